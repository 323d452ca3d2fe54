//! Error types shared by the token lifecycle manager and its collaborators.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical error exposed by public APIs.
///
/// Every variant is cheaply cloneable so a single failure can be broadcast to all callers
/// awaiting the same single-flight token computation.
#[derive(Clone, Debug, ThisError)]
pub enum Error {
	/// Transport-level failure (DNS, TCP, TLS) while calling the token endpoint.
	#[error("Network error occurred while calling the token endpoint.")]
	Transport(#[source] Arc<reqwest::Error>),
	/// Response body did not match the expected schema.
	///
	/// Raised for 2xx responses that fail to parse as a token payload and for non-2xx responses
	/// whose body fails to parse as a structured rejection.
	#[error("Token endpoint returned an invalid response (HTTP {status}).")]
	InvalidResponse {
		/// HTTP status code of the offending response.
		status: u16,
		/// Structured parsing failure pointing at the offending field.
		#[source]
		source: Arc<serde_path_to_error::Error<serde_json::Error>>,
	},
	/// Structured rejection returned by the token endpoint.
	#[error("Token endpoint rejected the request (HTTP {status}): [{code}] {description}.")]
	Rejected {
		/// HTTP status code of the rejection.
		status: u16,
		/// Machine-readable `error` code reported by the endpoint.
		code: String,
		/// Human-readable `error_description` reported by the endpoint.
		description: String,
	},
	/// The caller's cancellation signal fired while waiting for a token.
	#[error("Token request was cancelled by the caller.")]
	Cancelled,
	/// The in-flight token computation terminated without publishing a result.
	#[error("In-flight token request terminated without a result.")]
	Interrupted,
}
impl Error {
	/// Returns the HTTP status associated with this error, when one exists.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Transport(source) => source.status().map(|status| status.as_u16()),
			Self::InvalidResponse { status, .. } | Self::Rejected { status, .. } => Some(*status),
			Self::Cancelled | Self::Interrupted => None,
		}
	}

	/// Returns `true` when a failed refresh grant should fall back to full reacquisition.
	///
	/// Only the unauthorized/bad-request classes mark the refresh token as unusable. The
	/// classification goes by HTTP status rather than payload shape, so a 400/401 with an
	/// unparseable body still triggers the fallback; every other error propagates to the callers
	/// awaiting the computation.
	pub(crate) fn invalidates_refresh_token(&self) -> bool {
		matches!(
			self,
			Self::Rejected { status: 400 | 401, .. }
				| Self::InvalidResponse { status: 400 | 401, .. }
		)
	}
}
impl From<reqwest::Error> for Error {
	fn from(e: reqwest::Error) -> Self {
		Self::Transport(Arc::new(e))
	}
}
