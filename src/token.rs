//! Immutable token values derived from endpoint responses.

// self
use crate::{_prelude::*, endpoint::TokenResponse};

/// Immutable snapshot of an issued token set.
///
/// A fetch or refresh always produces a brand-new value; nothing mutates a published token.
/// Relative lifetimes from the endpoint response (`expires_in` and friends) are anchored to the
/// instant the response was received, so expiry arithmetic follows the client clock rather than
/// the server clock.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
	/// Bearer credential presented on protected requests.
	pub access_token: String,
	/// Absolute instant at which the access token lapses.
	pub expires_at: OffsetDateTime,
	/// Refresh credential; empty when the endpoint issued none.
	pub refresh_token: String,
	/// Absolute instant at which the refresh token lapses.
	pub refresh_expires_at: OffsetDateTime,
	/// Token type reported by the endpoint (typically `Bearer`).
	pub token_type: String,
	/// Not-before instant; informational metadata only, never enforced as a validity constraint.
	pub not_before: OffsetDateTime,
	/// Session identifier reported by the endpoint.
	pub session_state: String,
	/// Scope actually granted.
	pub scope: String,
}
impl Token {
	pub(crate) fn from_response(response: TokenResponse, received_at: OffsetDateTime) -> Self {
		Self {
			access_token: response.access_token,
			expires_at: received_at + Duration::seconds(response.expires_in),
			refresh_token: response.refresh_token,
			refresh_expires_at: received_at + Duration::seconds(response.refresh_expires_in),
			token_type: response.token_type,
			not_before: received_at + Duration::seconds(response.not_before_policy),
			session_state: response.session_state,
			scope: response.scope,
		}
	}

	/// Returns `true` when the endpoint issued a refresh token alongside the access token.
	pub fn has_refresh_token(&self) -> bool {
		!self.refresh_token.is_empty()
	}

	/// Returns `true` when the access token, shortened by `buffer`, has lapsed at `instant`.
	pub fn is_access_expired(&self, instant: OffsetDateTime, buffer: Duration) -> bool {
		self.expires_at - buffer <= instant
	}

	/// Returns `true` when the refresh token, shortened by `buffer`, has lapsed at `instant`.
	pub fn is_refresh_expired(&self, instant: OffsetDateTime, buffer: Duration) -> bool {
		self.refresh_expires_at - buffer <= instant
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token")
			.field("access_token", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.field(
				"refresh_token",
				&if self.refresh_token.is_empty() { "<none>" } else { "<redacted>" },
			)
			.field("refresh_expires_at", &self.refresh_expires_at)
			.field("token_type", &self.token_type)
			.field("not_before", &self.not_before)
			.field("session_state", &self.session_state)
			.field("scope", &self.scope)
			.finish()
	}
}
