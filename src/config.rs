//! Immutable credential configuration injected into the token manager once at construction.

// self
use crate::_prelude::*;

/// Credential set and policy knobs for a [`TokenManager`](crate::manager::TokenManager).
///
/// Constructed once and never mutated afterwards; the manager owns its options for its whole
/// lifetime and re-reads them on every full acquisition to select the grant type. A manager
/// serves exactly one credential set.
#[derive(Clone)]
pub struct TokenOptions {
	/// Token endpoint URL receiving every grant request.
	pub token_endpoint: Url,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Client secret for confidential clients.
	pub client_secret: String,
	/// Resource-owner username; a non-blank value switches full grants to `password`.
	pub username: Option<String>,
	/// Resource-owner password accompanying `username`.
	pub password: Option<String>,
	/// Scope requested on every grant.
	pub scope: String,
	/// Audience forwarded on full grants when set.
	pub audience: Option<String>,
	/// Safety buffer subtracted from expiry instants before comparison, so tokens are replaced
	/// slightly before they technically lapse.
	pub expiry_buffer: Duration,
}
impl TokenOptions {
	/// Scope requested when none is configured.
	pub const DEFAULT_SCOPE: &'static str = "openid";
	/// Expiry safety buffer applied when none is configured.
	pub const DEFAULT_EXPIRY_BUFFER: Duration = Duration::minutes(1);

	/// Creates options for the provided endpoint and client credentials, with the default scope
	/// and expiry buffer.
	pub fn new(
		token_endpoint: Url,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Self {
		Self {
			token_endpoint,
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			username: None,
			password: None,
			scope: Self::DEFAULT_SCOPE.into(),
			audience: None,
			expiry_buffer: Self::DEFAULT_EXPIRY_BUFFER,
		}
	}

	/// Sets the resource-owner username, switching full grants to the `password` grant.
	pub fn with_username(mut self, username: impl Into<String>) -> Self {
		self.username = Some(username.into());

		self
	}

	/// Sets the resource-owner password.
	pub fn with_password(mut self, password: impl Into<String>) -> Self {
		self.password = Some(password.into());

		self
	}

	/// Overrides the requested scope (defaults to `openid`).
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = scope.into();

		self
	}

	/// Sets the audience forwarded on full grants.
	pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
		self.audience = Some(audience.into());

		self
	}

	/// Overrides the expiry safety buffer (defaults to 1 minute); negative values clamp to zero.
	pub fn with_expiry_buffer(mut self, buffer: Duration) -> Self {
		self.expiry_buffer = if buffer.is_negative() { Duration::ZERO } else { buffer };

		self
	}

	/// Returns `true` when a non-blank username is configured.
	pub(crate) fn has_username(&self) -> bool {
		self.username.as_deref().is_some_and(|username| !username.trim().is_empty())
	}
}
impl Debug for TokenOptions {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenOptions")
			.field("token_endpoint", &self.token_endpoint.as_str())
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("username", &self.username)
			.field("password", &if self.password.is_some() { "<redacted>" } else { "<none>" })
			.field("scope", &self.scope)
			.field("audience", &self.audience)
			.field("expiry_buffer", &self.expiry_buffer)
			.finish()
	}
}
