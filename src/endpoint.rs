//! Raw token endpoint client speaking the OAuth 2.0 wire protocol.

// self
use crate::{_prelude::*, clock::Clock, config::TokenOptions, token::Token};

/// Grant submitted to the token endpoint.
#[derive(Clone, Debug)]
pub(crate) enum Grant {
	/// `client_credentials` grant authenticated by the client secret alone.
	ClientCredentials,
	/// `password` grant carrying the configured resource-owner credentials.
	Password,
	/// `refresh_token` grant exchanging the carried refresh token.
	Refresh(String),
}
impl Grant {
	pub(crate) fn grant_type(&self) -> &'static str {
		match self {
			Self::ClientCredentials => "client_credentials",
			Self::Password => "password",
			Self::Refresh(_) => "refresh_token",
		}
	}
}

/// Form body of a token request; unset fields are omitted entirely rather than sent empty.
#[derive(Debug, Serialize)]
struct TokenRequestForm<'a> {
	grant_type: &'static str,
	client_id: &'a str,
	client_secret: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	username: Option<&'a str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	password: Option<&'a str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	scope: Option<&'a str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	audience: Option<&'a str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	refresh_token: Option<&'a str>,
}

/// Successful token payload as it appears on the wire.
///
/// Only `access_token` and `expires_in` are mandatory; Keycloak-style extras default to their
/// zero values when absent.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
	pub access_token: String,
	pub expires_in: i64,
	#[serde(default)]
	pub refresh_token: String,
	#[serde(default)]
	pub refresh_expires_in: i64,
	#[serde(default)]
	pub token_type: String,
	#[serde(default, rename = "not-before-policy")]
	pub not_before_policy: i64,
	#[serde(default)]
	pub session_state: String,
	#[serde(default)]
	pub scope: String,
}

/// Structured rejection payload per RFC 6749 §5.2.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
	error: String,
	#[serde(default)]
	error_description: String,
}

/// Stateless client exchanging grants for tokens at a single endpoint.
///
/// Holds no token state of its own; every call performs exactly one HTTP round trip.
#[derive(Clone)]
pub(crate) struct TokenEndpointClient {
	http: reqwest::Client,
	options: Arc<TokenOptions>,
	clock: Arc<dyn Clock>,
}
impl TokenEndpointClient {
	pub(crate) fn new(http: reqwest::Client, options: Arc<TokenOptions>, clock: Arc<dyn Clock>) -> Self {
		Self { http, options, clock }
	}

	pub(crate) fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Exchanges the grant for a fresh [`Token`].
	///
	/// Relative lifetimes in the response are anchored to the clock instant at which the response
	/// was received.
	#[tracing::instrument(
		err,
		skip_all,
		fields(grant_type = grant.grant_type(), token_endpoint = %self.options.token_endpoint)
	)]
	pub(crate) async fn request_token(&self, grant: Grant) -> Result<Token> {
		let options = &*self.options;
		let form = match &grant {
			Grant::ClientCredentials => TokenRequestForm {
				grant_type: grant.grant_type(),
				client_id: &options.client_id,
				client_secret: &options.client_secret,
				username: None,
				password: None,
				scope: Some(&options.scope),
				audience: options.audience.as_deref(),
				refresh_token: None,
			},
			Grant::Password => TokenRequestForm {
				grant_type: grant.grant_type(),
				client_id: &options.client_id,
				client_secret: &options.client_secret,
				username: options.username.as_deref(),
				password: options.password.as_deref(),
				scope: Some(&options.scope),
				audience: options.audience.as_deref(),
				refresh_token: None,
			},
			Grant::Refresh(refresh_token) => TokenRequestForm {
				grant_type: grant.grant_type(),
				client_id: &options.client_id,
				client_secret: &options.client_secret,
				username: None,
				password: None,
				scope: Some(&options.scope),
				audience: None,
				refresh_token: Some(refresh_token),
			},
		};
		let response =
			self.http.post(options.token_endpoint.clone()).form(&form).send().await?;
		let status = response.status();
		let received_at = self.clock.now();
		let body = response.bytes().await?;

		if status.is_success() {
			let response = parse_json::<TokenResponse>(&body).map_err(|e| {
				Error::InvalidResponse { status: status.as_u16(), source: Arc::new(e) }
			})?;

			tracing::debug!("Token endpoint issued a new token.");

			Ok(Token::from_response(response, received_at))
		} else {
			let rejection = parse_json::<ErrorResponse>(&body).map_err(|e| {
				Error::InvalidResponse { status: status.as_u16(), source: Arc::new(e) }
			})?;

			Err(Error::Rejected {
				status: status.as_u16(),
				code: rejection.error,
				description: rejection.error_description,
			})
		}
	}
}
impl Debug for TokenEndpointClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenEndpointClient").field("options", &self.options).finish()
	}
}

fn parse_json<'a, T>(body: &'a [u8]) -> Result<T, serde_path_to_error::Error<serde_json::Error>>
where
	T: Deserialize<'a>,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
}
