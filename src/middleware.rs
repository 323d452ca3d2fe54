//! [`reqwest_middleware`] stage injecting `Authorization: Bearer` headers on demand.

// crates.io
use http::Extensions;
use reqwest::{
	Request, Response,
	header::{self, HeaderValue},
};
use reqwest_middleware::{Middleware, Next};
// self
use crate::manager::TokenManager;

/// Middleware attaching a bearer token from a [`TokenManager`] to outgoing requests.
///
/// Requests already carrying an `Authorization` header pass through untouched, so callers can
/// override the credential per request. Token acquisition happens lazily on the first request
/// that needs it.
///
/// ```rust,no_run
/// use auto_bearer::{config::TokenOptions, manager::TokenManager, middleware::BearerAuth};
///
/// # fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let options = TokenOptions::new(
/// 	auto_bearer::url::Url::parse("https://id.example.com/token")?,
/// 	"client",
/// 	"secret",
/// );
/// let client = reqwest_middleware::ClientBuilder::new(reqwest::Client::new())
/// 	.with(BearerAuth::new(TokenManager::new(options)))
/// 	.build();
/// # let _ = client;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct BearerAuth {
	manager: TokenManager,
}
impl BearerAuth {
	/// Wraps the manager into a middleware stage.
	pub fn new(manager: TokenManager) -> Self {
		Self { manager }
	}
}
#[async_trait::async_trait]
impl Middleware for BearerAuth {
	async fn handle(
		&self,
		mut req: Request,
		extensions: &mut Extensions,
		next: Next<'_>,
	) -> reqwest_middleware::Result<Response> {
		if !req.headers().contains_key(header::AUTHORIZATION) {
			let token =
				self.manager.token().await.map_err(reqwest_middleware::Error::middleware)?;
			let mut value = HeaderValue::from_str(&format!("Bearer {}", token.access_token))
				.map_err(reqwest_middleware::Error::middleware)?;

			value.set_sensitive(true);

			req.headers_mut().insert(header::AUTHORIZATION, value);
		}

		next.run(req, extensions).await
	}
}
