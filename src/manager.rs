//! Demand-driven token lifecycle manager.

// std
use std::future::Future;
// crates.io
use tokio_util::sync::CancellationToken;
// self
use crate::{
	_prelude::*,
	cache::{Flight, TokenCache},
	clock::{Clock, SystemClock},
	config::TokenOptions,
	endpoint::{Grant, TokenEndpointClient},
	token::Token,
};

/// Demand-driven acquirer and refresher of bearer tokens for one credential set.
///
/// There is no background timer; every [`token`](Self::token) call checks the cached token's
/// expiry against the clock and renews on demand. Renewal prefers the `refresh_token` grant and
/// falls back to a full grant when the endpoint reports the refresh token unusable. Clones share
/// the cache, so concurrent callers across clones coalesce onto a single endpoint request.
#[derive(Clone)]
pub struct TokenManager {
	options: Arc<TokenOptions>,
	endpoint: TokenEndpointClient,
	cache: Arc<TokenCache>,
	clock: Arc<dyn Clock>,
}
impl TokenManager {
	/// Creates a manager with a fresh [`reqwest::Client`].
	pub fn new(options: TokenOptions) -> Self {
		Self::with_http_client(options, reqwest::Client::new())
	}

	/// Creates a manager reusing the provided HTTP client for endpoint calls.
	pub fn with_http_client(options: TokenOptions, http: reqwest::Client) -> Self {
		let options = Arc::new(options);
		let clock = Arc::new(SystemClock) as Arc<dyn Clock>;

		Self {
			endpoint: TokenEndpointClient::new(http, options.clone(), clock.clone()),
			cache: Arc::new(TokenCache::default()),
			options,
			clock,
		}
	}

	/// Replaces the clock consulted for expiry decisions and timestamp anchoring.
	pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
		let clock = Arc::new(clock) as Arc<dyn Clock>;

		self.endpoint = self.endpoint.with_clock(clock.clone());
		self.clock = clock;

		self
	}

	/// Returns a currently-valid token, acquiring or renewing one if necessary.
	pub async fn token(&self) -> Result<Token> {
		self.token_with_cancellation(&CancellationToken::new()).await
	}

	/// Like [`token`](Self::token), but abandons the wait when `cancellation` fires.
	///
	/// Cancellation detaches this caller only; an in-flight endpoint request keeps running and
	/// its result remains available to every other caller.
	pub async fn token_with_cancellation(
		&self,
		cancellation: &CancellationToken,
	) -> Result<Token> {
		let flight = self.cache.get_or_install({
			let endpoint = self.endpoint.clone();
			let grant = self.full_grant();

			move || async move { endpoint.request_token(grant).await }
		});
		let token = self.wait(&flight, cancellation).await?;

		if !token.is_access_expired(self.clock.now(), self.options.expiry_buffer) {
			return Ok(token);
		}

		tracing::debug!("Cached access token lapsed; renewing.");

		self.cache.evict(&flight);

		let flight = self.cache.get_or_install(|| self.renewal(token));

		self.wait(&flight, cancellation).await
	}

	fn full_grant(&self) -> Grant {
		if self.options.has_username() { Grant::Password } else { Grant::ClientCredentials }
	}

	fn renewal(&self, stale: Token) -> impl Future<Output = Result<Token>> + Send + 'static {
		let endpoint = self.endpoint.clone();
		let fallback = self.full_grant();
		let buffer = self.options.expiry_buffer;
		let clock = self.clock.clone();

		async move {
			if stale.has_refresh_token() && !stale.is_refresh_expired(clock.now(), buffer) {
				match endpoint.request_token(Grant::Refresh(stale.refresh_token)).await {
					Ok(token) => return Ok(token),
					Err(e) if e.invalidates_refresh_token() => {
						tracing::warn!(
							status = e.status(),
							"Refresh token was not accepted; falling back to a full grant."
						);
					},
					Err(e) => return Err(e),
				}
			}

			endpoint.request_token(fallback).await
		}
	}

	async fn wait(&self, flight: &Flight, cancellation: &CancellationToken) -> Result<Token> {
		tokio::select! {
			result = flight.wait() => result,
			_ = cancellation.cancelled() => Err(Error::Cancelled),
		}
	}
}
impl Debug for TokenManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager").field("options", &self.options).finish()
	}
}
