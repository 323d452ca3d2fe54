//! Demand-driven OAuth 2.0 bearer tokens for [`reqwest`].
//!
//! The entry point is [`TokenManager`](manager::TokenManager): configure it once with
//! [`TokenOptions`](config::TokenOptions), then call
//! [`token`](manager::TokenManager::token) whenever a request needs a credential. The manager
//! caches the last issued token, coalesces concurrent acquisitions into a single endpoint
//! request, and renews on demand via the `refresh_token` grant with a fall back to a full
//! `client_credentials` or `password` grant.
//!
//! With the default `middleware` feature the whole lifecycle hides behind
//! [`BearerAuth`](middleware::BearerAuth), a [`reqwest_middleware`] stage that injects
//! `Authorization: Bearer` headers transparently.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

mod cache;
pub mod clock;
pub mod config;
mod endpoint;
pub mod error;
pub mod manager;
#[cfg(feature = "middleware")] pub mod middleware;
pub mod token;

pub use error::{Error, Result};

/// Re-exports of foundational crates appearing in this crate's public API.
pub use reqwest;
pub use time;
pub use tokio_util;
pub use url;

mod _prelude {
	pub use std::{
		fmt::{Debug, Formatter, Result as FmtResult},
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(test)] use wiremock as _;
