//! Authenticated request gateway.
//!
//! Wraps every backend call so that it carries the current access token and
//! so that an expired token costs one refresh, however many requests noticed
//! it at the same time.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use storefront_client::gateway::{ApiRequest, Gateway, GatewayConfig};
//! use storefront_client::session::MemorySessionStore;
//!
//! let session = Arc::new(MemorySessionStore::new());
//! let gateway = Gateway::new(GatewayConfig::from_env()?, session)?
//!     .with_navigator(|login: &str| router.replace(login));
//!
//! let me: serde_json::Value = gateway.fetch(ApiRequest::get("/members/me")).await?;
//! ```
//!
//! # Refresh protocol
//!
//! 1. A `401` on a request that has not been retried yet triggers recovery.
//! 2. Without a refresh token the session is cleared, the navigator is sent
//!    to the login path and the `401` is returned.
//! 3. The first request to recover becomes the initiator and calls the
//!    refresh endpoint directly on the [`Transport`]. Requests that hit `401`
//!    meanwhile queue behind it.
//! 4. On success the new pair is stored, every queued request is replayed
//!    once with the new token (FIFO handover), then the initiator replays.
//! 5. On failure every queued request and the initiator fail with the same
//!    [`RefreshError`]; the session is cleared once and the navigator fires
//!    once.

mod client;
mod config;
mod error;
mod refresh;
mod request;
mod traits;
mod transport;

pub use client::Gateway;
pub use config::GatewayConfig;
pub use error::RefreshError;
pub use request::{ApiRequest, ApiResponse, FilePart, RequestBody};
pub use traits::{LogNavigator, LoginNavigator, Transport};
pub use transport::ReqwestTransport;
