//! Typed facades over the storefront REST API.
//!
//! Every call goes through the [`Gateway`], so all of them share token
//! attachment and transparent credential refresh.
//!
//! ```no_run
//! use std::sync::Arc;
//! use storefront_client::api::StorefrontClient;
//! use storefront_client::{GatewayConfig, MemorySessionStore};
//!
//! # async fn run() -> Result<(), storefront_client::Error> {
//! let client = StorefrontClient::new(
//!     GatewayConfig::from_env()?,
//!     Arc::new(MemorySessionStore::new()),
//! )?;
//!
//! client.auth().login("kim@example.com", "secret123").await?;
//! let page = client.products().list(0, 20).await?;
//! println!("{} products", page.total_elements);
//! # Ok(())
//! # }
//! ```

mod admin;
mod auth;
mod events;
mod members;
pub mod models;
mod orders;
mod products;

use std::sync::Arc;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use events::EventApi;
pub use members::MemberApi;
pub use orders::OrderApi;
pub use products::ProductApi;

use crate::error::Error;
use crate::gateway::{Gateway, GatewayConfig, LoginNavigator, ReqwestTransport, Transport};
use crate::session::SessionStore;

/// Entry point for the typed API.
///
/// Cheap to clone; clones share the gateway (session, transport, refresh state).
pub struct StorefrontClient<T = ReqwestTransport> {
    gateway: Gateway<T>,
}

impl<T> Clone for StorefrontClient<T> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
        }
    }
}

impl StorefrontClient<ReqwestTransport> {
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be built.
    pub fn new(config: GatewayConfig, session: Arc<dyn SessionStore>) -> Result<Self, Error> {
        Ok(Self::with_gateway(Gateway::new(config, session)?))
    }
}

impl<T: Transport> StorefrontClient<T> {
    #[must_use]
    pub fn with_gateway(gateway: Gateway<T>) -> Self {
        Self { gateway }
    }

    /// Replace the login navigator for this client and every clone of it.
    #[must_use]
    pub fn with_navigator(self, navigator: impl LoginNavigator) -> Self {
        Self {
            gateway: self.gateway.with_navigator(navigator),
        }
    }

    #[must_use]
    pub fn gateway(&self) -> &Gateway<T> {
        &self.gateway
    }

    #[must_use]
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        self.gateway.session()
    }

    #[must_use]
    pub fn auth(&self) -> AuthApi<'_, T> {
        AuthApi::new(&self.gateway)
    }

    #[must_use]
    pub fn members(&self) -> MemberApi<'_, T> {
        MemberApi::new(&self.gateway)
    }

    #[must_use]
    pub fn products(&self) -> ProductApi<'_, T> {
        ProductApi::new(&self.gateway)
    }

    #[must_use]
    pub fn orders(&self) -> OrderApi<'_, T> {
        OrderApi::new(&self.gateway)
    }

    #[must_use]
    pub fn admin(&self) -> AdminApi<'_, T> {
        AdminApi::new(&self.gateway)
    }

    #[must_use]
    pub fn events(&self) -> EventApi<'_, T> {
        EventApi::new(&self.gateway)
    }
}
