#![doc = include_str!("../README.md")]

pub mod cart;
pub mod error;
pub mod gateway;
pub mod session;
pub mod types;

#[cfg(feature = "api")]
pub mod api;

// Re-exports for convenient access
pub use cart::{Cart, CartItem, CartProduct, OrderLine};
pub use error::Error;
pub use gateway::{
    ApiRequest, ApiResponse, FilePart, Gateway, GatewayConfig, LogNavigator, LoginNavigator,
    RefreshError, RequestBody, ReqwestTransport, Transport,
};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
pub use types::{
    ApiEnvelope, CategoryId, Member, MemberId, OrderId, OrderItemId, Page, PaymentId, ProductId,
    Role, TokenPair,
};

#[cfg(feature = "api")]
pub use api::StorefrontClient;
