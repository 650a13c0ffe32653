use super::models::TrackEvent;
use crate::error::Error;
use crate::gateway::{ApiRequest, Gateway, ReqwestTransport, Transport};
use crate::types::ProductId;

/// Behaviour tracking and realtime counters.
pub struct EventApi<'a, T = ReqwestTransport> {
    gateway: &'a Gateway<T>,
}

impl<'a, T: Transport> EventApi<'a, T> {
    pub(crate) fn new(gateway: &'a Gateway<T>) -> Self {
        Self { gateway }
    }

    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn track(&self, event: &TrackEvent) -> Result<(), Error> {
        self.gateway
            .send(ApiRequest::post("/events").json(event)?)
            .await?
            .ack()
    }

    /// Send several events in one request. An empty batch is a no-op.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn track_batch(&self, events: &[TrackEvent]) -> Result<(), Error> {
        if events.is_empty() {
            return Ok(());
        }
        self.gateway
            .send(ApiRequest::post("/events/batch").json(events)?)
            .await?
            .ack()
    }

    /// Members active in the last few minutes.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn online_users(&self) -> Result<u64, Error> {
        self.gateway
            .fetch(ApiRequest::get("/events/realtime/online"))
            .await
    }

    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn product_views(&self, product_id: ProductId) -> Result<u64, Error> {
        self.gateway
            .fetch(ApiRequest::get(format!("/events/realtime/product/{product_id}/views")))
            .await
    }
}
