use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::StatusCode;
use serde::Serialize;

use super::config::GatewayConfig;
use super::error::RefreshError;
use super::refresh::{RefreshCoordinator, Ticket};
use super::request::{ApiRequest, ApiResponse};
use super::traits::{LogNavigator, LoginNavigator, Transport};
use super::transport::ReqwestTransport;
use crate::error::Error;
use crate::session::SessionStore;
use crate::types::{ApiEnvelope, TokenPair};

/// Authenticated request gateway.
///
/// Every call carries the session's access token. When the backend answers
/// `401`, the gateway refreshes the credentials once (no matter how many
/// requests failed together), replays each affected request once with the
/// new token, and only surfaces an error when the session cannot be
/// restored. Cheap to clone; clones share session, transport and refresh
/// state.
pub struct Gateway<T = ReqwestTransport> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    config: GatewayConfig,
    transport: T,
    session: Arc<dyn SessionStore>,
    navigator: RwLock<Arc<dyn LoginNavigator>>,
    refresh: RefreshCoordinator,
}

// Manual Clone: avoid derive adding a `T: Clone` bound.
impl<T> Clone for Gateway<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

impl Gateway<ReqwestTransport> {
    /// Gateway over HTTP using the config's base URL and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be built.
    pub fn new(config: GatewayConfig, session: Arc<dyn SessionStore>) -> Result<Self, Error> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, transport, session))
    }
}

impl<T: Transport> Gateway<T> {
    /// Gateway over a custom transport.
    #[must_use]
    pub fn with_transport(config: GatewayConfig, transport: T, session: Arc<dyn SessionStore>) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                transport,
                session,
                navigator: RwLock::new(Arc::new(LogNavigator)),
                refresh: RefreshCoordinator::default(),
            }),
        }
    }

    /// Replace the login navigator.
    #[must_use]
    pub fn with_navigator(self, navigator: impl LoginNavigator) -> Self {
        self.set_navigator(navigator);
        self
    }

    /// Replace the login navigator for this gateway and every clone of it.
    pub fn set_navigator(&self, navigator: impl LoginNavigator) {
        *self.inner.navigator.write() = Arc::new(navigator);
    }

    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.inner.session
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// Whether a credential refresh is currently in flight.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.inner.refresh.is_refreshing()
    }

    /// Number of requests waiting on the in-flight refresh.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.inner.refresh.pending_len()
    }

    /// Send `request`, transparently recovering from an expired access token.
    ///
    /// # Errors
    ///
    /// - [`Error::Http`] / [`Error::Timeout`] when no response was obtained.
    /// - [`Error::Status`] for non-2xx responses, including a `401` that could
    ///   not be recovered (no refresh token, or still `401` after the retry).
    /// - [`Error::Refresh`] when the credential refresh itself failed; the
    ///   session has been cleared and the user sent to the login page.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, Error> {
        let bearer = self.inner.session.access_token();
        let response = self
            .inner
            .transport
            .send(&request, bearer.as_deref())
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return response.error_for_status();
        }

        self.recover(request, bearer, response.into_status_error())
            .await
    }

    /// Send and unwrap the `ApiResponse<T>` envelope.
    ///
    /// # Errors
    ///
    /// Everything [`send`](Self::send) returns, plus [`Error::Json`] /
    /// [`Error::Api`] for an unusable envelope.
    pub async fn fetch<D: serde::de::DeserializeOwned>(&self, request: ApiRequest) -> Result<D, Error> {
        self.send(request).await?.data()
    }

    async fn recover(
        &self,
        mut request: ApiRequest,
        used_bearer: Option<String>,
        unauthorized: Error,
    ) -> Result<ApiResponse, Error> {
        if request.retried {
            tracing::debug!(path = request.path(), "Unauthorized after retry; giving up");
            return Err(unauthorized);
        }

        let lease = match self.inner.refresh.enter() {
            Ticket::Wait(rx) => {
                tracing::debug!(path = request.path(), "Queued behind in-flight refresh");
                let token = rx.await.unwrap_or(Err(RefreshError::Abandoned))?;
                request.retried = true;
                return self.replay(&request, &token).await;
            }
            Ticket::Lead(lease) => lease,
        };
        request.retried = true;

        // Session reads happen under the lease: a refresh that settled just
        // before it was taken has already stored its pair.
        if let Some(current) = self
            .inner
            .session
            .access_token()
            .filter(|current| used_bearer.as_deref() != Some(current.as_str()))
        {
            tracing::debug!(path = request.path(), "Replaying with newer access token");
            lease.settle(Ok(current.clone()));
            return self.replay(&request, &current).await;
        }

        let Some(refresh_token) = self.inner.session.refresh_token() else {
            lease.settle(Err(RefreshError::NoRefreshToken));
            self.expire_session("no refresh token");
            return Err(unauthorized);
        };

        tracing::info!(path = request.path(), "Access token expired; refreshing");
        match self.refresh_credentials(&refresh_token).await {
            Ok(tokens) => {
                if let Err(e) = self.inner.session.set_credentials(&tokens) {
                    tracing::warn!(error = %e, "Failed to persist refreshed credentials");
                }
                let released = lease.settle(Ok(tokens.access_token.clone()));
                tracing::info!(released, "Credential refresh succeeded");
                self.replay(&request, &tokens.access_token).await
            }
            Err(e) => {
                let rejected = lease.settle(Err(e.clone()));
                tracing::warn!(error = %e, rejected, "Credential refresh failed");
                self.expire_session("refresh failed");
                Err(Error::Refresh(e))
            }
        }
    }

    async fn replay(&self, request: &ApiRequest, token: &str) -> Result<ApiResponse, Error> {
        self.inner
            .transport
            .send(request, Some(token))
            .await?
            .error_for_status()
    }

    /// Call the refresh endpoint on the raw transport, outside interception.
    async fn refresh_credentials(&self, refresh_token: &str) -> Result<TokenPair, RefreshError> {
        let request = ApiRequest::post(self.inner.config.refresh_path())
            .json(&RefreshRequest { refresh_token })
            .map_err(|e| RefreshError::Malformed(e.to_string()))?;

        let call = self.inner.transport.send(&request, None);
        let response = match self.inner.config.refresh_timeout() {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| RefreshError::Timeout)?,
            None => call.await,
        }
        .map_err(|e| match e {
            Error::Timeout => RefreshError::Timeout,
            other => RefreshError::Transport(other.to_string()),
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.into_status_error() {
                Error::Status { message, .. } => message,
                other => other.to_string(),
            };
            return Err(RefreshError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ApiEnvelope<TokenPair> = response
            .json()
            .map_err(|e| RefreshError::Malformed(e.to_string()))?;
        if !envelope.success {
            return Err(RefreshError::Rejected {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| "token refresh failed".into()),
            });
        }
        let tokens = envelope
            .data
            .ok_or_else(|| RefreshError::Malformed("missing token pair".into()))?;
        if tokens.access_token.is_empty() {
            return Err(RefreshError::Malformed("empty access token".into()));
        }
        Ok(tokens)
    }

    fn expire_session(&self, reason: &'static str) {
        tracing::warn!(reason, "Session expired; clearing credentials");
        if let Err(e) = self.inner.session.clear() {
            tracing::warn!(error = %e, "Failed to clear stored session");
        }
        let navigator = self.inner.navigator.read().clone();
        navigator.navigate_to_login(self.inner.config.login_path());
    }
}
