use std::future::Future;

use super::request::{ApiRequest, ApiResponse};
use crate::error::Error;

/// Raw HTTP exchange used by the gateway.
///
/// Implementations send exactly one request and report whatever the server
/// answered, including non-2xx statuses. Only failures to obtain a response
/// (connection errors, timeouts) are errors. Refresh coordination lives
/// above this trait, so the gateway also uses it directly for the refresh
/// call without re-entering its own interception.
///
/// # Example
///
/// ```rust,ignore
/// impl Transport for RecordingTransport {
///     async fn send(
///         &self,
///         request: &ApiRequest,
///         bearer: Option<&str>,
///     ) -> Result<ApiResponse, storefront_client::Error> {
///         self.log.lock().push((request.path().to_owned(), bearer.map(str::to_owned)));
///         self.inner.send(request, bearer).await
///     }
/// }
/// ```
pub trait Transport: Send + Sync + 'static {
    /// Send `request`, attaching `Authorization: Bearer <bearer>` when given.
    fn send(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> impl Future<Output = Result<ApiResponse, Error>> + Send;
}

/// Consumer-provided hook for the "go to login" side effect.
///
/// Called once per unrecoverable authentication failure, after the session
/// has been cleared. Closures `Fn(&str)` implement it directly.
pub trait LoginNavigator: Send + Sync + 'static {
    fn navigate_to_login(&self, login_path: &str);
}

impl<F> LoginNavigator for F
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn navigate_to_login(&self, login_path: &str) {
        self(login_path);
    }
}

/// Navigator that only records the event in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl LoginNavigator for LogNavigator {
    fn navigate_to_login(&self, login_path: &str) {
        tracing::info!(login_path, "Session expired; login required");
    }
}
