use std::time::Duration;

use url::Url;

use crate::error::Error;

/// Gateway configuration.
///
/// The base URL is the only required field and is a constructor parameter.
/// Everything else has a default and a `with_*` override.
///
/// ```rust,ignore
/// use storefront_client::GatewayConfig;
///
/// let config = GatewayConfig::new("https://shop.example.com/api".parse()?)
///     .with_timeout(std::time::Duration::from_secs(5))
///     .with_refresh_timeout(std::time::Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct GatewayConfig {
    pub(crate) base_url: Url,
    pub(crate) timeout: Duration,
    pub(crate) refresh_path: String,
    pub(crate) login_path: String,
    pub(crate) refresh_timeout: Option<Duration>,
}

impl GatewayConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8081/api";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Self::DEFAULT_TIMEOUT,
            refresh_path: "/auth/refresh".into(),
            login_path: "/login".into(),
            refresh_timeout: None,
        }
    }

    /// Create config from environment variables.
    ///
    /// # Optional env vars
    /// - `STOREFRONT_API_URL`: backend base URL (default `http://localhost:8081/api`)
    /// - `STOREFRONT_TIMEOUT_MS`: per-request timeout in milliseconds (default 15000)
    /// - `STOREFRONT_REFRESH_TIMEOUT_MS`: bound on the refresh call (default: none)
    /// - `STOREFRONT_LOGIN_PATH`: login entry point handed to the navigator (default `/login`)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, Error> {
        let base_url = std::env::var("STOREFRONT_API_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string());
        let base_url: Url = base_url
            .parse()
            .map_err(|e| Error::Config(format!("STOREFRONT_API_URL: {e}")))?;

        let mut config = Self::new(base_url);

        if let Some(ms) = env_millis("STOREFRONT_TIMEOUT_MS")? {
            config = config.with_timeout(ms);
        }
        if let Some(ms) = env_millis("STOREFRONT_REFRESH_TIMEOUT_MS")? {
            config = config.with_refresh_timeout(ms);
        }
        if let Ok(path) = std::env::var("STOREFRONT_LOGIN_PATH") {
            config = config.with_login_path(path);
        }

        Ok(config)
    }

    /// Per-request timeout applied by the transport.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Path of the credential refresh endpoint, relative to the base URL.
    #[must_use]
    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    /// Login entry point passed to the [`LoginNavigator`](super::LoginNavigator).
    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Bound the refresh call separately from the transport timeout.
    ///
    /// Queued requests wait at most this long (plus the transport's own
    /// timeout) before failing with [`RefreshError::Timeout`](super::RefreshError::Timeout).
    #[must_use]
    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn refresh_path(&self) -> &str {
        &self.refresh_path
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    #[must_use]
    pub fn refresh_timeout(&self) -> Option<Duration> {
        self.refresh_timeout
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_BASE_URL
                .parse()
                .expect("valid default URL"),
        )
    }
}

fn env_millis(name: &str) -> Result<Option<Duration>, Error> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|e| Error::Config(format!("{name}: {e}"))),
        Err(_) => Ok(None),
    }
}
