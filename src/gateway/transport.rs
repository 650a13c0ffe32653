use reqwest::multipart::{Form, Part};
use url::Url;

use super::config::GatewayConfig;
use super::request::{ApiRequest, ApiResponse, RequestBody};
use super::traits::Transport;
use crate::error::Error;

/// [`Transport`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Build a transport with the config's base URL and per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the TLS backend cannot be initialised.
    pub fn new(config: &GatewayConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url().clone(),
        })
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `path` below the base URL, keeping the base's own path prefix.
    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        joined
            .parse()
            .map_err(|e| Error::Config(format!("invalid request URL {joined}: {e}")))
    }
}

impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, Error> {
        let url = self.endpoint(request.path())?;
        let mut builder = self.http.request(request.method().clone(), url);

        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(parts) => {
                let mut form = Form::new();
                for part in parts {
                    let mut field =
                        Part::bytes(part.bytes.to_vec()).file_name(part.file_name.clone());
                    if let Some(mime) = &part.content_type {
                        field = field.mime_str(mime)?;
                    }
                    form = form.part(part.field.clone(), field);
                }
                builder.multipart(form)
            }
        };

        let response = builder.send().await.map_err(map_send_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(map_send_error)?;

        tracing::debug!(
            method = %request.method(),
            path = request.path(),
            status = status.as_u16(),
            "HTTP exchange complete"
        );

        Ok(ApiResponse::new(status, headers, body))
    }
}

fn map_send_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout
    } else {
        Error::Http(e)
    }
}
