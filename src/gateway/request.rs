use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::types::ApiEnvelope;

/// A replayable request description.
///
/// Requests are plain data so the gateway can send the same call again after
/// a credential refresh. The `Authorization` header is never part of it; the
/// gateway attaches the bearer at dispatch time.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: RequestBody,
    pub(crate) retried: bool,
}

/// Request payload.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FilePart>),
}

/// One file field of a multipart upload.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl ApiRequest {
    /// Request against `path`, relative to the configured base URL.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            retried: false,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a query parameter only when a value is present.
    #[must_use]
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Serialize `body` as the JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if `body` cannot be represented as JSON.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, Error> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Add a file field to a multipart payload.
    #[must_use]
    pub fn file(mut self, part: FilePart) -> Self {
        match &mut self.body {
            RequestBody::Multipart(parts) => parts.push(part),
            body => *body = RequestBody::Multipart(vec![part]),
        }
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    #[must_use]
    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Whether this request already went through a refresh-and-retry cycle.
    #[must_use]
    pub fn is_retried(&self) -> bool {
        self.retried
    }
}

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ApiResponse {
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Response with a JSON body and no headers (handy for custom transports).
    #[must_use]
    pub fn from_json(status: StatusCode, body: &serde_json::Value) -> Self {
        Self::new(status, HeaderMap::new(), body.to_string())
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(Into::into)
    }

    /// Decode the `ApiResponse<T>` envelope and return its payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] on a malformed body, or [`Error::Api`] if the
    /// envelope reports failure or carries no data.
    pub fn data<T: DeserializeOwned>(&self) -> Result<T, Error> {
        self.json::<ApiEnvelope<T>>()?.into_data()
    }

    /// Decode an `ApiResponse<Void>` envelope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] on a malformed body, or [`Error::Api`] if the
    /// envelope reports failure.
    pub fn ack(&self) -> Result<(), Error> {
        self.json::<ApiEnvelope<serde_json::Value>>()?.into_unit()
    }

    /// Pass 2xx responses through; turn anything else into [`Error::Status`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Status`] for every non-success status.
    pub fn error_for_status(self) -> Result<Self, Error> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(self.into_status_error())
        }
    }

    /// Build the status error, using the backend's error envelope when present.
    #[must_use]
    pub fn into_status_error(self) -> Error {
        let envelope = serde_json::from_slice::<ApiEnvelope<serde_json::Value>>(&self.body).ok();
        let (code, message) = match envelope {
            Some(env) => (
                env.code,
                env.message
                    .unwrap_or_else(|| self.status.canonical_reason().unwrap_or("").to_string()),
            ),
            None => (None, self.text()),
        };
        Error::Status {
            status: self.status,
            code,
            message,
        }
    }
}
