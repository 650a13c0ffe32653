use crate::gateway::RefreshError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    /// The backend answered with a non-success status.
    ///
    /// `code` and `message` come from the `ApiResponse` error envelope when the
    /// body carries one, otherwise `message` holds the raw body.
    #[error("{} {message}", .status.as_u16())]
    Status {
        status: reqwest::StatusCode,
        code: Option<String>,
        message: String,
    },

    /// The backend answered 2xx but flagged the call as failed (`success: false`).
    #[error("API error{}: {message}", .code.as_deref().map(|c| format!(" [{c}]")).unwrap_or_default())]
    Api {
        code: Option<String>,
        message: String,
    },

    /// The session could not be restored; the caller's request was not retried.
    #[error("Session refresh failed: {0}")]
    Refresh(#[from] RefreshError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session storage error: {0}")]
    Storage(String),
}

impl Error {
    /// HTTP status of a backend rejection, if this error is one.
    #[must_use]
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `true` when the backend rejected the request as unauthenticated.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(reqwest::StatusCode::UNAUTHORIZED)
    }

    /// `true` when the error means the user has to log in again.
    #[must_use]
    pub fn is_session_invalid(&self) -> bool {
        matches!(self, Self::Refresh(_)) || self.is_unauthorized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display_is_status_and_message() {
        let err = Error::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            code: Some("P001".into()),
            message: "product not found".into(),
        };
        assert_eq!(err.to_string(), "404 product not found");
        assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
        assert!(!err.is_session_invalid());
    }

    #[test]
    fn api_error_display() {
        let err = Error::Api {
            code: Some("PAY001".into()),
            message: "duplicate payment".into(),
        };
        assert_eq!(err.to_string(), "API error [PAY001]: duplicate payment");

        let err = Error::Api {
            code: None,
            message: "failed".into(),
        };
        assert_eq!(err.to_string(), "API error: failed");
    }

    #[test]
    fn refresh_failure_invalidates_session() {
        let err = Error::from(RefreshError::Abandoned);
        assert!(err.is_session_invalid());
        assert!(err.status().is_none());
    }
}
