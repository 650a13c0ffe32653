/// Why a credential refresh did not produce a new token pair.
///
/// Cloneable: the initiator and every queued request receive the same value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RefreshError {
    /// The refresh call never got a response (connection failure, transport timeout).
    #[error("refresh request failed: {0}")]
    Transport(String),

    /// The refresh endpoint answered but refused to issue tokens.
    #[error("refresh rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The refresh endpoint answered 2xx with a payload that is not a token pair.
    #[error("malformed refresh response: {0}")]
    Malformed(String),

    /// The session held no refresh token, so no refresh was attempted.
    #[error("no refresh token in session")]
    NoRefreshToken,

    /// The configured refresh timeout elapsed.
    #[error("refresh timed out")]
    Timeout,

    /// The request that started the refresh was dropped before it settled.
    #[error("refresh abandoned by its initiator")]
    Abandoned,
}
