/// Errors that can occur when talking to the dashboard API.
///
/// # Examples
///
/// ```rust
/// use fleetmon_client::error::ClientError;
///
/// let err = ClientError::Api { code: 403, message: "invalid token".to_string() };
/// assert!(err.to_string().contains("invalid token"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An underlying HTTP transport error from `reqwest`.
    #[error("dashboard network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx HTTP status from the dashboard.
    #[error("dashboard HTTP error: status={status}, body={body}")]
    Http { status: u16, body: String },

    /// The dashboard returned a 2xx status but the payload signals a logical
    /// error.
    #[error("dashboard API error: code={code}, message={message}")]
    Api { code: i64, message: String },

    /// A success envelope arrived without its result payload.
    #[error("dashboard API response missing result payload")]
    EmptyResult,
}

/// Convenience type alias so callers can write `error::Result<T>`.
pub type Result<T> = std::result::Result<T, ClientError>;
