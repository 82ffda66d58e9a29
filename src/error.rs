use thiserror::Error;

/// Errors surfaced by [`crate::PegasusClient`] and the domain decoders.
///
/// Transport failures and non-2xx statuses are propagated as-is in
/// [`PegasusError::Http`]; the client never retries or reclassifies them.
#[derive(Debug, Error)]
pub enum PegasusError {
    /// A JSON payload did not carry the structure a decoder requires.
    #[error("invalid input data: {0}")]
    InvalidData(String),

    /// A caller-supplied argument violated a precondition before any
    /// network call was made.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The availability probe at construction time reported the remote
    /// service as down.
    #[error("pegasus service is unavailable")]
    ServiceUnavailable,

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, PegasusError>;
