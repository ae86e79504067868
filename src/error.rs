use thiserror::Error;

/// Failures surfaced to the user. Remote-provided messages are carried
/// verbatim when the server supplies one; otherwise each operation falls
/// back to a static message.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Caught client-side, before any request is issued.
    #[error("{0}")]
    Validation(String),

    /// No session token is held, or the remote rejected the one we sent.
    #[error("You must be logged in to manage contacts")]
    Unauthorized,

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{0}")]
    SignupFailed(String),

    /// The mutation target does not exist on the remote.
    #[error("{0}")]
    NotFound(String),

    /// Transport and server failures that fit nothing above.
    #[error("{0}")]
    Http(String),
}
