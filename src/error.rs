// Error taxonomy for the transfer client. Every failure the library can
// produce is a distinct variant so callers can match on the condition
// instead of parsing message text.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FbinError {
    // Configuration
    #[error("no url set")]
    NoUrl,

    #[error("no username set")]
    NoUsername,

    #[error("no password set")]
    NoPassword,

    // Input
    #[error("no filename provided")]
    NoFilename,

    #[error("no id/url provided")]
    NoTarget,

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("stdin can't be uploaded more than once")]
    StdinRepeated,

    // Session state
    #[error("upload already done")]
    UploadDone,

    // Server responses
    #[error("server refused the uploaded file")]
    BadRequest,

    #[error("authentication failed, please check credentials/url")]
    Unauthorized,

    #[error("file not found")]
    NotFound,

    #[error("internal server error")]
    InternalServerError,

    #[error("unexpected server response: {0}")]
    UnexpectedStatus(String),

    // IO and transport
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
