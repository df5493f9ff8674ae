use std::io;

use thiserror::Error;

use crate::persist::PersistError;

/// Every failure the pipeline can report to its caller.
#[derive(Debug, Error)]
pub enum StudioError {
    /// The chosen file is neither an image nor a video.
    #[error("unsupported file type '{media_type}': please choose an image or video")]
    Validation { media_type: String },

    #[error("failed to get signed URL: {status}")]
    SignedUrl { status: String },

    #[error("failed to upload file: {status}")]
    UploadTransfer { status: String },

    /// The job may still have been created server-side.
    #[error("failed to submit job: {status}")]
    Submission { status: String },

    #[error("failed to check status: {status}")]
    PollTransport { status: String },

    /// The service reported `failed` or `error` for the job.
    #[error("{message}")]
    JobProcessing { message: String },

    #[error("job timed out after {attempts} status checks")]
    JobTimeout { attempts: u32 },

    #[error("no output URL in response")]
    MissingOutputUrl,

    /// Every download strategy failed.
    #[error(
        "download failed ({}). Open {url} in a browser and save it manually (right-click, \"Save Image As\").",
        .attempts.join("; ")
    )]
    Download { url: String, attempts: Vec<String> },

    #[error("unexpected HTTP status {0}")]
    HttpStatus(String),

    #[error("response too large (max {max_bytes}, actual {actual})")]
    TooLarge { max_bytes: u64, actual: u64 },

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<reqwest::Error> for StudioError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return StudioError::Timeout(err.to_string());
        }
        if err.is_decode() {
            return StudioError::Decode(err.to_string());
        }
        StudioError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(err: serde_json::Error) -> Self {
        StudioError::Decode(err.to_string())
    }
}
