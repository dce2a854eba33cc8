// Error types. Upload failures get their own enum because they are the
// only errors that come from the remote side; everything else is local
// file or terminal trouble.

use std::path::PathBuf;
use thiserror::Error;

/// A failed call to the remote endpoint. Always fatal for the run.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("could not reach endpoint {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("upload to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    #[error("endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// XML-RPC `<fault>`, e.g. wrong username or password.
    #[error("endpoint rejected the upload (fault {code}): {message}")]
    Fault { code: i64, message: String },

    #[error("unexpected response from endpoint: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Error)]
pub enum MdImgUpError {
    #[error("cannot read document '{path}': {source}")]
    SourceFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read image '{path}': {source}")]
    ImageUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("cannot write document '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot save configuration to '{path}': {reason}")]
    ConfigWrite { path: PathBuf, reason: String },

    #[error("prompt failed: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, MdImgUpError>;
