//! Error types for AbuseIPDB client operations.

use crate::response::ApiError;
use crate::transport::TransportError;
use std::io;
use std::path::{Path, PathBuf};

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the client.
///
/// Validation variants are always raised before any request is sent.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required argument was empty or a numeric parameter was out of range.
    #[error("{0}")]
    InvalidArgument(String),

    /// A category token matched neither a known id nor a short name.
    #[error("Invalid report category was given: [{0}]")]
    InvalidCategory(String),

    /// The selection only holds categories that can't be used alone.
    #[error("Invalid report category parameter given: some categories can't be used alone ({0})")]
    StandaloneCategory(String),

    /// The bulk report source file does not exist.
    #[error("The file [{}] does not exist.", .0.display())]
    FileNotFound(PathBuf),

    /// The bulk report source file is not readable.
    #[error("The file [{}] is not readable.", .0.display())]
    PermissionDenied(PathBuf),

    /// Any other I/O failure on a local file.
    #[error("I/O error on [{}]: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The transport could not be built or failed fatally.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The API answered with a non-empty `errors` array.
    #[error("AbuseIPDB returned {} error(s): {}", .0.len(), join_details(.0))]
    RemoteApi(Vec<ApiError>),

    /// The response body did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// An endpoint URL could not be built.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Classify an I/O error raised while touching `path`.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Error::PermissionDenied(path.to_path_buf()),
            _ => Error::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Returns true for errors raised by local input validation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidArgument(_)
                | Error::InvalidCategory(_)
                | Error::StandaloneCategory(_)
                | Error::FileNotFound(_)
                | Error::PermissionDenied(_)
        )
    }
}

fn join_details(errors: &[ApiError]) -> String {
    errors
        .iter()
        .map(|e| e.detail.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
