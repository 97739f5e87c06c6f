use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while translating a controller file.
///
/// Degraded output (unmapped types, ambiguous annotations) is never an error; it is
/// reported through a [`DiagnosticSink`](crate::diagnostics::DiagnosticSink) instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The class descriptor carries no usable base-route annotation.
    #[error("Unable to find class address for {class}")]
    Structural { class: String },

    /// The parser interpreter could not be located.
    #[error("{name} not found. Please ensure \"{name}\" is available in PATH or configure its location")]
    BinaryNotFound {
        name: String,
        configured: Option<PathBuf>,
    },

    /// The parser exited with a non-zero status.
    #[error("Parser failed ({status}): {stderr}")]
    ToolFailed { status: ExitStatus, stderr: String },

    /// The parser exited successfully but wrote to its error stream.
    #[error("Parser reported errors: {stderr}")]
    ToolStderr { stderr: String },

    /// The parser output is not a JSON array of class descriptors.
    #[error("Malformed parser output: {message}")]
    MalformedInput { message: String },

    /// Translating a particular file failed.
    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error only concerns a single class, leaving siblings usable.
    pub fn is_structural(&self) -> bool {
        matches!(self, Error::Structural { .. })
    }

    /// Attach the file the error occurred in
    pub fn in_file(self, path: &std::path::Path) -> Self {
        Error::File {
            path: path.to_path_buf(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedInput {
            message: err.to_string(),
        }
    }
}
