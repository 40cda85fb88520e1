//! Error types for the slideweight library.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for slideweight operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while analyzing a presentation.
///
/// The first four variants are the ones a user sees: they carry the
/// one-line message printed by the CLI. The rest are raised while reading
/// the package and are folded into [`Error::CorruptDocument`] at the
/// document boundary.
#[derive(Error, Debug)]
pub enum Error {
    /// The input path does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The input path does not have a `.pptx` extension.
    #[error("unsupported file type (expected .pptx): {}", .0.display())]
    UnsupportedFileType(PathBuf),

    /// The package could not be opened or parsed as a presentation.
    #[error("failed to open .pptx: {0}")]
    CorruptDocument(String),

    /// A JSON or CSV report could not be written.
    #[error("failed to write output file {}: {reason}", .path.display())]
    OutputWrite {
        /// Target path of the report
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A required package part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// JSON serialization failed.
    #[error("JSON serialization error: {0}")]
    Json(String),

    /// CSV serialization failed.
    #[error("CSV serialization error: {0}")]
    Csv(String),
}

impl Error {
    /// Wrap any error raised while opening a package as a corrupt-document error.
    pub fn corrupt(err: impl std::fmt::Display) -> Self {
        match err.to_string() {
            reason if reason.is_empty() => Error::CorruptDocument("unknown error".to_string()),
            reason => Error::CorruptDocument(reason),
        }
    }

    /// Fold a package-level error into [`Error::CorruptDocument`].
    ///
    /// Errors that already are corrupt-document errors pass through unchanged.
    pub fn into_corrupt(self) -> Self {
        match self {
            err @ Error::CorruptDocument(_) => err,
            err => Error::corrupt(err),
        }
    }

    /// Build an output-write error for `path`.
    pub fn output_write(path: &Path, err: impl std::fmt::Display) -> Self {
        Error::OutputWrite {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err.to_string())
    }
}
