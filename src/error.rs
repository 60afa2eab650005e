//! Error types for pdf2docx.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdf2docx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a PDF.
///
/// Line classification has no error case: every line falls through to
/// [`Role::Paragraph`](crate::classify::Role::Paragraph).
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The source document could not be opened or parsed.
    #[error("Cannot open '{}': {reason}", path.display())]
    SourceOpen {
        /// Input path
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// A single page could not be read (strict mode only).
    #[error("Failed to read page {page}: {reason}")]
    PageRead {
        /// 0-based page index
        page: usize,
        /// Underlying cause
        reason: String,
    },

    /// Every page of a non-empty document failed to read.
    #[error("No page could be read ({0} pages)")]
    NoReadablePages(usize),

    /// The output document could not be written.
    #[error("Cannot write '{}': {reason}", path.display())]
    Persistence {
        /// Output path
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// A classifier rules file is malformed.
    #[error("Invalid classifier rules: {0}")]
    InvalidRules(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap any error as a [`Error::SourceOpen`] for `path`.
    pub fn source_open(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::SourceOpen {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Wrap any error as a [`Error::Persistence`] for `path`.
    pub fn persistence(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Persistence {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidRules(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::PageRead {
            page: 3,
            reason: "bad stream".into(),
        };
        assert_eq!(err.to_string(), "Failed to read page 3: bad stream");
    }

    #[test]
    fn test_path_errors_name_the_file() {
        let err = Error::source_open("notes/lab1.pdf", "truncated xref");
        assert_eq!(err.to_string(), "Cannot open 'notes/lab1.pdf': truncated xref");

        let err = Error::persistence("out.docx", "permission denied");
        assert!(err.to_string().contains("out.docx"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::InvalidRules(_)));
    }
}
