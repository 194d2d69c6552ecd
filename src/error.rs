//! Error types for pdfsplice library.

use std::io;
use thiserror::Error;

use crate::model::{ElementId, PageId, SourceId};

/// Result type alias for pdfsplice operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading, editing or exporting.
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

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and requires a password.
    #[error("Document is encrypted")]
    Encrypted,

    /// The source document has no pages to contribute.
    #[error("Document '{0}' has no pages")]
    EmptyDocument(String),

    /// A page listed in the page tree could not be resolved.
    #[error("Page {0} could not be resolved in '{1}'")]
    PageNotFound(u32, String),

    /// An insertion or move target lies outside the structure.
    #[error("Position {position} is out of range (structure has {len} slots)")]
    PositionOutOfRange {
        /// Requested position
        position: usize,
        /// Number of valid slots at the time of the call
        len: usize,
    },

    /// An element with this id is already part of the structure.
    #[error("Element {0} is already in the structure")]
    DuplicateElement(ElementId),

    /// A page is already placed in another element.
    #[error("Page {0} is already in the structure")]
    DuplicatePage(PageId),

    /// A page references a source that is not loaded in this session.
    #[error("Source {0} is not loaded")]
    UnknownSource(SourceId),

    /// Every element is excluded or the structure is empty.
    #[error("Nothing to export: no included pages")]
    NothingToExport,

    /// Error while assembling the output document.
    #[error("Export error: {0}")]
    Export(String),

    /// Error reading an operation script.
    #[error("Invalid operation script: {0}")]
    Script(#[from] serde_json::Error),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::PositionOutOfRange {
            position: 7,
            len: 3,
        };
        assert_eq!(
            err.to_string(),
            "Position 7 is out of range (structure has 3 slots)"
        );

        let err = Error::DuplicateElement(ElementId(4));
        assert_eq!(err.to_string(), "Element e4 is already in the structure");

        let err = Error::DuplicatePage(PageId(9));
        assert_eq!(err.to_string(), "Page p9 is already in the structure");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Script(_)));
    }
}
