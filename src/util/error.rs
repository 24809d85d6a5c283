//! Error types for the vertex-data library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for buffer and stream operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Invalid magic bytes at start of a stream file
    #[error("Invalid data file: expected VDATA magic bytes")]
    InvalidMagic,

    /// Unsupported stream format version
    #[error("Unsupported stream version: {0}")]
    UnsupportedVersion(u16),

    /// Stream is truncated or corrupted
    #[error("Unexpected end of stream at position {0}")]
    UnexpectedEof(u64),

    /// Invalid data structure in stream
    #[error("Invalid stream structure: {0}")]
    InvalidStructure(String),

    /// Element index past the end of an array or view
    #[error("Index {index} out of range (len: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Proxy view spans more bytes than its storage holds
    #[error("View of {span} bytes at offset {offset} exceeds storage of {available} bytes")]
    ViewOutOfRange {
        offset: usize,
        span: usize,
        available: usize,
    },

    /// No constructor registered for a class name
    #[error("Unknown class: {0}")]
    UnknownClass(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }

    /// Create an out-of-range error for `index` into a sequence of `len`.
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }
}

/// Result type alias for vertex-data operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::InvalidMagic;
        assert!(e.to_string().contains("magic"));

        let e = Error::out_of_range(5, 3);
        assert!(e.to_string().contains("5"));
        assert!(e.to_string().contains("3"));

        let e = Error::ViewOutOfRange { offset: 4, span: 64, available: 32 };
        assert_eq!(e.to_string(), "View of 64 bytes at offset 4 exceeds storage of 32 bytes");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
