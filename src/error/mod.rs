//! Error types for bufrs.
//!
//! End of stream is never an error in this crate: operations that can hit it
//! return `Ok(None)`. Everything else goes through [`BufError`].

use std::io;
use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;

/// Errors that can occur during buffered I/O operations.
#[derive(Debug, Error)]
pub enum BufError {
    /// An I/O error occurred in the underlying source or sink.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// End of stream was reached after some, but not all, of the requested
    /// bytes were read.
    #[error("partial read: got {} bytes before end of stream", .partial.len())]
    PartialRead {
        /// The bytes that were read before end of stream.
        partial: Bytes,
    },

    /// The window filled up before a delimiter was found or a peek could be
    /// satisfied. Recoverable: the payload is the buffered content.
    #[error("buffer full: {} bytes buffered", .buffered.len())]
    BufferFull {
        /// Copy of the buffered-but-unmatched bytes.
        buffered: Bytes,
    },

    /// `fill` was called on a window with no free space.
    #[error("tried to fill full buffer")]
    FillFullWindow,

    /// The source kept returning zero-length reads without signalling EOF.
    #[error("no progress after {reads} read calls")]
    NoProgress {
        /// Number of consecutive empty reads.
        reads: usize,
    },

    /// A length argument exceeded the available data.
    #[error("out of range: requested {requested} bytes, {len} available")]
    OutOfRange {
        /// The length that was asked for.
        requested: usize,
        /// The length that was available.
        len: usize,
    },

    /// A buffer would have to grow beyond its maximum size.
    #[error("buffer cannot be grown beyond the maximum size: {requested} bytes (max {max})")]
    TooLarge {
        /// The capacity that would have been required.
        requested: usize,
        /// The maximum allowed capacity.
        max: usize,
    },

    /// The delimiter passed to a scanning operation is unusable.
    #[error("invalid delimiter: {message}")]
    InvalidDelimiter {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// The writer's sink failed earlier; the writer stays failed until reset.
    #[error("sink error: {0}")]
    Sink(#[source] Arc<io::Error>),

    /// Decoded bytes were not valid UTF-8.
    #[error("invalid utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl BufError {
    /// Returns `true` for internal-invariant violations that must not be
    /// retried.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BufError::FillFullWindow
                | BufError::NoProgress { .. }
                | BufError::OutOfRange { .. }
                | BufError::InvalidDelimiter { .. }
        )
    }

    /// Returns the data carried by a partial read or buffer-full error.
    pub fn partial(&self) -> Option<&Bytes> {
        match self {
            BufError::PartialRead { partial } => Some(partial),
            BufError::BufferFull { buffered } => Some(buffered),
            _ => None,
        }
    }
}

impl From<std::string::FromUtf8Error> for BufError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        BufError::Utf8(e.utf8_error())
    }
}

impl From<BufError> for io::Error {
    fn from(e: BufError) -> Self {
        match e {
            BufError::Io(e) => e,
            BufError::Sink(e) => io::Error::new(e.kind(), BufError::Sink(e)),
            BufError::PartialRead { .. } => io::Error::new(io::ErrorKind::UnexpectedEof, e),
            BufError::Utf8(_) => io::Error::new(io::ErrorKind::InvalidData, e),
            BufError::OutOfRange { .. }
            | BufError::InvalidDelimiter { .. }
            | BufError::InvalidConfig { .. } => io::Error::new(io::ErrorKind::InvalidInput, e),
            BufError::TooLarge { .. } => io::Error::new(io::ErrorKind::OutOfMemory, e),
            BufError::BufferFull { .. } | BufError::FillFullWindow | BufError::NoProgress { .. } => {
                io::Error::other(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test");
        let err: BufError = io_err.into();
        assert!(matches!(err, BufError::Io(_)));
    }

    #[test]
    fn test_display() {
        let err = BufError::NoProgress { reads: 100 };
        assert_eq!(err.to_string(), "no progress after 100 read calls");

        let err = BufError::BufferFull {
            buffered: Bytes::from_static(b"abcd"),
        };
        assert!(err.to_string().contains("buffer full"));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(BufError::FillFullWindow.is_fatal());
        assert!(BufError::NoProgress { reads: 1 }.is_fatal());
        assert!(
            !BufError::BufferFull {
                buffered: Bytes::new()
            }
            .is_fatal()
        );
        assert!(
            !BufError::PartialRead {
                partial: Bytes::new()
            }
            .is_fatal()
        );
    }

    #[test]
    fn test_partial_payload() {
        let err = BufError::PartialRead {
            partial: Bytes::from_static(b"ab"),
        };
        assert_eq!(err.partial().map(|b| &b[..]), Some(&b"ab"[..]));
        assert!(BufError::FillFullWindow.partial().is_none());
    }

    #[test]
    fn test_into_io_error_kind() {
        let err: io::Error = BufError::PartialRead {
            partial: Bytes::new(),
        }
        .into();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

        let sink = Arc::new(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        let err: io::Error = BufError::Sink(sink).into();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
