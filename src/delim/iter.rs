//! Iterators over delimiter-separated spans of a [`ByteSource`].
//!
//! - [`DelimitedSpans`] - Lazily yields byte spans as [`Bytes`]
//! - [`DelimitedStrings`] - Same spans, decoded as UTF-8
//!
//! # Example
//!
//! ```
//! use bufrs::split_delimited;
//! use std::io::Cursor;
//!
//! let source = Cursor::new(b"aa##bb##c".to_vec());
//! let spans = split_delimited(source, b"##")?.collect::<Result<Vec<_>, _>>()?;
//! assert_eq!(spans, [&b"aa"[..], &b"bb"[..], &b"c"[..]]);
//! # Ok::<(), bufrs::BufError>(())
//! ```

use bytes::Bytes;

use super::engine::DelimiterSplitter;
use crate::config::MAX_CONSECUTIVE_EMPTY_READS;
use crate::error::BufError;
use crate::source::ByteSource;
use crate::util::{decode_utf8, scan_chunk_size};

/// An iterator that yields the spans between delimiters of a source.
///
/// The source is read in chunks of `max(1024, delimiter.len() + 1)` bytes
/// only when no complete span is buffered. End of stream always ends a
/// final span, which is empty if the stream was empty or ended with a
/// delimiter.
///
/// The iterator is not restartable: after end of stream or an error it
/// yields `None`.
#[derive(Debug)]
pub struct DelimitedSpans<S> {
    source: S,
    splitter: DelimiterSplitter,
    chunk: Vec<u8>,
    max_empty_reads: usize,
    finished: bool,
}

impl<S: ByteSource> DelimitedSpans<S> {
    /// Creates an iterator over the spans of `source` separated by
    /// `delimiter`.
    ///
    /// # Errors
    ///
    /// Returns [`BufError::InvalidDelimiter`] if `delimiter` is empty.
    pub fn new(source: S, delimiter: &[u8]) -> Result<Self, BufError> {
        let splitter = DelimiterSplitter::new(delimiter)?;
        Ok(Self {
            source,
            chunk: vec![0; scan_chunk_size(delimiter.len())],
            splitter,
            max_empty_reads: MAX_CONSECUTIVE_EMPTY_READS,
            finished: false,
        })
    }

    /// Sets how many consecutive zero-length reads are tolerated before the
    /// iterator fails with [`BufError::NoProgress`]. Zero is treated as one.
    pub fn with_max_empty_reads(mut self, reads: usize) -> Self {
        self.max_empty_reads = reads.max(1);
        self
    }

    /// Consumes the iterator, returning the source.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: ByteSource> Iterator for DelimitedSpans<S> {
    type Item = Result<Bytes, BufError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut empty_reads = 0;
        loop {
            if let Some(span) = self.splitter.next_span() {
                return Some(Ok(span));
            }

            match self.source.read_bytes(&mut self.chunk) {
                Ok(None) => {
                    self.finished = true;
                    return Some(Ok(self.splitter.finish()));
                }
                Ok(Some(0)) => {
                    empty_reads += 1;
                    if empty_reads >= self.max_empty_reads {
                        tracing::warn!(reads = empty_reads, "delimiter scan made no progress");
                        self.finished = true;
                        return Some(Err(BufError::NoProgress { reads: empty_reads }));
                    }
                }
                Ok(Some(n)) => {
                    empty_reads = 0;
                    self.splitter.feed(&self.chunk[..n]);
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}

/// An iterator that yields delimiter-separated spans decoded as UTF-8.
#[derive(Debug)]
pub struct DelimitedStrings<S> {
    inner: DelimitedSpans<S>,
}

impl<S: ByteSource> DelimitedStrings<S> {
    /// Creates an iterator over the UTF-8 spans of `source` separated by
    /// `delimiter`.
    ///
    /// # Errors
    ///
    /// Returns [`BufError::InvalidDelimiter`] if `delimiter` is empty.
    pub fn new(source: S, delimiter: &str) -> Result<Self, BufError> {
        Ok(Self {
            inner: DelimitedSpans::new(source, delimiter.as_bytes())?,
        })
    }

    /// Consumes the iterator, returning the source.
    pub fn into_inner(self) -> S {
        self.inner.into_inner()
    }
}

impl<S: ByteSource> Iterator for DelimitedStrings<S> {
    type Item = Result<String, BufError>;

    fn next(&mut self) -> Option<Self::Item> {
        let span = match self.inner.next()? {
            Ok(span) => span,
            Err(e) => return Some(Err(e)),
        };
        Some(decode_utf8(Vec::from(span)))
    }
}

/// Splits `source` on `delimiter`, yielding byte spans lazily.
///
/// # Errors
///
/// Returns [`BufError::InvalidDelimiter`] if `delimiter` is empty.
pub fn split_delimited<S: ByteSource>(
    source: S,
    delimiter: &[u8],
) -> Result<DelimitedSpans<S>, BufError> {
    DelimitedSpans::new(source, delimiter)
}

/// Splits `source` on `delimiter`, yielding UTF-8 strings lazily.
///
/// # Errors
///
/// Returns [`BufError::InvalidDelimiter`] if `delimiter` is empty.
pub fn split_delimited_strings<S: ByteSource>(
    source: S,
    delimiter: &str,
) -> Result<DelimitedStrings<S>, BufError> {
    DelimitedStrings::new(source, delimiter)
}
