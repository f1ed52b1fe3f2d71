//! Sans-io delimiter splitting engine.
//!
//! [`DelimiterSplitter`] never touches a source. Callers push bytes in with
//! `feed()`, pull finished spans out with `next_span()` and collect the tail
//! with `finish()` once their stream ends. The sync iterator and the async
//! stream are thin drivers around it.
//!
//! # Example
//!
//! ```
//! use bufrs::DelimiterSplitter;
//!
//! let mut splitter = DelimiterSplitter::new(b"##")?;
//! let mut spans = Vec::new();
//!
//! // The second delimiter straddles the two feeds.
//! for piece in [&b"aa##b"[..], &b"b#"[..], &b"#c"[..]] {
//!     splitter.feed(piece);
//!     while let Some(span) = splitter.next_span() {
//!         spans.push(span);
//!     }
//! }
//! spans.push(splitter.finish());
//!
//! assert_eq!(spans, [&b"aa"[..], &b"bb"[..], &b"c"[..]]);
//! # Ok::<(), bufrs::BufError>(())
//! ```

use bytes::{Bytes, BytesMut};

use super::matcher::DelimiterMatcher;
use crate::error::BufError;

/// Splits a byte stream on a multi-byte delimiter.
///
/// Bytes are scanned exactly once: the matcher state and the scan cursor
/// persist across `feed()` calls, so delimiters that straddle two feeds are
/// found without rescanning. Emitted spans never contain the delimiter.
#[derive(Debug, Clone)]
pub struct DelimiterSplitter {
    matcher: DelimiterMatcher,
    acc: BytesMut,
    inspected: usize,
}

impl DelimiterSplitter {
    /// Creates a splitter for `delimiter`.
    ///
    /// # Errors
    ///
    /// Returns [`BufError::InvalidDelimiter`] if `delimiter` is empty.
    pub fn new(delimiter: &[u8]) -> Result<Self, BufError> {
        Ok(Self::from_matcher(DelimiterMatcher::new(delimiter)?))
    }

    /// Creates a splitter around an existing matcher, resetting its state.
    pub fn from_matcher(mut matcher: DelimiterMatcher) -> Self {
        matcher.reset();
        Self {
            matcher,
            acc: BytesMut::new(),
            inspected: 0,
        }
    }

    /// The delimiter this splitter splits on.
    pub fn delimiter(&self) -> &[u8] {
        self.matcher.pattern()
    }

    /// Appends bytes to the accumulator.
    pub fn feed(&mut self, data: &[u8]) {
        self.acc.extend_from_slice(data);
    }

    /// Returns the next complete span, if the accumulated bytes contain one.
    pub fn next_span(&mut self) -> Option<Bytes> {
        let start = self.inspected;
        let mut end = None;
        for (i, &byte) in self.acc[start..].iter().enumerate() {
            if self.matcher.feed(byte) {
                end = Some(start + i + 1);
                break;
            }
        }

        let Some(end) = end else {
            self.inspected = self.acc.len();
            return None;
        };

        let mut span = self.acc.split_to(end).freeze();
        span.truncate(end - self.delimiter().len());
        self.inspected = 0;
        Some(span)
    }

    /// Ends the stream, returning everything not yet emitted.
    ///
    /// The result may be empty, e.g. when the stream ended with a
    /// delimiter. The splitter is left ready for a new stream.
    pub fn finish(&mut self) -> Bytes {
        self.matcher.reset();
        self.inspected = 0;
        self.acc.split().freeze()
    }

    /// Number of bytes accumulated but not yet emitted.
    pub fn pending_len(&self) -> usize {
        self.acc.len()
    }

    /// Drops accumulated bytes and any partial match.
    pub fn reset(&mut self) {
        self.matcher.reset();
        self.acc.clear();
        self.inspected = 0;
    }
}
