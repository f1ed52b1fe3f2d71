//! Knuth-Morris-Pratt matcher for multi-byte delimiters.

use crate::error::BufError;

/// Streaming matcher for one non-empty byte pattern.
///
/// The failure table is computed once. Bytes are then fed one at a time and
/// the matcher reports when the most recent bytes complete the pattern.
/// Matches do not overlap: after a full match the state starts over.
///
/// # Example
///
/// ```
/// use bufrs::DelimiterMatcher;
///
/// let mut matcher = DelimiterMatcher::new(b"##")?;
/// let hits: Vec<bool> = b"a###".iter().map(|&b| matcher.feed(b)).collect();
/// assert_eq!(hits, [false, false, true, false]);
/// # Ok::<(), bufrs::BufError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DelimiterMatcher {
    pattern: Box<[u8]>,
    table: Vec<usize>,
    matched: usize,
}

impl DelimiterMatcher {
    /// Creates a matcher for `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`BufError::InvalidDelimiter`] if `pattern` is empty.
    pub fn new(pattern: &[u8]) -> Result<Self, BufError> {
        if pattern.is_empty() {
            return Err(BufError::InvalidDelimiter {
                message: "delimiter must not be empty",
            });
        }

        Ok(Self {
            pattern: pattern.into(),
            table: build_failure_table(pattern),
            matched: 0,
        })
    }

    /// The pattern being searched for.
    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    /// `table[i]` is the length of the longest proper prefix of
    /// `pattern[..=i]` that is also a suffix of it.
    pub fn failure_table(&self) -> &[usize] {
        &self.table
    }

    /// Number of pattern bytes matched by the most recent input.
    pub fn match_len(&self) -> usize {
        self.matched
    }

    /// Forgets any partial match.
    pub fn reset(&mut self) {
        self.matched = 0;
    }

    /// Feeds one byte; returns `true` when it completes the pattern.
    #[inline]
    pub fn feed(&mut self, byte: u8) -> bool {
        while self.matched > 0 && self.pattern[self.matched] != byte {
            self.matched = self.table[self.matched - 1];
        }
        if self.pattern[self.matched] == byte {
            self.matched += 1;
        }
        if self.matched == self.pattern.len() {
            self.matched = 0;
            return true;
        }
        false
    }
}

/// Classic KMP prefix function, O(pattern length).
fn build_failure_table(pattern: &[u8]) -> Vec<usize> {
    let mut table = vec![0; pattern.len()];
    let mut prefix_end = 0;
    for i in 1..pattern.len() {
        while prefix_end > 0 && pattern[i] != pattern[prefix_end] {
            prefix_end = table[prefix_end - 1];
        }
        if pattern[i] == pattern[prefix_end] {
            prefix_end += 1;
        }
        table[i] = prefix_end;
    }
    table
}
