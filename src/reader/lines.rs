//! Line iterator over a buffered reader.

use super::buffered::BufferedReader;
use crate::error::BufError;
use crate::source::ByteSource;
use crate::util::decode_utf8;

/// Iterator over the lines of a [`BufferedReader`], as UTF-8 strings.
///
/// Line endings (`\n` or `\r\n`) are stripped. Lines longer than the
/// reader's window are reassembled from their fragments, so every item is a
/// whole line. A line that is not valid UTF-8 is reported as an error and
/// skipped; after a read error the iterator is exhausted.
///
/// # Example
///
/// ```
/// use bufrs::BufferedReader;
/// use std::io::Cursor;
///
/// let reader = BufferedReader::with_capacity(4, Cursor::new(&b"a long line\r\nshort"[..]));
/// let lines: Vec<String> = reader.lines().collect::<Result<_, _>>()?;
/// assert_eq!(lines, ["a long line", "short"]);
/// # Ok::<(), bufrs::BufError>(())
/// ```
#[derive(Debug)]
pub struct Lines<S> {
    reader: BufferedReader<S>,
    pending: Vec<u8>,
    done: bool,
}

impl<S: ByteSource> Lines<S> {
    pub(crate) fn new(reader: BufferedReader<S>) -> Self {
        Self {
            reader,
            pending: Vec::new(),
            done: false,
        }
    }

    /// Returns the underlying reader, dropping any partially assembled line.
    pub fn into_inner(self) -> BufferedReader<S> {
        self.reader
    }
}

impl<S: ByteSource> Iterator for Lines<S> {
    type Item = Result<String, BufError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.reader.read_line() {
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
                Ok(None) => {
                    self.done = true;
                    if self.pending.is_empty() {
                        return None;
                    }
                    return Some(decode_utf8(std::mem::take(&mut self.pending)));
                }
                Ok(Some(line)) => {
                    self.pending.extend_from_slice(line.line);
                    if !line.more {
                        return Some(decode_utf8(std::mem::take(&mut self.pending)));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_lines_basic() {
        let reader = BufferedReader::new(Cursor::new(&b"one\ntwo\r\nthree"[..]));
        let lines: Vec<_> = reader.lines().collect::<Result<_, _>>().unwrap();
        assert_eq!(lines, ["one", "two", "three"]);
    }

    #[test]
    fn test_lines_trailing_newline() {
        let reader = BufferedReader::new(Cursor::new(&b"one\n\ntwo\n"[..]));
        let lines: Vec<_> = reader.lines().collect::<Result<_, _>>().unwrap();
        assert_eq!(lines, ["one", "", "two"]);
    }

    #[test]
    fn test_lines_longer_than_window() {
        let text = "0123456789abcdef\r\nxy\n";
        let reader = BufferedReader::with_capacity(5, Cursor::new(text.as_bytes()));
        let lines: Vec<_> = reader.lines().collect::<Result<_, _>>().unwrap();
        assert_eq!(lines, ["0123456789abcdef", "xy"]);
    }

    #[test]
    fn test_lines_invalid_utf8() {
        let reader = BufferedReader::new(Cursor::new(&[0xff, 0xfe, b'\n'][..]));
        let mut lines = reader.lines();
        assert!(matches!(lines.next(), Some(Err(BufError::Utf8(_)))));
        assert!(lines.next().is_none());
    }
}
