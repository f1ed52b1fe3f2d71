//! Synchronous buffered reader over a [`ByteSource`].

use std::io::{self, Read};

use bytes::Bytes;

use super::lines::Lines;
use super::window::{Line, PeekStep, ReadPlan, ReadWindow, SliceStep};
use crate::config::ReaderConfig;
use crate::error::BufError;
use crate::source::ByteSource;
use crate::util::decode_utf8;

/// A buffered reader with a fixed-capacity window.
///
/// `BufferedReader` wraps any [`ByteSource`] and cuts down the number of
/// calls made to it. On top of plain reads it offers peeking, exact reads,
/// and delimiter / line oriented reads.
///
/// End of stream is reported as `Ok(None)`. Views returned by
/// [`peek`](Self::peek), [`read_slice`](Self::read_slice) and
/// [`read_line`](Self::read_line) borrow the reader and are gone before the
/// next call.
///
/// # Example
///
/// ```
/// use bufrs::BufferedReader;
/// use std::io::Cursor;
///
/// let mut reader = BufferedReader::new(Cursor::new(&b"abc\r\ndef\nghi"[..]));
///
/// assert_eq!(reader.read_line()?.unwrap().line, b"abc");
/// assert_eq!(reader.read_line()?.unwrap().line, b"def");
/// assert_eq!(reader.read_line()?.unwrap().line, b"ghi");
/// assert!(reader.read_line()?.is_none());
/// # Ok::<(), bufrs::BufError>(())
/// ```
#[derive(Debug)]
pub struct BufferedReader<S> {
    source: S,
    window: ReadWindow,
    max_empty_reads: usize,
}

impl<S: ByteSource> BufferedReader<S> {
    /// Creates a reader with the default window size.
    pub fn new(source: S) -> Self {
        Self::with_config(ReaderConfig::default(), source)
    }

    /// Creates a reader with a window of `capacity` bytes.
    ///
    /// Capacities below [`MIN_BUF_SIZE`](crate::config::MIN_BUF_SIZE) are
    /// rounded up.
    pub fn with_capacity(capacity: usize, source: S) -> Self {
        Self::with_config(ReaderConfig::default().with_capacity(capacity), source)
    }

    /// Creates a reader from a configuration.
    pub fn with_config(config: ReaderConfig, source: S) -> Self {
        let config = config.clamped();
        Self {
            source,
            window: ReadWindow::new(config.capacity()),
            max_empty_reads: config.max_empty_reads(),
        }
    }

    /// Discards buffered data and starts reading from `source`.
    ///
    /// The window allocation is kept.
    pub fn reset(&mut self, source: S) {
        self.source = source;
        self.window.reset();
    }

    /// Window capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }

    /// Number of bytes that can be read from the window without touching the
    /// source.
    pub fn buffered(&self) -> usize {
        self.window.buffered()
    }

    /// Returns a reference to the underlying source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Returns a mutable reference to the underlying source.
    ///
    /// Reading from it directly skips whatever is buffered.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consumes the reader and returns the source. Buffered bytes are lost.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Reads new data into the window.
    ///
    /// Makes at most `max_empty_reads` source calls: the first one that
    /// yields data or EOF ends the fill.
    fn fill(&mut self) -> Result<(), BufError> {
        self.window.prepare_fill()?;
        for _ in 0..self.max_empty_reads {
            let read = self.source.read_bytes(self.window.spare_mut())?;
            if self.window.commit_fill(read) {
                return Ok(());
            }
        }
        tracing::warn!(reads = self.max_empty_reads, "source made no progress");
        Err(BufError::NoProgress {
            reads: self.max_empty_reads,
        })
    }

    /// Reads into `dest`.
    ///
    /// Makes at most one call to the source, so it may return fewer bytes
    /// than requested even in the middle of a stream. Returns `Ok(None)` at
    /// end of stream; an empty `dest` returns `Some(0)` without I/O.
    pub fn read(&mut self, dest: &mut [u8]) -> Result<Option<usize>, BufError> {
        match self.window.plan_read(dest.len()) {
            ReadPlan::Nothing => Ok(Some(0)),
            ReadPlan::Direct => Ok(self.source.read_bytes(dest)?),
            ReadPlan::Refill => {
                let read = self.source.read_bytes(self.window.spare_mut())?;
                match self.window.commit_refill(read) {
                    None => Ok(None),
                    Some(0) => Ok(Some(0)),
                    Some(_) => Ok(Some(self.window.copy_out(dest))),
                }
            }
            ReadPlan::Copy => Ok(Some(self.window.copy_out(dest))),
        }
    }

    /// Fills `dest` completely.
    ///
    /// Returns `Ok(None)` if the stream ended before any byte was read.
    ///
    /// # Errors
    ///
    /// - [`BufError::PartialRead`] carrying the bytes read so far if the
    ///   stream ended part way through
    /// - [`BufError::NoProgress`] if the source keeps returning empty reads
    pub fn read_exact(&mut self, dest: &mut [u8]) -> Result<Option<()>, BufError> {
        let mut filled = 0;
        let mut empty_reads = 0;
        while filled < dest.len() {
            match self.read(&mut dest[filled..])? {
                None if filled == 0 => return Ok(None),
                None => {
                    return Err(BufError::PartialRead {
                        partial: Bytes::copy_from_slice(&dest[..filled]),
                    });
                }
                Some(0) => {
                    empty_reads += 1;
                    if empty_reads >= self.max_empty_reads {
                        return Err(BufError::NoProgress { reads: empty_reads });
                    }
                }
                Some(n) => {
                    filled += n;
                    empty_reads = 0;
                }
            }
        }
        Ok(Some(()))
    }

    /// Reads a single byte.
    pub fn read_byte(&mut self) -> Result<Option<u8>, BufError> {
        loop {
            if let Some(b) = self.window.take_byte() {
                return Ok(Some(b));
            }
            if self.window.is_eof() {
                return Ok(None);
            }
            self.fill()?;
        }
    }

    /// Returns the next `n` bytes without consuming them.
    ///
    /// At end of stream fewer than `n` bytes may be returned; `Ok(None)`
    /// means nothing is left at all.
    ///
    /// # Errors
    ///
    /// [`BufError::BufferFull`] if `n` is larger than the window.
    pub fn peek(&mut self, n: usize) -> Result<Option<&[u8]>, BufError> {
        let range = loop {
            match self.window.peek_step(n)? {
                PeekStep::Ready(range) => break range,
                PeekStep::Eof => return Ok(None),
                PeekStep::NeedFill => self.fill()?,
            }
        };
        Ok(Some(self.window.get(range)))
    }

    fn scan(&mut self, delim: u8) -> Result<SliceStep, BufError> {
        let mut scanned = 0;
        loop {
            match self.window.scan_slice(delim, &mut scanned) {
                Some(step) => return Ok(step),
                None => self.fill()?,
            }
        }
    }

    /// Reads up to and including the next `delim`.
    ///
    /// End of stream acts as a delimiter: the remaining bytes are returned
    /// as the last slice, then `Ok(None)`.
    ///
    /// # Errors
    ///
    /// [`BufError::BufferFull`] if the window filled up without a delimiter.
    /// The payload is a copy of the whole window, which counts as consumed.
    pub fn read_slice(&mut self, delim: u8) -> Result<Option<&[u8]>, BufError> {
        let step = self.scan(delim)?;
        self.window.slice_result(step)
    }

    /// Reads one line, without its `\n` or `\r\n`.
    ///
    /// Lines longer than the window come back in fragments with
    /// [`Line::more`] set; see [`lines`](Self::lines) for an iterator that
    /// joins them.
    pub fn read_line(&mut self) -> Result<Option<Line<'_>>, BufError> {
        let step = self.scan(b'\n')?;
        Ok(self.window.line_result(step))
    }

    /// Reads up to and including `delim` and decodes the bytes as UTF-8.
    ///
    /// # Errors
    ///
    /// - [`BufError::InvalidDelimiter`] if `delim` is not a single byte
    /// - [`BufError::Utf8`] if the bytes are not valid UTF-8
    /// - anything [`read_slice`](Self::read_slice) returns
    pub fn read_delimited_string(&mut self, delim: char) -> Result<Option<String>, BufError> {
        let delim = single_byte(delim)?;
        match self.read_slice(delim)? {
            Some(slice) => decode_utf8(slice.to_vec()).map(Some),
            None => Ok(None),
        }
    }

    /// Turns the reader into an iterator over whole lines.
    pub fn lines(self) -> Lines<S> {
        Lines::new(self)
    }
}

pub(crate) fn single_byte(delim: char) -> Result<u8, BufError> {
    if delim.is_ascii() {
        Ok(delim as u8)
    } else {
        Err(BufError::InvalidDelimiter {
            message: "delimiter must be a single-byte character",
        })
    }
}

/// Empty source reads are retried, since `Ok(0)` means end of stream here.
impl<S: ByteSource> Read for BufferedReader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        for _ in 0..self.max_empty_reads {
            match BufferedReader::read(self, buf)? {
                None => return Ok(0),
                Some(0) if !buf.is_empty() => continue,
                Some(n) => return Ok(n),
            }
        }
        tracing::warn!(reads = self.max_empty_reads, "source made no progress");
        Err(BufError::NoProgress {
            reads: self.max_empty_reads,
        }
        .into())
    }
}
