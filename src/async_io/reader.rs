//! Async buffered reader over a `futures_io::AsyncRead`.

use bytes::Bytes;
use futures_io::AsyncRead;

use super::poll::read_source;
use crate::config::ReaderConfig;
use crate::error::BufError;
use crate::reader::single_byte;
use crate::reader::window::{Line, PeekStep, ReadPlan, ReadWindow, SliceStep};
use crate::util::decode_utf8;

/// The async counterpart of [`BufferedReader`](crate::BufferedReader).
///
/// Same window, same semantics; every method that may touch the source is
/// an `async fn`. Works with any runtime through `futures_io::AsyncRead`;
/// tokio users can wrap their readers with `tokio_util::compat`.
///
/// # Example
///
/// ```ignore
/// use bufrs::AsyncBufferedReader;
/// use futures_io::AsyncRead;
///
/// async fn count_lines<R: AsyncRead + Unpin>(source: R) -> Result<usize, bufrs::BufError> {
///     let mut reader = AsyncBufferedReader::new(source);
///     let mut count = 0;
///     while let Some(line) = reader.read_line().await? {
///         if !line.more {
///             count += 1;
///         }
///     }
///     Ok(count)
/// }
/// ```
#[derive(Debug)]
pub struct AsyncBufferedReader<R> {
    source: R,
    window: ReadWindow,
    max_empty_reads: usize,
}

impl<R: AsyncRead + Unpin> AsyncBufferedReader<R> {
    /// Creates a reader with the default window size.
    pub fn new(source: R) -> Self {
        Self::with_config(ReaderConfig::default(), source)
    }

    /// Creates a reader with a window of `capacity` bytes, rounded up to
    /// [`MIN_BUF_SIZE`](crate::config::MIN_BUF_SIZE).
    pub fn with_capacity(capacity: usize, source: R) -> Self {
        Self::with_config(ReaderConfig::default().with_capacity(capacity), source)
    }

    /// Creates a reader from a configuration.
    pub fn with_config(config: ReaderConfig, source: R) -> Self {
        let config = config.clamped();
        Self {
            source,
            window: ReadWindow::new(config.capacity()),
            max_empty_reads: config.max_empty_reads(),
        }
    }

    /// Discards buffered data and starts reading from `source`.
    pub fn reset(&mut self, source: R) {
        self.source = source;
        self.window.reset();
    }

    /// Window capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }

    /// Bytes buffered and not yet consumed.
    pub fn buffered(&self) -> usize {
        self.window.buffered()
    }

    /// Returns a reference to the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.source
    }

    /// Returns a mutable reference to the underlying source.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.source
    }

    /// Consumes the reader and returns the source. Buffered bytes are lost.
    pub fn into_inner(self) -> R {
        self.source
    }

    async fn fill(&mut self) -> Result<(), BufError> {
        self.window.prepare_fill()?;
        for _ in 0..self.max_empty_reads {
            let read = read_source(&mut self.source, self.window.spare_mut()).await?;
            if self.window.commit_fill(read) {
                return Ok(());
            }
        }
        tracing::warn!(reads = self.max_empty_reads, "source made no progress");
        Err(BufError::NoProgress {
            reads: self.max_empty_reads,
        })
    }

    /// Reads into `dest` with at most one source read.
    ///
    /// See [`BufferedReader::read`](crate::BufferedReader::read).
    pub async fn read(&mut self, dest: &mut [u8]) -> Result<Option<usize>, BufError> {
        match self.window.plan_read(dest.len()) {
            ReadPlan::Nothing => Ok(Some(0)),
            ReadPlan::Direct => Ok(read_source(&mut self.source, dest).await?),
            ReadPlan::Refill => {
                let read = read_source(&mut self.source, self.window.spare_mut()).await?;
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
    /// # Errors
    ///
    /// [`BufError::PartialRead`] if the stream ended part way through.
    pub async fn read_exact(&mut self, dest: &mut [u8]) -> Result<Option<()>, BufError> {
        let mut filled = 0;
        let mut empty_reads = 0;
        while filled < dest.len() {
            match self.read(&mut dest[filled..]).await? {
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
    pub async fn read_byte(&mut self) -> Result<Option<u8>, BufError> {
        loop {
            if let Some(b) = self.window.take_byte() {
                return Ok(Some(b));
            }
            if self.window.is_eof() {
                return Ok(None);
            }
            self.fill().await?;
        }
    }

    /// Returns the next `n` bytes without consuming them.
    ///
    /// # Errors
    ///
    /// [`BufError::BufferFull`] if `n` is larger than the window.
    pub async fn peek(&mut self, n: usize) -> Result<Option<&[u8]>, BufError> {
        let range = loop {
            match self.window.peek_step(n)? {
                PeekStep::Ready(range) => break range,
                PeekStep::Eof => return Ok(None),
                PeekStep::NeedFill => self.fill().await?,
            }
        };
        Ok(Some(self.window.get(range)))
    }

    async fn scan(&mut self, delim: u8) -> Result<SliceStep, BufError> {
        let mut scanned = 0;
        loop {
            match self.window.scan_slice(delim, &mut scanned) {
                Some(step) => return Ok(step),
                None => self.fill().await?,
            }
        }
    }

    /// Reads up to and including the next `delim`.
    ///
    /// # Errors
    ///
    /// [`BufError::BufferFull`] if the window filled up without a delimiter.
    pub async fn read_slice(&mut self, delim: u8) -> Result<Option<&[u8]>, BufError> {
        let step = self.scan(delim).await?;
        self.window.slice_result(step)
    }

    /// Reads one line, without its `\n` or `\r\n`.
    pub async fn read_line(&mut self) -> Result<Option<Line<'_>>, BufError> {
        let step = self.scan(b'\n').await?;
        Ok(self.window.line_result(step))
    }

    /// Reads up to and including `delim` and decodes the bytes as UTF-8.
    pub async fn read_delimited_string(&mut self, delim: char) -> Result<Option<String>, BufError> {
        let delim = single_byte(delim)?;
        match self.read_slice(delim).await? {
            Some(slice) => decode_utf8(slice.to_vec()).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_async_read_line_crlf_split() {
        let source: &[u8] = b"abc\r\ndef";
        let mut reader = AsyncBufferedReader::with_capacity(4, source);

        let line = reader.read_line().await.unwrap().unwrap();
        assert_eq!((line.line, line.more), (&b"abc"[..], true));
        let line = reader.read_line().await.unwrap().unwrap();
        assert_eq!((line.line, line.more), (&b""[..], false));
        let line = reader.read_line().await.unwrap().unwrap();
        assert_eq!((line.line, line.more), (&b"def"[..], false));
        assert!(reader.read_line().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_async_read_exact_partial() {
        let source: &[u8] = b"abc";
        let mut reader = AsyncBufferedReader::new(source);
        let mut dest = [0u8; 2];
        assert_eq!(reader.read_exact(&mut dest).await.unwrap(), Some(()));
        assert_eq!(&dest, b"ab");

        let err = reader.read_exact(&mut dest).await.unwrap_err();
        assert_eq!(err.partial().unwrap(), &b"c"[..]);
        assert_eq!(reader.read_exact(&mut dest).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_async_peek_and_read_byte() {
        let source: &[u8] = b"xyz";
        let mut reader = AsyncBufferedReader::new(source);
        assert_eq!(reader.peek(2).await.unwrap().unwrap(), b"xy");
        assert_eq!(reader.read_byte().await.unwrap(), Some(b'x'));
        assert_eq!(reader.peek(5).await.unwrap().unwrap(), b"yz");
        assert_eq!(reader.read_delimited_string('z').await.unwrap().unwrap(), "yz");
        assert_eq!(reader.read_byte().await.unwrap(), None);
    }
}
