//! Synchronous buffered writer over a [`ByteSink`].

use std::io::{self, Write};

use super::window::WriteWindow;
use crate::config::WriterConfig;
use crate::error::BufError;
use crate::source::ByteSink;

/// A buffered writer with a fixed-capacity window.
///
/// Small writes are collected in the window and handed to the sink in
/// batches: when the window overflows, or on [`flush`](Self::flush).
/// Writes at least as large as the window skip it when it is empty.
///
/// The first sink error poisons the writer: that call and every later
/// `write` / `flush` fail with the same [`BufError::Sink`] until
/// [`reset`](Self::reset). Buffered bytes are *not* flushed on drop.
///
/// # Example
///
/// ```
/// use bufrs::BufferedWriter;
///
/// let mut writer = BufferedWriter::with_capacity(8, Vec::new());
/// writer.write(b"hello ")?;
/// writer.write(b"world")?;
/// writer.flush()?;
/// assert_eq!(writer.get_ref(), b"hello world");
/// # Ok::<(), bufrs::BufError>(())
/// ```
#[derive(Debug)]
pub struct BufferedWriter<W> {
    sink: W,
    window: WriteWindow,
}

impl<W: ByteSink> BufferedWriter<W> {
    /// Creates a writer with the default window size.
    pub fn new(sink: W) -> Self {
        Self::with_config(WriterConfig::default(), sink)
    }

    /// Creates a writer with a window of `capacity` bytes.
    ///
    /// A zero capacity falls back to the default size.
    pub fn with_capacity(capacity: usize, sink: W) -> Self {
        Self::with_config(WriterConfig::default().with_capacity(capacity), sink)
    }

    /// Creates a writer from a configuration.
    pub fn with_config(config: WriterConfig, sink: W) -> Self {
        Self {
            sink,
            window: WriteWindow::new(config.clamped().capacity()),
        }
    }

    /// Drops buffered bytes, clears the sticky error and writes to `sink`
    /// from now on. Nothing is flushed.
    pub fn reset(&mut self, sink: W) {
        self.sink = sink;
        self.window.reset();
    }

    /// Window capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }

    /// Bytes buffered and not yet flushed.
    pub fn buffered(&self) -> usize {
        self.window.buffered()
    }

    /// Free space left in the window.
    pub fn available(&self) -> usize {
        self.window.available()
    }

    /// Returns a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Consumes the writer and returns the sink. Buffered bytes are lost.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Writes all of `data`, returning its length.
    ///
    /// # Errors
    ///
    /// [`BufError::Sink`] if the sink failed, now or during an earlier call.
    pub fn write(&mut self, mut data: &[u8]) -> Result<usize, BufError> {
        self.window.check()?;
        if data.is_empty() {
            return Ok(0);
        }

        let mut total = 0;
        while data.len() > self.window.available() {
            let n = if self.window.buffered() == 0 {
                let result = self.sink.write_bytes(data);
                self.window.accept(result, data.len())?
            } else {
                let n = self.window.push(data);
                self.flush()?;
                n
            };
            total += n;
            data = &data[n..];
        }
        total += self.window.push(data);
        Ok(total)
    }

    /// Hands every buffered byte to the sink.
    ///
    /// # Errors
    ///
    /// [`BufError::Sink`] if the sink failed, now or during an earlier call.
    pub fn flush(&mut self) -> Result<(), BufError> {
        self.window.check()?;
        let mut written = 0;
        while written < self.window.buffered() {
            let offered = self.window.buffered() - written;
            let result = self.sink.write_bytes(&self.window.pending()[written..]);
            written += self.window.accept(result, offered)?;
        }
        self.window.clear();
        Ok(())
    }
}

impl<W: ByteSink> Write for BufferedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(BufferedWriter::write(self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(BufferedWriter::flush(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sink that accepts at most `limit` bytes per call.
    #[derive(Default)]
    struct Trickle {
        data: Vec<u8>,
        limit: usize,
        calls: usize,
    }

    impl ByteSink for Trickle {
        fn write_bytes(&mut self, data: &[u8]) -> io::Result<usize> {
            self.calls += 1;
            let n = data.len().min(self.limit);
            self.data.extend_from_slice(&data[..n]);
            Ok(n)
        }
    }

    /// Sink that fails on its `fail_on`-th call.
    struct Failing {
        calls: usize,
        fail_on: usize,
    }

    impl ByteSink for Failing {
        fn write_bytes(&mut self, data: &[u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.calls == self.fail_on {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
            }
            Ok(data.len())
        }
    }

    #[test]
    fn test_small_writes_are_batched() {
        let mut writer = BufferedWriter::with_capacity(16, Trickle {
            limit: usize::MAX,
            ..Default::default()
        });
        for _ in 0..4 {
            writer.write(b"abc").unwrap();
        }
        assert_eq!(writer.get_ref().calls, 0);
        assert_eq!(writer.buffered(), 12);
        writer.flush().unwrap();
        assert_eq!(writer.get_ref().calls, 1);
        assert_eq!(writer.get_ref().data, b"abcabcabcabc");
    }

    #[test]
    fn test_large_write_bypasses_empty_window() {
        let mut writer = BufferedWriter::with_capacity(4, Vec::new());
        assert_eq!(writer.write(b"0123456789").unwrap(), 10);
        assert_eq!(writer.buffered(), 0);
        assert_eq!(writer.get_ref(), b"0123456789");
    }

    #[test]
    fn test_overflow_flushes_then_buffers_rest() {
        let mut writer = BufferedWriter::with_capacity(4, Vec::new());
        writer.write(b"ab").unwrap();
        assert_eq!(writer.write(b"cdef").unwrap(), 4);
        assert_eq!(writer.get_ref(), b"abcd");
        assert_eq!(writer.buffered(), 2);
        writer.flush().unwrap();
        assert_eq!(writer.get_ref(), b"abcdef");
    }

    #[test]
    fn test_flush_loops_over_partial_writes() {
        let mut writer = BufferedWriter::with_capacity(32, Trickle {
            limit: 3,
            ..Default::default()
        });
        writer.write(b"partial writes").unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.get_ref().data, b"partial writes");
        assert_eq!(writer.get_ref().calls, 5);
    }

    #[test]
    fn test_empty_flush_is_noop() {
        let mut writer = BufferedWriter::new(Failing {
            calls: 0,
            fail_on: 1,
        });
        writer.flush().unwrap();
        assert_eq!(writer.get_ref().calls, 0);
    }

    #[test]
    fn test_sticky_error() {
        let mut writer = BufferedWriter::with_capacity(4, Failing {
            calls: 0,
            fail_on: 2,
        });
        writer.write(b"abcd").unwrap();
        writer.write(b"e").unwrap(); // flushes "abcd" on call 1
        let err = writer.write(b"fghi").unwrap_err(); // flush fails on call 2
        assert!(matches!(err, BufError::Sink(_)));
        assert_eq!(writer.get_ref().calls, 2);

        assert!(writer.write(b"x").is_err());
        assert!(writer.flush().is_err());
        assert_eq!(writer.get_ref().calls, 2);

        writer.reset(Failing {
            calls: 0,
            fail_on: usize::MAX,
        });
        assert_eq!(writer.buffered(), 0);
        writer.write(b"ok").unwrap();
        writer.flush().unwrap();
    }

    #[test]
    fn test_zero_write_sink_poisons() {
        let mut writer = BufferedWriter::with_capacity(4, Trickle::default());
        let err = writer.write(b"too big for window").unwrap_err();
        assert!(matches!(err, BufError::Sink(ref e) if e.kind() == io::ErrorKind::WriteZero));
    }

    #[test]
    fn test_zero_capacity_uses_default() {
        let writer = BufferedWriter::with_capacity(0, Vec::new());
        assert_eq!(writer.capacity(), crate::config::DEFAULT_BUF_SIZE);
    }

    #[test]
    fn test_io_write_impl() {
        let mut writer = BufferedWriter::with_capacity(3, Vec::new());
        write!(writer, "{}-{}", 12, 34).unwrap();
        Write::flush(&mut writer).unwrap();
        assert_eq!(writer.into_inner(), b"12-34");
    }
}
