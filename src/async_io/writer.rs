//! Async buffered writer over a `futures_io::AsyncWrite`.

use futures_io::AsyncWrite;

use super::poll::{close_sink, flush_sink, write_sink};
use crate::config::WriterConfig;
use crate::error::BufError;
use crate::writer::window::WriteWindow;

/// The async counterpart of [`BufferedWriter`](crate::BufferedWriter).
///
/// Unlike the sync writer, [`flush`](Self::flush) also flushes the sink
/// once every buffered byte has been written to it, since async sinks often
/// buffer on their own.
#[derive(Debug)]
pub struct AsyncBufferedWriter<W> {
    sink: W,
    window: WriteWindow,
}

impl<W: AsyncWrite + Unpin> AsyncBufferedWriter<W> {
    /// Creates a writer with the default window size.
    pub fn new(sink: W) -> Self {
        Self::with_config(WriterConfig::default(), sink)
    }

    /// Creates a writer with a window of `capacity` bytes; zero means the
    /// default size.
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
    /// from now on.
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
    pub async fn write(&mut self, mut data: &[u8]) -> Result<usize, BufError> {
        self.window.check()?;
        if data.is_empty() {
            return Ok(0);
        }

        let mut total = 0;
        while data.len() > self.window.available() {
            let n = if self.window.buffered() == 0 {
                let result = write_sink(&mut self.sink, data).await;
                self.window.accept(result, data.len())?
            } else {
                let n = self.window.push(data);
                self.flush_window().await?;
                n
            };
            total += n;
            data = &data[n..];
        }
        total += self.window.push(data);
        Ok(total)
    }

    async fn flush_window(&mut self) -> Result<(), BufError> {
        self.window.check()?;
        let mut written = 0;
        while written < self.window.buffered() {
            let offered = self.window.buffered() - written;
            let result = write_sink(&mut self.sink, &self.window.pending()[written..]).await;
            written += self.window.accept(result, offered)?;
        }
        self.window.clear();
        Ok(())
    }

    /// Writes every buffered byte to the sink, then flushes the sink.
    ///
    /// # Errors
    ///
    /// [`BufError::Sink`] if the sink failed, now or during an earlier call.
    pub async fn flush(&mut self) -> Result<(), BufError> {
        self.flush_window().await?;
        if let Err(e) = flush_sink(&mut self.sink).await {
            return Err(self.window.poison(e));
        }
        Ok(())
    }

    /// Flushes, then closes the sink.
    pub async fn close(&mut self) -> Result<(), BufError> {
        self.flush().await?;
        if let Err(e) = close_sink(&mut self.sink).await {
            return Err(self.window.poison(e));
        }
        Ok(())
    }
}
