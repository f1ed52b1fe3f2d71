//! Async stream of delimiter-separated spans.
//!
//! # Example
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use bufrs::split_delimited_async;
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead + Unpin>(reader: R) -> Result<(), bufrs::BufError> {
//!     let mut stream = split_delimited_async(reader, b"\r\n\r\n")?;
//!
//!     while let Some(span) = stream.next().await {
//!         let span = span?;
//!         println!("span: {} bytes", span.len());
//!     }
//!     Ok(())
//! }
//! ```

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_core::Stream;
use futures_io::AsyncRead;
use pin_project_lite::pin_project;

use crate::delim::DelimiterSplitter;
use crate::error::BufError;
use crate::util::scan_chunk_size;

pin_project! {
    /// A stream that yields the spans between delimiters of an async reader.
    ///
    /// Same splitting rules as [`DelimitedSpans`](crate::DelimitedSpans):
    /// spans exclude the delimiter and end of stream closes a final,
    /// possibly empty, span.
    pub struct DelimitedStream<R> {
        #[pin]
        reader: R,
        splitter: DelimiterSplitter,
        chunk: Vec<u8>,
        finished: bool,
    }
}

impl<R: AsyncRead> DelimitedStream<R> {
    /// Creates a stream over the spans of `reader` separated by `delimiter`.
    ///
    /// # Errors
    ///
    /// Returns [`BufError::InvalidDelimiter`] if `delimiter` is empty.
    pub fn new(reader: R, delimiter: &[u8]) -> Result<Self, BufError> {
        Ok(Self {
            reader,
            splitter: DelimiterSplitter::new(delimiter)?,
            chunk: vec![0; scan_chunk_size(delimiter.len())],
            finished: false,
        })
    }

    /// Consumes the stream, returning the reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: AsyncRead> Stream for DelimitedStream<R> {
    type Item = Result<Bytes, BufError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        if *this.finished {
            return Poll::Ready(None);
        }

        loop {
            if let Some(span) = this.splitter.next_span() {
                return Poll::Ready(Some(Ok(span)));
            }

            let n = match this.reader.as_mut().poll_read(cx, &mut this.chunk[..]) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
                Poll::Ready(Err(e)) => {
                    *this.finished = true;
                    return Poll::Ready(Some(Err(BufError::Io(e))));
                }
                Poll::Ready(Ok(n)) => n,
            };

            if n == 0 {
                *this.finished = true;
                return Poll::Ready(Some(Ok(this.splitter.finish())));
            }
            this.splitter.feed(&this.chunk[..n]);
        }
    }
}

/// Creates a stream of delimiter-separated spans from an async reader.
///
/// Uses `futures_io::AsyncRead`, so any runtime works. Tokio readers can be
/// adapted with `tokio_util::compat::TokioAsyncReadCompatExt::compat`.
///
/// # Errors
///
/// Returns [`BufError::InvalidDelimiter`] if `delimiter` is empty.
pub fn split_delimited_async<R: AsyncRead>(
    reader: R,
    delimiter: &[u8],
) -> Result<DelimitedStream<R>, BufError> {
    DelimitedStream::new(reader, delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_delimited_stream_empty() {
        let reader: &[u8] = &[];
        let stream = DelimitedStream::new(reader, b"##").unwrap();
        let spans: Vec<_> = futures_util::StreamExt::collect(stream).await;
        let spans: Vec<Bytes> = spans.into_iter().collect::<Result<_, _>>().unwrap();
        assert_eq!(spans, [&b""[..]]);
    }

    #[tokio::test]
    async fn test_delimited_stream_spans() {
        let reader: &[u8] = b"aa##bb##c";
        let stream = split_delimited_async(reader, b"##").unwrap();
        let spans: Vec<_> = futures_util::StreamExt::collect(stream).await;
        let spans: Vec<Bytes> = spans.into_iter().collect::<Result<_, _>>().unwrap();
        assert_eq!(spans, [&b"aa"[..], &b"bb"[..], &b"c"[..]]);
    }
}
