//! Single-call adapters from `futures-io` traits to the crate's read and
//! write conventions.

use std::future::poll_fn;
use std::io;
use std::pin::Pin;

use futures_io::{AsyncRead, AsyncWrite};

/// One read from `source`, with `Ok(None)` for end of stream.
pub(crate) async fn read_source<R: AsyncRead + Unpin + ?Sized>(
    source: &mut R,
    buf: &mut [u8],
) -> io::Result<Option<usize>> {
    loop {
        let result = poll_fn(|cx| Pin::new(&mut *source).poll_read(cx, &mut *buf)).await;
        match result {
            Ok(0) if !buf.is_empty() => return Ok(None),
            Ok(n) => return Ok(Some(n)),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}

/// One write to `sink`; may be partial.
pub(crate) async fn write_sink<W: AsyncWrite + Unpin + ?Sized>(
    sink: &mut W,
    data: &[u8],
) -> io::Result<usize> {
    loop {
        match poll_fn(|cx| Pin::new(&mut *sink).poll_write(cx, data)).await {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            other => return other,
        }
    }
}

pub(crate) async fn flush_sink<W: AsyncWrite + Unpin + ?Sized>(sink: &mut W) -> io::Result<()> {
    poll_fn(|cx| Pin::new(&mut *sink).poll_flush(cx)).await
}

pub(crate) async fn close_sink<W: AsyncWrite + Unpin + ?Sized>(sink: &mut W) -> io::Result<()> {
    poll_fn(|cx| Pin::new(&mut *sink).poll_close(cx)).await
}
