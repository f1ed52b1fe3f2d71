//! Auto-resizing byte accumulator with a read cursor.

use std::io::{self, Write};

use bytes::Bytes;

use crate::config::{MAX_SIZE, MIN_READ};
use crate::error::BufError;
use crate::source::ByteSource;

/// A growable byte buffer that can be written to and read from like a
/// stream.
///
/// Bytes are appended at the end and consumed from the front. Consumed space
/// is reclaimed lazily: a write that does not fit first tries to slide the
/// unread bytes back to offset 0 and only reallocates when that is not
/// enough.
///
/// # Example
///
/// ```
/// use bufrs::GrowableBuffer;
///
/// let mut buf = GrowableBuffer::new();
/// buf.write_from(b"hello world")?;
///
/// let mut word = [0u8; 5];
/// assert_eq!(buf.read_into(&mut word), Some(5));
/// assert_eq!(&word, b"hello");
/// assert_eq!(buf.bytes(), b" world");
/// # Ok::<(), bufrs::BufError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct GrowableBuffer {
    /// Physical storage; its length is the capacity.
    buf: Vec<u8>,
    /// End of the written region.
    len: usize,
    /// Read offset.
    off: usize,
}

impl GrowableBuffer {
    /// Creates an empty buffer without allocating.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty buffer with `capacity` bytes preallocated.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity.min(MAX_SIZE)],
            len: 0,
            off: 0,
        }
    }

    /// Returns a view of the unread bytes.
    ///
    /// The view borrows the buffer, so it cannot outlive the next mutating
    /// call.
    pub fn bytes(&self) -> &[u8] {
        &self.buf[self.off..self.len]
    }

    /// Returns an owned copy of the unread bytes.
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(self.bytes())
    }

    /// Returns `true` if there are no unread bytes.
    pub fn is_empty(&self) -> bool {
        self.len == self.off
    }

    /// Number of unread bytes.
    pub fn len(&self) -> usize {
        self.len - self.off
    }

    /// Size of the physical allocation.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Keeps only the first `n` unread bytes.
    ///
    /// `truncate(0)` is the same as [`reset`](Self::reset).
    ///
    /// # Errors
    ///
    /// Returns [`BufError::OutOfRange`] if `n > self.len()`.
    pub fn truncate(&mut self, n: usize) -> Result<(), BufError> {
        if n == 0 {
            self.reset();
            return Ok(());
        }
        if n > self.len() {
            return Err(BufError::OutOfRange {
                requested: n,
                len: self.len(),
            });
        }
        self.len = self.off + n;
        Ok(())
    }

    /// Discards all content and keeps the allocation.
    pub fn reset(&mut self) {
        self.len = 0;
        self.off = 0;
    }

    /// Copies unread bytes into `dest` and consumes them.
    ///
    /// Returns `None` when the buffer is empty and `dest` is not. An empty
    /// `dest` always yields `Some(0)`, even on an empty buffer. Reading from
    /// an empty buffer resets it so the space is reused.
    pub fn read_into(&mut self, dest: &mut [u8]) -> Option<usize> {
        if self.is_empty() {
            self.reset();
            if dest.is_empty() {
                return Some(0);
            }
            return None;
        }
        let n = dest.len().min(self.len());
        dest[..n].copy_from_slice(&self.buf[self.off..self.off + n]);
        self.off += n;
        Some(n)
    }

    /// Appends all of `src`, growing as needed. Never writes partially.
    ///
    /// # Errors
    ///
    /// Returns [`BufError::TooLarge`] if the buffer would exceed
    /// [`MAX_SIZE`](crate::config::MAX_SIZE).
    pub fn write_from(&mut self, src: &[u8]) -> Result<usize, BufError> {
        let at = self.make_room(src.len())?;
        self.buf[at..at + src.len()].copy_from_slice(src);
        Ok(src.len())
    }

    /// Ensures `n` more bytes can be written without reallocating.
    ///
    /// # Errors
    ///
    /// Returns [`BufError::TooLarge`] if the buffer would exceed
    /// [`MAX_SIZE`](crate::config::MAX_SIZE).
    pub fn grow(&mut self, n: usize) -> Result<(), BufError> {
        let at = self.make_room(n)?;
        self.len = at;
        Ok(())
    }

    /// Reads from `source` until it reports end of stream.
    ///
    /// Reads land directly in spare capacity when at least
    /// [`MIN_READ`](crate::config::MIN_READ) bytes are free; otherwise a
    /// `MIN_READ` scratch chunk is read and appended. Returns the number of
    /// bytes read.
    pub fn read_all_from<S: ByteSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Result<usize, BufError> {
        let mut total = 0;
        let mut scratch = Vec::new();
        loop {
            if self.capacity() - self.len < MIN_READ {
                scratch.resize(MIN_READ, 0);
                match source.read_bytes(&mut scratch)? {
                    None => return Ok(total),
                    Some(n) => {
                        self.write_from(&scratch[..n])?;
                        total += n;
                    }
                }
            } else {
                match source.read_bytes(&mut self.buf[self.len..])? {
                    None => return Ok(total),
                    Some(n) => {
                        self.len += n;
                        total += n;
                    }
                }
            }
        }
    }

    /// Makes room for `n` more bytes and returns the offset they go to.
    ///
    /// On return `len` already covers the new bytes.
    fn make_room(&mut self, n: usize) -> Result<usize, BufError> {
        let m = self.len();
        if m == 0 && self.off != 0 {
            self.reset();
        }

        // Fits in the tail.
        if n <= self.capacity() - self.len {
            let at = self.len;
            self.len += n;
            return Ok(at);
        }

        let required = m
            .checked_add(n)
            .filter(|&r| r <= MAX_SIZE)
            .ok_or(BufError::TooLarge {
                requested: m.saturating_add(n),
                max: MAX_SIZE,
            })?;

        let c = self.capacity();
        if required <= c {
            // Dropping the consumed prefix is enough.
            self.buf.copy_within(self.off..self.len, 0);
            tracing::trace!(unread = m, capacity = c, "slid unread bytes to front");
        } else {
            let new_cap = c.saturating_mul(2).saturating_add(n).min(MAX_SIZE);
            let mut buf = vec![0; new_cap];
            buf[..m].copy_from_slice(&self.buf[self.off..self.len]);
            self.buf = buf;
            tracing::trace!(unread = m, old = c, new = new_cap, "reallocated buffer");
        }
        self.off = 0;
        self.len = required;
        Ok(m)
    }
}

impl From<Vec<u8>> for GrowableBuffer {
    fn from(buf: Vec<u8>) -> Self {
        let len = buf.len();
        Self { buf, len, off: 0 }
    }
}

impl From<&[u8]> for GrowableBuffer {
    fn from(data: &[u8]) -> Self {
        Self::from(data.to_vec())
    }
}

impl io::Read for GrowableBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_into(buf).unwrap_or(0))
    }
}

impl Write for GrowableBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_from(buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(feature = "async-io")]
mod async_impls {
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use futures_io::{AsyncRead, AsyncWrite};

    use super::GrowableBuffer;

    impl AsyncRead for GrowableBuffer {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut [u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Ready(Ok(self.get_mut().read_into(buf).unwrap_or(0)))
        }
    }

    impl AsyncWrite for GrowableBuffer {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Ready(self.get_mut().write_from(buf).map_err(io::Error::from))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let data: Vec<u8> = (0..1000).map(|i| (i % 251) as u8).collect();
        let mut buf = GrowableBuffer::new();
        assert_eq!(buf.write_from(&data).unwrap(), data.len());

        let mut out = vec![0u8; data.len()];
        assert_eq!(buf.read_into(&mut out), Some(data.len()));
        assert_eq!(out, data);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_empty_destination_asymmetry() {
        let mut buf = GrowableBuffer::new();
        assert_eq!(buf.read_into(&mut []), Some(0));
        assert_eq!(buf.read_into(&mut [0u8; 3]), None);
    }

    #[test]
    fn test_read_from_empty_resets() {
        let mut buf = GrowableBuffer::new();
        buf.write_from(b"abc").unwrap();
        let mut out = [0u8; 3];
        buf.read_into(&mut out);
        assert_eq!(buf.read_into(&mut out), None);
        assert_eq!(buf.off, 0);
        assert_eq!(buf.len, 0);
    }

    #[test]
    fn test_grow_prevents_reallocation() {
        let mut buf = GrowableBuffer::new();
        buf.write_from(b"xyz").unwrap();
        buf.grow(100).unwrap();
        let cap = buf.capacity();
        assert!(cap >= 103);
        buf.write_from(&[7u8; 100]).unwrap();
        assert_eq!(buf.capacity(), cap);
        assert_eq!(buf.len(), 103);
    }

    #[test]
    fn test_grow_too_large() {
        let mut buf = GrowableBuffer::new();
        buf.write_from(b"a").unwrap();
        let err = buf.grow(MAX_SIZE).unwrap_err();
        assert!(matches!(err, BufError::TooLarge { max: MAX_SIZE, .. }));
        // Unchanged on failure.
        assert_eq!(buf.bytes(), b"a");
    }

    #[test]
    fn test_slide_reuses_consumed_prefix() {
        let mut buf = GrowableBuffer::with_capacity(64);
        buf.write_from(&[1u8; 60]).unwrap();
        let mut sink = [0u8; 58];
        buf.read_into(&mut sink);
        // 2 unread, 4 free at the tail; 10 more fits once slid.
        buf.write_from(&[2u8; 10]).unwrap();
        assert_eq!(buf.capacity(), 64);
        assert_eq!(buf.bytes(), &[1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2]);
    }

    #[test]
    fn test_slide_when_consumed_prefix_suffices() {
        let mut buf = GrowableBuffer::with_capacity(64);
        buf.write_from(&[1u8; 60]).unwrap();
        let mut sink = [0u8; 30];
        buf.read_into(&mut sink);
        // 30 unread + 10 new is more than half the capacity but still fits.
        buf.write_from(&[2u8; 10]).unwrap();
        assert_eq!(buf.capacity(), 64);
        assert_eq!(buf.len(), 40);
        assert_eq!(&buf.bytes()[..30], &[1u8; 30]);
        assert_eq!(&buf.bytes()[30..], &[2u8; 10]);
    }

    #[test]
    fn test_reallocation_doubles_plus_n() {
        let mut buf = GrowableBuffer::with_capacity(16);
        buf.write_from(&[0u8; 16]).unwrap();
        buf.write_from(&[1u8; 4]).unwrap();
        assert_eq!(buf.capacity(), 2 * 16 + 4);
        assert_eq!(buf.len(), 20);
    }

    #[test]
    fn test_truncate() {
        let mut buf = GrowableBuffer::from(&b"hello world"[..]);
        let mut skip = [0u8; 6];
        buf.read_into(&mut skip);
        buf.truncate(3).unwrap();
        assert_eq!(buf.bytes(), b"wor");

        assert!(matches!(
            buf.truncate(4),
            Err(BufError::OutOfRange {
                requested: 4,
                len: 3
            })
        ));

        buf.truncate(0).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_reset_keeps_allocation() {
        let mut buf = GrowableBuffer::new();
        buf.write_from(&[9u8; 500]).unwrap();
        let cap = buf.capacity();
        buf.reset();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn test_reset_behaves_like_fresh() {
        let mut used = GrowableBuffer::with_capacity(32);
        used.write_from(b"garbage garbage").unwrap();
        let mut tmp = [0u8; 4];
        used.read_into(&mut tmp);
        used.reset();

        let mut fresh = GrowableBuffer::with_capacity(32);
        for buf in [&mut used, &mut fresh] {
            buf.write_from(b"0123456789").unwrap();
        }
        let (mut a, mut b) = ([0u8; 7], [0u8; 7]);
        assert_eq!(used.read_into(&mut a), fresh.read_into(&mut b));
        assert_eq!(a, b);
        assert_eq!(used.bytes(), fresh.bytes());
        assert_eq!(used.capacity(), fresh.capacity());
    }

    #[test]
    fn test_to_bytes_is_a_copy() {
        let mut buf = GrowableBuffer::from(b"abc".to_vec());
        let copy = buf.to_bytes();
        buf.reset();
        buf.write_from(b"xyz").unwrap();
        assert_eq!(&copy[..], b"abc");
    }

    #[test]
    fn test_read_all_from_small_capacity_uses_scratch() {
        let data: Vec<u8> = (0..100_000).map(|i| (i % 256) as u8).collect();
        let mut src = std::io::Cursor::new(data.clone());
        let mut buf = GrowableBuffer::new();
        assert_eq!(buf.read_all_from(&mut src).unwrap(), data.len());
        assert_eq!(buf.bytes(), &data[..]);
    }

    #[test]
    fn test_read_all_from_reads_into_spare_capacity() {
        let data = vec![5u8; 1000];
        let mut src = std::io::Cursor::new(data.clone());
        let mut buf = GrowableBuffer::with_capacity(2 * MIN_READ);
        let cap = buf.capacity();
        assert_eq!(buf.read_all_from(&mut src).unwrap(), 1000);
        assert_eq!(buf.capacity(), cap);
        assert_eq!(buf.bytes(), &data[..]);
    }

    #[test]
    fn test_io_traits() {
        use std::io::Read;

        let mut buf = GrowableBuffer::new();
        buf.write_all(b"stream").unwrap();
        let mut out = String::new();
        buf.read_to_string(&mut out).unwrap();
        assert_eq!(out, "stream");
    }
}
