//! Byte source and sink capabilities.
//!
//! Everything in this crate reads through [`ByteSource`] and writes through
//! [`ByteSink`]. Both are implemented for every [`std::io::Read`] and
//! [`std::io::Write`], so files, sockets, cursors and [`GrowableBuffer`]
//! plug in directly.
//!
//! A hand-written source can implement [`ByteSource`] itself when it needs to
//! report a zero-length read that is *not* end of stream (for example after a
//! spurious wake-up).
//!
//! [`GrowableBuffer`]: crate::GrowableBuffer

use std::io::{self, Read, Write};

/// A producer of bytes.
pub trait ByteSource {
    /// Reads up to `buf.len()` bytes into `buf`.
    ///
    /// Returns `Ok(None)` once the source is exhausted, and on every call
    /// after that. `Ok(Some(0))` with a non-empty `buf` is a spurious empty
    /// read; callers may retry.
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>>;
}

/// A consumer of bytes.
pub trait ByteSink {
    /// Writes some prefix of `data`, returning how many bytes were accepted.
    ///
    /// Writes may be partial; callers loop.
    fn write_bytes(&mut self, data: &[u8]) -> io::Result<usize>;
}

impl<R: Read + ?Sized> ByteSource for R {
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>> {
        loop {
            match self.read(buf) {
                Ok(0) if !buf.is_empty() => return Ok(None),
                Ok(n) => return Ok(Some(n)),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

impl<W: Write + ?Sized> ByteSink for W {
    fn write_bytes(&mut self, data: &[u8]) -> io::Result<usize> {
        loop {
            match self.write(data) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                other => return other,
            }
        }
    }
}
