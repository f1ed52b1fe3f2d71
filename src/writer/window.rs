//! Sans-io write window and sticky error shared by the sync and async
//! buffered writers.

use std::io;
use std::sync::Arc;

use crate::error::BufError;

#[derive(Debug)]
pub(crate) struct WriteWindow {
    buf: Vec<u8>,
    used: usize,
    sticky: Option<Arc<io::Error>>,
}

impl WriteWindow {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity],
            used: 0,
            sticky: None,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn buffered(&self) -> usize {
        self.used
    }

    pub(crate) fn available(&self) -> usize {
        self.buf.len() - self.used
    }

    /// Bytes waiting to be flushed.
    pub(crate) fn pending(&self) -> &[u8] {
        &self.buf[..self.used]
    }

    /// Copies as much of `data` as fits and returns how much that was.
    pub(crate) fn push(&mut self, data: &[u8]) -> usize {
        let n = data.len().min(self.available());
        self.buf[self.used..self.used + n].copy_from_slice(&data[..n]);
        self.used += n;
        n
    }

    /// Marks everything as flushed.
    pub(crate) fn clear(&mut self) {
        self.used = 0;
    }

    /// Drops buffered bytes and forgets any sticky error.
    pub(crate) fn reset(&mut self) {
        self.used = 0;
        self.sticky = None;
    }

    /// Fails with the stored error, if any.
    pub(crate) fn check(&self) -> Result<(), BufError> {
        match &self.sticky {
            Some(e) => Err(BufError::Sink(Arc::clone(e))),
            None => Ok(()),
        }
    }

    /// Stores `e` as the sticky error and returns it.
    pub(crate) fn poison(&mut self, e: io::Error) -> BufError {
        tracing::debug!(error = %e, "sink failed, writer is now poisoned");
        let e = Arc::new(e);
        self.sticky = Some(Arc::clone(&e));
        BufError::Sink(e)
    }

    /// Checks the result of one sink write, poisoning on failure.
    ///
    /// A sink that accepts nothing of a non-empty slice would stall the
    /// writer forever, so that counts as [`io::ErrorKind::WriteZero`].
    pub(crate) fn accept(
        &mut self,
        result: io::Result<usize>,
        offered: usize,
    ) -> Result<usize, BufError> {
        match result {
            Ok(0) if offered > 0 => {
                Err(self.poison(io::Error::from(io::ErrorKind::WriteZero)))
            }
            Ok(n) => Ok(n),
            Err(e) => Err(self.poison(e)),
        }
    }
}
