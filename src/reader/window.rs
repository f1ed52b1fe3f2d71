//! Sans-io window shared by the sync and async buffered readers.
//!
//! All cursor arithmetic lives here; the drivers only decide when to talk to
//! their source. Every scanning step reports byte ranges instead of slices so
//! a driver can loop over `fill` without holding a borrow of the window.

use std::ops::Range;

use bytes::Bytes;

use crate::error::BufError;

/// A line returned by `read_line`.
///
/// `line` has its trailing `\n` or `\r\n` removed. `more` is `true` when the
/// line did not fit in the reader's window: the caller gets the line in
/// fragments and must concatenate them until a fragment with `more == false`
/// arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Line content, valid until the next call on the reader.
    pub line: &'a [u8],
    /// Whether the line continues in the next fragment.
    pub more: bool,
}

/// What `read` should do for a destination of a given length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReadPlan {
    /// Destination is empty; report 0 without touching the source.
    Nothing,
    /// Window is empty and the destination is at least as large: bypass it.
    Direct,
    /// Window is empty: one source read into the window, then copy.
    Refill,
    /// Serve from buffered bytes.
    Copy,
}

/// Outcome of one step of a peek.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PeekStep {
    Ready(Range<usize>),
    Eof,
    NeedFill,
}

/// Outcome of one step of a single-byte delimiter scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SliceStep {
    /// Delimiter found, or EOF reached with bytes left. Already consumed.
    Found(Range<usize>),
    /// Window filled without a delimiter. The whole window is consumed.
    Full(Range<usize>),
    /// Nothing left at all.
    Eof,
}

#[derive(Debug)]
pub(crate) struct ReadWindow {
    buf: Vec<u8>,
    r: usize,
    w: usize,
    eof: bool,
}

impl ReadWindow {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity],
            r: 0,
            w: 0,
            eof: false,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn buffered(&self) -> usize {
        self.w - self.r
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.eof
    }

    pub(crate) fn unread(&self) -> &[u8] {
        &self.buf[self.r..self.w]
    }

    pub(crate) fn get(&self, range: Range<usize>) -> &[u8] {
        &self.buf[range]
    }

    /// Forgets all buffered bytes and the EOF flag, keeping the allocation.
    pub(crate) fn reset(&mut self) {
        self.r = 0;
        self.w = 0;
        self.eof = false;
    }

    /// Slides unread bytes to the front ahead of a fill.
    ///
    /// # Errors
    ///
    /// [`BufError::FillFullWindow`] if there is no free space afterwards.
    pub(crate) fn prepare_fill(&mut self) -> Result<(), BufError> {
        if self.r > 0 {
            self.buf.copy_within(self.r..self.w, 0);
            self.w -= self.r;
            self.r = 0;
            tracing::trace!(buffered = self.w, "compacted read window");
        }
        if self.w >= self.buf.len() {
            tracing::warn!(capacity = self.buf.len(), "tried to fill full buffer");
            return Err(BufError::FillFullWindow);
        }
        Ok(())
    }

    /// Free space after the written region.
    pub(crate) fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.w..]
    }

    /// Records one source read made during a fill.
    ///
    /// Returns `true` once the fill is over (data arrived or EOF), `false`
    /// for an empty read that should be retried.
    pub(crate) fn commit_fill(&mut self, read: Option<usize>) -> bool {
        match read {
            None => {
                self.eof = true;
                true
            }
            Some(0) => false,
            Some(n) => {
                debug_assert!(self.w + n <= self.buf.len(), "source overran window");
                self.w += n;
                true
            }
        }
    }

    pub(crate) fn plan_read(&mut self, dest_len: usize) -> ReadPlan {
        if dest_len == 0 {
            return ReadPlan::Nothing;
        }
        if self.r == self.w {
            if dest_len >= self.buf.len() {
                return ReadPlan::Direct;
            }
            self.r = 0;
            self.w = 0;
            return ReadPlan::Refill;
        }
        ReadPlan::Copy
    }

    /// Records the single source read of a [`ReadPlan::Refill`].
    pub(crate) fn commit_refill(&mut self, read: Option<usize>) -> Option<usize> {
        match read {
            None => {
                self.eof = true;
                None
            }
            Some(n) => {
                self.w += n;
                Some(n)
            }
        }
    }

    /// Copies buffered bytes into `dest` and consumes them.
    pub(crate) fn copy_out(&mut self, dest: &mut [u8]) -> usize {
        let n = dest.len().min(self.buffered());
        dest[..n].copy_from_slice(&self.buf[self.r..self.r + n]);
        self.r += n;
        n
    }

    pub(crate) fn take_byte(&mut self) -> Option<u8> {
        if self.r == self.w {
            return None;
        }
        let b = self.buf[self.r];
        self.r += 1;
        Some(b)
    }

    pub(crate) fn peek_step(&self, n: usize) -> Result<PeekStep, BufError> {
        let avail = self.buffered();
        if avail < n && avail < self.buf.len() && !self.eof {
            return Ok(PeekStep::NeedFill);
        }
        if avail == 0 && self.eof {
            return Ok(PeekStep::Eof);
        }
        if avail < n && self.eof {
            return Ok(PeekStep::Ready(self.r..self.w));
        }
        if avail < n {
            tracing::debug!(requested = n, capacity = self.buf.len(), "peek exceeds window");
            return Err(BufError::BufferFull {
                buffered: Bytes::copy_from_slice(self.unread()),
            });
        }
        Ok(PeekStep::Ready(self.r..self.r + n))
    }

    /// One step of a single-byte delimiter scan.
    ///
    /// `scanned` is the number of unread bytes already searched by earlier
    /// steps of the same scan; it is updated before asking for a fill.
    /// `None` means the window needs a fill before the scan can finish.
    pub(crate) fn scan_slice(&mut self, delim: u8, scanned: &mut usize) -> Option<SliceStep> {
        let from = self.r + *scanned;
        if let Some(i) = self.buf[from..self.w].iter().position(|&b| b == delim) {
            let end = from + i + 1;
            let range = self.r..end;
            self.r = end;
            return Some(SliceStep::Found(range));
        }

        if self.eof {
            if self.r == self.w {
                return Some(SliceStep::Eof);
            }
            let range = self.r..self.w;
            self.r = self.w;
            return Some(SliceStep::Found(range));
        }

        if self.buffered() >= self.buf.len() {
            let range = self.r..self.w;
            self.r = self.w;
            tracing::debug!(capacity = self.buf.len(), "delimiter not found in full window");
            return Some(SliceStep::Full(range));
        }

        *scanned = self.w - self.r;
        None
    }

    /// Turns a finished scan into the result of `read_slice`.
    ///
    /// A full window becomes [`BufError::BufferFull`] carrying a copy of the
    /// whole window, since the window itself will be overwritten by the next
    /// fill.
    pub(crate) fn slice_result(&self, step: SliceStep) -> Result<Option<&[u8]>, BufError> {
        match step {
            SliceStep::Found(range) => Ok(Some(&self.buf[range])),
            SliceStep::Eof => Ok(None),
            SliceStep::Full(range) => Err(BufError::BufferFull {
                buffered: Bytes::copy_from_slice(&self.buf[range]),
            }),
        }
    }

    /// Turns a finished `\n` scan into the result of `read_line`.
    pub(crate) fn line_result(&mut self, step: SliceStep) -> Option<Line<'_>> {
        match step {
            SliceStep::Eof => None,
            SliceStep::Full(mut range) => {
                // A "\r\n" may straddle the fill boundary: put the '\r' back
                // so the next call sees the pair.
                if !self.eof && !range.is_empty() && self.buf[range.end - 1] == b'\r' {
                    debug_assert!(self.r > 0, "tried to rewind past start of buffer");
                    self.r -= 1;
                    range.end -= 1;
                    tracing::debug!("rewound trailing CR at window boundary");
                }
                Some(Line {
                    line: &self.buf[range],
                    more: !self.eof,
                })
            }
            SliceStep::Found(range) => {
                let line = &self.buf[range];
                Some(Line {
                    line: strip_eol(line),
                    more: false,
                })
            }
        }
    }
}

/// Drops a trailing `\n` or `\r\n`. A lone trailing `\r` is kept.
fn strip_eol(line: &[u8]) -> &[u8] {
    match line {
        [head @ .., b'\r', b'\n'] => head,
        [head @ .., b'\n'] => head,
        _ => line,
    }
}
