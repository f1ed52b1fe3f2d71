//! Configuration for buffered readers and writers.
//!
//! - [`ReaderConfig`] - Window size and empty-read tolerance of a reader
//! - [`WriterConfig`] - Window size of a writer
//!
//! # Example
//!
//! ```
//! use bufrs::{ReaderConfig, WriterConfig};
//!
//! // Custom window size
//! let config = ReaderConfig::new(16 * 1024, 100)?;
//!
//! // Builder pattern
//! let config = WriterConfig::default().with_capacity(64 * 1024);
//!
//! # Ok::<(), bufrs::BufError>(())
//! ```

use crate::error::BufError;

/// Default window size (4 KiB).
pub const DEFAULT_BUF_SIZE: usize = 4096;

/// Smallest reader window. Smaller requests are rounded up.
///
/// A window must hold at least a `\r` and the byte that follows it for
/// CRLF detection across fill boundaries to make progress.
pub const MIN_BUF_SIZE: usize = 4;

/// Number of consecutive zero-length reads tolerated before giving up.
pub const MAX_CONSECUTIVE_EMPTY_READS: usize = 100;

/// Minimum read size used by [`GrowableBuffer::read_all_from`](crate::GrowableBuffer::read_all_from) (32 KiB).
pub const MIN_READ: usize = 32 * 1024;

/// Maximum size of a [`GrowableBuffer`](crate::GrowableBuffer) (2^32 - 2 bytes).
pub const MAX_SIZE: usize = u32::MAX as usize - 1;

/// Minimum size of the chunks a delimiter scanner reads from its source.
pub const MIN_SCAN_CHUNK: usize = 1024;

/// Configuration for a buffered reader.
///
/// # Example
///
/// ```
/// use bufrs::ReaderConfig;
///
/// let config = ReaderConfig::default()
///     .with_capacity(8192)
///     .with_max_empty_reads(10);
/// assert_eq!(config.capacity(), 8192);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReaderConfig {
    /// Window capacity in bytes.
    capacity: usize,

    /// Zero-length reads tolerated by a single fill.
    max_empty_reads: usize,
}

impl ReaderConfig {
    /// Creates a new reader configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BufError::InvalidConfig`] if:
    /// - `capacity` is smaller than [`MIN_BUF_SIZE`]
    /// - `max_empty_reads` is zero
    pub fn new(capacity: usize, max_empty_reads: usize) -> Result<Self, BufError> {
        if capacity < MIN_BUF_SIZE {
            return Err(BufError::InvalidConfig {
                message: "reader capacity is below the minimum window size",
            });
        }

        if max_empty_reads == 0 {
            return Err(BufError::InvalidConfig {
                message: "max_empty_reads must be non-zero",
            });
        }

        Ok(Self {
            capacity,
            max_empty_reads,
        })
    }

    /// Sets the window capacity.
    ///
    /// Note: This does not validate the configuration. Use [`ReaderConfig::validate`]
    /// to check if the configuration is valid.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets how many consecutive zero-length reads a fill tolerates.
    pub fn with_max_empty_reads(mut self, reads: usize) -> Self {
        self.max_empty_reads = reads;
        self
    }

    /// Returns the window capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the empty-read budget.
    pub fn max_empty_reads(&self) -> usize {
        self.max_empty_reads
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), BufError> {
        Self::new(self.capacity, self.max_empty_reads).map(|_| ())
    }

    /// Returns a copy with out-of-range values replaced by the nearest valid
    /// ones, the way the reader constructors treat their arguments.
    pub(crate) fn clamped(self) -> Self {
        Self {
            capacity: self.capacity.max(MIN_BUF_SIZE),
            max_empty_reads: self.max_empty_reads.max(1),
        }
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_BUF_SIZE,
            max_empty_reads: MAX_CONSECUTIVE_EMPTY_READS,
        }
    }
}

/// Configuration for a buffered writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WriterConfig {
    /// Window capacity in bytes.
    capacity: usize,
}

impl WriterConfig {
    /// Creates a new writer configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BufError::InvalidConfig`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, BufError> {
        if capacity == 0 {
            return Err(BufError::InvalidConfig {
                message: "writer capacity must be non-zero",
            });
        }

        Ok(Self { capacity })
    }

    /// Sets the window capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Returns the window capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), BufError> {
        Self::new(self.capacity).map(|_| ())
    }

    /// A zero capacity falls back to [`DEFAULT_BUF_SIZE`].
    pub(crate) fn clamped(self) -> Self {
        if self.capacity == 0 {
            Self::default()
        } else {
            self
        }
    }
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_BUF_SIZE,
        }
    }
}
