//! Buffered writing to byte sinks.
//!
//! - [`BufferedWriter`] - Fixed-window writer with a sticky sink error

mod buffered;
pub(crate) mod window;

pub use buffered::BufferedWriter;
