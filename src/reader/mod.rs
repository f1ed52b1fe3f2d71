//! Buffered reading from byte sources.
//!
//! - [`BufferedReader`] - Fixed-window reader with peek, exact, delimiter
//!   and line reads
//! - [`Lines`] - Iterator over whole lines of a reader
//! - [`Line`] - One line, or line fragment, returned by `read_line`

mod buffered;
mod lines;
pub(crate) mod window;

pub use buffered::BufferedReader;
pub use lines::Lines;
pub use window::Line;

#[cfg(feature = "async-io")]
pub(crate) use buffered::single_byte;
