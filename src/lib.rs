//! bufrs
//!
//! Buffered binary I/O for Rust.
//!
//! `bufrs` is a small, transport agnostic layer between code that wants to
//! read or write bytes conveniently and whatever actually produces or
//! consumes them. It provides:
//!
//! - [`GrowableBuffer`] - an in-memory byte accumulator that is itself a
//!   source and a sink
//! - [`BufferedReader`] - peek, exact, delimiter and line reads over any
//!   [`ByteSource`]
//! - [`BufferedWriter`] - batched writes with a sticky error over any
//!   [`ByteSink`]
//! - [`DelimitedSpans`] - streaming split on a multi-byte delimiter, using a
//!   Knuth-Morris-Pratt [`DelimiterMatcher`]
//!
//! The crate intentionally:
//! - does NOT open files or sockets
//! - does NOT decode text other than UTF-8
//! - does NOT spawn tasks or impose timeouts
//!
//! End of stream is `Ok(None)`, never an error.
//!
//! # Sync
//!
//! ```no_run
//! use std::fs::File;
//! use bufrs::{BufError, BufferedReader};
//!
//! fn main() -> Result<(), BufError> {
//!     let file = File::open("data.txt")?;
//!
//!     for line in BufferedReader::new(file).lines() {
//!         println!("{}", line?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use bufrs::split_delimited_async;
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead + Unpin>(reader: R) -> Result<(), bufrs::BufError> {
//!     let mut stream = split_delimited_async(reader, b"\0")?;
//!
//!     while let Some(record) = stream.next().await {
//!         println!("record {}", record?.len());
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
mod error;

mod buffer;
mod delim;
mod reader;
mod source;
mod util; // internal helpers
mod writer;

#[cfg(feature = "async-io")]
mod async_io;

//
// Public surface
//

pub use buffer::GrowableBuffer;
pub use config::{ReaderConfig, WriterConfig};
pub use delim::{
    DelimitedSpans, DelimitedStrings, DelimiterMatcher, DelimiterSplitter, split_delimited,
    split_delimited_strings,
};
pub use error::BufError;
pub use reader::{BufferedReader, Line, Lines};
pub use source::{ByteSink, ByteSource};
pub use writer::BufferedWriter;

#[cfg(feature = "async-io")]
pub use async_io::{
    AsyncBufferedReader, AsyncBufferedWriter, DelimitedStream, split_delimited_async,
};
