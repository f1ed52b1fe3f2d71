//! Async buffered I/O over `futures-io`.
//!
//! Runtime agnostic: anything implementing `futures_io::AsyncRead` or
//! `AsyncWrite` works, including tokio types through `tokio_util::compat`.
//!
//! - [`AsyncBufferedReader`] - Async counterpart of `BufferedReader`
//! - [`AsyncBufferedWriter`] - Async counterpart of `BufferedWriter`
//! - [`split_delimited_async`] - Stream of delimiter-separated spans
//!
//! This module requires the `async-io` feature to be enabled.

mod poll;
mod reader;
mod stream;
mod writer;

pub use reader::AsyncBufferedReader;
pub use stream::{DelimitedStream, split_delimited_async};
pub use writer::AsyncBufferedWriter;
