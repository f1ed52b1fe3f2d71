//! Multi-byte delimiter scanning.
//!
//! - [`DelimiterMatcher`] - KMP failure table plus streaming match state
//! - [`DelimiterSplitter`] - Sans-io engine with `feed()`/`next_span()`/`finish()`
//! - [`DelimitedSpans`] / [`DelimitedStrings`] - Lazy iterators over a source

mod engine;
mod iter;
mod matcher;

pub use engine::DelimiterSplitter;
pub use iter::{DelimitedSpans, DelimitedStrings, split_delimited, split_delimited_strings};
pub use matcher::DelimiterMatcher;
