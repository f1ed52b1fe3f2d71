//! Internal utility functions and helpers.
//!
//! This module contains small helper functions used throughout the crate.
//! It is an implementation detail and not part of the public API.

use crate::error::BufError;

/// Decodes an owned byte buffer as UTF-8 without copying it.
pub(crate) fn decode_utf8(bytes: Vec<u8>) -> Result<String, BufError> {
    Ok(String::from_utf8(bytes)?)
}

/// Size of the chunks a delimiter scanner pulls from its source.
pub(crate) fn scan_chunk_size(delim_len: usize) -> usize {
    crate::config::MIN_SCAN_CHUNK.max(delim_len + 1)
}
