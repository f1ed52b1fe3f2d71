//! In-memory byte accumulation.
//!
//! - [`GrowableBuffer`] - Auto-resizing buffer that is both a byte source and
//!   a byte sink, usable anywhere a real stream is expected

mod growable;

pub use growable::GrowableBuffer;
