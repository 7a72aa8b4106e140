//! `.osr` replay container decoding.
//!
//! The container is a fixed sequence of little-endian integers, marker
//! prefixed strings and one length-delimited blob. Field widths and marker
//! values live in `layout`, bounds-checked reads in `reader`, and the field
//! order in `parser`.
//!
//! The motion-data blob is returned as-is; its LZMA stream is not inspected.

pub mod error;
pub mod layout;
pub mod mods;
pub mod parser;
pub mod reader;

pub use parser::{DecodedReplay, decode_replay};
