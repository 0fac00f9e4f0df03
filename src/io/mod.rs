//! Byte-level access for the decoders and the sources that supply the bytes.
//!
//! - [`ByteView`] is the bounds-checked, endianness-aware view every decoder
//!   reads through.
//! - [`ByteSource`] abstracts where a file's bytes come from (disk today).

mod byte_view;
mod source;

pub use byte_view::{read_u16_be, read_u16_le, read_u32_be, read_u32_le, ByteView};
pub use source::{ByteSource, FileSource};
