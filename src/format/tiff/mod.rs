//! TIFF structure decoding for EXIF payloads.
//!
//! EXIF data inside an APP1 segment is a miniature TIFF file: a header
//! declaring the byte order, followed by a chain of IFDs (Image File
//! Directories) whose entries carry the tags.
//!
//! # Key Concepts
//!
//! - **Byte order**: the header declares II (little-endian) or MM
//!   (big-endian). Every multi-byte read in the payload honors it.
//!
//! - **IFD chain**: IFD0 describes the main image; its next pointer leads to
//!   IFD1, which describes the thumbnail. Nothing past IFD1 is read.
//!
//! - **Sub-directories**: pointer tags in an IFD lead to the EXIF SubIFD and
//!   the GPS IFD. Their tags are merged into the `exif` and `gps` maps.
//!
//! - **Inline vs offset values**: values of up to 4 bytes are stored in the
//!   entry itself, larger ones at an offset from the TIFF header.

mod ifd;
mod parser;
mod tags;
mod values;

pub use ifd::IfdWalker;
pub use parser::{
    exif_tiff_view, ByteOrder, TiffHeader, EXIF_IDENTIFIER, MAX_IFD0_OFFSET, MIN_APP1_LENGTH,
    MIN_EXIF_LENGTH,
};
pub use tags::{
    iptc_tag_name, DataFormat, DirectoryKind, COMPRESSION_JPEG_THUMBNAIL, EXIF_IFD_POINTER,
    GPS_IFD_POINTER,
};
pub use values::{decode_text, decode_value, DirectoryEntry, ENTRY_SIZE};
