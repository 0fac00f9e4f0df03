//! Binary format decoders for JPEG metadata.
//!
//! - [`jpeg`] walks the APPn segments at the head of a JPEG stream
//! - [`tiff`] decodes the TIFF structure carried by EXIF APP1 segments
//! - [`iptc`] decodes IPTC-IIM records carried by APP13 segments
//!
//! None of these perform I/O; they operate on bytes already in memory.

pub mod iptc;
pub mod jpeg;
pub mod tiff;

pub use iptc::{decode_iptc, IptcRecord, IptcRecords};
pub use jpeg::{has_soi, Segment, SegmentScanner, APP1, APP13};
