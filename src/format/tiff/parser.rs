//! TIFF header parsing for EXIF payloads.
//!
//! An APP1 segment carrying EXIF data looks like this:
//!
//! ```text
//! Bytes 0-5:  "Exif\0\0" identifier
//! Bytes 6-7:  Byte order (0x4949 = little-endian "II", 0x4D4D = big-endian "MM")
//! Bytes 8-9:  Magic (42 = 0x002A) in the declared byte order
//! Bytes 10-13: Offset to IFD0, relative to byte 6
//! ```
//!
//! Every offset inside the EXIF structure is relative to the start of the
//! TIFF header, so the decoders work on a view that starts at byte 6.

use crate::error::MetadataError;
use crate::format::jpeg::APP1;
use crate::io::{read_u16_be, read_u16_le, read_u32_be, read_u32_le, ByteView};

// =============================================================================
// Constants
// =============================================================================

/// Identifier that opens an EXIF APP1 payload.
pub const EXIF_IDENTIFIER: &[u8; 6] = b"Exif\0\0";

/// Smallest APP1 payload accepted at all.
pub const MIN_APP1_LENGTH: usize = 8;

/// Smallest EXIF payload that can hold the identifier plus a TIFF header.
pub const MIN_EXIF_LENGTH: usize = 12;

/// Largest IFD0 offset an APP1 segment (64KB max) can address.
pub const MAX_IFD0_OFFSET: u32 = 0x0000_FFFF;

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) declared by a TIFF header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    BigEndian,
}

impl ByteOrder {
    /// Read a u16 from a byte slice using this byte order.
    #[inline]
    pub fn read_u16(self, bytes: &[u8]) -> u16 {
        match self {
            ByteOrder::LittleEndian => read_u16_le(bytes),
            ByteOrder::BigEndian => read_u16_be(bytes),
        }
    }

    /// Read a u32 from a byte slice using this byte order.
    #[inline]
    pub fn read_u32(self, bytes: &[u8]) -> u32 {
        match self {
            ByteOrder::LittleEndian => read_u32_le(bytes),
            ByteOrder::BigEndian => read_u32_be(bytes),
        }
    }
}

// =============================================================================
// TiffHeader
// =============================================================================

/// Parsed TIFF header of an EXIF payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    /// Byte order for all multi-byte values
    pub byte_order: ByteOrder,

    /// Offset to IFD0, relative to the TIFF header
    pub ifd0_offset: u32,
}

impl TiffHeader {
    /// Parse the header at the start of a TIFF view.
    ///
    /// Resolves the view's byte order as a side effect, so subsequent
    /// `short_at`/`long_at` calls on it honor the declared endianness.
    ///
    /// # Errors
    /// - `UnknownByteOrder` if bytes 0-1 are not II or MM
    /// - `BadTiffMagic` if bytes 2-3 are not 42 in that order
    /// - `InvalidIfd0Offset` if the IFD0 offset exceeds 0xFFFF
    pub fn parse(tiff: &mut ByteView) -> Result<Self, MetadataError> {
        let byte_order = tiff
            .resolve_byte_order()
            .ok_or(MetadataError::UnknownByteOrder)?;

        if !tiff.verify_tiff_magic() {
            return Err(MetadataError::BadTiffMagic);
        }

        let ifd0_offset = tiff.long_at(4)?;
        if ifd0_offset > MAX_IFD0_OFFSET {
            return Err(MetadataError::InvalidIfd0Offset(ifd0_offset));
        }

        Ok(TiffHeader {
            byte_order,
            ifd0_offset,
        })
    }
}

/// Strip the `Exif\0\0` identifier from an APP1 payload.
///
/// Returns `Ok(None)` when the payload carries something other than EXIF
/// (XMP, for instance), which is skipped without error.
///
/// # Errors
/// - `SegmentTooShort` if the payload is under 8 bytes
/// - `DirectoryTooShort` if an EXIF payload is under 12 bytes
pub fn exif_tiff_view(payload: &ByteView) -> Result<Option<ByteView>, MetadataError> {
    let length = payload.len();
    if length < MIN_APP1_LENGTH {
        return Err(MetadataError::SegmentTooShort {
            marker: APP1,
            length,
        });
    }

    if payload.bytes_at(0, EXIF_IDENTIFIER.len())? != EXIF_IDENTIFIER {
        return Ok(None);
    }

    if length < MIN_EXIF_LENGTH {
        return Err(MetadataError::DirectoryTooShort { length });
    }

    payload.slice(EXIF_IDENTIFIER.len(), length).map(Some)
}

// =============================================================================
// Tests
// =============================================================================
