//! EXIF data formats and tag name tables.
//!
//! This module defines the vocabulary for IFD decoding:
//! - Data formats that determine how an entry's value is encoded
//! - Directory kinds and the tag ids each one names
//!
//! The tables are static; a tag id missing from a table is decoded but
//! not reported.

// =============================================================================
// Data Formats
// =============================================================================

/// Data format codes of a 12-byte IFD entry.
///
/// Only String, UShort, ULong and URational have a decoder; entries in any
/// other format are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum DataFormat {
    UByte = 1,
    String = 2,
    UShort = 3,
    ULong = 4,
    URational = 5,
    SByte = 6,
    /// Opaque bytes; listed as a second "UByte" in older EXIF readers
    Undefined = 7,
    SShort = 8,
    SLong = 9,
    SRational = 10,
    SFloat = 11,
    DFloat = 12,
}

impl DataFormat {
    /// Create a DataFormat from its numeric code.
    ///
    /// Returns `None` for codes outside 1..=12.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(DataFormat::UByte),
            2 => Some(DataFormat::String),
            3 => Some(DataFormat::UShort),
            4 => Some(DataFormat::ULong),
            5 => Some(DataFormat::URational),
            6 => Some(DataFormat::SByte),
            7 => Some(DataFormat::Undefined),
            8 => Some(DataFormat::SShort),
            9 => Some(DataFormat::SLong),
            10 => Some(DataFormat::SRational),
            11 => Some(DataFormat::SFloat),
            12 => Some(DataFormat::DFloat),
            _ => None,
        }
    }

    /// Whether entries in this format are decoded at all.
    #[inline]
    pub const fn is_decoded(self) -> bool {
        matches!(
            self,
            DataFormat::String | DataFormat::UShort | DataFormat::ULong | DataFormat::URational
        )
    }
}

// =============================================================================
// Pointer Tags and Well-Known Values
// =============================================================================

/// Offset to the EXIF SubIFD
pub const EXIF_IFD_POINTER: u16 = 0x8769;

/// Offset to the GPS IFD
pub const GPS_IFD_POINTER: u16 = 0x8825;

/// `Compression` value marking a JPEG-compressed thumbnail in IFD1
pub const COMPRESSION_JPEG_THUMBNAIL: u32 = 6;

// =============================================================================
// Directory Kinds
// =============================================================================

/// Which output map an IFD's tags land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectoryKind {
    /// IFD0, IFD1 and the EXIF SubIFD
    Exif,
    /// The GPS IFD
    Gps,
}

impl DirectoryKind {
    /// Name of the tag `tag_id` in this directory, if it has one.
    pub fn tag_name(self, tag_id: u16) -> Option<&'static str> {
        match self {
            DirectoryKind::Exif => exif_tag_name(tag_id),
            DirectoryKind::Gps => gps_tag_name(tag_id),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            DirectoryKind::Exif => "exif",
            DirectoryKind::Gps => "gps",
        }
    }
}

// =============================================================================
// Tag Tables
// =============================================================================

fn exif_tag_name(tag_id: u16) -> Option<&'static str> {
    let name = match tag_id {
        // IFD0 / IFD1
        0x0100 => "ImageWidth",
        0x0101 => "ImageHeight",
        0x0103 => "Compression",
        0x010e => "ImageDescription",
        0x010f => "Make",
        0x0110 => "Model",
        0x0112 => "Orientation",
        0x0131 => "Software",
        0x0132 => "ModifyDate",
        0x013b => "Artist",
        0x0201 => "ThumbnailOffset",
        0x0202 => "ThumbnailSize",
        0x8298 => "Copyright",

        // EXIF SubIFD
        0x829a => "ExposureTime",
        0x829d => "FNumber",
        0x8822 => "ExposureProgram",
        0x8827 => "ISO",
        0x9003 => "DateTimeOriginal",
        0x9004 => "DateTimeDigitized",
        0x9207 => "MeteringMode",
        0x9209 => "Flash",
        0x920a => "FocalLength",
        0xa001 => "ColorSpace",
        0xa002 => "PixelXDimension",
        0xa003 => "PixelYDimension",
        0xa405 => "FocalLengthIn35mmFilm",
        0xa430 => "CameraOwnerName",
        0xa431 => "BodySerialNumber",
        0xa433 => "LensMake",
        0xa434 => "LensModel",
        0xa435 => "LensSerialNumber",
        _ => return None,
    };
    Some(name)
}

fn gps_tag_name(tag_id: u16) -> Option<&'static str> {
    let name = match tag_id {
        0x0001 => "GPSLatitudeRef",
        0x0002 => "GPSLatitude",
        0x0003 => "GPSLongitudeRef",
        0x0004 => "GPSLongitude",
        0x0005 => "GPSAltitudeRef",
        0x0006 => "GPSAltitude",
        0x0007 => "GPSTimeStamp",
        0x001d => "GPSDateStamp",
        _ => return None,
    };
    Some(name)
}

/// Name of the IPTC dataset `record:dataset`, if it has one.
pub fn iptc_tag_name(record: u8, dataset: u8) -> Option<&'static str> {
    let name = match (record, dataset) {
        (2, 5) => "ObjectName",
        (2, 25) => "Keywords",
        (2, 80) => "By-line",
        (2, 90) => "City",
        (2, 101) => "Country",
        (2, 105) => "Headline",
        (2, 116) => "CopyrightNotice",
        (2, 120) => "Description",
        _ => return None,
    };
    Some(name)
}

// =============================================================================
// Tests
// =============================================================================
