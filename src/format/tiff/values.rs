//! IFD entry value decoding.
//!
//! Each IFD entry is 12 bytes:
//!
//! ```text
//! Bytes 0-1:  Tag id
//! Bytes 2-3:  Data format code
//! Bytes 4-7:  Component count
//! Bytes 8-11: Value (when it fits) or offset to the value
//! ```
//!
//! Offsets are relative to the TIFF header. Decoding is dispatched by an
//! exhaustive match on [`DataFormat`]; formats without a decoder yield
//! `Ok(None)` and the tag is dropped.

use crate::error::MetadataError;
use crate::io::ByteView;
use crate::metadata::Value;

use super::tags::DataFormat;

/// Size of one IFD entry in bytes.
pub const ENTRY_SIZE: usize = 12;

/// Offset of the value/offset field inside an entry.
const VALUE_FIELD: usize = 8;

/// Strings up to this many components are stored inline.
const INLINE_STRING_MAX: u32 = 4;

// =============================================================================
// DirectoryEntry
// =============================================================================

/// One raw IFD entry, alive for a single decode step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Tag id
    pub tag_id: u16,

    /// Raw data format code
    pub format_code: u16,

    /// Number of components of the declared format
    pub component_count: u32,

    /// The value/offset field, undecoded
    pub value_or_offset: [u8; 4],

    /// Where the entry starts in the TIFF view
    pub position: usize,
}

impl DirectoryEntry {
    /// Read the entry starting at `position`.
    pub fn parse(tiff: &ByteView, position: usize) -> Result<Self, MetadataError> {
        let raw = tiff.bytes_at(position, ENTRY_SIZE)?;
        let value_or_offset = [raw[8], raw[9], raw[10], raw[11]];

        Ok(DirectoryEntry {
            tag_id: tiff.short_at(position)?,
            format_code: tiff.short_at(position + 2)?,
            component_count: tiff.long_at(position + 4)?,
            value_or_offset,
            position,
        })
    }

    /// Decoded data format, `None` for unknown codes.
    #[inline]
    pub fn format(&self) -> Option<DataFormat> {
        DataFormat::from_u16(self.format_code)
    }

    #[inline]
    fn value_field(&self) -> usize {
        self.position + VALUE_FIELD
    }
}

// =============================================================================
// Value decoding
// =============================================================================

/// Decode an entry's value according to its data format.
///
/// Returns `Ok(None)` when the format has no decoder, when a UShort entry has
/// a count other than 1 or 2, or when a string's data lies outside the view.
///
/// # Errors
/// `OutOfBounds` when ULong or URational data lies outside the view.
pub fn decode_value(tiff: &ByteView, entry: &DirectoryEntry) -> Result<Option<Value>, MetadataError> {
    let Some(format) = entry.format().filter(|format| format.is_decoded()) else {
        return Ok(None);
    };

    match format {
        DataFormat::String => decode_string(tiff, entry),
        DataFormat::UShort => decode_ushort(tiff, entry),
        DataFormat::ULong => decode_ulong(tiff, entry).map(Some),
        DataFormat::URational => decode_urational(tiff, entry).map(Some),
        _ => Ok(None),
    }
}

fn decode_string(tiff: &ByteView, entry: &DirectoryEntry) -> Result<Option<Value>, MetadataError> {
    if entry.component_count <= INLINE_STRING_MAX {
        return Ok(Some(Value::String(decode_text(&entry.value_or_offset))));
    }

    let data_offset = tiff.long_at(entry.value_field())? as usize;
    match tiff.bytes_at(data_offset, entry.component_count as usize) {
        Ok(bytes) => Ok(Some(Value::String(decode_text(bytes)))),
        Err(_) => Ok(None),
    }
}

fn decode_ushort(tiff: &ByteView, entry: &DirectoryEntry) -> Result<Option<Value>, MetadataError> {
    let field = entry.value_field();
    match entry.component_count {
        1 => Ok(Some(Value::UShort(tiff.short_at(field)?))),
        2 => Ok(Some(Value::UShortPair(
            tiff.short_at(field)?,
            tiff.short_at(field + 2)?,
        ))),
        _ => Ok(None),
    }
}

fn decode_ulong(tiff: &ByteView, entry: &DirectoryEntry) -> Result<Value, MetadataError> {
    let field_value = tiff.long_at(entry.value_field())?;
    if entry.component_count == 1 {
        return Ok(Value::JoinedULong(field_value.to_string()));
    }

    let data_offset = field_value as usize;
    let count = entry.component_count as usize;
    check_array(tiff, data_offset, count, 4)?;

    let values = (0..count)
        .map(|i| tiff.long_at(data_offset + i * 4).map(|v| v.to_string()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Value::JoinedULong(values.join(",")))
}

fn decode_urational(tiff: &ByteView, entry: &DirectoryEntry) -> Result<Value, MetadataError> {
    let data_offset = tiff.long_at(entry.value_field())? as usize;
    let count = entry.component_count as usize;
    check_array(tiff, data_offset, count, 8)?;

    let values = (0..count)
        .map(|i| {
            let pair = data_offset + i * 8;
            let numerator = tiff.long_at(pair)?;
            let denominator = tiff.long_at(pair + 4)?;
            Ok(format!("{}/{}", numerator, denominator))
        })
        .collect::<Result<Vec<_>, MetadataError>>()?;

    Ok(Value::JoinedRational(values.join(",")))
}

/// Fail before allocating anything if `count` elements of `width` bytes
/// starting at `offset` do not fit in the view.
fn check_array(
    tiff: &ByteView,
    offset: usize,
    count: usize,
    width: usize,
) -> Result<(), MetadataError> {
    if count == 0 {
        return Ok(());
    }

    let len = count.checked_mul(width).ok_or(MetadataError::OutOfBounds {
        offset,
        requested: usize::MAX,
        size: tiff.len(),
    })?;
    tiff.bytes_at(offset, len).map(|_| ())
}

// =============================================================================
// Text decoding
// =============================================================================

/// Decode metadata text, dropping every NUL byte.
///
/// Valid UTF-8 is kept as is; anything else is read as Latin-1, one char per
/// byte.
pub fn decode_text(bytes: &[u8]) -> String {
    let stripped: Vec<u8> = bytes.iter().copied().filter(|&b| b != 0).collect();
    match String::from_utf8(stripped) {
        Ok(text) => text,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    }
}

// =============================================================================
// Tests
// =============================================================================
