//! Bounds-checked, endianness-aware view over a byte buffer.
//!
//! A [`ByteView`] owns a cheaply cloneable [`Bytes`] handle, a read cursor
//! used by sequential scans, and the byte order resolved from a TIFF header.
//! Offset-addressed reads never clamp: any read that would run past the end of
//! the view fails with [`MetadataError::OutOfBounds`].
//!
//! Slices are views of their own. Offsets inside a slice are relative to the
//! slice start, the cursor starts at zero, and the parent's byte order is
//! inherited.

use bytes::Bytes;

use crate::error::MetadataError;
use crate::format::tiff::ByteOrder;

/// TIFF magic number that follows the byte order marker.
const TIFF_MAGIC: u16 = 0x002A;

// =============================================================================
// ByteView
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteView {
    data: Bytes,
    cursor: usize,
    byte_order: Option<ByteOrder>,
}

impl ByteView {
    /// Create a view over `data` with the cursor at zero and no byte order.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            cursor: 0,
            byte_order: None,
        }
    }

    /// Length of the view in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current cursor position.
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Bytes left between the cursor and the end of the view.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Byte order resolved by [`resolve_byte_order`](Self::resolve_byte_order),
    /// or inherited from the parent view.
    #[inline]
    pub fn byte_order(&self) -> Option<ByteOrder> {
        self.byte_order
    }

    /// The whole view as a byte slice.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the byte at the cursor.
    ///
    /// Returns `None` once the cursor reaches the end of the view.
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.cursor)?;
        self.cursor += 1;
        Some(byte)
    }

    /// Move the cursor forward by `count` bytes, stopping at the end of the view.
    pub fn skip(&mut self, count: usize) {
        self.cursor = self.cursor.saturating_add(count).min(self.data.len());
    }

    /// Read the byte at `offset`.
    pub fn byte_at(&self, offset: usize) -> Result<u8, MetadataError> {
        self.data
            .get(offset)
            .copied()
            .ok_or(MetadataError::OutOfBounds {
                offset,
                requested: 1,
                size: self.data.len(),
            })
    }

    /// Borrow `len` bytes starting at `offset`.
    pub fn bytes_at(&self, offset: usize, len: usize) -> Result<&[u8], MetadataError> {
        let end = self.checked_end(offset, len)?;
        Ok(&self.data[offset..end])
    }

    /// Inspect bytes 0-1 and record the byte order they declare.
    ///
    /// `"II"` is little-endian, `"MM"` is big-endian. Anything else leaves the
    /// view without a byte order and returns `None`.
    pub fn resolve_byte_order(&mut self) -> Option<ByteOrder> {
        self.byte_order = match self.data.get(0..2) {
            Some(b"II") => Some(ByteOrder::LittleEndian),
            Some(b"MM") => Some(ByteOrder::BigEndian),
            _ => None,
        };
        self.byte_order
    }

    /// Check that bytes 2-3 hold the TIFF magic number in the resolved order.
    pub fn verify_tiff_magic(&self) -> bool {
        matches!(self.short_at(2), Ok(TIFF_MAGIC))
    }

    /// Read a u16 at `offset` using the resolved byte order.
    pub fn short_at(&self, offset: usize) -> Result<u16, MetadataError> {
        let order = self.byte_order.ok_or(MetadataError::UnknownByteOrder)?;
        Ok(order.read_u16(self.bytes_at(offset, 2)?))
    }

    /// Read a u32 at `offset` using the resolved byte order.
    pub fn long_at(&self, offset: usize) -> Result<u32, MetadataError> {
        let order = self.byte_order.ok_or(MetadataError::UnknownByteOrder)?;
        Ok(order.read_u32(self.bytes_at(offset, 4)?))
    }

    /// Derive a view over `[start, end)` of this view.
    ///
    /// The slice shares the backing buffer, inherits the byte order and gets
    /// its own cursor.
    pub fn slice(&self, start: usize, end: usize) -> Result<ByteView, MetadataError> {
        if start > end || end > self.data.len() {
            return Err(MetadataError::OutOfBounds {
                offset: start,
                requested: end.saturating_sub(start),
                size: self.data.len(),
            });
        }

        Ok(ByteView {
            data: self.data.slice(start..end),
            cursor: 0,
            byte_order: self.byte_order,
        })
    }

    fn checked_end(&self, offset: usize, len: usize) -> Result<usize, MetadataError> {
        match offset.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(end),
            _ => Err(MetadataError::OutOfBounds {
                offset,
                requested: len,
                size: self.data.len(),
            }),
        }
    }
}

// =============================================================================
// Endian Helper Functions
// =============================================================================
//
// Callers pass slices of exactly the right width; ByteView checks bounds
// before handing slices over.

/// Read a little-endian u16 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 2 bytes.
#[inline]
pub fn read_u16_le(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

/// Read a big-endian u16 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 2 bytes.
#[inline]
pub fn read_u16_be(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}

/// Read a little-endian u32 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 4 bytes.
#[inline]
pub fn read_u32_le(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Read a big-endian u32 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 4 bytes.
#[inline]
pub fn read_u32_be(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
