//! JPEG segment scanning.
//!
//! Metadata lives in the application segments (APPn) that follow the SOI
//! marker:
//!
//! ```text
//! FF D8                     SOI
//! FF En  LL LL  payload...  APPn, LL LL counts itself plus the payload
//! FF En  LL LL  payload...
//! FF DB  ...                first non-APPn segment, scanning stops here
//! ```
//!
//! Scan data is never inspected. APP1 carries EXIF, APP13 carries IPTC; all
//! other APPn segments are yielded but ignored by the extractor.

use bytes::Bytes;
use tracing::trace;

use crate::error::MetadataError;
use crate::io::ByteView;

// =============================================================================
// JPEG Markers
// =============================================================================

/// Start Of Image marker
pub const SOI: [u8; 2] = [0xFF, 0xD8];

/// Prefix byte of every marker
pub const MARKER_PREFIX: u8 = 0xFF;

/// Application segment 0 (JFIF), first APPn marker
pub const APP0: u8 = 0xE0;

/// Application segment 1 (EXIF)
pub const APP1: u8 = 0xE1;

/// Application segment 13 (Photoshop / IPTC)
pub const APP13: u8 = 0xED;

/// Last marker treated as an application segment
pub const APPN_LAST: u8 = 0xFE;

/// Size of a segment header: marker (2) + length (2)
const SEGMENT_HEADER_SIZE: usize = 4;

/// Check whether data starts with the SOI marker.
#[inline]
pub fn has_soi(data: &[u8]) -> bool {
    data.len() >= 2 && data[0..2] == SOI
}

#[inline]
fn is_app_marker(marker: u8) -> bool {
    (APP0..=APPN_LAST).contains(&marker)
}

// =============================================================================
// Segment
// =============================================================================

/// One APPn segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Low marker byte (0xE0..=0xFE)
    pub marker: u8,

    /// Segment payload, without the marker and length field
    pub payload: ByteView,
}

// =============================================================================
// SegmentScanner
// =============================================================================

/// Iterates over the APPn segments of a JPEG stream.
///
/// Stops at the first marker outside the APPn range, or when fewer than four
/// bytes remain for a segment header. A declared length that runs past the
/// end of the input is clamped to what is there.
#[derive(Debug, Clone)]
pub struct SegmentScanner {
    view: ByteView,
    done: bool,
}

impl SegmentScanner {
    /// Start scanning `data`.
    ///
    /// # Errors
    /// `NotAJpeg` if the data does not begin with `FF D8`.
    pub fn new(data: impl Into<Bytes>) -> Result<Self, MetadataError> {
        let mut view = ByteView::new(data);
        if !has_soi(view.as_bytes()) {
            return Err(MetadataError::NotAJpeg);
        }
        view.skip(SOI.len());

        Ok(Self { view, done: false })
    }

    /// Read the next APPn segment.
    ///
    /// Returns `Ok(None)` once scanning has stopped.
    ///
    /// # Errors
    /// `SegmentTooShort` if a segment declares a length below 2.
    pub fn next_segment(&mut self) -> Result<Option<Segment>, MetadataError> {
        if self.done {
            return Ok(None);
        }

        let Some([prefix, marker, len_hi, len_lo]) = self.read_header() else {
            self.done = true;
            return Ok(None);
        };

        if prefix != MARKER_PREFIX || !is_app_marker(marker) {
            trace!(marker = format!("0x{:02X}{:02X}", prefix, marker), "End of APPn segments");
            self.done = true;
            return Ok(None);
        }

        let length = usize::from(len_lo) + 256 * usize::from(len_hi);
        if length < 2 {
            self.done = true;
            return Err(MetadataError::SegmentTooShort { marker, length });
        }

        let payload_len = length - 2;
        let start = self.view.position();
        let end = start.saturating_add(payload_len).min(self.view.len());
        let payload = self.view.slice(start, end)?;
        self.view.skip(payload_len);

        trace!(marker = format!("0xFF{:02X}", marker), length = payload.len(), "APPn segment");

        Ok(Some(Segment { marker, payload }))
    }

    fn read_header(&mut self) -> Option<[u8; SEGMENT_HEADER_SIZE]> {
        if self.view.remaining() < SEGMENT_HEADER_SIZE {
            return None;
        }
        let mut header = [0u8; SEGMENT_HEADER_SIZE];
        for byte in header.iter_mut() {
            *byte = self.view.next_byte()?;
        }
        Some(header)
    }
}

impl Iterator for SegmentScanner {
    type Item = Result<Segment, MetadataError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_segment().transpose()
    }
}

// =============================================================================
// Tests
// =============================================================================
