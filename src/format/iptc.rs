//! IPTC-IIM decoding for APP13 payloads.
//!
//! APP13 usually wraps IPTC data in a Photoshop resource block; rather than
//! parse the wrapper, the decoder resynchronizes on the first `0x1C` byte that
//! is followed by a plausible record number and reads records from there.
//!
//! Each record is laid out as:
//!
//! ```text
//! 0x1C  record  dataset  length...  value...
//! ```
//!
//! A standard length is two bytes, big-endian. When the high bit of the first
//! length byte is set, the remaining 15 bits give the number of bytes that
//! follow and hold the real length, also big-endian.
//!
//! Decoding is lenient: on the first malformed record it stops, and every
//! dataset decoded before that point is kept.

use tracing::{debug, trace};

use crate::error::IptcError;
use crate::format::tiff::{decode_text, iptc_tag_name};
use crate::io::ByteView;
use crate::metadata::MetadataResult;

/// Tag marker opening every IPTC record
pub const IPTC_TAG_MARKER: u8 = 0x1C;

/// Record numbers at or above this are not treated as a resync point
const MAX_RECORD: u8 = 0x0F;

/// Bytes after the marker needed for record, dataset and a standard length
const RECORD_HEADER_SIZE: usize = 4;

const EXTENDED_LENGTH_FLAG: u8 = 0x80;

/// One IPTC dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IptcRecord<'a> {
    pub record: u8,
    pub dataset: u8,
    pub value: &'a [u8],
}

/// Iterator over the records of an APP13 payload.
///
/// Yields an error at most once, then ends.
#[derive(Debug, Clone)]
pub struct IptcRecords<'a> {
    data: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> IptcRecords<'a> {
    /// Start at the first plausible record in `data`.
    pub fn new(data: &'a [u8]) -> Self {
        let pos = data
            .windows(2)
            .position(|w| w[0] == IPTC_TAG_MARKER && w[1] < MAX_RECORD)
            .unwrap_or(data.len());

        Self {
            data,
            pos,
            done: false,
        }
    }

    fn read_record(&mut self) -> Result<IptcRecord<'a>, IptcError> {
        let data = self.data;
        let start = self.pos;

        let found = data[start];
        if found != IPTC_TAG_MARKER {
            return Err(IptcError::InvalidMarker {
                offset: start,
                found,
            });
        }

        let mut pos = start + 1;
        if pos + RECORD_HEADER_SIZE > data.len() {
            return Err(IptcError::TruncatedRecord { offset: start });
        }

        let record = data[pos];
        let dataset = data[pos + 1];
        let indicator = data[pos + 2];
        let low = data[pos + 3];
        pos += RECORD_HEADER_SIZE;

        let length = if indicator & EXTENDED_LENGTH_FLAG != 0 {
            let count = (usize::from(indicator & !EXTENDED_LENGTH_FLAG) << 8) | usize::from(low);
            let length_bytes = data
                .get(pos..pos + count)
                .ok_or(IptcError::TruncatedRecord { offset: start })?;
            pos += count;

            length_bytes.iter().try_fold(0usize, |acc, &b| {
                acc.checked_mul(256)
                    .map(|v| v | usize::from(b))
                    .ok_or(IptcError::LengthOverflow { offset: start })
            })?
        } else {
            (usize::from(indicator) << 8) | usize::from(low)
        };

        let remaining = data.len() - pos;
        if length > remaining {
            return Err(IptcError::ValueOverrun {
                offset: start,
                length,
                remaining,
            });
        }

        let value = &data[pos..pos + length];
        self.pos = pos + length;

        Ok(IptcRecord {
            record,
            dataset,
            value,
        })
    }
}

impl<'a> Iterator for IptcRecords<'a> {
    type Item = Result<IptcRecord<'a>, IptcError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos >= self.data.len() {
            return None;
        }

        let record = self.read_record();
        if record.is_err() {
            self.done = true;
        }
        Some(record)
    }
}

/// Decode the named datasets of an APP13 payload into `result`.
///
/// Datasets without a name are skipped. A name seen more than once becomes a
/// list.
///
/// # Errors
/// Returns the reason decoding stopped. Datasets decoded before the failure
/// have already been stored in `result`.
pub fn decode_iptc(payload: &ByteView, result: &mut MetadataResult) -> Result<(), IptcError> {
    let mut decoded = 0usize;

    for record in IptcRecords::new(payload.as_bytes()) {
        let record = record?;
        let Some(name) = iptc_tag_name(record.record, record.dataset) else {
            trace!(record = record.record, dataset = record.dataset, "Skipping unnamed IPTC dataset");
            continue;
        };

        result.insert_iptc(name, decode_text(record.value));
        decoded += 1;
    }

    debug!(decoded, "Decoded IPTC datasets");
    Ok(())
}
