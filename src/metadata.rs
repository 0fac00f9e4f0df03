//! Decoded metadata types.
//!
//! [`MetadataResult`] is what one call to
//! [`MetadataExtractor::parse`](crate::MetadataExtractor::parse) produces. It
//! owns all of its maps and the thumbnail bytes; nothing is shared between
//! calls.

use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use serde::{Serialize, Serializer};

use crate::format::tiff::DirectoryKind;

// =============================================================================
// Value
// =============================================================================

/// A decoded EXIF/GPS tag value.
///
/// One variant per data format the decoder implements. ULong and URational
/// values are rendered as comma-joined text whatever their count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// NUL-stripped text
    String(String),
    /// A single 16-bit value
    UShort(u16),
    /// Two 16-bit values
    UShortPair(u16, u16),
    /// Decimal values joined by commas, e.g. `"640"` or `"1,2,3"`
    JoinedULong(String),
    /// `numerator/denominator` pairs joined by commas, e.g. `"1/200"`
    JoinedRational(String),
}

impl Value {
    /// Numeric value of a single UShort or single-component ULong.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::UShort(v) => Some(u32::from(*v)),
            Value::JoinedULong(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) | Value::JoinedULong(s) | Value::JoinedRational(s) => f.write_str(s),
            Value::UShort(v) => write!(f, "{}", v),
            Value::UShortPair(a, b) => write!(f, "{},{}", a, b),
        }
    }
}

// =============================================================================
// IptcValue
// =============================================================================

/// A decoded IPTC dataset.
///
/// A dataset seen once is plain text; repeating it (Keywords, typically)
/// turns the entry into a list in encounter order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IptcValue {
    Text(String),
    List(Vec<String>),
}

impl IptcValue {
    /// Append another occurrence, promoting a single value to a list.
    pub fn push(&mut self, value: String) {
        match self {
            IptcValue::Text(first) => {
                let first = std::mem::take(first);
                *self = IptcValue::List(vec![first, value]);
            }
            IptcValue::List(values) => values.push(value),
        }
    }

    /// All occurrences in encounter order.
    pub fn values(&self) -> Vec<&str> {
        match self {
            IptcValue::Text(s) => vec![s.as_str()],
            IptcValue::List(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for IptcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.values().join(", "))
    }
}

// =============================================================================
// MetadataResult
// =============================================================================

/// Metadata extracted from one JPEG file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetadataResult {
    /// Tags from IFD0, IFD1 and the EXIF SubIFD
    pub exif: BTreeMap<String, Value>,

    /// Tags from the GPS IFD
    pub gps: BTreeMap<String, Value>,

    /// Datasets from the APP13 IPTC block
    pub iptc: BTreeMap<String, IptcValue>,

    /// Raw bytes of the embedded JPEG thumbnail
    #[serde(rename = "thumbnail_len", serialize_with = "serialize_thumbnail_len")]
    pub thumbnail: Option<Bytes>,
}

impl MetadataResult {
    /// The map that tags of `kind` are stored in.
    pub fn directory_mut(&mut self, kind: DirectoryKind) -> &mut BTreeMap<String, Value> {
        match kind {
            DirectoryKind::Exif => &mut self.exif,
            DirectoryKind::Gps => &mut self.gps,
        }
    }

    /// Record one IPTC dataset occurrence.
    pub fn insert_iptc(&mut self, name: &str, value: String) {
        match self.iptc.get_mut(name) {
            Some(existing) => existing.push(value),
            None => {
                self.iptc.insert(name.to_string(), IptcValue::Text(value));
            }
        }
    }

    /// EXIF orientation (1-8), if recorded as a number.
    pub fn orientation(&self) -> Option<u16> {
        self.exif
            .get("Orientation")
            .and_then(Value::as_u32)
            .and_then(|v| u16::try_from(v).ok())
    }

    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.exif.is_empty() && self.gps.is_empty() && self.iptc.is_empty() && self.thumbnail.is_none()
    }
}

fn serialize_thumbnail_len<S: Serializer>(
    thumbnail: &Option<Bytes>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match thumbnail {
        Some(bytes) => serializer.serialize_some(&bytes.len()),
        None => serializer.serialize_none(),
    }
}
