use thiserror::Error;

/// I/O errors raised while acquiring the raw bytes of a file
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// The requested file does not exist
    #[error("File not found: {0}")]
    NotFound(String),

    /// Any other failure while reading the file
    #[error("Failed to read {id}: {message}")]
    Read { id: String, message: String },
}

/// Errors that abort metadata extraction as a whole.
///
/// Everything on the JPEG/EXIF path is fail-fast: a single structural problem
/// means no `MetadataResult` is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// Input does not start with the SOI marker (0xFFD8)
    #[error("File is not a valid JPEG")]
    NotAJpeg,

    /// Segment payload too small to hold what its marker promises
    #[error("Segment 0xFF{marker:02X} too short: {length} bytes")]
    SegmentTooShort { marker: u8, length: usize },

    /// EXIF payload too small to hold a TIFF header
    #[error("IFD data too short: {length} bytes")]
    DirectoryTooShort { length: usize },

    /// TIFF byte order marker is neither "II" nor "MM"
    #[error("Invalid byte order")]
    UnknownByteOrder,

    /// TIFF magic number 42 missing after the byte order marker
    #[error("Invalid byte order marker")]
    BadTiffMagic,

    /// IFD0 offset outside the range an APP1 segment can address
    #[error("Invalid IFD0 offset: {0}")]
    InvalidIfd0Offset(u32),

    /// IFD declares zero entries
    #[error("No entries in IFD at offset {offset}")]
    EmptyDirectory { offset: usize },

    /// Read would go past the end of the buffer
    #[error("Out of bounds: requested {requested} bytes at offset {offset}, size is {size}")]
    OutOfBounds {
        offset: usize,
        requested: usize,
        size: usize,
    },

    /// IFD offset was already visited in this payload
    #[error("IFD at offset {offset} visited twice")]
    DirectoryLoop { offset: usize },

    /// Sub-IFD pointers nested deeper than the walker follows
    #[error("Sub-IFD nesting too deep at offset {offset}")]
    DirectoryTooDeep { offset: usize },
}

/// Reasons IPTC decoding stops early.
///
/// These never escape `MetadataExtractor::parse`; tags decoded before the
/// failure point are kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IptcError {
    /// Record does not start with 0x1C
    #[error("Invalid IPTC marker 0x{found:02X} at offset {offset}")]
    InvalidMarker { offset: usize, found: u8 },

    /// Not enough bytes left for a record header
    #[error("Truncated IPTC record at offset {offset}")]
    TruncatedRecord { offset: usize },

    /// Extended length does not fit in a machine word
    #[error("IPTC extended length overflows at offset {offset}")]
    LengthOverflow { offset: usize },

    /// Value runs past the end of the payload
    #[error("IPTC value of {length} bytes at offset {offset} exceeds remaining {remaining}")]
    ValueOverrun {
        offset: usize,
        length: usize,
        remaining: usize,
    },
}

/// Errors from the load pipeline (acquisition + decode)
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// Identifier does not name a JPEG file
    #[error("File is not a JPEG: {0}")]
    NotJpeg(String),

    /// Acquiring the bytes failed
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Background task failed or went away
    #[error("Worker error: {0}")]
    Worker(String),
}

/// Errors that can occur while rendering a preview
#[derive(Debug, Clone, Error)]
pub enum PreviewError {
    /// Source image could not be decoded
    #[error("Failed to decode image: {message}")]
    Decode { message: String },

    /// Preview could not be encoded
    #[error("Failed to encode preview: {message}")]
    Encode { message: String },

    /// Requested preview size is zero
    #[error("Invalid preview size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}
