//! IFD traversal.
//!
//! An IFD is a 2-byte entry count, `count` 12-byte entries and a 4-byte
//! offset to the next IFD (0 when there is none). Entries tagged 0x8769 and
//! 0x8825 point at the EXIF SubIFD and the GPS IFD; those directories are
//! walked as well and their tags merged into the same result.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::error::MetadataError;
use crate::io::ByteView;
use crate::metadata::MetadataResult;

use super::tags::{DirectoryKind, EXIF_IFD_POINTER, GPS_IFD_POINTER};
use super::values::{decode_value, DirectoryEntry, ENTRY_SIZE};

/// Deepest sub-directory nesting followed below a top-level IFD.
///
/// Real files nest at most two levels (IFD0, EXIF SubIFD, interop IFD).
const MAX_SUBDIRECTORY_DEPTH: usize = 16;

/// Walks the IFDs of one TIFF view.
///
/// Every directory offset is remembered across calls, so a payload whose
/// pointers form a cycle fails with `DirectoryLoop` instead of spinning.
#[derive(Debug)]
pub struct IfdWalker<'a> {
    tiff: &'a ByteView,
    visited: HashSet<usize>,
}

impl<'a> IfdWalker<'a> {
    /// Create a walker over a TIFF view whose byte order is resolved.
    pub fn new(tiff: &'a ByteView) -> Self {
        Self {
            tiff,
            visited: HashSet::new(),
        }
    }

    /// Walk the directory at `offset` and every sub-directory it points to.
    ///
    /// A sub-directory is walked as soon as its pointer entry is decoded, so
    /// entries after the pointer overwrite same-named tags from inside it.
    /// Tags land in the map for `kind` (sub-directories use their own kind).
    /// Returns the directory's next-IFD offset; sub-directory chains are not
    /// followed.
    ///
    /// # Errors
    /// - `EmptyDirectory` if any walked directory has zero entries
    /// - `DirectoryLoop` if a directory offset repeats
    /// - `DirectoryTooDeep` if sub-directory pointers nest too deeply
    /// - `OutOfBounds` if a count or a ULong/URational value cannot be read
    pub fn walk(
        &mut self,
        offset: usize,
        kind: DirectoryKind,
        result: &mut MetadataResult,
    ) -> Result<u32, MetadataError> {
        self.walk_at(offset, kind, result, 0)
    }

    fn walk_at(
        &mut self,
        offset: usize,
        kind: DirectoryKind,
        result: &mut MetadataResult,
        depth: usize,
    ) -> Result<u32, MetadataError> {
        if !self.visited.insert(offset) {
            return Err(MetadataError::DirectoryLoop { offset });
        }

        let count = self.tiff.short_at(offset)? as usize;
        if count == 0 {
            return Err(MetadataError::EmptyDirectory { offset });
        }

        debug!(offset, count, depth, directory = kind.name(), "Walking IFD");

        let first_entry = offset + 2;
        let mut end = first_entry;
        for i in 0..count {
            let position = first_entry + i * ENTRY_SIZE;
            if position + ENTRY_SIZE > self.tiff.len() {
                trace!(position, "IFD entry past end of payload, skipping");
                continue;
            }
            end = position + ENTRY_SIZE;

            let entry = DirectoryEntry::parse(self.tiff, position)?;
            let Some(value) = decode_value(self.tiff, &entry)? else {
                continue;
            };

            match entry.tag_id {
                EXIF_IFD_POINTER | GPS_IFD_POINTER => {
                    let sub_kind = if entry.tag_id == GPS_IFD_POINTER {
                        DirectoryKind::Gps
                    } else {
                        DirectoryKind::Exif
                    };
                    let Some(sub_offset) = value.as_u32() else {
                        continue;
                    };
                    let sub_offset = sub_offset as usize;
                    if depth >= MAX_SUBDIRECTORY_DEPTH {
                        return Err(MetadataError::DirectoryTooDeep { offset: sub_offset });
                    }
                    self.walk_at(sub_offset, sub_kind, result, depth + 1)?;
                }
                tag_id => {
                    if let Some(name) = kind.tag_name(tag_id) {
                        result.directory_mut(kind).insert(name.to_string(), value);
                    }
                }
            }
        }

        // A truncated next pointer ends the chain
        Ok(self.tiff.long_at(end).unwrap_or(0))
    }
}
