//! Index entry representation
//!
//! Each entry in the index represents a staged file with:
//! - File path, relative to the repository root, with `/` separators
//! - Content hash (blob object ID)
//! - File metadata (mode, size, timestamps, device/inode, ownership)
//!
//! ## Entry Format
//!
//! ```text
//! 10 x u32   ctime, ctime_nsec, mtime, mtime_nsec, dev, ino, mode, uid, gid, size
//! 20 bytes   blob object ID
//! u16        flags: low 12 bits = path length, bits 12-13 = stage
//! path       UTF-8 bytes, NUL terminated, zero padded to a multiple of 8 bytes
//! ```

use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
use crate::artifacts::objects::OBJECT_ID_RAW_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::CoreError;
use anyhow::anyhow;
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use is_executable::IsExecutable;
use std::fs::Metadata;
use std::io::Write;
use std::os::unix::prelude::MetadataExt;
use std::path::Path;

/// Largest path length (in UTF-8 bytes) that fits the 12-bit flags field
pub const MAX_PATH_SIZE: usize = 0xFFF;

/// Block size for entry alignment (8 bytes)
pub const ENTRY_BLOCK: usize = 8;

/// Size of the fixed part of an entry: 10 metadata words, the hash and the flags
pub const ENTRY_FIXED_SIZE: usize = 10 * 4 + OBJECT_ID_RAW_LENGTH + 2;

/// Minimum size of an index entry in bytes
pub const ENTRY_MIN_SIZE: usize = 64;

const PATH_LENGTH_MASK: u16 = 0x0FFF;
const STAGE_SHIFT: u16 = 12;
const STAGE_MASK: u16 = 0x3;

/// Index entry representing a staged file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// File path relative to repository root
    pub name: String,
    /// Hash of the staged blob
    pub oid: ObjectId,
    pub metadata: EntryMetadata,
}

impl IndexEntry {
    /// Build an entry, rejecting paths whose length does not fit the flags field.
    pub fn try_new(name: String, oid: ObjectId, metadata: EntryMetadata) -> anyhow::Result<Self> {
        check_path_length(&name)?;

        Ok(IndexEntry {
            name,
            oid,
            metadata,
        })
    }

    pub fn flags(&self) -> u16 {
        let length = self.name.len().min(MAX_PATH_SIZE) as u16;
        ((self.metadata.stage & STAGE_MASK) << STAGE_SHIFT) | (length & PATH_LENGTH_MASK)
    }

    /// Total on-disk size: smallest multiple of 8 covering header, path and NUL.
    pub fn encoded_len(&self) -> usize {
        padded_len(self.name.len())
    }

    pub fn serialize(&self) -> anyhow::Result<Bytes> {
        let metadata = &self.metadata;

        let mut entry_bytes = Vec::with_capacity(self.encoded_len());
        entry_bytes.write_u32::<byteorder::NetworkEndian>(metadata.ctime)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(metadata.ctime_nsec)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(metadata.mtime)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(metadata.mtime_nsec)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(metadata.dev)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(metadata.ino)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(metadata.mode)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(metadata.uid)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(metadata.gid)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(metadata.size)?;
        self.oid.write_h40_to(&mut entry_bytes)?;
        entry_bytes.write_u16::<byteorder::NetworkEndian>(self.flags())?;
        entry_bytes.write_all(self.name.as_bytes())?;

        // There must be at least one null byte at the end
        entry_bytes.push(0);
        while entry_bytes.len() % ENTRY_BLOCK != 0 {
            entry_bytes.push(0);
        }

        Ok(Bytes::from(entry_bytes))
    }

    /// Decode one entry from the front of `bytes`.
    ///
    /// Returns `Ok(None)` when `bytes` ends before the record does, otherwise the
    /// entry and the number of bytes it occupies (padding included).
    pub fn deserialize(bytes: &[u8]) -> anyhow::Result<Option<(Self, usize)>> {
        if bytes.len() < ENTRY_MIN_SIZE {
            return Ok(None);
        }

        let name_end = match bytes[ENTRY_FIXED_SIZE..].iter().position(|&b| b == 0) {
            Some(offset) => ENTRY_FIXED_SIZE + offset,
            None => return Ok(None),
        };
        let consumed = padded_len(name_end - ENTRY_FIXED_SIZE);
        if bytes.len() < consumed {
            return Ok(None);
        }

        let read_u32 = |at: usize| byteorder::NetworkEndian::read_u32(&bytes[at..at + 4]);

        let mut oid_bytes = &bytes[40..60];
        let oid = ObjectId::read_h40_from(&mut oid_bytes)?;
        let flags = byteorder::NetworkEndian::read_u16(&bytes[60..62]);

        let name = std::str::from_utf8(&bytes[ENTRY_FIXED_SIZE..name_end])
            .map_err(|_| anyhow!("Invalid UTF-8 in entry name"))?
            .to_string();

        let entry = IndexEntry {
            name,
            oid,
            metadata: EntryMetadata {
                ctime: read_u32(0),
                ctime_nsec: read_u32(4),
                mtime: read_u32(8),
                mtime_nsec: read_u32(12),
                dev: read_u32(16),
                ino: read_u32(20),
                mode: read_u32(24),
                uid: read_u32(28),
                gid: read_u32(32),
                size: read_u32(36),
                stage: (flags >> STAGE_SHIFT) & STAGE_MASK,
            },
        };

        Ok(Some((entry, consumed)))
    }
}

impl PartialOrd for IndexEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name
            .as_bytes()
            .cmp(other.name.as_bytes())
            .then_with(|| self.metadata.stage.cmp(&other.metadata.stage))
    }
}

/// Fail with `PathTooLong` unless the UTF-8 length of `name` fits 12 bits.
pub fn check_path_length(name: &str) -> anyhow::Result<()> {
    if name.len() > MAX_PATH_SIZE {
        return Err(CoreError::PathTooLong(name.len()).into());
    }

    Ok(())
}

fn padded_len(path_len: usize) -> usize {
    (ENTRY_FIXED_SIZE + path_len + ENTRY_BLOCK) / ENTRY_BLOCK * ENTRY_BLOCK
}

/// File metadata stored in index entries
///
/// Values are truncated to 32 bits, as the on-disk format stores them.
///
/// - `ctime`: File status change time (inode modification)
/// - `mtime`: File content modification time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    pub ctime: u32,
    pub ctime_nsec: u32,
    pub mtime: u32,
    pub mtime_nsec: u32,
    pub dev: u32,
    pub ino: u32,
    /// Raw mode bits as stored on disk, see [`EntryMode`] for the known values
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub size: u32,
    /// Merge stage, always 0 for entries staged by this crate
    pub stage: u16,
}

impl TryFrom<(&Path, Metadata)> for EntryMetadata {
    type Error = anyhow::Error;

    fn try_from((file_path, metadata): (&Path, Metadata)) -> Result<Self, Self::Error> {
        if !metadata.is_file() {
            return Err(anyhow!("{} is not a regular file", file_path.display()));
        }

        let mode = match file_path.is_executable() {
            true => EntryMode::File(FileMode::Executable),
            false => EntryMode::File(FileMode::Regular),
        }
        .as_u32();

        Ok(Self {
            ctime: metadata.ctime() as u32,
            ctime_nsec: metadata.ctime_nsec() as u32,
            mtime: metadata.mtime() as u32,
            mtime_nsec: metadata.mtime_nsec() as u32,
            dev: metadata.dev() as u32,
            ino: metadata.ino() as u32,
            mode,
            uid: metadata.uid(),
            gid: metadata.gid(),
            size: metadata.size() as u32,
            stage: 0,
        })
    }
}
