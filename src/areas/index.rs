//! Index (staging area)
//!
//! The index tracks which files will be included in the next commit, along with
//! the filesystem metadata they had when they were staged.
//!
//! ## Index File Format
//!
//! The index file contains:
//! - Header: Signature, version, and entry count
//! - Entries: Sorted list of staged files with metadata
//! - Checksum: SHA-1 hash of all preceding bytes
//!
//! The checksum is verified before anything else is decoded, so a damaged file
//! is rejected as a whole.

use crate::artifacts::index::checksum::{self, Checksum};
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::HEADER_SIZE;
use crate::errors::CoreError;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::ops::DerefMut;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Suffix of the temporary file an index or ref is written to before being renamed
pub(crate) const LOCK_SUFFIX: &str = "lock";

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.git/index`)
    path: Box<Path>,
    /// Staged files keyed by path; `String` ordering is byte ordering
    entries: BTreeMap<String, IndexEntry>,
    /// Set when the entries differ from what was last loaded or saved
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn entry_by_path(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    /// Entries in path order
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.changed = false;
    }

    /// Load the index from disk
    ///
    /// A missing or zero-length file is the valid initial state and leaves the
    /// index empty; nothing is created on disk. A shared lock is held on the file
    /// while it is read.
    pub fn load(&mut self) -> anyhow::Result<()> {
        self.clear();

        if !self.path.exists() {
            debug!(path = %self.path.display(), "no index file, starting empty");
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .read(true)
            .open(&self.path)
            .context(format!("Unable to open index {}", self.path.display()))?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        let mut data = Vec::new();
        lock.deref_mut()
            .read_to_end(&mut data)
            .context(format!("Unable to read index {}", self.path.display()))?;

        if data.is_empty() {
            return Ok(());
        }

        for entry in Self::decode(&data)? {
            self.entries.insert(entry.name.clone(), entry);
        }
        debug!(entries = self.entries.len(), "loaded index");

        Ok(())
    }

    /// Decode a complete index file
    ///
    /// Order of checks: trailing checksum, signature, version, then exactly the
    /// declared number of entries. Bytes following the declared entries (format
    /// extensions written by other tools) are covered by the checksum but ignored.
    pub fn decode(data: &[u8]) -> anyhow::Result<Vec<IndexEntry>> {
        let body = checksum::verify(data)?;
        let header = IndexHeader::deserialize(body)?;

        let mut remaining = &body[HEADER_SIZE..];
        // The declared count is untrusted until the records are parsed
        let mut entries = Vec::new();

        while entries.len() < header.entries_count as usize {
            match IndexEntry::deserialize(remaining)? {
                Some((entry, consumed)) => {
                    entries.push(entry);
                    remaining = &remaining[consumed..];
                }
                None => break,
            }
        }

        if entries.len() != header.entries_count as usize {
            return Err(CoreError::TruncatedIndex {
                declared: header.entries_count,
                parsed: entries.len() as u32,
            }
            .into());
        }

        Ok(entries)
    }

    /// Encode entries, in the order given, followed by the checksum trailer
    pub fn encode<'e>(entries: impl ExactSizeIterator<Item = &'e IndexEntry>) -> anyhow::Result<Bytes> {
        let mut writer = Checksum::new(Vec::new());

        writer.write(&IndexHeader::new(entries.len() as u32).serialize()?)?;
        for entry in entries {
            writer.write(&entry.serialize()?)?;
        }

        Ok(Bytes::from(writer.write_checksum()?))
    }

    /// Stage an entry, replacing any entry already recorded for its path
    pub fn add(&mut self, entry: IndexEntry) {
        self.entries.insert(entry.name.clone(), entry);
        self.changed = true;
    }

    /// Write every entry back to disk
    ///
    /// The file is rebuilt in memory, written to `index.lock` and renamed over
    /// the index, so readers see either the old or the new file in full.
    pub fn save(&mut self) -> anyhow::Result<()> {
        let data = Self::encode(self.entries.values())?;
        let lock_path = self.lock_path();

        let mut lock_file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
            .context(format!(
                "Unable to create {}: is another process writing the index?",
                lock_path.display()
            ))?;

        let written = lock_file
            .write_all(&data)
            .and_then(|_| lock_file.sync_all())
            .and_then(|_| std::fs::rename(&lock_path, &self.path));

        if let Err(error) = written {
            let _ = std::fs::remove_file(&lock_path);
            return Err(error).context(format!("Unable to write index {}", self.path.display()));
        }

        self.changed = false;
        debug!(entries = self.entries.len(), bytes = data.len(), "saved index");

        Ok(())
    }

    fn lock_path(&self) -> PathBuf {
        let mut lock_path = self.path.to_path_buf().into_os_string();
        lock_path.push(".");
        lock_path.push(LOCK_SUFFIX);

        PathBuf::from(lock_path)
    }
}
