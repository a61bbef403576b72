//! References (HEAD and the branch it points to)
//!
//! References are human-readable names pointing to commits. Two shapes exist
//! on disk:
//! - Direct: a 40-character hash followed by a newline (`refs/heads/main`)
//! - Symbolic: `ref: <path>` naming another reference (`HEAD`)
//!
//! Only a single branch is supported; `HEAD` always names `refs/heads/main`
//! in repositories created by `init`. A detached `HEAD` is refused.

use crate::areas::index::LOCK_SUFFIX;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::CoreError;
use anyhow::Context;
use derive_new::new;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Symbolic references nested deeper than this are treated as a loop
const MAX_SYMREF_DEPTH: usize = 5;

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Directory holding branch references, relative to the metadata directory
pub const HEADS_DIR: &str = "refs/heads";

pub const DEFAULT_BRANCH: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq)]
enum SymRefOrOid {
    SymRef(String),
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_symref_or_oid(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ref file at {:?}", path))?;
        let content = content.trim();

        // An existing but empty ref is a failed write, not an unborn branch
        if content.is_empty() {
            return Err(CoreError::CorruptRef {
                name: path.display().to_string(),
                reason: "file is empty".to_string(),
            }
            .into());
        }

        match regex::Regex::new(SYMREF_REGEX)?.captures(content) {
            Some(symref_match) => Ok(Some(SymRefOrOid::SymRef(symref_match[1].to_string()))),
            None => Ok(Some(SymRefOrOid::Oid(ObjectId::try_parse(
                content.to_string(),
            )?))),
        }
    }
}

/// References manager rooted at the metadata directory (typically `.git`)
#[derive(Debug, new)]
pub struct Refs {
    path: Box<Path>,
}

impl Refs {
    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn heads_path(&self) -> PathBuf {
        self.path.join(HEADS_DIR)
    }

    /// Point `HEAD` at the default branch unless it already exists
    ///
    /// Returns whether `HEAD` was written.
    pub fn init_head(&self) -> anyhow::Result<bool> {
        if self.head_path().exists() {
            return Ok(false);
        }

        self.update_ref_file(
            &self.head_path(),
            &format!("ref: {}/{}", HEADS_DIR, DEFAULT_BRANCH),
        )?;

        Ok(true)
    }

    /// Name of the reference a commit updates, e.g. `refs/heads/main`
    ///
    /// Follows `HEAD` through symbolic references. A missing `HEAD` falls back
    /// to the default branch; a `HEAD` holding a hash is an error.
    pub fn current_ref(&self) -> anyhow::Result<String> {
        let mut name = HEAD_REF_NAME.to_string();

        for _ in 0..MAX_SYMREF_DEPTH {
            match SymRefOrOid::read_symref_or_oid(&self.path.join(&name))? {
                Some(SymRefOrOid::SymRef(target)) => name = target,
                Some(SymRefOrOid::Oid(_)) if name == HEAD_REF_NAME => {
                    anyhow::bail!("detached {} is not supported", HEAD_REF_NAME)
                }
                Some(SymRefOrOid::Oid(_)) => return Ok(name),
                None if name == HEAD_REF_NAME => {
                    return Ok(format!("{}/{}", HEADS_DIR, DEFAULT_BRANCH));
                }
                None => return Ok(name),
            }
        }

        anyhow::bail!("symbolic reference {} nests too deeply", HEAD_REF_NAME)
    }

    /// Short name of the current branch, e.g. `main`
    pub fn current_branch(&self) -> anyhow::Result<String> {
        let current_ref = self.current_ref()?;

        Ok(current_ref
            .strip_prefix(HEADS_DIR)
            .and_then(|name| name.strip_prefix('/'))
            .unwrap_or(&current_ref)
            .to_string())
    }

    /// Commit the current branch points to; `None` before the first commit
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        match SymRefOrOid::read_symref_or_oid(&self.path.join(self.current_ref()?))? {
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            Some(SymRefOrOid::SymRef(_)) | None => Ok(None),
        }
    }

    /// Overwrite the current branch ref with `oid`
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        let ref_path = self.path.join(self.current_ref()?);
        self.update_ref_file(&ref_path, oid.as_ref())?;
        debug!(oid = %oid, path = %ref_path.display(), "updated ref");

        Ok(())
    }

    /// Replace a ref file through `<name>.lock`, so the old value stays intact
    /// until the new one is complete
    fn update_ref_file(&self, path: &Path, raw_ref: &str) -> anyhow::Result<()> {
        // create all the parent directories if they don't exist
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        let lock_path = Self::lock_path(path);
        let mut lock_file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
            .with_context(|| format!("unable to create lock file {:?}", lock_path))?;

        let written = lock_file
            .write_all(format!("{raw_ref}\n").as_bytes())
            .and_then(|_| lock_file.sync_all())
            .and_then(|_| std::fs::rename(&lock_path, path));

        if let Err(error) = written {
            let _ = std::fs::remove_file(&lock_path);
            return Err(error).with_context(|| format!("failed to write ref file at {:?}", path));
        }

        Ok(())
    }

    fn lock_path(path: &Path) -> PathBuf {
        let mut lock_path = path.as_os_str().to_owned();
        lock_path.push(".");
        lock_path.push(LOCK_SUFFIX);

        PathBuf::from(lock_path)
    }
}
