use crate::artifacts::index::index_entry::EntryMetadata;
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 1] = [".git"];

/// Separator used for every path handed out by the workspace
pub const PATH_SEPARATOR: char = '/';

/// The working directory, as seen from the repository root
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every regular file below the root, outside the metadata directory
    ///
    /// Paths are relative, `/`-separated and sorted by bytes. Symbolic links
    /// are not followed.
    pub fn list_files(&self) -> anyhow::Result<Vec<String>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.path)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.file_name().to_string_lossy().as_ref()))
        {
            let entry = entry.with_context(|| format!("Unable to walk {}", self.path.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative_path = entry.path().strip_prefix(&self.path)?;
            files.push(Self::normalize(relative_path)?);
        }

        files.sort();
        Ok(files)
    }

    fn is_ignored(name: &str) -> bool {
        IGNORED_PATHS.contains(&name)
    }

    /// Join the components of a relative path with `/`
    pub fn normalize(relative_path: &Path) -> anyhow::Result<String> {
        let mut parts = Vec::new();

        for component in relative_path.components() {
            match component {
                Component::Normal(name) => parts.push(name.to_str().with_context(|| {
                    format!("{} is not valid UTF-8", relative_path.display())
                })?),
                Component::CurDir => {}
                _ => anyhow::bail!("{} is outside the repository", relative_path.display()),
            }
        }

        Ok(parts.join(&PATH_SEPARATOR.to_string()))
    }

    /// Path of `file_path` relative to the root, normalized
    ///
    /// Relative inputs are taken as relative to the root already.
    pub fn relative_path(&self, file_path: &Path) -> anyhow::Result<String> {
        match file_path.is_absolute() {
            true => Self::normalize(file_path.strip_prefix(&self.path).with_context(|| {
                format!("{} is outside the repository", file_path.display())
            })?),
            false => Self::normalize(file_path),
        }
    }

    pub fn absolute_path(&self, file_path: &str) -> PathBuf {
        self.path.join(file_path)
    }

    pub fn read_file(&self, file_path: &str) -> anyhow::Result<Bytes> {
        let full_path = self.absolute_path(file_path);

        let content = std::fs::read(&full_path)
            .with_context(|| format!("Unable to read {}", full_path.display()))?;

        Ok(Bytes::from(content))
    }

    pub fn parse_blob(&self, file_path: &str) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.read_file(file_path)?))
    }

    pub fn stat_file(&self, file_path: &str) -> anyhow::Result<EntryMetadata> {
        let full_path = self.absolute_path(file_path);
        let metadata = std::fs::metadata(&full_path)
            .with_context(|| format!("Unable to stat {}", full_path.display()))?;

        (full_path.as_path(), metadata).try_into()
    }
}
