use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::{IndexEntry, check_path_length};
use std::path::Path;
use tracing::debug;

impl Repository {
    /// Stage files: store their content as blobs and record them in the index
    ///
    /// Directories expand to every file below them. All path lengths are checked
    /// before any file is read; the index is only written once every path has
    /// been staged.
    pub fn stage(&self, paths: &[String]) -> anyhow::Result<()> {
        let mut index = self.index();

        // Load the index file from the disk
        index.load()?;

        for path in self.expand_paths(paths)? {
            let blob = self.workspace().parse_blob(&path)?;
            let stat = self.workspace().stat_file(&path)?;
            let blob_id = self.database().store(&blob)?;

            debug!(path = %path, oid = %blob_id, "staged file");
            index.add(IndexEntry::try_new(path, blob_id, stat)?);
        }

        index.save()?;

        Ok(())
    }

    fn expand_paths(&self, paths: &[String]) -> anyhow::Result<Vec<String>> {
        let mut expanded = Vec::new();
        let mut workspace_files = None;

        for path in paths {
            let path = self.workspace().relative_path(Path::new(path))?;
            check_path_length(&path)?;

            if !self.workspace().absolute_path(&path).is_dir() {
                expanded.push(path);
                continue;
            }

            if workspace_files.is_none() {
                workspace_files = Some(self.workspace().list_files()?);
            }
            let dir_prefix = format!("{path}/");
            expanded.extend(
                workspace_files
                    .iter()
                    .flatten()
                    .filter(|file| path.is_empty() || file.starts_with(&dir_prefix))
                    .cloned(),
            );
        }

        for path in &expanded {
            check_path_length(path)?;
        }

        Ok(expanded)
    }
}
