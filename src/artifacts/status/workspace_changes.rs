use derive_new::new;

/// Paths that differ between the working directory and the index
///
/// Each list is sorted by path bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, new)]
pub struct WorkspaceChanges {
    /// Staged and on disk, with different content
    pub changed: Vec<String>,
    /// On disk only
    pub added: Vec<String>,
    /// Staged only
    pub deleted: Vec<String>,
}

impl WorkspaceChanges {
    pub fn is_clean(&self) -> bool {
        self.changed.is_empty() && self.added.is_empty() && self.deleted.is_empty()
    }
}
