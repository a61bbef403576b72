use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::status::workspace_changes::WorkspaceChanges;
use colored::Colorize;
use std::collections::BTreeSet;

// Terminology:
// - added files: files on disk that are not tracked by the index
// - changed files: files tracked by the index whose content differs on disk
// - deleted files: files tracked by the index that are gone from the workspace
impl Repository {
    /// Compare the working directory against the index
    ///
    /// Read-only: content is hashed without being stored and the index file is
    /// neither created nor rewritten.
    pub fn compare(&self) -> anyhow::Result<WorkspaceChanges> {
        let mut index = self.index();
        index.load()?;

        let workspace_files = self.workspace().list_files()?;
        let mut changes = WorkspaceChanges::default();

        for path in &workspace_files {
            match index.entry_by_path(path) {
                Some(entry) => {
                    let data = self.workspace().read_file(path)?;
                    if self.database().hash(ObjectType::Blob, &data)? != entry.oid {
                        changes.changed.push(path.clone());
                    }
                }
                None => changes.added.push(path.clone()),
            }
        }

        let on_disk = workspace_files.iter().map(String::as_str).collect::<BTreeSet<_>>();
        changes.deleted = index
            .entries()
            .filter(|entry| !on_disk.contains(entry.name.as_str()))
            .map(|entry| entry.name.clone())
            .collect();

        Ok(changes)
    }

    /// Print one ` M`, ` D` or `??` line per path, in path order
    pub fn status(&self) -> anyhow::Result<()> {
        let changes = self.compare()?;

        let mut lines = changes
            .changed
            .iter()
            .map(|path| (path, FileStatus::Modified))
            .chain(changes.deleted.iter().map(|path| (path, FileStatus::Deleted)))
            .chain(changes.added.iter().map(|path| (path, FileStatus::Untracked)))
            .collect::<Vec<_>>();
        lines.sort();

        for (path, status) in lines {
            writeln!(self.writer(), "{} {}", status, path)?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum FileStatus {
    Modified,
    Deleted,
    Untracked,
}

impl From<&FileStatus> for &str {
    fn from(status: &FileStatus) -> Self {
        match status {
            FileStatus::Modified => " M",
            FileStatus::Deleted => " D",
            FileStatus::Untracked => "??",
        }
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status_str: &str = self.into();
        let colored_str = match self {
            FileStatus::Untracked => status_str.green(),
            FileStatus::Modified | FileStatus::Deleted => status_str.red(),
        };
        write!(f, "{}", colored_str)
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::fixtures::TestRepository;
    use crate::artifacts::status::workspace_changes::WorkspaceChanges;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn repo() -> TestRepository {
        let repo = TestRepository::init();
        repo.write_file("b-modified.txt", "original");
        repo.write_file("a-modified.txt", "original");
        repo.write_file("deleted.txt", "soon gone");
        repo.write_file("kept.txt", "same");
        repo.stage(&["a-modified.txt", "b-modified.txt", "deleted.txt", "kept.txt"]);

        repo.write_file("b-modified.txt", "edited");
        repo.write_file("a-modified.txt", "edited");
        repo.delete_file("deleted.txt");
        repo.write_file("new.txt", "fresh");
        repo.write_file("dir/also-new.txt", "fresh");

        repo
    }

    #[rstest]
    fn partitions_changed_added_and_deleted(repo: TestRepository) {
        let changes = repo.repository.compare().unwrap();

        assert_eq!(
            changes,
            WorkspaceChanges::new(
                vec!["a-modified.txt".to_string(), "b-modified.txt".to_string()],
                vec!["dir/also-new.txt".to_string(), "new.txt".to_string()],
                vec!["deleted.txt".to_string()],
            )
        );
    }

    #[rstest]
    fn compare_does_not_touch_repository_state(repo: TestRepository) {
        let before = repo.snapshot_git_dir();

        let first = repo.repository.compare().unwrap();
        let second = repo.repository.compare().unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.snapshot_git_dir(), before);
    }

    #[test]
    fn compare_without_index_creates_nothing() {
        let repo = TestRepository::init();
        repo.write_file("a.txt", "hello");
        let before = repo.snapshot_git_dir();

        let changes = repo.repository.compare().unwrap();

        assert_eq!(changes.added, vec!["a.txt"]);
        assert!(!repo.repository.git_path().join("index").exists());
        assert_eq!(repo.snapshot_git_dir(), before);
    }

    #[test]
    fn content_change_is_found_even_with_unchanged_timestamps() {
        let repo = TestRepository::init();
        repo.write_file("a.txt", "hello");
        repo.stage(&["a.txt"]);
        let path = repo.dir.path().join("a.txt");
        let mtime = filetime::FileTime::from_last_modification_time(&std::fs::metadata(&path).unwrap());

        repo.write_file("a.txt", "jello");
        filetime::set_file_mtime(&path, mtime).unwrap();

        assert_eq!(repo.repository.compare().unwrap().changed, vec!["a.txt"]);
    }

    #[rstest]
    fn status_prints_lines_in_path_order(repo: TestRepository) {
        colored::control::set_override(false);
        repo.take_output();

        repo.repository.status().unwrap();

        assert_eq!(
            repo.take_output(),
            " M a-modified.txt\n M b-modified.txt\n D deleted.txt\n?? dir/also-new.txt\n?? new.txt\n"
        );
    }

    #[test]
    fn clean_tree_prints_nothing() {
        let repo = TestRepository::init();
        repo.write_file("a.txt", "hello");
        repo.stage(&["a.txt"]);
        repo.take_output();

        assert!(repo.repository.compare().unwrap().is_clean());
        repo.repository.status().unwrap();
        assert_eq!(repo.take_output(), "");
    }
}
