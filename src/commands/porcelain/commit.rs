use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use tracing::info;

impl Repository {
    /// Record the staged tree as a new commit on the current branch
    ///
    /// `author` is `Name <email>`; without it the identity comes from
    /// `GIT_AUTHOR_NAME` and `GIT_AUTHOR_EMAIL`.
    pub fn commit(&self, message: &str, author: Option<&str>) -> anyhow::Result<ObjectId> {
        self.commit_with_env(message, author, |name| std::env::var(name).ok())
    }

    /// Same as [`Repository::commit`] with environment lookups going through `env`
    pub fn commit_with_env(
        &self,
        message: &str,
        author: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<ObjectId> {
        if message.trim().is_empty() {
            anyhow::bail!("Aborting commit due to empty commit message");
        }

        let tree_id = self.build_tree()?;
        let parent = self.refs().read_head()?;
        let author = Author::resolve(author, env)?;

        let is_root = match parent {
            Some(_) => "",
            None => " (root-commit)",
        };

        let commit = Commit::new(parent, tree_id, author, message.to_string());
        let commit_id = self.database().store(&commit)?;
        self.refs().update_head(&commit_id)?;

        info!(oid = %commit_id, tree = %commit.tree_oid(), "created commit");

        let branch = self.refs().current_branch()?;
        writeln!(
            self.writer(),
            "[{}{} {}] {}",
            branch,
            is_root,
            commit_id.to_short_oid(),
            commit.short_message()
        )?;

        Ok(commit_id)
    }
}
