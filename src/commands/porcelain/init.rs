use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;
use tracing::info;

impl Repository {
    /// Create the metadata layout: `objects/`, `refs/heads/` and `HEAD`
    ///
    /// Neither the branch ref nor the index file is created; both appear with
    /// the first commit and the first `add`. Running it again keeps existing
    /// objects, refs and index untouched.
    pub fn init(&self) -> anyhow::Result<()> {
        let reinitialized = self.refs().head_path().exists();

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .git/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .git/refs/heads directory")?;

        self.refs()
            .init_head()
            .context("Failed to create initial HEAD reference")?;

        info!(path = %self.git_path().display(), reinitialized, "initialized repository");

        let verb = match reinitialized {
            true => "Reinitialized existing",
            false => "Initialized empty",
        };
        writeln!(
            self.writer(),
            "{} Git repository in {}",
            verb,
            self.git_path().display()
        )?;

        Ok(())
    }
}
