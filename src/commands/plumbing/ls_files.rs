use crate::areas::repository::Repository;

impl Repository {
    /// List staged paths; with `stage` set, also their mode, blob and stage number
    pub fn ls_files(&self, stage: bool) -> anyhow::Result<()> {
        let mut index = self.index();
        index.load()?;

        for entry in index.entries() {
            match stage {
                true => writeln!(
                    self.writer(),
                    "{:06o} {} {}\t{}",
                    entry.metadata.mode,
                    entry.oid,
                    entry.metadata.stage,
                    entry.name
                )?,
                false => writeln!(self.writer(), "{}", entry.name)?,
            }
        }

        Ok(())
    }
}
