use crate::areas::database::ObjectBox;
use crate::areas::repository::Repository;
use std::io::Write;

/// What `cat-file` prints about an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatFileMode {
    /// The content, formatted for its kind
    Pretty,
    /// The kind name
    Type,
}

impl Repository {
    pub fn cat_file(&self, prefix: &str, mode: CatFileMode) -> anyhow::Result<()> {
        let object_id = self.database().resolve_prefix(prefix)?;

        if mode == CatFileMode::Type {
            let (object_type, _) = self.database().load(&object_id)?;
            writeln!(self.writer(), "{}", object_type)?;
            return Ok(());
        }

        match self.database().parse_object(&object_id)? {
            // blobs are written back byte for byte
            ObjectBox::Blob(blob) => self.writer().write_all(blob.content())?,
            ObjectBox::Tree(tree) if tree.is_empty() => {}
            object @ ObjectBox::Tree(_) => writeln!(self.writer(), "{}", object.display())?,
            object @ ObjectBox::Commit(_) => write!(self.writer(), "{}", object.display())?,
        }

        Ok(())
    }
}
