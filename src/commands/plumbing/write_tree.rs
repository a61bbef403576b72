use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use tracing::debug;

impl Repository {
    /// Store the staged entries as a flat tree and return its ID
    ///
    /// Fails with `NestedPathUnsupported` when any staged path contains `/`.
    pub fn build_tree(&self) -> anyhow::Result<ObjectId> {
        let mut index = self.index();

        // Load the index file from the disk
        index.load()?;

        let tree = Tree::build(index.entries())?;
        let tree_id = self.database().store(&tree)?;
        debug!(oid = %tree_id, entries = index.len(), "wrote tree");

        Ok(tree_id)
    }

    pub fn write_tree(&self) -> anyhow::Result<()> {
        let tree_id = self.build_tree()?;
        writeln!(self.writer(), "{}", tree_id)?;

        Ok(())
    }
}
