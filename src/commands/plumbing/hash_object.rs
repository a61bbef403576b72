use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use std::path::Path;

impl Repository {
    /// Print the blob ID of a file, storing the blob only when `write` is set
    pub fn hash_object(&self, object_path: &str, write: bool) -> anyhow::Result<ObjectId> {
        let object_path = self.workspace().relative_path(Path::new(object_path))?;
        let object_data = self.workspace().read_file(&object_path)?;

        let object_id = match write {
            true => self.database().put(ObjectType::Blob, &object_data)?,
            false => self.database().hash(ObjectType::Blob, &object_data)?,
        };

        writeln!(self.writer(), "{}", object_id)?;

        Ok(object_id)
    }
}
