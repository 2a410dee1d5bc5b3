use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use std::path::Path;

impl Repository {
    pub fn hash_object(&self, file: &str, write: bool) -> anyhow::Result<()> {
        let content = self.workspace().read_file(Path::new(file))?;

        let oid = if write {
            self.database().store_blob(&content)?
        } else {
            ObjectId::digest(&ObjectType::Blob, &content)
        };

        writeln!(self.writer(), "{oid}")?;

        Ok(())
    }
}
