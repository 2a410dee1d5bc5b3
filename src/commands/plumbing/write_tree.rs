use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::{Tree, TreeEntry};
use anyhow::Context;
use std::path::Path;

impl Repository {
    pub fn write_tree_command(&self) -> anyhow::Result<()> {
        let tree_oid = self.write_tree()?;
        writeln!(self.writer(), "{tree_oid}")?;

        Ok(())
    }

    /// Snapshot the working directory into a stored tree object
    ///
    /// Every non-ignored file becomes a blob, every subdirectory a subtree.
    /// Pure function of the filesystem content at call time.
    pub fn write_tree(&self) -> anyhow::Result<ObjectId> {
        self.write_tree_at(None)
    }

    fn write_tree_at(&self, prefix: Option<&Path>) -> anyhow::Result<ObjectId> {
        let mut entries = Vec::new();

        for path in self.workspace().list_dir(prefix)? {
            let name = path
                .file_name()
                .with_context(|| format!("path {path:?} has no file name"))?
                .to_string_lossy()
                .to_string();

            if self.workspace().path().join(&path).is_dir() {
                let subtree_oid = self.write_tree_at(Some(&path))?;
                entries.push(TreeEntry::new(name, subtree_oid, ObjectType::Tree));
            } else {
                let content = self.workspace().read_file(&path)?;
                let blob_oid = self.database().store_blob(&content)?;
                entries.push(TreeEntry::new(name, blob_oid, ObjectType::Blob));
            }
        }

        self.database().store_tree(&Tree::build(entries))
    }
}
