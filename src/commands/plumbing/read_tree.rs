use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::PathMap;
use crate::errors::UgitError;

impl Repository {
    /// Replace the working directory with the contents of a tree object
    pub fn read_tree(&self, target: &str) -> anyhow::Result<()> {
        let tree_oid = Revision::parse(target)
            .resolve(self)?
            .ok_or_else(|| UgitError::UnknownReference(target.to_string()))?;

        let view = self.database().expand_tree(Some(&tree_oid))?;
        self.restore_tree(&view)
    }

    /// Clear the working directory and materialize a path map into it
    ///
    /// Ignored paths (the control directory) survive the clear.
    pub fn restore_tree(&self, view: &PathMap) -> anyhow::Result<()> {
        self.workspace().clear()?;

        for (path, oid) in view {
            let content = self.database().load_object(oid, Some(ObjectType::Blob))?;
            self.workspace().write_file(path, &content)?;
        }

        Ok(())
    }
}
