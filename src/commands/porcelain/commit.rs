use crate::areas::refs::{HEAD_REF_NAME, MERGE_HEAD_REF_NAME, RefValue};
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Snapshot the working directory and record it as a new commit
    ///
    /// The current HEAD (if any) becomes the first parent. A pending
    /// MERGE_HEAD becomes the second parent and is consumed: the merge state
    /// machine goes back to clean on the commit that closes it.
    pub fn commit(&self, message: &str) -> anyhow::Result<ObjectId> {
        let tree_oid = self.write_tree()?;

        let mut parents = Vec::new();
        if let Some(head_oid) = self.refs().read_oid(HEAD_REF_NAME)? {
            parents.push(head_oid);
        }
        if let Some(value) = self.refs().read_ref(MERGE_HEAD_REF_NAME, false)?
            && let Some(merge_oid) = value.as_oid()
        {
            parents.push(merge_oid.clone());
            self.refs().delete_ref(MERGE_HEAD_REF_NAME, false)?;
        }

        let commit = Commit::new(tree_oid, parents, message.to_string());
        let commit_oid = self.database().store_commit(&commit)?;

        self.refs()
            .update_ref(HEAD_REF_NAME, RefValue::Direct(commit_oid.clone()), true)?;

        writeln!(
            self.writer(),
            "[{}] {}",
            commit_oid.to_short_oid(),
            commit.short_message()
        )?;

        Ok(commit_oid)
    }
}
