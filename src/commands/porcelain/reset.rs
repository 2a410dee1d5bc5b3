use crate::areas::refs::{HEAD_REF_NAME, RefValue};
use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::errors::UgitError;

impl Repository {
    /// Move HEAD (through its symbolic chain) to another commit
    ///
    /// With `hard`, the working directory is restored to the target tree as
    /// well; otherwise only the ref moves.
    pub fn reset(&self, target: &str, hard: bool) -> anyhow::Result<()> {
        let target_oid = Revision::parse(target).resolve(self)?.ok_or_else(|| {
            UgitError::PreconditionFailed(format!("{target} does not resolve to a commit"))
        })?;

        self.refs()
            .update_ref(HEAD_REF_NAME, RefValue::Direct(target_oid.clone()), true)?;

        if hard {
            let commit = self.database().parse_commit(&target_oid)?;
            let view = self.database().expand_tree(Some(commit.tree_oid()))?;
            self.restore_tree(&view)?;
        }

        writeln!(self.writer(), "HEAD is now at {}", target_oid.to_short_oid())?;

        Ok(())
    }
}
