use crate::areas::refs::{HEAD_REF_NAME, RefValue};
use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::errors::UgitError;

const DETACHMENT_NOTICE: &str = r#"
You are in 'detached HEAD' state. You can look around, make experimental
changes and commit them without impacting any branches.

If you want to create a new branch to retain commits you create, you may
do so by using the branch command:

    ugit branch <new-branch-name>
"#;

impl Repository {
    /// Switch the working directory and HEAD to another revision
    ///
    /// Checking out a branch leaves HEAD symbolic, so later commits move the
    /// branch; checking out anything else detaches HEAD onto the commit.
    pub fn checkout(&self, target: &str) -> anyhow::Result<()> {
        let revision = Revision::parse(target);
        let target_oid = revision.resolve(self)?.ok_or_else(|| {
            UgitError::PreconditionFailed(format!("{target} has no commits to check out"))
        })?;

        let commit = self.database().parse_commit(&target_oid)?;
        let view = self.database().expand_tree(Some(commit.tree_oid()))?;
        self.restore_tree(&view)?;

        if revision.is_branch(self)? {
            self.refs().update_ref(
                HEAD_REF_NAME,
                RefValue::Symbolic(format!("refs/heads/{}", revision.name())),
                false,
            )?;
            writeln!(self.writer(), "Switched to branch '{}'", revision.name())?;
        } else {
            self.refs()
                .update_ref(HEAD_REF_NAME, RefValue::Direct(target_oid.clone()), false)?;
            eprintln!("Note: checking out '{target}'.\n{DETACHMENT_NOTICE}");
            writeln!(
                self.writer(),
                "HEAD is now at {} {}",
                target_oid.to_short_oid(),
                commit.short_message()
            )?;
        }

        Ok(())
    }
}
