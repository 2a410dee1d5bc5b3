use crate::areas::refs::{HEAD_REF_NAME, MERGE_HEAD_REF_NAME, RefValue};
use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::diff::LineOracle;
use crate::artifacts::graph;
use crate::artifacts::merge::merge_trees;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::PathMap;
use crate::errors::UgitError;

impl Repository {
    /// Merge another revision into the current HEAD
    ///
    /// When HEAD is already an ancestor of the target this fast-forwards
    /// without creating a merge state. Otherwise the merged content lands in
    /// the working tree, MERGE_HEAD marks the pending second parent, and the
    /// next commit closes the merge.
    pub fn merge(&self, target: &str) -> anyhow::Result<()> {
        let head_oid = self.refs().read_oid(HEAD_REF_NAME)?.ok_or_else(|| {
            UgitError::PreconditionFailed("no HEAD commit to merge into".to_string())
        })?;
        let other_oid = Revision::parse(target).resolve(self)?.ok_or_else(|| {
            UgitError::PreconditionFailed(format!("{target} has no commits to merge"))
        })?;

        let base_oid = graph::merge_base(self.database(), &head_oid, &other_oid)?;

        if base_oid.as_ref() == Some(&head_oid) {
            let commit = self.database().parse_commit(&other_oid)?;
            let view = self.database().expand_tree(Some(commit.tree_oid()))?;
            self.restore_tree(&view)?;
            self.refs()
                .update_ref(HEAD_REF_NAME, RefValue::Direct(other_oid), true)?;

            writeln!(self.writer(), "Fast-forward merge, no need to commit")?;
            return Ok(());
        }

        self.refs().update_ref(
            MERGE_HEAD_REF_NAME,
            RefValue::Direct(other_oid.clone()),
            false,
        )?;

        // unrelated histories merge against an empty base
        let base_view = self.tree_view_of(base_oid.as_ref())?;
        let head_view = self.tree_view_of(Some(&head_oid))?;
        let other_view = self.tree_view_of(Some(&other_oid))?;

        let merged = merge_trees(
            self.database(),
            &base_view,
            &head_view,
            &other_view,
            &LineOracle,
        )?;

        self.workspace().clear()?;
        for (path, content) in &merged.content {
            self.workspace().write_file(path, content)?;
        }

        for path in &merged.conflicts {
            writeln!(self.writer(), "CONFLICT: {}", path.display())?;
        }
        writeln!(self.writer(), "Merged in working tree\nPlease commit")?;

        Ok(())
    }

    /// Print the first common ancestor of two revisions
    pub fn merge_base(&self, first: &str, second: &str) -> anyhow::Result<()> {
        let first_oid = self.resolve_commit(first)?;
        let second_oid = self.resolve_commit(second)?;

        match graph::merge_base(self.database(), &first_oid, &second_oid)? {
            Some(base) => writeln!(self.writer(), "{base}")?,
            None => writeln!(self.writer(), "no common ancestor")?,
        }

        Ok(())
    }

    fn resolve_commit(&self, target: &str) -> anyhow::Result<ObjectId> {
        Revision::parse(target).resolve(self)?.ok_or_else(|| {
            UgitError::PreconditionFailed(format!("{target} does not resolve to a commit")).into()
        })
    }

    fn tree_view_of(&self, commit_oid: Option<&ObjectId>) -> anyhow::Result<PathMap> {
        match commit_oid {
            Some(oid) => {
                let commit = self.database().parse_commit(oid)?;
                self.database().expand_tree(Some(commit.tree_oid()))
            }
            None => Ok(PathMap::new()),
        }
    }
}
