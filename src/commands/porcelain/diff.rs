use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::diff::{LineOracle, diff_trees};
use crate::artifacts::objects::tree::PathMap;

impl Repository {
    /// Show content changes between a commit (HEAD by default) and the
    /// working directory
    ///
    /// The working directory is snapshotted first so its blobs are stored and
    /// loadable; the snapshot is content-addressed, so this never bloats the
    /// database with duplicates.
    pub fn diff(&self, target: Option<&str>) -> anyhow::Result<()> {
        let from_oid = match target {
            Some(target) => Revision::parse(target).resolve(self)?,
            None => self.refs().read_oid(HEAD_REF_NAME)?,
        };

        let from_view = match from_oid {
            Some(oid) => {
                let commit = self.database().parse_commit(&oid)?;
                self.database().expand_tree(Some(commit.tree_oid()))?
            }
            None => PathMap::new(),
        };

        let working_tree = self.write_tree()?;
        let to_view = self.database().expand_tree(Some(&working_tree))?;

        let report = diff_trees(self.database(), &from_view, &to_view, &LineOracle)?;
        self.writer().write_all(&report)?;

        Ok(())
    }
}
