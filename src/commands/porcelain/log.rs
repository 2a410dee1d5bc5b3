use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::graph::CommitWalk;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use std::collections::HashMap;

impl Repository {
    /// Show the history reachable from a revision (HEAD by default)
    ///
    /// Walks all parents of every commit, so merge history is shown in full,
    /// each commit exactly once.
    pub fn log(&self, target: Option<&str>) -> anyhow::Result<()> {
        let start_oid = match target {
            Some(target) => Revision::parse(target).resolve(self)?,
            None => self.refs().read_oid(HEAD_REF_NAME)?,
        };
        let Some(start_oid) = start_oid else {
            // nothing committed yet
            return Ok(());
        };

        let decorations = self.ref_decorations()?;

        for commit_oid in CommitWalk::new(self.database(), [start_oid]) {
            let commit_oid = commit_oid?;
            let commit = self.database().parse_commit(&commit_oid)?;

            let refs = decorations
                .get(&commit_oid)
                .map(|names| format!(" ({})", names.join(", ")))
                .unwrap_or_default();

            writeln!(
                self.writer(),
                "{}",
                format!("commit {commit_oid}{refs}").yellow()
            )?;
            writeln!(self.writer())?;
            for line in commit.message().lines() {
                writeln!(self.writer(), "    {line}")?;
            }
            writeln!(self.writer())?;
        }

        Ok(())
    }

    /// Map every commit oid to the ref names pointing at it
    fn ref_decorations(&self) -> anyhow::Result<HashMap<ObjectId, Vec<String>>> {
        let mut decorations: HashMap<ObjectId, Vec<String>> = HashMap::new();

        for (refname, value) in self.refs().iter_refs("", true)? {
            if let Some(oid) = value.as_oid() {
                decorations.entry(oid.clone()).or_default().push(refname);
            }
        }

        Ok(decorations)
    }
}
