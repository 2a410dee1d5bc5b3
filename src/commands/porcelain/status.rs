use crate::areas::refs::{HEAD_REF_NAME, MERGE_HEAD_REF_NAME};
use crate::areas::repository::Repository;
use crate::artifacts::diff::changed_paths;
use crate::artifacts::objects::tree::PathMap;
use colored::Colorize;

impl Repository {
    /// Show the current branch and the paths changed since HEAD
    ///
    /// Change detection is pure oid comparison between the HEAD tree and the
    /// ephemeral working-tree view; no blob content is read twice.
    pub fn status(&self) -> anyhow::Result<()> {
        match self.current_branch()? {
            Some(branch) => writeln!(self.writer(), "On branch {branch}")?,
            None => {
                let head = self.refs().read_oid(HEAD_REF_NAME)?;
                match head {
                    Some(oid) => {
                        writeln!(self.writer(), "HEAD detached at {}", oid.to_short_oid())?
                    }
                    None => writeln!(self.writer(), "No commits yet")?,
                }
            }
        }

        if let Some(value) = self.refs().read_ref(MERGE_HEAD_REF_NAME, false)?
            && let Some(merge_oid) = value.as_oid()
        {
            writeln!(
                self.writer(),
                "Merging with {}",
                merge_oid.to_short_oid()
            )?;
        }

        let head_view = match self.refs().read_oid(HEAD_REF_NAME)? {
            Some(head_oid) => {
                let commit = self.database().parse_commit(&head_oid)?;
                self.database().expand_tree(Some(commit.tree_oid()))?
            }
            None => PathMap::new(),
        };
        let working_view = self.workspace().tree_view()?;

        let changes = changed_paths(&head_view, &working_view);
        if changes.is_empty() {
            writeln!(self.writer(), "nothing to commit, working tree clean")?;
            return Ok(());
        }

        writeln!(self.writer(), "\nChanges since last commit:")?;
        for (path, kind) in changes {
            writeln!(
                self.writer(),
                "    {:>10}: {}",
                kind.to_string().red(),
                path.display()
            )?;
        }

        Ok(())
    }
}
