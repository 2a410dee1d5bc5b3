use crate::areas::refs::{HEAD_REF_NAME, RefValue};
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::Revision;
use crate::errors::UgitError;
use colored::Colorize;

impl Repository {
    /// Create a branch, or list branches when no name is given
    pub fn branch(&self, name: Option<&str>, start_point: Option<&str>) -> anyhow::Result<()> {
        match name {
            Some(name) => self.create_branch(name, start_point),
            None => self.list_branches(),
        }
    }

    fn create_branch(&self, name: &str, start_point: Option<&str>) -> anyhow::Result<()> {
        let name = BranchName::try_parse(name.to_string())?;

        let start_oid = match start_point {
            Some(start_point) => Revision::parse(start_point).resolve(self)?,
            None => self.refs().read_oid(HEAD_REF_NAME)?,
        }
        .ok_or_else(|| {
            UgitError::PreconditionFailed("no commit to branch from".to_string())
        })?;

        self.refs().update_ref(
            &format!("refs/heads/{name}"),
            RefValue::Direct(start_oid.clone()),
            false,
        )?;

        writeln!(
            self.writer(),
            "Branch {name} created at {}",
            start_oid.to_short_oid()
        )?;

        Ok(())
    }

    fn list_branches(&self) -> anyhow::Result<()> {
        let current = self.current_branch()?;

        for (refname, _) in self.refs().iter_refs("refs/heads/", true)? {
            let branch = refname.trim_start_matches("refs/heads/");
            if Some(branch) == current.as_deref() {
                writeln!(self.writer(), "* {}", branch.green())?;
            } else {
                writeln!(self.writer(), "  {branch}")?;
            }
        }

        Ok(())
    }

    /// Name of the branch HEAD points at, `None` when detached
    pub fn current_branch(&self) -> anyhow::Result<Option<String>> {
        Ok(
            match self.refs().read_ref(HEAD_REF_NAME, false)? {
                Some(RefValue::Symbolic(target)) => target
                    .strip_prefix("refs/heads/")
                    .map(|branch| branch.to_string()),
                _ => None,
            },
        )
    }
}
