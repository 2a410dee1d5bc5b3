use crate::areas::refs::{HEAD_REF_NAME, RefValue};
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::Revision;
use crate::errors::UgitError;

impl Repository {
    /// Tag a revision (HEAD by default) with a name under `refs/tags/`
    pub fn tag(&self, name: &str, target: Option<&str>) -> anyhow::Result<()> {
        // tags follow the same naming rules as branches
        let name = BranchName::try_parse(name.to_string())?;

        let target_oid = match target {
            Some(target) => Revision::parse(target).resolve(self)?,
            None => self.refs().read_oid(HEAD_REF_NAME)?,
        }
        .ok_or_else(|| UgitError::PreconditionFailed("no commit to tag".to_string()))?;

        self.refs().update_ref(
            &format!("refs/tags/{name}"),
            RefValue::Direct(target_oid.clone()),
            false,
        )?;

        writeln!(
            self.writer(),
            "Tag {name} created at {}",
            target_oid.to_short_oid()
        )?;

        Ok(())
    }

    /// Remove a tag from `refs/tags/`
    pub fn delete_tag(&self, name: &str) -> anyhow::Result<()> {
        let refname = format!("refs/tags/{name}");

        if self.refs().read_ref(&refname, false)?.is_none() {
            return Err(UgitError::UnknownReference(refname).into());
        }

        self.refs().delete_ref(&refname, false)?;
        writeln!(self.writer(), "Deleted tag {name}")?;

        Ok(())
    }
}
