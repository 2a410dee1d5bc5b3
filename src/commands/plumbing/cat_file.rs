use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::UgitError;

impl Repository {
    /// Print a stored object's payload
    ///
    /// With `expected` set, the stored kind must match; without it the
    /// payload is dumped blindly whatever the kind.
    pub fn cat_file(&self, target: &str, expected: Option<&str>) -> anyhow::Result<()> {
        let oid = Revision::parse(target)
            .resolve(self)?
            .ok_or_else(|| UgitError::UnknownReference(target.to_string()))?;

        let expected = expected.map(ObjectType::try_from).transpose()?;
        let payload = self.database().load_object(&oid, expected)?;

        self.writer().write_all(&payload)?;

        Ok(())
    }
}
