//! User-typed name resolution
//!
//! A revision is whatever the user typed on the command line: a branch, a
//! tag, `HEAD`, its alias `@`, a fully spelled ref path, or a raw oid. The
//! search order mirrors the ref namespace:
//!
//! 1. the literal string as a ref path
//! 2. `refs/<name>`
//! 3. `refs/tags/<name>`
//! 4. `refs/heads/<name>`
//! 5. a literal 40-hex object id
//!
//! Anything else fails with `UnknownReference`.

use crate::areas::repository::Repository;
use crate::artifacts::branch::REF_ALIASES;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::UgitError;

#[derive(Debug, Clone)]
pub struct Revision(String);

impl Revision {
    pub fn parse(name: &str) -> Self {
        let name = REF_ALIASES.get(name).copied().unwrap_or(name);
        Revision(name.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Resolve to an oid
    ///
    /// A name that matches an existing ref resolves through that ref's chain;
    /// the result is `None` when the ref exists but is still unset (e.g.
    /// `HEAD` on a branch with no commits yet).
    pub fn resolve(&self, repository: &Repository) -> anyhow::Result<Option<ObjectId>> {
        for candidate in self.candidate_refs() {
            if repository.refs().read_ref(&candidate, false)?.is_some() {
                return repository.refs().read_oid(&candidate);
            }
        }

        if ObjectId::is_valid_hex(&self.0) {
            return Ok(Some(ObjectId::try_parse(self.0.clone())?));
        }

        Err(UgitError::UnknownReference(self.0.clone()).into())
    }

    /// Whether the name refers to an existing local branch
    pub fn is_branch(&self, repository: &Repository) -> anyhow::Result<bool> {
        Ok(repository
            .refs()
            .read_oid(&format!("refs/heads/{}", self.0))?
            .is_some())
    }

    fn candidate_refs(&self) -> [String; 4] {
        [
            self.0.clone(),
            format!("refs/{}", self.0),
            format!("refs/tags/{}", self.0),
            format!("refs/heads/{}", self.0),
        ]
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
