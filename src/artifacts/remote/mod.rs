//! Remote synchronization over filesystem-reachable repositories
//!
//! A "remote" is just another repository root on the same filesystem; the
//! object database and ref store are reentrant over any root, so fetch and
//! push are plain two-store operations. Objects are content-addressed, which
//! makes every transfer a verbatim byte copy and every repeated transfer a
//! no-op.
//!
//! Push is fast-forward only: the remote ref must be unset or an ancestor of
//! the value being pushed. There is no rollback for a failed push - objects
//! copied before the failure stay behind, harmlessly, because they are
//! addressed by content.

use crate::areas::refs::RefValue;
use crate::areas::repository::Repository;
use crate::artifacts::graph::{is_ancestor, reachable_objects};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::UgitError;
use std::collections::HashSet;

/// Ref namespace read on the remote side
pub const REMOTE_REFS_BASE: &str = "refs/heads/";

/// Ref namespace fetch writes into locally
pub const LOCAL_REFS_BASE: &str = "refs/remote/";

/// A branch ref mirrored by fetch
pub struct FetchedRef {
    /// Local tracking ref name (`refs/remote/<branch>`)
    pub refname: String,
    pub oid: ObjectId,
}

/// Open the repository at a remote path without creating anything
///
/// A mistyped path fails here instead of leaving an empty directory behind.
pub fn open(remote_path: &str) -> anyhow::Result<Repository> {
    if !std::path::Path::new(remote_path).is_dir() {
        return Err(UgitError::PreconditionFailed(format!(
            "remote repository at {remote_path} does not exist"
        ))
        .into());
    }

    Repository::new(remote_path, Box::new(std::io::sink()))
}

/// Mirror the remote's branches into the local repository
///
/// Copies every object reachable from the remote's `refs/heads/*` tips that
/// the local store does not already have, then writes one direct (never
/// symbolic) tracking ref under `refs/remote/` per remote branch.
pub fn fetch(local: &Repository, remote: &Repository) -> anyhow::Result<Vec<FetchedRef>> {
    ensure_initialized(remote)?;

    let heads: Vec<(String, ObjectId)> = remote
        .refs()
        .iter_refs(REMOTE_REFS_BASE, true)?
        .into_iter()
        .filter_map(|(name, value)| value.as_oid().cloned().map(|oid| (name, oid)))
        .collect();

    let tips = heads.iter().map(|(_, oid)| oid.clone());
    for oid in reachable_objects(remote.database(), tips)? {
        local.database().import_object(remote.database(), &oid)?;
    }

    let mut fetched = Vec::new();
    for (name, oid) in heads {
        let branch = name.strip_prefix(REMOTE_REFS_BASE).unwrap_or(&name);
        let refname = format!("{LOCAL_REFS_BASE}{branch}");
        local
            .refs()
            .update_ref(&refname, RefValue::Direct(oid.clone()), true)?;
        fetched.push(FetchedRef { refname, oid });
    }

    Ok(fetched)
}

/// Push one local ref to the remote, fast-forward only
///
/// Fails with `PreconditionFailed` when the local ref is unset and with
/// `NonFastForward` when the remote's current value is not an ancestor of
/// the local one. The transfer set is everything reachable locally minus
/// everything reachable from remote refs whose objects the remote store
/// actually has; a remote ref pointing at a lost object is silently excluded
/// from the "already has" side rather than reported.
pub fn push(local: &Repository, remote: &Repository, refname: &str) -> anyhow::Result<ObjectId> {
    ensure_initialized(remote)?;

    let local_oid = local.refs().read_oid(refname)?.ok_or_else(|| {
        UgitError::PreconditionFailed(format!("no local value for {refname}"))
    })?;

    let remote_oid = remote.refs().read_oid(refname)?;
    if let Some(remote_oid) = &remote_oid
        && !is_ancestor(local.database(), remote_oid, &local_oid)?
    {
        return Err(UgitError::NonFastForward {
            refname: refname.to_string(),
        }
        .into());
    }

    let known_tips: Vec<ObjectId> = remote
        .refs()
        .iter_refs(REMOTE_REFS_BASE, true)?
        .into_iter()
        .filter_map(|(_, value)| value.as_oid().cloned())
        .filter(|oid| remote.database().exists(oid))
        .collect();
    let remote_has: HashSet<ObjectId> = reachable_objects(remote.database(), known_tips)?
        .into_iter()
        .collect();

    for oid in reachable_objects(local.database(), [local_oid.clone()])? {
        if !remote_has.contains(&oid) {
            remote.database().import_object(local.database(), &oid)?;
        }
    }

    remote
        .refs()
        .update_ref(refname, RefValue::Direct(local_oid.clone()), true)?;

    Ok(local_oid)
}

fn ensure_initialized(remote: &Repository) -> anyhow::Result<()> {
    if remote.is_initialized() {
        Ok(())
    } else {
        Err(UgitError::PreconditionFailed(format!(
            "remote repository at {} is not initialized",
            remote.path().display()
        ))
        .into())
    }
}
