//! Tree comparison and content diffing
//!
//! Trees are compared in their flattened [`PathMap`] form: walk the union of
//! paths and look at the oid on each side. Same oid means same content, so
//! blob bytes are only touched when the oids differ.
//!
//! Byte-level work goes through the [`DiffOracle`] seam. [`LineOracle`] is
//! the default implementation; anything that can diff and three-way merge a
//! pair of byte buffers can stand in for it.

pub mod line_diff;

use crate::areas::database::Database;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::PathMap;
use bytes::Bytes;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Byte-level diff and merge engine
pub trait DiffOracle {
    /// Render a human-readable diff of two buffers
    fn diff(&self, from: &[u8], to: &[u8], path: &Path) -> Vec<u8>;

    /// Three-way merge of two buffers against a common base
    fn merge(&self, base: &[u8], ours: &[u8], theirs: &[u8]) -> line_diff::MergeResult;
}

/// The default line-oriented oracle
#[derive(Debug, Default)]
pub struct LineOracle;

impl DiffOracle for LineOracle {
    fn diff(&self, from: &[u8], to: &[u8], path: &Path) -> Vec<u8> {
        line_diff::unified_diff(from, to, path)
    }

    fn merge(&self, base: &[u8], ours: &[u8], theirs: &[u8]) -> line_diff::MergeResult {
        line_diff::merge_three_way(base, ours, theirs)
    }
}

/// How a path differs between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    New,
    Deleted,
    Modified,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::New => "new file",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Modified => "modified",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Union of both maps in sorted path order, with the oid each side holds
pub fn compare_path_maps<'a>(
    from: &'a PathMap,
    to: &'a PathMap,
) -> Vec<(&'a Path, Option<&'a ObjectId>, Option<&'a ObjectId>)> {
    let paths: BTreeSet<&PathBuf> = from.keys().chain(to.keys()).collect();

    paths
        .into_iter()
        .map(|path| (path.as_path(), from.get(path), to.get(path)))
        .collect()
}

/// Paths whose content differs between two snapshots, with the change kind
pub fn changed_paths(from: &PathMap, to: &PathMap) -> Vec<(PathBuf, ChangeKind)> {
    compare_path_maps(from, to)
        .into_iter()
        .filter_map(|(path, from_oid, to_oid)| {
            let kind = match (from_oid, to_oid) {
                (None, Some(_)) => ChangeKind::New,
                (Some(_), None) => ChangeKind::Deleted,
                (Some(from_oid), Some(to_oid)) if from_oid != to_oid => ChangeKind::Modified,
                _ => return None,
            };
            Some((path.to_path_buf(), kind))
        })
        .collect()
}

/// Concatenated byte diff of every changed path
///
/// A path absent on one side diffs against empty content. Blob bytes come
/// from the database, so both snapshots must already be stored.
pub fn diff_trees(
    database: &Database,
    from: &PathMap,
    to: &PathMap,
    oracle: &impl DiffOracle,
) -> anyhow::Result<Bytes> {
    let mut output = Vec::new();

    for (path, from_oid, to_oid) in compare_path_maps(from, to) {
        if from_oid == to_oid {
            continue;
        }

        let from_content = load_or_empty(database, from_oid)?;
        let to_content = load_or_empty(database, to_oid)?;
        output.extend_from_slice(&oracle.diff(&from_content, &to_content, path));
    }

    Ok(output.into())
}

pub(crate) fn load_or_empty(
    database: &Database,
    oid: Option<&ObjectId>,
) -> anyhow::Result<Bytes> {
    match oid {
        Some(oid) => database.load_object(oid, Some(ObjectType::Blob)),
        None => Ok(Bytes::new()),
    }
}
