//! Three-way tree merge
//!
//! Both sides are merged against the tree of their merge base, path by path.
//! A path absent on a side contributes empty content, so additions and
//! deletions fall out of the same chunk rules as edits. The output is plain
//! file content keyed by path; the caller decides what to do with it
//! (materialize into the working tree, typically).

use crate::areas::database::Database;
use crate::artifacts::diff::{DiffOracle, load_or_empty};
use crate::artifacts::objects::tree::PathMap;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

pub struct MergedTree {
    /// Merged content per path, conflict markers included where needed
    pub content: BTreeMap<PathBuf, Bytes>,
    /// Paths whose merge produced conflict markers
    pub conflicts: Vec<PathBuf>,
}

/// Merge two flattened trees against their common base
pub fn merge_trees(
    database: &Database,
    base: &PathMap,
    ours: &PathMap,
    theirs: &PathMap,
    oracle: &impl DiffOracle,
) -> anyhow::Result<MergedTree> {
    let mut content = BTreeMap::new();
    let mut conflicts = Vec::new();

    // union over all three trees: a path deleted on both sides still merges
    let paths: BTreeSet<&Path> = base
        .keys()
        .chain(ours.keys())
        .chain(theirs.keys())
        .map(PathBuf::as_path)
        .collect();

    for path in paths {
        let base_content = load_or_empty(database, base.get(path))?;
        let ours_content = load_or_empty(database, ours.get(path))?;
        let theirs_content = load_or_empty(database, theirs.get(path))?;

        let merged = oracle.merge(&base_content, &ours_content, &theirs_content);
        if merged.conflicted {
            conflicts.push(path.to_path_buf());
        }
        content.insert(path.to_path_buf(), merged.content.into());
    }

    Ok(MergedTree { content, conflicts })
}
