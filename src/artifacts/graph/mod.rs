//! Commit-graph traversal
//!
//! Commits form a DAG through their parent lists. [`CommitWalk`] visits every
//! commit reachable from a set of starting points exactly once, expanding all
//! parents of each commit. The frontier is an explicit deque: the first
//! parent of the most recently visited commit is expanded next, so traversal
//! order is deterministic for a given input order.
//!
//! On top of the walk sit the ancestry queries the rest of the engine needs:
//! `is_ancestor` (push safety), `merge_base` (three-way merge) and
//! `reachable_objects` (remote transfer sets).

use crate::areas::database::Database;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use std::collections::{HashSet, VecDeque};

pub struct CommitWalk<'db> {
    database: &'db Database,
    frontier: VecDeque<ObjectId>,
    visited: HashSet<ObjectId>,
}

impl<'db> CommitWalk<'db> {
    /// Walk every commit reachable from `start`, including the start commits
    pub fn new(database: &'db Database, start: impl IntoIterator<Item = ObjectId>) -> Self {
        CommitWalk {
            database,
            frontier: start.into_iter().collect(),
            visited: HashSet::new(),
        }
    }
}

impl Iterator for CommitWalk<'_> {
    type Item = anyhow::Result<ObjectId>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let oid = self.frontier.pop_front()?;
            if !self.visited.insert(oid.clone()) {
                continue;
            }

            let commit = match self.database.parse_commit(&oid) {
                Ok(commit) => commit,
                // a reachable commit that cannot be read is fatal, not skippable
                Err(error) => return Some(Err(error)),
            };

            #[cfg(feature = "debug_walk")]
            eprintln!(
                "[walk] {} parents={:?}",
                oid.to_short_oid(),
                commit
                    .parents()
                    .iter()
                    .map(|p| p.to_short_oid())
                    .collect::<Vec<_>>()
            );

            // push in reverse so the first parent is expanded next
            for parent in commit.parents().iter().rev() {
                self.frontier.push_front(parent.clone());
            }

            return Some(Ok(oid));
        }
    }
}

/// Whether `candidate` is reachable from `of_oid` via parent expansion
///
/// Reflexive: every commit is an ancestor of itself.
pub fn is_ancestor(
    database: &Database,
    candidate: &ObjectId,
    of_oid: &ObjectId,
) -> anyhow::Result<bool> {
    for oid in CommitWalk::new(database, [of_oid.clone()]) {
        if oid? == *candidate {
            return Ok(true);
        }
    }

    Ok(false)
}

/// First common ancestor of `oid1` and `oid2` in traversal order
///
/// Best effort: in histories with several equally valid merge bases this
/// returns the one the walk reaches first, not a true lowest common
/// ancestor. The three-way merge depends on getting exactly one base.
pub fn merge_base(
    database: &Database,
    oid1: &ObjectId,
    oid2: &ObjectId,
) -> anyhow::Result<Option<ObjectId>> {
    let ancestors1 = CommitWalk::new(database, [oid1.clone()])
        .collect::<anyhow::Result<HashSet<ObjectId>>>()?;

    for oid in CommitWalk::new(database, [oid2.clone()]) {
        let oid = oid?;
        if ancestors1.contains(&oid) {
            return Ok(Some(oid));
        }
    }

    Ok(None)
}

/// Closure of all commit, tree and blob oids reachable from `commits`
///
/// Deduplicated, in deterministic discovery order. This is the transfer set
/// remote sync subtracts and copies.
pub fn reachable_objects(
    database: &Database,
    commits: impl IntoIterator<Item = ObjectId>,
) -> anyhow::Result<Vec<ObjectId>> {
    let mut seen = HashSet::new();
    let mut objects = Vec::new();

    for commit_oid in CommitWalk::new(database, commits) {
        let commit_oid = commit_oid?;
        if !seen.insert(commit_oid.clone()) {
            continue;
        }
        objects.push(commit_oid.clone());

        let commit = database.parse_commit(&commit_oid)?;
        collect_tree_objects(database, commit.tree_oid(), &mut seen, &mut objects)?;
    }

    Ok(objects)
}

fn collect_tree_objects(
    database: &Database,
    tree_oid: &ObjectId,
    seen: &mut HashSet<ObjectId>,
    objects: &mut Vec<ObjectId>,
) -> anyhow::Result<()> {
    if !seen.insert(tree_oid.clone()) {
        return Ok(());
    }
    objects.push(tree_oid.clone());

    for entry in database.parse_tree(tree_oid)?.entries() {
        match entry.kind {
            ObjectType::Blob => {
                if seen.insert(entry.oid.clone()) {
                    objects.push(entry.oid.clone());
                }
            }
            ObjectType::Tree => collect_tree_objects(database, &entry.oid, seen, objects)?,
            ObjectType::Commit => unreachable!("commit entry inside a tree"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::Commit;
    use crate::artifacts::objects::tree::{Tree, TreeEntry};
    use pretty_assertions::assert_eq;

    fn temp_database() -> (assert_fs::TempDir, Database) {
        let dir = assert_fs::TempDir::new().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());
        (dir, database)
    }

    fn store_commit(
        database: &Database,
        content: &str,
        parents: Vec<ObjectId>,
        message: &str,
    ) -> ObjectId {
        let blob = database.store_blob(content.as_bytes()).unwrap();
        let tree = Tree::build(vec![TreeEntry::new(
            "file.txt".to_string(),
            blob,
            ObjectType::Blob,
        )]);
        let tree_oid = database.store_tree(&tree).unwrap();
        let commit = Commit::new(tree_oid, parents, message.to_string());
        database.store_commit(&commit).unwrap()
    }

    #[test]
    fn walk_visits_each_commit_once_in_first_parent_order() {
        let (_guard, database) = temp_database();

        let c1 = store_commit(&database, "one", vec![], "c1");
        let c2 = store_commit(&database, "two", vec![c1.clone()], "c2");
        let c3 = store_commit(&database, "three", vec![c1.clone()], "c3");
        let merge = store_commit(&database, "four", vec![c2.clone(), c3.clone()], "merge");

        let visited = CommitWalk::new(&database, [merge.clone()])
            .collect::<anyhow::Result<Vec<_>>>()
            .unwrap();

        assert_eq!(visited, vec![merge, c2, c1, c3]);
    }

    #[test]
    fn is_ancestor_is_reflexive_and_follows_all_parents() {
        let (_guard, database) = temp_database();

        let c1 = store_commit(&database, "one", vec![], "c1");
        let c2 = store_commit(&database, "two", vec![c1.clone()], "c2");
        let c3 = store_commit(&database, "three", vec![c1.clone()], "c3");
        let merge = store_commit(&database, "four", vec![c2.clone(), c3.clone()], "merge");

        assert!(is_ancestor(&database, &merge, &merge).unwrap());
        assert!(is_ancestor(&database, &c1, &merge).unwrap());
        assert!(is_ancestor(&database, &c3, &merge).unwrap());
        assert!(!is_ancestor(&database, &merge, &c2).unwrap());
        assert!(!is_ancestor(&database, &c2, &c3).unwrap());
    }

    #[test]
    fn merge_base_of_diverging_branches_is_the_fork_point() {
        let (_guard, database) = temp_database();

        let c1 = store_commit(&database, "one", vec![], "c1");
        let c2 = store_commit(&database, "two", vec![c1.clone()], "c2");
        let c3 = store_commit(&database, "three", vec![c1.clone()], "c3");

        let base = merge_base(&database, &c2, &c3).unwrap();
        assert_eq!(base, Some(c1.clone()));

        // the returned base is an ancestor of both sides
        assert!(is_ancestor(&database, &c1, &c2).unwrap());
        assert!(is_ancestor(&database, &c1, &c3).unwrap());
    }

    #[test]
    fn unrelated_histories_have_no_merge_base() {
        let (_guard, database) = temp_database();

        let a = store_commit(&database, "one", vec![], "a");
        let b = store_commit(&database, "other", vec![], "b");

        assert_eq!(merge_base(&database, &a, &b).unwrap(), None);
    }

    #[test]
    fn reachable_objects_covers_commits_trees_and_blobs() {
        let (_guard, database) = temp_database();

        let c1 = store_commit(&database, "one", vec![], "c1");
        let c2 = store_commit(&database, "two", vec![c1.clone()], "c2");

        let objects = reachable_objects(&database, [c2.clone()]).unwrap();

        // two commits, two trees, two blobs
        assert_eq!(objects.len(), 6);
        assert!(objects.contains(&c1));
        assert!(objects.contains(&c2));

        let commit = database.parse_commit(&c2).unwrap();
        assert!(objects.contains(commit.tree_oid()));

        // deduplicated even when histories share objects
        let unique: HashSet<_> = objects.iter().collect();
        assert_eq!(unique.len(), objects.len());
    }
}
