//! Tree object
//!
//! Trees are directory snapshots. The payload is a sequence of lines,
//! one per direct child, sorted lexicographically by name:
//!
//! ```text
//! <kind> <oid> <name>\n
//! ```
//!
//! where kind is `blob` for files and `tree` for subdirectories. Entry names
//! never contain `/` and are never `.` or `..`; a tree flattens recursively
//! into a [`PathMap`], the single path -> oid shape used everywhere a
//! directory snapshot, a working-tree view or a merge input is needed.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::UgitError;
use bytes::Bytes;
use derive_new::new;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Flat mapping from relative path to blob oid
///
/// Ordered so that iteration (and therefore diff/merge output) is stable.
pub type PathMap = BTreeMap<PathBuf, ObjectId>;

/// One direct child of a tree
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEntry {
    pub name: String,
    pub oid: ObjectId,
    pub kind: ObjectType,
}

/// A parsed tree object
#[derive(Debug, Clone, Default)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Build a tree from entries, sorting them into canonical name order
    pub fn build(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Tree { entries }
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    /// Encode the canonical line format
    pub fn serialize(&self) -> Bytes {
        let content = self
            .entries
            .iter()
            .map(|entry| format!("{} {} {}\n", entry.kind.as_str(), entry.oid, entry.name))
            .collect::<String>();

        Bytes::from(content)
    }

    /// Parse and validate a tree payload
    ///
    /// The `oid` is only used to name the offender in `CorruptTree` errors.
    pub fn deserialize(oid: &ObjectId, payload: &[u8]) -> anyhow::Result<Self> {
        let corrupt = |reason: String| UgitError::CorruptTree {
            oid: oid.to_string(),
            reason,
        };

        let content = std::str::from_utf8(payload)
            .map_err(|_| corrupt("payload is not valid UTF-8".to_string()))?;

        let mut entries = Vec::new();
        for line in content.lines() {
            let mut parts = line.splitn(3, ' ');
            let (kind, entry_oid, name) = match (parts.next(), parts.next(), parts.next()) {
                (Some(kind), Some(entry_oid), Some(name)) => (kind, entry_oid, name),
                _ => return Err(corrupt(format!("malformed entry line {line:?}")).into()),
            };

            let kind = ObjectType::try_from(kind)
                .map_err(|_| corrupt(format!("unknown entry kind {kind:?}")))?;
            if kind == ObjectType::Commit {
                return Err(corrupt("commit entry inside a tree".to_string()).into());
            }
            Self::validate_entry_name(name).map_err(corrupt)?;
            if entries.iter().any(|e: &TreeEntry| e.name == name) {
                return Err(corrupt(format!("duplicate entry name {name:?}")).into());
            }

            let entry_oid = ObjectId::try_parse(entry_oid.to_string())
                .map_err(|e| corrupt(format!("bad entry oid: {e}")))?;

            entries.push(TreeEntry::new(name.to_string(), entry_oid, kind));
        }

        Ok(Tree { entries })
    }

    fn validate_entry_name(name: &str) -> Result<(), String> {
        if name.is_empty() {
            return Err("empty entry name".to_string());
        }
        if name == "." || name == ".." {
            return Err(format!("entry name {name:?} is not allowed"));
        }
        if name.contains('/') {
            return Err(format!("entry name {name:?} contains '/'"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    #[test]
    fn serialize_sorts_entries_by_name() {
        let tree = Tree::build(vec![
            TreeEntry::new("zeta".to_string(), oid('a'), ObjectType::Blob),
            TreeEntry::new("alpha".to_string(), oid('b'), ObjectType::Tree),
        ]);

        let encoded = String::from_utf8(tree.serialize().to_vec()).unwrap();
        assert_eq!(
            encoded,
            format!("tree {} alpha\nblob {} zeta\n", oid('b'), oid('a'))
        );
    }

    #[test]
    fn round_trips_through_the_line_format() {
        let tree = Tree::build(vec![
            TreeEntry::new("a.txt".to_string(), oid('1'), ObjectType::Blob),
            TreeEntry::new("sub".to_string(), oid('2'), ObjectType::Tree),
        ]);

        let parsed = Tree::deserialize(&oid('f'), &tree.serialize()).unwrap();
        assert_eq!(parsed.entries(), tree.entries());
    }

    #[test]
    fn rejects_traversal_names_and_duplicates() {
        let dotdot = format!("blob {} ..\n", oid('a'));
        assert!(Tree::deserialize(&oid('f'), dotdot.as_bytes()).is_err());

        let slash = format!("blob {} a/b\n", oid('a'));
        assert!(Tree::deserialize(&oid('f'), slash.as_bytes()).is_err());

        let dup = format!("blob {} a\nblob {} a\n", oid('a'), oid('b'));
        assert!(Tree::deserialize(&oid('f'), dup.as_bytes()).is_err());
    }

    #[test]
    fn rejects_unknown_entry_kind() {
        let line = format!("symlink {} a\n", oid('a'));
        let err = Tree::deserialize(&oid('f'), line.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("corrupt tree"));
    }
}
