//! Commit object
//!
//! A commit records one directory snapshot plus where it came from:
//!
//! ```text
//! tree <oid>
//! parent <oid>        (zero or more)
//!
//! <message>
//! ```
//!
//! Zero parents is a root commit, one an ordinary commit, two a merge commit
//! (the second parent comes from MERGE_HEAD at commit time). Commits form a
//! DAG through the parent relation.

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::UgitError;
use bytes::Bytes;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Commit {
    tree_oid: ObjectId,
    parents: Vec<ObjectId>,
    message: String,
}

impl Commit {
    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    /// All parents, in recorded order (first parent first)
    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the message, for one-line display
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn serialize(&self) -> Bytes {
        let mut content = String::new();

        content.push_str(&format!("tree {}\n", self.tree_oid));
        for parent in &self.parents {
            content.push_str(&format!("parent {parent}\n"));
        }
        content.push('\n');
        content.push_str(&self.message);
        content.push('\n');

        Bytes::from(content)
    }

    /// Parse a commit payload
    ///
    /// The header block runs until the first blank line; everything after it
    /// is the free-text message. An unrecognized header key means the stored
    /// payload is not a commit we wrote, so it fails with `CorruptCommit`.
    pub fn deserialize(oid: &ObjectId, payload: &[u8]) -> anyhow::Result<Self> {
        let corrupt = |reason: String| UgitError::CorruptCommit {
            oid: oid.to_string(),
            reason,
        };

        let content = std::str::from_utf8(payload)
            .map_err(|_| corrupt("payload is not valid UTF-8".to_string()))?;

        let mut tree_oid = None;
        let mut parents = Vec::new();
        let mut lines = content.lines();

        for line in lines.by_ref() {
            if line.is_empty() {
                break;
            }

            let (key, value) = line
                .split_once(' ')
                .ok_or_else(|| corrupt(format!("malformed header line {line:?}")))?;

            match key {
                "tree" => {
                    tree_oid = Some(
                        ObjectId::try_parse(value.to_string())
                            .map_err(|e| corrupt(format!("bad tree oid: {e}")))?,
                    );
                }
                "parent" => {
                    parents.push(
                        ObjectId::try_parse(value.to_string())
                            .map_err(|e| corrupt(format!("bad parent oid: {e}")))?,
                    );
                }
                _ => return Err(corrupt(format!("unknown header key {key:?}")).into()),
            }
        }

        let tree_oid = tree_oid.ok_or_else(|| corrupt("missing tree header".to_string()))?;
        let message = lines.collect::<Vec<&str>>().join("\n");

        Ok(Commit::new(tree_oid, parents, message))
    }
}
