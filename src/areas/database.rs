//! Content-addressed object database
//!
//! Objects live flat under `.ugit/objects/<oid>` as `<kind>\x00<payload>`.
//! The oid is the SHA-1 of exactly those bytes, so writes are idempotent and
//! never update in place: a store of already-present content is a no-op, new
//! content lands via a temp file plus rename.

use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::{PathMap, Tree};
use crate::errors::UgitError;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use fake::rand;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, new)]
pub struct Database {
    /// Path to the objects directory (typically `.ugit/objects`)
    path: Box<Path>,
}

impl Database {
    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Store an object, returning its content-derived id
    ///
    /// Idempotent: identical `(kind, payload)` always yields the same oid and
    /// repeat calls leave the existing file untouched.
    pub fn store_object(&self, kind: ObjectType, payload: &[u8]) -> anyhow::Result<ObjectId> {
        let oid = ObjectId::digest(&kind, payload);
        let object_path = self.object_path(&oid);

        if !object_path.exists() {
            let mut content = Vec::with_capacity(payload.len() + 8);
            content.write_all(kind.as_str().as_bytes())?;
            content.push(0);
            content.write_all(payload)?;

            self.write_object(object_path, Bytes::from(content))?;
        }

        Ok(oid)
    }

    pub fn store_blob(&self, content: &[u8]) -> anyhow::Result<ObjectId> {
        self.store_object(ObjectType::Blob, content)
    }

    pub fn store_tree(&self, tree: &Tree) -> anyhow::Result<ObjectId> {
        self.store_object(ObjectType::Tree, &tree.serialize())
    }

    pub fn store_commit(&self, commit: &Commit) -> anyhow::Result<ObjectId> {
        self.store_object(ObjectType::Commit, &commit.serialize())
    }

    /// Load an object's payload, optionally checking its kind
    ///
    /// With `expected` set, a kind mismatch fails with `TypeMismatch`. With
    /// `None` the payload comes back regardless of kind (blind byte dump).
    pub fn load_object(
        &self,
        oid: &ObjectId,
        expected: Option<ObjectType>,
    ) -> anyhow::Result<Bytes> {
        let (kind, payload) = self.split_object(oid)?;

        if let Some(expected) = expected
            && kind != expected
        {
            return Err(UgitError::TypeMismatch {
                oid: oid.to_string(),
                expected: expected.to_string(),
                actual: kind.to_string(),
            }
            .into());
        }

        Ok(payload)
    }

    /// Read the kind of a stored object without interpreting the payload
    pub fn object_kind(&self, oid: &ObjectId) -> anyhow::Result<ObjectType> {
        Ok(self.split_object(oid)?.0)
    }

    /// Existence probe without reading content
    pub fn exists(&self, oid: &ObjectId) -> bool {
        self.object_path(oid).exists()
    }

    pub fn parse_tree(&self, oid: &ObjectId) -> anyhow::Result<Tree> {
        let payload = self.load_object(oid, Some(ObjectType::Tree))?;
        Tree::deserialize(oid, &payload)
    }

    pub fn parse_commit(&self, oid: &ObjectId) -> anyhow::Result<Commit> {
        let payload = self.load_object(oid, Some(ObjectType::Commit))?;
        Commit::deserialize(oid, &payload)
    }

    /// Recursively flatten a tree into a path map
    ///
    /// `None` yields an empty map, matching an absent/empty snapshot.
    pub fn expand_tree(&self, tree_oid: Option<&ObjectId>) -> anyhow::Result<PathMap> {
        let mut result = PathMap::new();

        if let Some(tree_oid) = tree_oid {
            self.expand_tree_into(tree_oid, PathBuf::new(), &mut result)?;
        }

        Ok(result)
    }

    fn expand_tree_into(
        &self,
        tree_oid: &ObjectId,
        base_path: PathBuf,
        result: &mut PathMap,
    ) -> anyhow::Result<()> {
        let tree = self.parse_tree(tree_oid)?;

        for entry in tree.entries() {
            let path = base_path.join(&entry.name);
            match entry.kind {
                ObjectType::Blob => {
                    result.insert(path, entry.oid.clone());
                }
                ObjectType::Tree => {
                    self.expand_tree_into(&entry.oid, path, result)?;
                }
                // rejected by Tree::deserialize already
                ObjectType::Commit => unreachable!("commit entry inside a tree"),
            }
        }

        Ok(())
    }

    /// Copy an object's stored bytes from another database
    ///
    /// Used by remote sync; the content is already addressed by its digest so
    /// a verbatim byte copy preserves identity. Copying an object that is
    /// already present is a no-op.
    pub fn import_object(&self, from: &Database, oid: &ObjectId) -> anyhow::Result<()> {
        if self.exists(oid) {
            return Ok(());
        }

        let content = from.read_object(from.object_path(oid), oid)?;
        self.write_object(self.object_path(oid), content)
    }

    fn object_path(&self, oid: &ObjectId) -> PathBuf {
        self.path.join(oid.as_ref())
    }

    fn split_object(&self, oid: &ObjectId) -> anyhow::Result<(ObjectType, Bytes)> {
        let content = self.read_object(self.object_path(oid), oid)?;

        let nul = content
            .iter()
            .position(|byte| *byte == 0)
            .ok_or_else(|| UgitError::CorruptObject(oid.to_string()))?;

        let kind = std::str::from_utf8(&content[..nul])
            .ok()
            .and_then(|kind| ObjectType::try_from(kind).ok())
            .ok_or_else(|| UgitError::CorruptObject(oid.to_string()))?;

        Ok((kind, content.slice(nul + 1..)))
    }

    fn read_object(&self, object_path: PathBuf, oid: &ObjectId) -> anyhow::Result<Bytes> {
        if !object_path.exists() {
            return Err(UgitError::NotFound(oid.to_string()).into());
        }

        let content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Ok(content.into())
    }

    fn write_object(&self, object_path: PathBuf, content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        std::fs::create_dir_all(object_dir).context(format!(
            "Unable to create object directory {}",
            object_dir.display()
        ))?;

        let temp_object_path = object_dir.join(Self::generate_temp_name());
        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::tree::TreeEntry;
    use pretty_assertions::assert_eq;

    fn temp_database() -> (assert_fs::TempDir, Database) {
        let dir = assert_fs::TempDir::new().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());
        (dir, database)
    }

    #[test]
    fn store_then_load_returns_the_payload() {
        let (_guard, database) = temp_database();

        let oid = database.store_blob(b"payload bytes").unwrap();
        let payload = database.load_object(&oid, Some(ObjectType::Blob)).unwrap();

        assert_eq!(&payload[..], b"payload bytes");
        assert!(database.exists(&oid));
    }

    #[test]
    fn store_is_idempotent() {
        let (_guard, database) = temp_database();

        let first = database.store_blob(b"same").unwrap();
        let second = database.store_blob(b"same").unwrap();

        assert_eq!(first, second);
        let files = std::fs::read_dir(database.objects_path()).unwrap().count();
        assert_eq!(files, 1);
    }

    #[test]
    fn load_with_wrong_kind_is_a_type_mismatch() {
        let (_guard, database) = temp_database();

        let oid = database.store_blob(b"not a tree").unwrap();
        let err = database
            .load_object(&oid, Some(ObjectType::Tree))
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<UgitError>(),
            Some(UgitError::TypeMismatch { .. })
        ));

        // no expected kind: blind byte dump succeeds
        assert!(database.load_object(&oid, None).is_ok());
    }

    #[test]
    fn missing_object_is_not_found() {
        let (_guard, database) = temp_database();

        let oid = ObjectId::try_parse("c".repeat(40)).unwrap();
        let err = database.load_object(&oid, None).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<UgitError>(),
            Some(UgitError::NotFound(_))
        ));
    }

    #[test]
    fn expand_tree_flattens_nested_directories() {
        let (_guard, database) = temp_database();

        let blob_a = database.store_blob(b"a").unwrap();
        let blob_b = database.store_blob(b"b").unwrap();
        let subtree = Tree::build(vec![TreeEntry::new(
            "inner.txt".to_string(),
            blob_b.clone(),
            ObjectType::Blob,
        )]);
        let subtree_oid = database.store_tree(&subtree).unwrap();
        let root = Tree::build(vec![
            TreeEntry::new("top.txt".to_string(), blob_a.clone(), ObjectType::Blob),
            TreeEntry::new("sub".to_string(), subtree_oid, ObjectType::Tree),
        ]);
        let root_oid = database.store_tree(&root).unwrap();

        let map = database.expand_tree(Some(&root_oid)).unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&PathBuf::from("top.txt")), Some(&blob_a));
        assert_eq!(map.get(&PathBuf::from("sub/inner.txt")), Some(&blob_b));

        assert!(database.expand_tree(None).unwrap().is_empty());
    }

    #[test]
    fn import_object_copies_bytes_between_stores() {
        let (_guard_a, source) = temp_database();
        let (_guard_b, target) = temp_database();

        let oid = source.store_blob(b"travelling bytes").unwrap();
        assert!(!target.exists(&oid));

        target.import_object(&source, &oid).unwrap();

        assert!(target.exists(&oid));
        assert_eq!(
            &target.load_object(&oid, Some(ObjectType::Blob)).unwrap()[..],
            b"travelling bytes"
        );
    }
}
