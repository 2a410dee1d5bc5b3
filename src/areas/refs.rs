//! References (HEAD, branches, tags, remote-tracking refs)
//!
//! A ref is a named pointer stored as a small text file under the control
//! directory. It is either:
//! - Direct: a 40-character oid
//! - Symbolic: `ref: <target>` naming another ref to follow
//!
//! `HEAD` is always present and usually symbolic, pointing at the current
//! branch under `refs/heads/`. A transient `MERGE_HEAD` exists only while a
//! merge is waiting to be committed.
//!
//! Dereferencing follows the symbolic chain with an explicit bounded loop; a
//! chain deeper than [`MAX_REF_DEPTH`] fails with `ReferenceCycle` instead of
//! looping forever.

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::UgitError;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Upper bound on symbolic-ref chain length
pub const MAX_REF_DEPTH: usize = 32;

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Name of the transient merge marker reference
pub const MERGE_HEAD_REF_NAME: &str = "MERGE_HEAD";

/// The content of one ref file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefValue {
    /// Direct object ID
    Direct(ObjectId),
    /// Symbolic reference naming another ref
    Symbolic(String),
}

impl RefValue {
    pub fn as_oid(&self) -> Option<&ObjectId> {
        match self {
            RefValue::Direct(oid) => Some(oid),
            RefValue::Symbolic(_) => None,
        }
    }

    fn encode(&self) -> String {
        match self {
            RefValue::Direct(oid) => oid.to_string(),
            RefValue::Symbolic(target) => format!("ref: {target}"),
        }
    }

    fn read_from(path: &Path) -> anyhow::Result<Option<RefValue>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ref file at {path:?}"))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(RefValue::Symbolic(symref_match[1].to_string())))
        } else {
            Ok(Some(RefValue::Direct(ObjectId::try_parse(
                content.to_string(),
            )?)))
        }
    }
}

/// Reference store rooted at one control directory
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the control directory (typically `.ugit`)
    path: Box<Path>,
}

impl Refs {
    /// Write a ref, optionally through its symbolic chain
    ///
    /// With `deref`, the final non-symbolic ref in the chain is the one
    /// overwritten - updating `HEAD` while it points at `refs/heads/master`
    /// rewrites the branch file, not `HEAD` itself.
    pub fn update_ref(&self, refname: &str, value: RefValue, deref: bool) -> anyhow::Result<()> {
        if let RefValue::Symbolic(target) = &value
            && target.is_empty()
        {
            return Err(
                UgitError::PreconditionFailed("empty symbolic ref target".to_string()).into(),
            );
        }

        let refname = if deref {
            self.resolve_terminal(refname)?.0
        } else {
            refname.to_string()
        };

        self.write_ref_file(&self.ref_path(&refname), value.encode())
    }

    /// Read a ref
    ///
    /// With `deref`, follows the symbolic chain and returns the terminal
    /// direct value (or `None` when the chain ends at an unset ref). Without
    /// it, returns the immediate content of exactly the named ref.
    pub fn read_ref(&self, refname: &str, deref: bool) -> anyhow::Result<Option<RefValue>> {
        if deref {
            Ok(self.resolve_terminal(refname)?.1)
        } else {
            RefValue::read_from(&self.ref_path(refname))
        }
    }

    /// Resolved oid of a ref, `None` when unset
    pub fn read_oid(&self, refname: &str) -> anyhow::Result<Option<ObjectId>> {
        Ok(self
            .read_ref(refname, true)?
            .and_then(|value| value.as_oid().cloned()))
    }

    /// Remove the ref file at the (optionally dereferenced) terminal path
    pub fn delete_ref(&self, refname: &str, deref: bool) -> anyhow::Result<()> {
        let refname = if deref {
            self.resolve_terminal(refname)?.0
        } else {
            refname.to_string()
        };

        let ref_path = self.ref_path(&refname);
        if ref_path.exists() {
            std::fs::remove_file(&ref_path)
                .with_context(|| format!("failed to delete ref file at {ref_path:?}"))?;
        }

        Ok(())
    }

    /// Enumerate refs with a non-empty resolved value
    ///
    /// `HEAD` and `MERGE_HEAD` come first, then every file under `refs/` in
    /// sorted walk order, filtered by name prefix.
    pub fn iter_refs(&self, prefix: &str, deref: bool) -> anyhow::Result<Vec<(String, RefValue)>> {
        let mut names = vec![HEAD_REF_NAME.to_string(), MERGE_HEAD_REF_NAME.to_string()];

        for entry in WalkDir::new(self.refs_path())
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
        {
            if entry.path().is_file()
                && let Ok(relative) = entry.path().strip_prefix(self.path.as_ref())
            {
                names.push(relative.to_string_lossy().replace('\\', "/"));
            }
        }

        let mut refs = Vec::new();
        for name in names {
            if !name.starts_with(prefix) {
                continue;
            }
            if let Some(value) = self.read_ref(&name, deref)? {
                refs.push((name, value));
            }
        }

        Ok(refs)
    }

    /// Name of the terminal ref in the chain plus its value
    ///
    /// The value is `None` when the chain ends at an unset ref (e.g. HEAD
    /// pointing at a branch that has no commits yet).
    fn resolve_terminal(&self, refname: &str) -> anyhow::Result<(String, Option<RefValue>)> {
        let mut name = refname.to_string();

        for _ in 0..MAX_REF_DEPTH {
            match RefValue::read_from(&self.ref_path(&name))? {
                Some(RefValue::Symbolic(target)) => name = target,
                terminal => return Ok((name, terminal)),
            }
        }

        Err(UgitError::ReferenceCycle(refname.to_string()).into())
    }

    fn write_ref_file(&self, path: &Path, raw_ref: String) -> anyhow::Result<()> {
        // create all the parent directories if they don't exist
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!("failed to create parent directories for ref file at {path:?}")
        })?)?;

        // open the ref file as WRONLY and CREAT, then lock it for the write
        let mut ref_file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to open ref file at {path:?}"))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    fn ref_path(&self, refname: &str) -> PathBuf {
        self.path.join(refname)
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}
