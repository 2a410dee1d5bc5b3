//! Working directory access
//!
//! The workspace is an explicit capability over one directory: every
//! snapshot, restore and working-tree-view operation goes through it rather
//! than touching an ambient current directory. Paths handed out and accepted
//! are always relative to the workspace root.
//!
//! Any path containing the control directory (`.ugit`) as a component is
//! invisible to the workspace.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::PathMap;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name of the repository control directory
pub const CONTROL_DIR_NAME: &str = ".ugit";

const IGNORED_PATHS: [&str; 3] = [CONTROL_DIR_NAME, ".", ".."];

#[derive(Debug, new)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List the direct, non-ignored children of a directory
    ///
    /// `None` lists the workspace root. Returned paths are relative.
    pub fn list_dir(&self, dir_path: Option<&Path>) -> anyhow::Result<Vec<PathBuf>> {
        let dir_path = match dir_path {
            Some(p) => self.path.join(p),
            None => self.path.to_path_buf(),
        };

        if !dir_path.is_dir() {
            anyhow::bail!("The specified path is not a directory: {:?}", dir_path);
        }

        let mut children = std::fs::read_dir(&dir_path)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| self.relative_if_not_ignored(&entry.path()))
            .collect::<Vec<_>>();
        children.sort();

        Ok(children)
    }

    /// List every non-ignored file under the workspace root, sorted
    pub fn list_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = WalkDir::new(self.path.as_ref())
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| self.relative_if_not_ignored(entry.path()))
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let full_path = self.path.join(file_path);
        let content = std::fs::read(&full_path)
            .with_context(|| format!("failed to read file {full_path:?}"))?;

        Ok(content.into())
    }

    /// Write a file, creating parent directories as needed
    pub fn write_file(&self, file_path: &Path, content: &[u8]) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {parent:?}"))?;
        }

        std::fs::write(&full_path, content)
            .with_context(|| format!("failed to write file {full_path:?}"))?;

        Ok(())
    }

    /// Hash the live filesystem content into a path map
    ///
    /// This is the ephemeral "working tree view": nothing is stored, the oids
    /// are computed in memory purely for comparison against real trees.
    pub fn tree_view(&self) -> anyhow::Result<PathMap> {
        let mut view = PathMap::new();

        for path in self.list_files()? {
            let content = self.read_file(&path)?;
            view.insert(path, ObjectId::digest(&ObjectType::Blob, &content));
        }

        Ok(view)
    }

    /// Delete every non-ignored file, then every now-empty directory
    ///
    /// Directories are removed bottom-up. A directory that stays non-empty
    /// because it still holds ignored content is left in place; those
    /// deletion errors are the only ones swallowed here.
    pub fn clear(&self) -> anyhow::Result<()> {
        for entry in WalkDir::new(self.path.as_ref())
            .contents_first(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
        {
            let Some(relative) = self.relative_if_not_ignored(entry.path()) else {
                continue;
            };
            if relative.as_os_str().is_empty() {
                continue; // the workspace root itself
            }

            if entry.path().is_file() {
                std::fs::remove_file(entry.path())
                    .with_context(|| format!("failed to remove file {relative:?}"))?;
            } else if entry.path().is_dir() {
                // may still contain ignored files; that is fine
                let _ = std::fs::remove_dir(entry.path());
            }
        }

        Ok(())
    }

    fn is_ignored(path: &Path) -> bool {
        path.components().any(|component| {
            if let std::path::Component::Normal(name) = component {
                let name_str = name.to_string_lossy();
                IGNORED_PATHS.contains(&name_str.as_ref())
            } else {
                false
            }
        })
    }

    fn relative_if_not_ignored(&self, path: &Path) -> Option<PathBuf> {
        let relative = path.strip_prefix(self.path.as_ref()).ok()?;
        if Self::is_ignored(relative) {
            None
        } else {
            Some(relative.to_path_buf())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn temp_workspace() -> (assert_fs::TempDir, Workspace) {
        let dir = assert_fs::TempDir::new().unwrap();
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());
        (dir, workspace)
    }

    #[test]
    fn list_files_skips_the_control_directory() {
        let (_guard, workspace) = temp_workspace();

        workspace.write_file(Path::new("a.txt"), b"a").unwrap();
        workspace.write_file(Path::new("sub/b.txt"), b"b").unwrap();
        workspace
            .write_file(Path::new(".ugit/objects/junk"), b"x")
            .unwrap();

        let files = workspace.list_files().unwrap();
        assert_eq!(
            files,
            vec![PathBuf::from("a.txt"), PathBuf::from("sub/b.txt")]
        );
    }

    #[test]
    fn clear_removes_files_but_keeps_ignored_content() {
        let (_guard, workspace) = temp_workspace();

        workspace.write_file(Path::new("a.txt"), b"a").unwrap();
        workspace.write_file(Path::new("sub/deep/b.txt"), b"b").unwrap();
        workspace.write_file(Path::new(".ugit/HEAD"), b"head").unwrap();

        workspace.clear().unwrap();

        assert!(workspace.list_files().unwrap().is_empty());
        assert!(!workspace.path().join("sub").exists());
        assert!(workspace.path().join(".ugit/HEAD").exists());
    }

    #[test]
    fn tree_view_hashes_content_without_storing() {
        let (_guard, workspace) = temp_workspace();

        workspace.write_file(Path::new("a.txt"), b"same").unwrap();
        workspace.write_file(Path::new("b.txt"), b"same").unwrap();

        let view = workspace.tree_view().unwrap();
        assert_eq!(view.len(), 2);
        // identical content hashes identically
        assert_eq!(
            view.get(Path::new("a.txt")),
            view.get(Path::new("b.txt"))
        );
    }
}
