use crate::areas::database::Database;
use crate::areas::refs::Refs;
use crate::areas::workspace::{CONTROL_DIR_NAME, Workspace};
use std::cell::{RefCell, RefMut};
use std::path::Path;

/// Composition root over one repository directory
///
/// Nothing here is wired to a global location: a second `Repository` over a
/// different path is a fully independent store, which is exactly how remote
/// synchronization reaches "remote" repositories on the same filesystem.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        if !Path::new(path).exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = Path::new(path).canonicalize()?;

        let control_dir = path.join(CONTROL_DIR_NAME);
        let database = Database::new(control_dir.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(control_dir.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            database,
            workspace,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `init` has been run here
    pub fn is_initialized(&self) -> bool {
        self.path.join(CONTROL_DIR_NAME).is_dir()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}
