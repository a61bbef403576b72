use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

/// Name of the metadata directory below the repository root
pub const GIT_DIR: &str = ".git";

pub const OBJECTS_DIR: &str = "objects";

pub const INDEX_FILE: &str = "index";

/// A repository rooted at an explicit directory
///
/// Every operation works relative to `path`; the process working directory is
/// never consulted. User-facing output goes to `writer`.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: RefCell<Index>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    pub fn new(path: &Path, writer: Box<dyn std::io::Write>) -> Self {
        let git_path = path.join(GIT_DIR);

        let index = Index::new(git_path.join(INDEX_FILE).into_boxed_path());
        let database = Database::new(git_path.join(OBJECTS_DIR).into_boxed_path());
        let workspace = Workspace::new(path.into());
        let refs = Refs::new(git_path.into_boxed_path());

        Repository {
            path: path.into(),
            writer: RefCell::new(writer),
            index: RefCell::new(index),
            database,
            workspace,
            refs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_path(&self) -> PathBuf {
        self.path.join(GIT_DIR)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&'_ self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
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
