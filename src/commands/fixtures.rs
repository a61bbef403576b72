use crate::areas::repository::Repository;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// Output sink whose contents stay readable after it is boxed into a repository
#[derive(Debug, Clone, Default)]
pub(crate) struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub(crate) struct TestRepository {
    pub(crate) dir: TempDir,
    pub(crate) repository: Repository,
    pub(crate) output: SharedBuffer,
}

impl TestRepository {
    /// An initialized repository in a fresh temporary directory
    pub(crate) fn init() -> Self {
        let dir = TempDir::new().unwrap();
        let output = SharedBuffer::default();
        let repository = Repository::new(dir.path(), Box::new(output.clone()));
        repository.init().unwrap();

        TestRepository {
            dir,
            repository,
            output,
        }
    }

    pub(crate) fn write_file(&self, name: &str, content: &str) {
        self.dir.child(name).write_str(content).unwrap();
    }

    pub(crate) fn delete_file(&self, name: &str) {
        std::fs::remove_file(self.dir.path().join(name)).unwrap();
    }

    pub(crate) fn stage(&self, names: &[&str]) {
        let names = names.iter().map(|name| name.to_string()).collect::<Vec<_>>();
        self.repository.stage(&names).unwrap();
    }

    /// Every file below the metadata directory with its bytes
    pub(crate) fn snapshot_git_dir(&self) -> Vec<(String, Vec<u8>)> {
        let git_path = self.repository.git_path();
        let mut files = walkdir::WalkDir::new(&git_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| {
                (
                    entry.path().display().to_string(),
                    std::fs::read(entry.path()).unwrap(),
                )
            })
            .collect::<Vec<_>>();
        files.sort();

        files
    }

    pub(crate) fn take_output(&self) -> String {
        let contents = self.output.contents();
        self.output.0.borrow_mut().clear();

        contents
    }
}

pub(crate) fn no_env(_: &str) -> Option<String> {
    None
}
