//! In-memory project tree for tests.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use railsmith_core::{
    application::{ApplicationError, ports::ProjectTree},
    domain::RelativePath,
    error::RailsmithResult,
};

/// In-memory project tree.
///
/// Clones share state, so a test can keep a handle while the service owns
/// another.
#[derive(Debug, Clone)]
pub struct MemoryProjectTree {
    root: PathBuf,
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    executables: BTreeSet<PathBuf>,
    writes: usize,
}

impl MemoryProjectTree {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/memory/app"),
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    /// Seed a file, creating its parent directories. Does not count as a write.
    pub fn seed(&self, path: &str, content: &str) -> &Self {
        let path = PathBuf::from(path);
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        insert_ancestors(&mut inner.directories, &path);
        inner.files.insert(path, content.to_string());
        self
    }

    /// Read a file's content (testing helper).
    pub fn read(&self, path: &str) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(Path::new(path)).cloned()
    }

    pub fn is_executable(&self, path: &str) -> bool {
        self.inner
            .read()
            .map(|inner| inner.executables.contains(Path::new(path)))
            .unwrap_or(false)
    }

    /// Number of `write_file` calls so far.
    pub fn write_count(&self) -> usize {
        self.inner.read().map(|inner| inner.writes).unwrap_or(0)
    }
}

impl Default for MemoryProjectTree {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_ancestors(directories: &mut BTreeSet<PathBuf>, path: &Path) {
    let mut current = PathBuf::new();
    if let Some(parent) = path.parent() {
        for component in parent.components() {
            current.push(component);
            directories.insert(current.clone());
        }
    }
}

fn lock_error(path: &RelativePath) -> ApplicationError {
    ApplicationError::FilesystemError {
        path: path.as_path().to_path_buf(),
        reason: "memory tree lock poisoned".into(),
    }
}

impl ProjectTree for MemoryProjectTree {
    fn root(&self) -> &Path {
        &self.root
    }

    fn read_file(&self, path: &RelativePath) -> RailsmithResult<Option<String>> {
        let inner = self.inner.read().map_err(|_| lock_error(path))?;
        Ok(inner.files.get(path.as_path()).cloned())
    }

    fn write_file(&self, path: &RelativePath, content: &str) -> RailsmithResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_error(path))?;

        if let Some(parent) = path.parent() {
            if !inner.directories.contains(parent.as_path()) {
                return Err(ApplicationError::FilesystemError {
                    path: path.as_path().to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner
            .files
            .insert(path.as_path().to_path_buf(), content.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn exists(&self, path: &RelativePath) -> bool {
        self.inner
            .read()
            .map(|inner| {
                inner.files.contains_key(path.as_path())
                    || inner.directories.contains(path.as_path())
            })
            .unwrap_or(false)
    }

    fn create_dir_all(&self, path: &RelativePath) -> RailsmithResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_error(path))?;
        let mut current = PathBuf::new();
        for component in path.as_path().components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }
        Ok(())
    }

    fn set_executable(&self, path: &RelativePath) -> RailsmithResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_error(path))?;
        inner.executables.insert(path.as_path().to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_files_are_readable_and_parents_exist() {
        let tree = MemoryProjectTree::new();
        tree.seed("config/environments/development.rb", "x");

        assert!(tree.exists(&RelativePath::new("config/environments")));
        assert_eq!(
            tree.read_file(&RelativePath::new("config/environments/development.rb"))
                .unwrap()
                .as_deref(),
            Some("x")
        );
        assert_eq!(tree.write_count(), 0);
    }

    #[test]
    fn write_requires_parent_directory() {
        let tree = MemoryProjectTree::new();
        let path = RelativePath::new("app/views/home/index.html.erb");
        assert!(tree.write_file(&path, "hi").is_err());

        tree.create_dir_all(&RelativePath::new("app/views/home"))
            .unwrap();
        tree.write_file(&path, "hi").unwrap();
        assert_eq!(tree.read("app/views/home/index.html.erb").unwrap(), "hi");
    }

    #[test]
    fn clones_share_state() {
        let tree = MemoryProjectTree::new();
        let handle = tree.clone();
        tree.write_file(&RelativePath::new("Procfile.dev"), "web: x")
            .unwrap();
        assert_eq!(handle.read("Procfile.dev").unwrap(), "web: x");
        assert_eq!(handle.write_count(), 1);
    }
}
