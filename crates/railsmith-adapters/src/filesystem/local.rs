//! Local project tree backed by `std::fs`.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use railsmith_core::{
    application::{ApplicationError, ports::ProjectTree},
    domain::RelativePath,
    error::{RailsmithError, RailsmithResult},
};

/// The application directory on disk.
#[derive(Debug, Clone)]
pub struct LocalProjectTree {
    root: PathBuf,
}

impl LocalProjectTree {
    /// Open an existing directory.
    ///
    /// # Errors
    /// `FilesystemError` when `root` is missing or not a directory.
    pub fn open(root: impl AsRef<Path>) -> RailsmithResult<Self> {
        let root = root.as_ref();
        let root = root
            .canonicalize()
            .map_err(|e| map_io_error(root, e, "open application directory"))?;
        if !root.is_dir() {
            return Err(ApplicationError::FilesystemError {
                path: root,
                reason: "Not a directory".into(),
            }
            .into());
        }
        debug!(root = %root.display(), "opened project tree");
        Ok(Self { root })
    }

    fn resolve(&self, path: &RelativePath) -> PathBuf {
        self.root.join(path)
    }
}

impl ProjectTree for LocalProjectTree {
    fn root(&self) -> &Path {
        &self.root
    }

    fn read_file(&self, path: &RelativePath) -> RailsmithResult<Option<String>> {
        let full = self.resolve(path);
        match std::fs::read_to_string(&full) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_io_error(&full, e, "read file")),
        }
    }

    #[instrument(skip(self, content), fields(path = %path, bytes = content.len()))]
    fn write_file(&self, path: &RelativePath, content: &str) -> RailsmithResult<()> {
        let full = self.resolve(path);
        std::fs::write(&full, content).map_err(|e| map_io_error(&full, e, "write file"))
    }

    fn exists(&self, path: &RelativePath) -> bool {
        self.resolve(path).exists()
    }

    fn create_dir_all(&self, path: &RelativePath) -> RailsmithResult<()> {
        let full = self.resolve(path);
        std::fs::create_dir_all(&full).map_err(|e| map_io_error(&full, e, "create directory"))
    }

    fn set_executable(&self, path: &RelativePath) -> RailsmithResult<()> {
        let full = self.resolve(path);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata =
                std::fs::metadata(&full).map_err(|e| map_io_error(&full, e, "get metadata"))?;
            let mut perms = metadata.permissions();
            perms.set_mode(perms.mode() | 0o111);
            std::fs::set_permissions(&full, perms)
                .map_err(|e| map_io_error(&full, e, "set permissions"))?;
        }
        #[cfg(windows)]
        {
            let _ = full;
        }
        Ok(())
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> RailsmithError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
