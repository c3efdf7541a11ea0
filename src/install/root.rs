use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ROOT_PREFIX: &str = "pkgshell-";

/// Scratch directory holding every package installed during one session.
///
/// The directory is removed by [`InstallRoot::cleanup`], or on drop when a
/// startup error unwinds before the session gets to clean up.
#[derive(Debug)]
pub struct InstallRoot {
    dir: TempDir,
}

impl InstallRoot {
    /// Create a fresh root in the system temp directory.
    pub fn create() -> Result<Self> {
        Self::create_in(std::env::temp_dir())
    }

    pub fn create_in(parent: impl AsRef<Path>) -> Result<Self> {
        let parent = parent.as_ref();
        let dir = tempfile::Builder::new()
            .prefix(ROOT_PREFIX)
            .tempdir_in(parent)
            .with_context(|| format!("Failed to create install root in {:?}", parent))?;
        debug!("Created install root {:?}", dir.path());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Recursively delete the root and everything installed in it.
    pub fn cleanup(self) -> Result<()> {
        let path: PathBuf = self.dir.path().to_path_buf();
        debug!("Removing install root {:?}", path);
        self.dir
            .close()
            .with_context(|| format!("Failed to remove install root {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_create_uses_prefix() {
        let parent = tempdir().unwrap();
        let root = InstallRoot::create_in(parent.path()).unwrap();
        assert!(root.path().is_dir());
        assert!(root.path().starts_with(parent.path()));
        let name = root.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(ROOT_PREFIX));
        assert!(name.len() > ROOT_PREFIX.len());
    }

    #[test]
    fn test_cleanup_leaves_no_trace() {
        let parent = tempdir().unwrap();
        let root = InstallRoot::create_in(parent.path()).unwrap();
        let path = root.path().to_path_buf();

        let nested = path.join("pkgshell-0/node_modules/pkgshell-0");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("index.js"), "module.exports = 1;").unwrap();

        root.cleanup().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_removes_root() {
        let parent = tempdir().unwrap();
        let path = {
            let root = InstallRoot::create_in(parent.path()).unwrap();
            root.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_distinct_roots() {
        let parent = tempdir().unwrap();
        let a = InstallRoot::create_in(parent.path()).unwrap();
        let b = InstallRoot::create_in(parent.path()).unwrap();
        assert_ne!(a.path(), b.path());
    }
}
