use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Recursively delete a clone directory. A directory that is already gone is
/// not an error.
pub fn remove_repo_directory(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// The transient directory a single project is cloned into.
///
/// The directory is absent when the guard is acquired and is removed exactly
/// once: by [`WorkingCopy::release`], or on drop if release never ran.
#[derive(Debug)]
pub struct WorkingCopy {
    path: PathBuf,
    released: bool,
}

impl WorkingCopy {
    pub fn acquire(root: &Path, project_name: &str) -> Result<Self> {
        fs::create_dir_all(root)?;
        let path = root.join(project_name);

        if path.exists() {
            tracing::warn!("Removing stale working copy {}", path.display());
            remove_repo_directory(&path)?;
        }

        Ok(Self {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn release(mut self) -> Result<()> {
        self.released = true;
        tracing::debug!("Removing working copy {}", self.path.display());
        remove_repo_directory(&self.path)
    }
}

impl Drop for WorkingCopy {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = remove_repo_directory(&self.path) {
            tracing::warn!("Failed to remove {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_missing_directory_is_ok() {
        let root = tempfile::tempdir().unwrap();
        assert!(remove_repo_directory(&root.path().join("nothing-here")).is_ok());
    }

    #[test]
    fn test_acquire_clears_stale_directory() {
        let root = tempfile::tempdir().unwrap();
        let stale = root.path().join("kafka");
        fs::create_dir_all(stale.join("src")).unwrap();
        fs::write(stale.join("src/Old.java"), "class Old {}\n").unwrap();

        let copy = WorkingCopy::acquire(root.path(), "kafka").unwrap();
        assert_eq!(copy.path(), stale.as_path());
        assert!(!stale.exists());
        copy.release().unwrap();
    }

    #[test]
    fn test_release_and_drop_remove_directory() {
        let root = tempfile::tempdir().unwrap();

        let copy = WorkingCopy::acquire(root.path(), "hive").unwrap();
        fs::create_dir_all(copy.path().join("nested")).unwrap();
        let path = copy.path().to_path_buf();
        copy.release().unwrap();
        assert!(!path.exists());

        {
            let copy = WorkingCopy::acquire(root.path(), "pig").unwrap();
            fs::create_dir_all(copy.path()).unwrap();
        }
        assert!(!root.path().join("pig").exists());
    }

    #[test]
    fn test_acquire_creates_root() {
        let base = tempfile::tempdir().unwrap();
        let root = base.path().join("repositories");
        let copy = WorkingCopy::acquire(&root, "tika").unwrap();
        assert!(root.is_dir());
        copy.release().unwrap();
    }
}
