use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mfr_types::Acl;

use crate::error::{VfsError, VfsResult};
use crate::object_store::atomic_write;
use crate::traits::VfsPath;

/// A plain file on the local filesystem.
///
/// Local files have no notion of per-object ACLs: any ACL passed on write is
/// ignored, and none of the optional capabilities are advertised.
#[derive(Clone, PartialEq, Eq)]
pub struct LocalPath {
    path: PathBuf,
}

impl LocalPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn as_path(&self) -> &Path {
        &self.path
    }
}

impl VfsPath for LocalPath {
    fn path(&self) -> String {
        self.path.display().to_string()
    }

    fn join(&self, relative: &str) -> Arc<dyn VfsPath> {
        Arc::new(LocalPath {
            path: self.path.join(relative.trim_start_matches('/')),
        })
    }

    fn read_file(&self) -> VfsResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VfsError::io(self.path(), e)),
        }
    }

    fn write_file(&self, data: &[u8], acl: Option<&Acl>) -> VfsResult<()> {
        if let Some(acl) = acl {
            tracing::debug!(path = %self, %acl, "local filesystem ignores object ACL");
        }
        atomic_write(&self.path, data).map_err(|e| VfsError::io(self.path(), e))
    }

    fn remove(&self) -> VfsResult<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(VfsError::io(self.path(), e)),
        }
    }
}

impl fmt::Display for LocalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl fmt::Debug for LocalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalPath").field(&self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_creates_parents_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let p = LocalPath::new(dir.path()).join("nested/dir/file.txt");
        p.write_file(b"local", Some(&Acl::public_read())).unwrap();
        assert_eq!(p.read_file().unwrap().unwrap(), b"local");
        assert_eq!(
            fs::read(dir.path().join("nested/dir/file.txt")).unwrap(),
            b"local"
        );
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LocalPath::new(dir.path().join("nope"))
            .read_file()
            .unwrap()
            .is_none());
    }

    #[test]
    fn reading_a_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalPath::new(dir.path()).read_file().unwrap_err();
        assert!(matches!(err, VfsError::Io { .. }));
    }

    #[test]
    fn no_optional_capabilities() {
        let p = LocalPath::new("/tmp/x");
        assert!(p.as_public_readable().is_none());
        assert!(p.as_cluster_readable().is_none());
        assert!(p.as_object_acl().is_none());
        assert!(p.as_terraform().is_none());
    }
}
