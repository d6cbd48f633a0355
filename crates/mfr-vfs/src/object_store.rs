use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mfr_iac::TerraformWriter;
use mfr_types::Acl;
use tempfile::NamedTempFile;

use crate::error::{VfsError, VfsResult};
use crate::join_segments;
use crate::terraform;
use crate::traits::{ObjectAclPath, PublicReadable, TerraformPath, VfsPath};

const OBJECTS_DIR: &str = "objects";
const ACLS_DIR: &str = "acls";

/// A durable object-store bucket kept in a local directory.
///
/// Object data lives under `<root>/objects/<key>`; the per-object ACL, when
/// one was supplied on write, lives in `<root>/acls/<key>.json`. Writes go
/// through a temp file in the destination directory and are renamed into
/// place, so readers never observe a half-written object.
#[derive(Debug)]
pub struct ObjectBucket {
    name: String,
    root: PathBuf,
}

impl ObjectBucket {
    /// Open (creating if needed) a bucket rooted at `root`.
    pub fn open(name: impl Into<String>, root: impl AsRef<Path>) -> VfsResult<Arc<Self>> {
        let root = root.as_ref().to_path_buf();
        for dir in [OBJECTS_DIR, ACLS_DIR] {
            let dir = root.join(dir);
            fs::create_dir_all(&dir).map_err(|e| VfsError::io(dir.display().to_string(), e))?;
        }
        Ok(Arc::new(Self {
            name: name.into(),
            root,
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A handle to `key` in this bucket.
    pub fn path(self: &Arc<Self>, key: &str) -> ObjectStorePath {
        ObjectStorePath {
            bucket: Arc::clone(self),
            key: key.trim_matches('/').to_string(),
        }
    }

    fn object_file(&self, key: &str) -> VfsResult<PathBuf> {
        Ok(self.root.join(OBJECTS_DIR).join(self.checked_key(key)?))
    }

    fn acl_file(&self, key: &str) -> VfsResult<PathBuf> {
        let key = self.checked_key(key)?;
        Ok(self.root.join(ACLS_DIR).join(format!("{key}.json")))
    }

    fn checked_key<'a>(&self, key: &'a str) -> VfsResult<&'a str> {
        let bad = |reason: &str| VfsError::MalformedPath {
            path: format!("s3://{}/{key}", self.name),
            reason: reason.to_string(),
        };
        if key.is_empty() {
            return Err(bad("object key must not be empty"));
        }
        if key
            .split('/')
            .any(|seg| seg.is_empty() || seg == "." || seg == "..")
        {
            return Err(bad("object key has an empty or relative segment"));
        }
        Ok(key)
    }
}

/// An object in an [`ObjectBucket`], rendered as `s3://<bucket>/<key>`.
#[derive(Clone)]
pub struct ObjectStorePath {
    bucket: Arc<ObjectBucket>,
    key: String,
}

impl ObjectStorePath {
    pub fn bucket(&self) -> &ObjectBucket {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl VfsPath for ObjectStorePath {
    fn path(&self) -> String {
        format!("s3://{}/{}", self.bucket.name, self.key)
    }

    fn join(&self, relative: &str) -> Arc<dyn VfsPath> {
        Arc::new(ObjectStorePath {
            bucket: Arc::clone(&self.bucket),
            key: join_segments(&self.key, relative),
        })
    }

    fn read_file(&self) -> VfsResult<Option<Vec<u8>>> {
        let file = self.bucket.object_file(&self.key)?;
        match fs::read(&file) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VfsError::io(self.path(), e)),
        }
    }

    fn write_file(&self, data: &[u8], acl: Option<&Acl>) -> VfsResult<()> {
        let file = self.bucket.object_file(&self.key)?;
        let acl_file = self.bucket.acl_file(&self.key)?;

        let io_err = |e: io::Error| VfsError::io(self.path(), e);

        // Both files are staged before either is renamed into place.
        let staged_acl = match acl {
            Some(acl) => {
                let encoded = serde_json::to_vec(acl).map_err(|e| VfsError::CorruptAcl {
                    path: self.path(),
                    reason: e.to_string(),
                })?;
                Some(stage(&acl_file, &encoded).map_err(io_err)?)
            }
            None => None,
        };
        let staged_data = stage(&file, data).map_err(io_err)?;

        staged_data.persist(&file).map_err(|e| io_err(e.error))?;
        match staged_acl {
            Some(tmp) => {
                tmp.persist(&acl_file).map_err(|e| io_err(e.error))?;
            }
            None => match fs::remove_file(&acl_file) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(io_err(e)),
            },
        }
        tracing::debug!(path = %self.path(), bytes = data.len(), "wrote object");
        Ok(())
    }

    fn remove(&self) -> VfsResult<bool> {
        let file = self.bucket.object_file(&self.key)?;
        let existed = match fs::remove_file(&file) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(VfsError::io(self.path(), e)),
        };
        match fs::remove_file(self.bucket.acl_file(&self.key)?) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(VfsError::io(self.path(), e)),
        }
        Ok(existed)
    }

    fn as_public_readable(&self) -> Option<&dyn PublicReadable> {
        Some(self)
    }

    fn as_object_acl(&self) -> Option<&dyn ObjectAclPath> {
        Some(self)
    }

    fn as_terraform(&self) -> Option<&dyn TerraformPath> {
        Some(self)
    }
}

impl ObjectAclPath for ObjectStorePath {
    fn object_acl(&self) -> VfsResult<Option<Acl>> {
        let acl_file = self.bucket.acl_file(&self.key)?;
        let raw = match fs::read(&acl_file) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(VfsError::io(self.path(), e)),
        };
        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|e| VfsError::CorruptAcl {
                path: self.path(),
                reason: e.to_string(),
            })
    }
}

impl PublicReadable for ObjectStorePath {
    fn is_public(&self) -> VfsResult<bool> {
        Ok(self.object_acl()?.is_some_and(|acl| acl.grants_public_read()))
    }
}

impl TerraformPath for ObjectStorePath {
    fn render_terraform(
        &self,
        writer: &mut TerraformWriter,
        name: &str,
        data: &mut dyn Read,
        acl: Option<&Acl>,
    ) -> VfsResult<()> {
        terraform::render_object(
            writer,
            &self.path(),
            &self.bucket.name,
            &self.key,
            name,
            data,
            acl,
        )
    }
}

impl fmt::Display for ObjectStorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl fmt::Debug for ObjectStorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStorePath")
            .field("bucket", &self.bucket.name)
            .field("key", &self.key)
            .finish()
    }
}

/// Write `data` to a temp file beside `dest`, then rename it into place.
pub(crate) fn atomic_write(dest: &Path, data: &[u8]) -> io::Result<()> {
    stage(dest, data)?.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

/// Write `data` to a synced temp file beside `dest`, ready to be persisted.
fn stage(dest: &Path, data: &[u8]) -> io::Result<NamedTempFile> {
    let dir = dest
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no parent"))?;
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfr_types::{CannedAcl, Grant, Grantee, Permission};

    fn bucket() -> (tempfile::TempDir, Arc<ObjectBucket>) {
        let dir = tempfile::tempdir().unwrap();
        let bucket = ObjectBucket::open("state", dir.path()).unwrap();
        (dir, bucket)
    }

    // -----------------------------------------------------------------------
    // Core read / write
    // -----------------------------------------------------------------------

    #[test]
    fn read_missing_returns_none() {
        let (_dir, b) = bucket();
        assert!(b.path("cluster/absent").read_file().unwrap().is_none());
    }

    #[test]
    fn write_then_read_nested_key() {
        let (dir, b) = bucket();
        let p = b.path("cluster").join("config/foo.yaml");
        p.write_file(b"a: 1", None).unwrap();

        assert_eq!(p.path(), "s3://state/cluster/config/foo.yaml");
        assert_eq!(p.read_file().unwrap().unwrap(), b"a: 1");
        assert!(dir.path().join("objects/cluster/config/foo.yaml").exists());
    }

    #[test]
    fn objects_survive_reopen() {
        let (dir, b) = bucket();
        b.path("k").write_file(b"durable", Some(&Acl::public_read())).unwrap();
        drop(b);

        let reopened = ObjectBucket::open("state", dir.path()).unwrap();
        let p = reopened.path("k");
        assert_eq!(p.read_file().unwrap().unwrap(), b"durable");
        assert!(p.is_public().unwrap());
    }

    #[test]
    fn remove_deletes_data_and_acl() {
        let (dir, b) = bucket();
        let p = b.path("k");
        p.write_file(b"x", Some(&Acl::public_read())).unwrap();
        assert!(p.remove().unwrap());
        assert!(!p.remove().unwrap());
        assert!(!dir.path().join("acls/k.json").exists());
    }

    // -----------------------------------------------------------------------
    // ACLs
    // -----------------------------------------------------------------------

    #[test]
    fn acl_is_stored_and_cleared() {
        let (_dir, b) = bucket();
        let p = b.path("k");
        let owner = Acl::Canned(CannedAcl::BucketOwnerFullControl);
        p.write_file(b"x", Some(&owner)).unwrap();
        assert_eq!(p.object_acl().unwrap(), Some(owner));
        assert!(!p.is_public().unwrap());

        p.write_file(b"x", None).unwrap();
        assert_eq!(p.object_acl().unwrap(), None);
    }

    #[test]
    fn failed_data_write_leaves_acl_untouched() {
        let (dir, b) = bucket();
        fs::create_dir_all(dir.path().join("objects/k/child")).unwrap();

        let p = b.path("k");
        assert!(p.write_file(b"x", Some(&Acl::public_read())).is_err());
        assert!(!dir.path().join("acls/k.json").exists());
        assert_eq!(p.object_acl().unwrap(), None);
    }

    #[test]
    fn all_users_grant_is_public() {
        let (_dir, b) = bucket();
        let p = b.path("k");
        let acl = Acl::Grants(vec![Grant {
            grantee: Grantee::AllUsers,
            permission: Permission::Read,
        }]);
        p.write_file(b"x", Some(&acl)).unwrap();
        assert!(p.is_public().unwrap());
    }

    #[test]
    fn corrupt_acl_is_reported() {
        let (dir, b) = bucket();
        let p = b.path("k");
        p.write_file(b"x", None).unwrap();
        fs::write(dir.path().join("acls/k.json"), b"not json").unwrap();
        assert!(matches!(p.is_public(), Err(VfsError::CorruptAcl { .. })));
    }

    // -----------------------------------------------------------------------
    // Key validation
    // -----------------------------------------------------------------------

    #[test]
    fn rejects_traversal_keys() {
        let (_dir, b) = bucket();
        let p = b.path("cluster").join("../escape");
        assert!(matches!(
            p.write_file(b"x", None),
            Err(VfsError::MalformedPath { .. })
        ));
        assert!(matches!(
            b.path("").read_file(),
            Err(VfsError::MalformedPath { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Terraform
    // -----------------------------------------------------------------------

    #[test]
    fn render_terraform_declares_bucket_object() {
        let (_dir, b) = bucket();
        let p = b.path("cluster/config");
        let mut w = TerraformWriter::new();
        let mut data: &[u8] = b"cfg";
        p.render_terraform(&mut w, "cluster-config", &mut data, None)
            .unwrap();

        let res = w.resource("aws_s3_object", "cluster-config").unwrap();
        assert_eq!(res["bucket"], "state");
        assert_eq!(res["key"], "cluster/config");
        assert_eq!(res["provider"], "aws.files");
        assert!(res.get("acl").is_none());
        assert!(p.read_file().unwrap().is_none());
    }

    #[test]
    fn render_terraform_rejects_grant_lists() {
        let (_dir, b) = bucket();
        let acl = Acl::Grants(vec![Grant {
            grantee: Grantee::AuthenticatedUsers,
            permission: Permission::Read,
        }]);
        let mut w = TerraformWriter::new();
        let mut data: &[u8] = b"";
        let err = b
            .path("k")
            .render_terraform(&mut w, "k", &mut data, Some(&acl))
            .unwrap_err();
        assert!(matches!(err, VfsError::UnsupportedAcl { .. }));
        assert!(w.is_empty());
    }
}
