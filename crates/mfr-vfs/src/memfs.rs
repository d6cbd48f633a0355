use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use mfr_iac::TerraformWriter;
use mfr_types::Acl;

use crate::error::{VfsError, VfsResult};
use crate::join_segments;
use crate::terraform;
use crate::traits::{ClusterReadable, PublicReadable, TerraformPath, VfsPath};

/// Bucket name used when memfs objects are rendered as Terraform.
const TESTING_BUCKET: &str = "testingBucket";

#[derive(Clone)]
struct MemFsEntry {
    data: Vec<u8>,
    acl: Option<Acl>,
}

/// Shared state behind every [`MemFsPath`] created from it.
///
/// Intended for tests. Public ACLs are refused unless the whole context has
/// been marked cluster-readable with [`MemFsContext::mark_cluster_readable`].
pub struct MemFsContext {
    files: RwLock<BTreeMap<String, MemFsEntry>>,
    cluster_readable: AtomicBool,
}

impl MemFsContext {
    /// Create a new empty context.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            files: RwLock::new(BTreeMap::new()),
            cluster_readable: AtomicBool::new(false),
        })
    }

    /// Allow paths in this context to carry public ACLs.
    pub fn mark_cluster_readable(&self) {
        self.cluster_readable.store(true, Ordering::SeqCst);
    }

    pub fn is_cluster_readable(&self) -> bool {
        self.cluster_readable.load(Ordering::SeqCst)
    }

    /// A handle to `location` in this context.
    pub fn path(self: &Arc<Self>, location: &str) -> MemFsPath {
        MemFsPath {
            context: Arc::clone(self),
            location: location.trim_matches('/').to_string(),
        }
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.files.read().map(|f| f.len()).unwrap_or_default()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The ACL stored with `location`, if the object exists and has one.
    pub fn acl_of(&self, location: &str) -> VfsResult<Option<Acl>> {
        let files = self.read_files()?;
        Ok(files.get(location).and_then(|e| e.acl.clone()))
    }

    fn read_files(
        &self,
    ) -> VfsResult<std::sync::RwLockReadGuard<'_, BTreeMap<String, MemFsEntry>>> {
        self.files
            .read()
            .map_err(|e| VfsError::LockPoisoned(e.to_string()))
    }

    fn write_files(
        &self,
    ) -> VfsResult<std::sync::RwLockWriteGuard<'_, BTreeMap<String, MemFsEntry>>> {
        self.files
            .write()
            .map_err(|e| VfsError::LockPoisoned(e.to_string()))
    }
}

impl fmt::Debug for MemFsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemFsContext")
            .field("object_count", &self.len())
            .field("cluster_readable", &self.is_cluster_readable())
            .finish()
    }
}

/// A location inside a [`MemFsContext`], rendered as `memfs://<location>`.
#[derive(Clone)]
pub struct MemFsPath {
    context: Arc<MemFsContext>,
    location: String,
}

impl MemFsPath {
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn context(&self) -> &Arc<MemFsContext> {
        &self.context
    }
}

impl VfsPath for MemFsPath {
    fn path(&self) -> String {
        format!("memfs://{}", self.location)
    }

    fn join(&self, relative: &str) -> Arc<dyn VfsPath> {
        Arc::new(MemFsPath {
            context: Arc::clone(&self.context),
            location: join_segments(&self.location, relative),
        })
    }

    fn read_file(&self) -> VfsResult<Option<Vec<u8>>> {
        let files = self.context.read_files()?;
        Ok(files.get(&self.location).map(|e| e.data.clone()))
    }

    fn write_file(&self, data: &[u8], acl: Option<&Acl>) -> VfsResult<()> {
        let mut files = self.context.write_files()?;
        files.insert(
            self.location.clone(),
            MemFsEntry {
                data: data.to_vec(),
                acl: acl.cloned(),
            },
        );
        Ok(())
    }

    fn remove(&self) -> VfsResult<bool> {
        let mut files = self.context.write_files()?;
        Ok(files.remove(&self.location).is_some())
    }

    fn as_public_readable(&self) -> Option<&dyn PublicReadable> {
        Some(self)
    }

    fn as_cluster_readable(&self) -> Option<&dyn ClusterReadable> {
        Some(self)
    }

    fn as_terraform(&self) -> Option<&dyn TerraformPath> {
        Some(self)
    }
}

impl PublicReadable for MemFsPath {
    fn is_public(&self) -> VfsResult<bool> {
        Ok(self
            .context
            .acl_of(&self.location)?
            .is_some_and(|acl| acl.grants_public_read()))
    }
}

impl ClusterReadable for MemFsPath {
    fn is_cluster_readable(&self) -> bool {
        self.context.is_cluster_readable()
    }
}

impl TerraformPath for MemFsPath {
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
            TESTING_BUCKET,
            &self.location,
            name,
            data,
            acl,
        )
    }
}

impl fmt::Display for MemFsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl fmt::Debug for MemFsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemFsPath")
            .field("location", &self.location)
            .finish()
    }
}
