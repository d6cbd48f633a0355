use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::error::{VfsError, VfsResult};
use crate::local::LocalPath;
use crate::memfs::MemFsContext;
use crate::object_store::ObjectBucket;
use crate::traits::VfsPath;

/// Registry of backends used to turn path strings into [`VfsPath`] handles.
///
/// Recognised forms:
///
/// | Form | Backend |
/// |---|---|
/// | `memfs://<location>` | the context's shared [`MemFsContext`] |
/// | `s3://<bucket>/<key>` | a bucket registered with [`VfsContext::register_bucket`] |
/// | `file://<path>` or `/<path>` | [`LocalPath`] |
pub struct VfsContext {
    memfs: Arc<MemFsContext>,
    buckets: RwLock<HashMap<String, Arc<ObjectBucket>>>,
}

impl VfsContext {
    pub fn new() -> Self {
        Self {
            memfs: MemFsContext::new(),
            buckets: RwLock::new(HashMap::new()),
        }
    }

    /// The in-memory context that `memfs://` paths resolve into.
    pub fn memfs(&self) -> &Arc<MemFsContext> {
        &self.memfs
    }

    /// Open the bucket at `root` and make it addressable as `s3://<name>/`.
    pub fn register_bucket(
        &self,
        name: &str,
        root: impl AsRef<Path>,
    ) -> VfsResult<Arc<ObjectBucket>> {
        if name.is_empty() || name.contains('/') {
            return Err(VfsError::MalformedPath {
                path: format!("s3://{name}"),
                reason: "bucket name must be non-empty and contain no '/'".into(),
            });
        }
        let bucket = ObjectBucket::open(name, root)?;
        self.buckets
            .write()
            .map_err(|e| VfsError::LockPoisoned(e.to_string()))?
            .insert(name.to_string(), Arc::clone(&bucket));
        tracing::debug!(bucket = name, root = %bucket.root().display(), "registered bucket");
        Ok(bucket)
    }

    pub fn bucket(&self, name: &str) -> VfsResult<Option<Arc<ObjectBucket>>> {
        let buckets = self
            .buckets
            .read()
            .map_err(|e| VfsError::LockPoisoned(e.to_string()))?;
        Ok(buckets.get(name).cloned())
    }

    /// Parse a path string into a handle on the matching backend.
    pub fn build_path(&self, raw: &str) -> VfsResult<Arc<dyn VfsPath>> {
        if let Some(location) = raw.strip_prefix("memfs://") {
            return Ok(Arc::new(self.memfs.path(location)));
        }

        if let Some(rest) = raw.strip_prefix("s3://") {
            let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
            if bucket.is_empty() {
                return Err(VfsError::MalformedPath {
                    path: raw.to_string(),
                    reason: "missing bucket name".into(),
                });
            }
            let bucket = self
                .bucket(bucket)?
                .ok_or_else(|| VfsError::UnknownBucket(bucket.to_string()))?;
            return Ok(Arc::new(bucket.path(key)));
        }

        if let Some(path) = raw.strip_prefix("file://") {
            if path.is_empty() {
                return Err(VfsError::MalformedPath {
                    path: raw.to_string(),
                    reason: "missing file path".into(),
                });
            }
            return Ok(Arc::new(LocalPath::new(path)));
        }

        if raw.starts_with('/') {
            return Ok(Arc::new(LocalPath::new(raw)));
        }

        match raw.split_once("://") {
            Some((scheme, _)) => Err(VfsError::UnsupportedScheme(scheme.to_string())),
            None => Err(VfsError::MalformedPath {
                path: raw.to_string(),
                reason: "relative paths are not supported".into(),
            }),
        }
    }
}

impl Default for VfsContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VfsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buckets: Vec<String> = self
            .buckets
            .read()
            .map(|b| b.keys().cloned().collect())
            .unwrap_or_default();
        f.debug_struct("VfsContext")
            .field("memfs", &self.memfs)
            .field("buckets", &buckets)
            .finish()
    }
}
