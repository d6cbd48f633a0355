use mfr_types::{Acl, CannedAcl};
use mfr_vfs::VfsPath;

use crate::cluster::ClusterSpec;
use crate::error::{AclError, AclResult};
use crate::policy::AclStrategy;

/// Default ACLs for paths that carry per-object ACLs.
///
/// Foreign-owned buckets always get `bucket-owner-full-control`; otherwise
/// the cluster's `default_object_acl`, if any.
pub struct ObjectStoreAclStrategy;

impl AclStrategy for ObjectStoreAclStrategy {
    fn name(&self) -> &str {
        "object-store"
    }

    fn acl(&self, path: &dyn VfsPath, cluster: &ClusterSpec) -> AclResult<Option<Acl>> {
        if path.as_object_acl().is_none() {
            return Ok(None);
        }

        let raw = path.path();
        let bucket = bucket_of(&raw)
            .ok_or_else(|| AclError::strategy(self.name(), format!("no bucket in {raw:?}")))?;

        if cluster.is_foreign_owned(bucket) {
            return Ok(Some(Acl::Canned(CannedAcl::BucketOwnerFullControl)));
        }
        Ok(cluster.default_object_acl.map(Acl::Canned))
    }
}

/// Bucket component of a `<scheme>://<bucket>/<key>` path.
fn bucket_of(path: &str) -> Option<&str> {
    let (_, rest) = path.split_once("://")?;
    let bucket = rest.split('/').next()?;
    (!bucket.is_empty()).then_some(bucket)
}
