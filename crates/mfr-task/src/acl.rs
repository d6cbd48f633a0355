use mfr_types::{Acl, PublicAcl};
use mfr_vfs::VfsPath;

use crate::context::CloudupContext;
use crate::error::{TaskError, TaskResult};

/// Decide the ACL a managed file is written (or declared) with.
///
/// A public request is honoured only by backends that can carry it: paths
/// with per-object ACLs always, and cluster-readable-flagged paths only when
/// the flag is set. Both yield the same `public-read` descriptor. Anything
/// else defers to the cluster ACL policy unmodified.
pub fn resolve_acl(
    public_acl: PublicAcl,
    path: &dyn VfsPath,
    ctx: &CloudupContext,
) -> TaskResult<Option<Acl>> {
    if !public_acl.is_public() {
        return Ok(ctx.acl_policy().resolve(path, ctx.cluster())?);
    }

    if path.as_object_acl().is_some() {
        return Ok(Some(Acl::public_read()));
    }

    if let Some(flag) = path.as_cluster_readable() {
        if !flag.is_cluster_readable() {
            return Err(TaskError::Policy(format!(
                "the {:?} path is intended for use in tests",
                path.path()
            )));
        }
        return Ok(Some(Acl::public_read()));
    }

    Err(TaskError::Policy(format!(
        "the {:?} path does not support public ACL",
        path.path()
    )))
}
