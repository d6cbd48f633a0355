use std::sync::Arc;

use mfr_types::ManagedFileSpec;
use mfr_vfs::VfsPath;

use crate::context::CloudupContext;
use crate::error::{TaskError, TaskResult};

/// The storage root a managed file lives under.
///
/// A non-empty explicit base is parsed through the context's path registry;
/// otherwise the cluster config base is used. No I/O.
pub fn base_path(spec: &ManagedFileSpec, ctx: &CloudupContext) -> TaskResult<Arc<dyn VfsPath>> {
    let base = spec.base_str();
    if base.is_empty() {
        return Ok(Arc::clone(ctx.cluster_config_base()));
    }
    ctx.vfs()
        .build_path(base)
        .map_err(|source| TaskError::InvalidBase {
            base: base.to_string(),
            source,
        })
}
