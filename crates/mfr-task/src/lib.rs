//! Declarative reconciliation of a single managed storage object.
//!
//! A managed file is a named blob of configuration stored at a location
//! under a cluster's state-store root. Each pass compares what the caller
//! wants ([`ManagedFileSpec`](mfr_types::ManagedFileSpec)) with what storage
//! holds ([`ObservedState`](mfr_types::ObservedState)) and converges them,
//! either by writing directly or by declaring the object in Terraform
//! output for a later provisioning run.
//!
//! # Phases
//!
//! ```text
//! find -> normalize -> changes -> check_changes -> render | render_terraform
//! ```
//!
//! [`run_delta`] and [`run_delta_terraform`] drive one resource through all
//! phases and honour its lifecycle.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use mfr_acl::ClusterSpec;
//! use mfr_task::{run_delta, CloudupContext, DeltaOutcome};
//! use mfr_types::{ManagedFileSpec, StringResource};
//! use mfr_vfs::VfsContext;
//!
//! let ctx = CloudupContext::new(
//!     Arc::new(VfsContext::new()),
//!     ClusterSpec::new("dev", "memfs://clusters/dev"),
//! )
//! .unwrap();
//! let spec = ManagedFileSpec::new("foo", "config/foo.yaml", StringResource("a: 1".into()));
//!
//! assert!(run_delta(&spec, &ctx).unwrap().is_applied());
//! assert_eq!(run_delta(&spec, &ctx).unwrap(), DeltaOutcome::Unchanged);
//! ```

pub mod acl;
pub mod base;
pub mod changes;
pub mod context;
pub mod delta;
pub mod error;
mod managed_file;
pub mod task;

pub use acl::resolve_acl;
pub use base::base_path;
pub use changes::ManagedFileChanges;
pub use context::{CloudupContext, FeatureFlags};
pub use delta::{run_delta, run_delta_terraform, DeltaOutcome};
pub use error::{ErrorKind, TaskError, TaskResult};
pub use task::{ChangeSet, Task};

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use mfr_acl::ClusterSpec;
    use mfr_vfs::VfsContext;
    use tempfile::TempDir;

    use crate::context::CloudupContext;

    /// A context whose config base is `memfs://cluster`.
    pub fn memfs_context() -> CloudupContext {
        CloudupContext::new(
            Arc::new(VfsContext::new()),
            ClusterSpec::new("test", "memfs://cluster"),
        )
        .unwrap()
    }

    /// A context backed by a temp-dir bucket `state`, config base `s3://state/cluster`.
    pub fn bucket_context() -> (TempDir, CloudupContext) {
        bucket_context_with(|_| {})
    }

    pub fn bucket_context_with(
        configure: impl FnOnce(&mut ClusterSpec),
    ) -> (TempDir, CloudupContext) {
        let dir = tempfile::tempdir().unwrap();
        let vfs = VfsContext::new();
        vfs.register_bucket("state", dir.path()).unwrap();

        let mut cluster = ClusterSpec::new("test", "s3://state/cluster");
        configure(&mut cluster);
        let ctx = CloudupContext::new(Arc::new(vfs), cluster).unwrap();
        (dir, ctx)
    }
}
