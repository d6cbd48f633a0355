//! Storage path handles for the managed file reconciler.
//!
//! A [`VfsPath`] is an opaque handle to one location in some storage backend.
//! Every backend supports the core operations (join, read, write, remove);
//! optional behaviour is exposed through capability traits that callers
//! discover at runtime instead of matching on concrete backend types.
//!
//! # Backends
//!
//! - [`MemFsPath`] -- in-memory store for tests; public ACLs require the
//!   context to be marked cluster-readable
//! - [`ObjectStorePath`] -- durable, directory-backed object store with
//!   per-object ACLs, addressed as `s3://bucket/key`
//! - [`LocalPath`] -- plain filesystem, no ACL capabilities
//!
//! # Capabilities
//!
//! | Capability | MemFs | ObjectStore | Local |
//! |---|---|---|---|
//! | [`PublicReadable`] | yes | yes | no |
//! | [`ClusterReadable`] | yes | no | no |
//! | [`ObjectAclPath`] | no | yes | no |
//! | [`TerraformPath`] | yes | yes | no |
//!
//! # Design Rules
//!
//! 1. A missing object is `Ok(None)` from [`VfsPath::read_file`], never an error.
//! 2. Writes replace the whole object; there are no partial writes.
//! 3. All I/O errors are propagated with the path that failed.

pub mod context;
pub mod error;
pub mod local;
pub mod memfs;
pub mod object_store;
mod terraform;
pub mod traits;

pub use context::VfsContext;
pub use error::{VfsError, VfsResult};
pub use local::LocalPath;
pub use memfs::{MemFsContext, MemFsPath};
pub use object_store::{ObjectBucket, ObjectStorePath};
pub use traits::{ClusterReadable, ObjectAclPath, PublicReadable, TerraformPath, VfsPath};

/// Join a relative path onto a base, collapsing the separator between them.
pub(crate) fn join_segments(base: &str, relative: &str) -> String {
    let base = base.trim_end_matches('/');
    let relative = relative.trim_start_matches('/');
    match (base.is_empty(), relative.is_empty()) {
        (true, _) => relative.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{base}/{relative}"),
    }
}
