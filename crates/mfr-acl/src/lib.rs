//! Cluster-wide ACL policy for the managed file reconciler.
//!
//! When a managed file does not ask to be public, the ACL it is written with
//! comes from cluster policy rather than from the file itself. The policy is
//! an ordered list of strategies; the first strategy that has an opinion
//! about a path decides its ACL, and `None` from every strategy means "use
//! the backend default".
//!
//! # Quick Start
//!
//! ```rust
//! use mfr_acl::{AclPolicy, ClusterAclPolicy, ClusterSpec};
//! use mfr_vfs::{MemFsContext, VfsPath};
//!
//! let policy = ClusterAclPolicy::with_default_strategies();
//! let path = MemFsContext::new().path("cluster/config");
//! let acl = policy.resolve(&path, &ClusterSpec::default()).unwrap();
//! assert!(acl.is_none());
//! ```

pub mod cluster;
pub mod error;
pub mod policy;
pub mod strategies;

pub use cluster::ClusterSpec;
pub use error::{AclError, AclResult};
pub use policy::{AclPolicy, AclStrategy, ClusterAclPolicy};
pub use strategies::ObjectStoreAclStrategy;
