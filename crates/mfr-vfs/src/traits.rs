use std::fmt;
use std::io::Read;
use std::sync::Arc;

use mfr_iac::TerraformWriter;
use mfr_types::Acl;

use crate::error::VfsResult;

/// A handle to one location in a storage backend.
///
/// All implementations must satisfy these invariants:
/// - `read_file` returns `Ok(None)` when nothing is stored at the path.
/// - `write_file` replaces the whole object and applies `acl` (or the
///   backend default when `acl` is `None`) in the same call.
/// - Handles are cheap to clone via `Arc` and safe to share across threads.
///
/// Optional behaviour is discovered through the `as_*` accessors; the default
/// implementations report the capability as absent.
pub trait VfsPath: Send + Sync + fmt::Debug + fmt::Display {
    /// Canonical string form, including the scheme.
    fn path(&self) -> String;

    /// A new handle for `relative` beneath this one.
    fn join(&self, relative: &str) -> Arc<dyn VfsPath>;

    /// Read the full object. `Ok(None)` if it does not exist.
    fn read_file(&self) -> VfsResult<Option<Vec<u8>>>;

    /// Write the full object with the given ACL.
    fn write_file(&self, data: &[u8], acl: Option<&Acl>) -> VfsResult<()>;

    /// Remove the object. Returns `true` if it existed.
    fn remove(&self) -> VfsResult<bool>;

    fn as_public_readable(&self) -> Option<&dyn PublicReadable> {
        None
    }

    fn as_cluster_readable(&self) -> Option<&dyn ClusterReadable> {
        None
    }

    fn as_object_acl(&self) -> Option<&dyn ObjectAclPath> {
        None
    }

    fn as_terraform(&self) -> Option<&dyn TerraformPath> {
        None
    }
}

/// Backends that can answer whether an object is world-readable.
pub trait PublicReadable {
    fn is_public(&self) -> VfsResult<bool>;
}

/// Backends carrying a cluster-readable safety flag.
///
/// Only a path marked cluster-readable may be given public semantics.
pub trait ClusterReadable {
    fn is_cluster_readable(&self) -> bool;
}

/// Backends that store a per-object ACL alongside the data.
pub trait ObjectAclPath {
    /// The ACL currently stored for the object, if any.
    fn object_acl(&self) -> VfsResult<Option<Acl>>;
}

/// Backends that can be expressed as a Terraform declaration.
pub trait TerraformPath {
    /// Declare this object in `writer` instead of writing it.
    fn render_terraform(
        &self,
        writer: &mut TerraformWriter,
        name: &str,
        data: &mut dyn Read,
        acl: Option<&Acl>,
    ) -> VfsResult<()>;
}
