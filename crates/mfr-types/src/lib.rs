//! Foundation types for the managed file reconciler (MFR).
//!
//! This crate provides the desired-state and observed-state records for a
//! single managed storage object, plus the small vocabulary every other MFR
//! crate shares. Every other MFR crate depends on `mfr-types`.
//!
//! # Key Types
//!
//! - [`ManagedFileSpec`] -- Desired state supplied by the caller for one pass
//! - [`ObservedState`] -- Actual state read back from the storage backend
//! - [`PublicAcl`] -- Tri-state public-readability request (unset / public / private)
//! - [`Lifecycle`] -- Pass-through policy owned by the task executor
//! - [`Acl`] -- Resolved access-control descriptor applied to a stored object
//! - [`Resource`] -- Opaque byte producer (literal bytes, strings, files)

pub mod acl;
pub mod error;
pub mod lifecycle;
pub mod managed_file;
pub mod resource;

pub use acl::{Acl, CannedAcl, Grant, Grantee, Permission};
pub use error::TypeError;
pub use lifecycle::Lifecycle;
pub use managed_file::{ManagedFileSpec, ObservedState, PublicAcl};
pub use resource::{content_fingerprint, BytesResource, FileResource, Resource, StringResource};
