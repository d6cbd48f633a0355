//! Desired and observed state for a single managed file.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::lifecycle::Lifecycle;
use crate::resource::{content_fingerprint, Resource};

// ---------------------------------------------------------------------------
// PublicAcl
// ---------------------------------------------------------------------------

/// Requested (or observed) public-readability of an object.
///
/// `Unset` is distinct from `Private`: an unset request defers to the
/// cluster ACL policy, while `Private` is an explicit answer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicAcl {
    #[default]
    Unset,
    Public,
    Private,
}

impl PublicAcl {
    pub fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }

    pub fn is_set(self) -> bool {
        !matches!(self, Self::Unset)
    }

    pub fn from_flag(public: bool) -> Self {
        if public {
            Self::Public
        } else {
            Self::Private
        }
    }

    /// Replace `Unset` with `Private`, leaving explicit values alone.
    pub fn or_private(self) -> Self {
        match self {
            Self::Unset => Self::Private,
            other => other,
        }
    }
}

impl From<Option<bool>> for PublicAcl {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Unset, Self::from_flag)
    }
}

impl fmt::Display for PublicAcl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unset => "unset",
            Self::Public => "public",
            Self::Private => "private",
        })
    }
}

// ---------------------------------------------------------------------------
// ManagedFileSpec
// ---------------------------------------------------------------------------

/// Desired state of a managed file, supplied by the task executor.
///
/// A spec is immutable input for one reconciliation pass. Optional string
/// fields treat `Some("")` the same as `None`.
#[derive(Clone, Debug, Default)]
pub struct ManagedFileSpec {
    /// Stable identifier; immutable once the object exists.
    pub name: Option<String>,
    pub lifecycle: Lifecycle,
    /// Explicit storage root. When absent the cluster config base is used.
    pub base: Option<String>,
    /// Object path relative to the resolved root.
    pub location: Option<String>,
    pub contents: Option<Arc<dyn Resource>>,
    /// Whether the object itself (not its bucket) grants world-read.
    pub public_acl: PublicAcl,
}

impl ManagedFileSpec {
    /// A spec with a name, location and contents; everything else defaulted.
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        contents: impl Resource + 'static,
    ) -> Self {
        Self {
            name: Some(name.into()),
            location: Some(location.into()),
            contents: Some(Arc::new(contents)),
            ..Default::default()
        }
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_public_acl(mut self, public_acl: PublicAcl) -> Self {
        self.public_acl = public_acl;
        self
    }

    pub fn with_lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    pub fn name_str(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn base_str(&self) -> &str {
        self.base.as_deref().unwrap_or_default()
    }

    pub fn location_str(&self) -> &str {
        self.location.as_deref().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// ObservedState
// ---------------------------------------------------------------------------

/// Actual state of a managed file, rebuilt by every probe.
///
/// `public_acl` is only populated by backends that can answer a
/// public-readability query; it stays `Unset` otherwise.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ObservedState {
    pub name: Option<String>,
    pub lifecycle: Lifecycle,
    pub base: Option<String>,
    pub location: Option<String>,
    pub contents: Vec<u8>,
    pub public_acl: PublicAcl,
}

impl fmt::Debug for ObservedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservedState")
            .field("name", &self.name)
            .field("lifecycle", &self.lifecycle)
            .field("base", &self.base)
            .field("location", &self.location)
            .field("contents_len", &self.contents.len())
            .field("contents_fingerprint", &content_fingerprint(&self.contents))
            .field("public_acl", &self.public_acl)
            .finish()
    }
}
