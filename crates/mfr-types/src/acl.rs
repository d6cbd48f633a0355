//! Access-control descriptors applied to stored objects.
//!
//! An [`Acl`] is what the reconciler hands to a backend on write. Backends
//! that understand per-object ACLs persist it; others ignore it. A missing
//! ACL (`Option<Acl>::None`) always means "use the backend default".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Resolved permission policy for a single object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Acl {
    /// A named, backend-defined grant set (e.g. `public-read`).
    Canned(CannedAcl),
    /// An explicit list of grants.
    Grants(Vec<Grant>),
}

impl Acl {
    /// The descriptor used for every public object, whatever the backend.
    pub fn public_read() -> Self {
        Self::Canned(CannedAcl::PublicRead)
    }

    /// Returns `true` if anonymous readers may fetch the object.
    pub fn grants_public_read(&self) -> bool {
        match self {
            Self::Canned(canned) => canned.is_public(),
            Self::Grants(grants) => grants.iter().any(|g| {
                g.grantee == Grantee::AllUsers
                    && matches!(g.permission, Permission::Read | Permission::FullControl)
            }),
        }
    }

    /// The canned ACL name, if this is a canned descriptor.
    pub fn canned(&self) -> Option<CannedAcl> {
        match self {
            Self::Canned(canned) => Some(*canned),
            Self::Grants(_) => None,
        }
    }
}

impl fmt::Display for Acl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Canned(canned) => write!(f, "{canned}"),
            Self::Grants(grants) => write!(f, "{} grant(s)", grants.len()),
        }
    }
}

/// Canned ACL names understood by object-store backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CannedAcl {
    Private,
    PublicRead,
    PublicReadWrite,
    AuthenticatedRead,
    BucketOwnerRead,
    BucketOwnerFullControl,
}

impl CannedAcl {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::PublicRead => "public-read",
            Self::PublicReadWrite => "public-read-write",
            Self::AuthenticatedRead => "authenticated-read",
            Self::BucketOwnerRead => "bucket-owner-read",
            Self::BucketOwnerFullControl => "bucket-owner-full-control",
        }
    }

    /// Returns `true` for canned ACLs that grant anonymous read.
    pub fn is_public(&self) -> bool {
        matches!(self, Self::PublicRead | Self::PublicReadWrite)
    }
}

impl fmt::Display for CannedAcl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CannedAcl {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Self::Private),
            "public-read" => Ok(Self::PublicRead),
            "public-read-write" => Ok(Self::PublicReadWrite),
            "authenticated-read" => Ok(Self::AuthenticatedRead),
            "bucket-owner-read" => Ok(Self::BucketOwnerRead),
            "bucket-owner-full-control" => Ok(Self::BucketOwnerFullControl),
            other => Err(TypeError::UnknownCannedAcl(other.to_string())),
        }
    }
}

/// A single explicit grant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub grantee: Grantee,
    pub permission: Permission,
}

/// Who a grant applies to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grantee {
    AllUsers,
    AuthenticatedUsers,
    CanonicalUser(String),
}

/// What a grant allows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Permission {
    Read,
    Write,
    FullControl,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_read_is_public() {
        assert!(Acl::public_read().grants_public_read());
        assert!(Acl::Canned(CannedAcl::PublicReadWrite).grants_public_read());
        assert!(!Acl::Canned(CannedAcl::BucketOwnerFullControl).grants_public_read());
    }

    #[test]
    fn grants_all_users_read_is_public() {
        let acl = Acl::Grants(vec![Grant {
            grantee: Grantee::AllUsers,
            permission: Permission::Read,
        }]);
        assert!(acl.grants_public_read());

        let owner_only = Acl::Grants(vec![Grant {
            grantee: Grantee::CanonicalUser("owner".into()),
            permission: Permission::FullControl,
        }]);
        assert!(!owner_only.grants_public_read());
    }

    #[test]
    fn canned_parse_and_display() {
        let parsed: CannedAcl = "bucket-owner-full-control".parse().unwrap();
        assert_eq!(parsed, CannedAcl::BucketOwnerFullControl);
        assert_eq!(parsed.to_string(), "bucket-owner-full-control");
    }

    #[test]
    fn canned_parse_rejects_unknown() {
        let err = "world-writable".parse::<CannedAcl>().unwrap_err();
        assert_eq!(err, TypeError::UnknownCannedAcl("world-writable".into()));
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&Acl::public_read()).unwrap();
        assert_eq!(json, r#"{"Canned":"public-read"}"#);
        let back: Acl = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Acl::public_read());
    }
}
