use mfr_types::CannedAcl;
use serde::{Deserialize, Serialize};

/// The slice of cluster configuration ACL policy and the reconciler read.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterSpec {
    /// Cluster name, used in logs only.
    pub name: String,
    /// Root under which managed files live when they set no explicit base.
    pub config_base: String,
    /// Canned ACL for object-store writes that are not public.
    /// `None` leaves the bucket default in place.
    pub default_object_acl: Option<CannedAcl>,
    /// Buckets owned by another account. Objects written there are given
    /// `bucket-owner-full-control` so the bucket owner can still read them.
    pub foreign_owned_buckets: Vec<String>,
}

impl ClusterSpec {
    pub fn new(name: impl Into<String>, config_base: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config_base: config_base.into(),
            ..Default::default()
        }
    }

    pub fn is_foreign_owned(&self, bucket: &str) -> bool {
        self.foreign_owned_buckets.iter().any(|b| b == bucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ClusterSpec::default();
        assert!(c.name.is_empty());
        assert!(c.default_object_acl.is_none());
        assert!(!c.is_foreign_owned("state"));
    }

    #[test]
    fn deserializes_from_partial_toml() {
        let c: ClusterSpec = toml::from_str(
            r#"
            name = "prod"
            config_base = "s3://state/prod"
            default_object_acl = "bucket-owner-full-control"
            "#,
        )
        .unwrap();
        assert_eq!(c.name, "prod");
        assert_eq!(c.default_object_acl, Some(CannedAcl::BucketOwnerFullControl));
        assert!(c.foreign_owned_buckets.is_empty());
    }
}
