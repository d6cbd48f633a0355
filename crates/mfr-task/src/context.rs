use std::fmt;
use std::sync::Arc;

use mfr_acl::{AclPolicy, ClusterAclPolicy, ClusterSpec};
use mfr_types::CannedAcl;
use mfr_vfs::{VfsContext, VfsPath};
use serde::{Deserialize, Serialize};

use crate::error::{TaskError, TaskResult};

/// Feature toggles consulted during rendering.
///
/// Passed explicitly through [`CloudupContext`]; nothing reads process-wide
/// state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Emit managed files as Terraform declarations instead of writing them.
    pub terraform_managed_files: bool,
}

/// Everything a managed file needs from its surroundings for one pass.
pub struct CloudupContext {
    vfs: Arc<VfsContext>,
    cluster: ClusterSpec,
    cluster_config_base: Arc<dyn VfsPath>,
    acl_policy: Arc<dyn AclPolicy>,
    features: FeatureFlags,
}

impl CloudupContext {
    /// Build a context, resolving the cluster's config base up front.
    ///
    /// Uses the default [`ClusterAclPolicy`] and all features off. A public
    /// `default_object_acl` is rejected: private objects must read back as
    /// private.
    pub fn new(vfs: Arc<VfsContext>, cluster: ClusterSpec) -> TaskResult<Self> {
        if cluster.config_base.is_empty() {
            return Err(TaskError::Config("cluster config_base must be set".into()));
        }
        if let Some(acl) = cluster.default_object_acl.filter(CannedAcl::is_public) {
            return Err(TaskError::Config(format!(
                "cluster default_object_acl {acl:?} grants public read; \
                 request public access per managed file instead",
                acl = acl.as_str()
            )));
        }
        let cluster_config_base = vfs.build_path(&cluster.config_base).map_err(|e| {
            TaskError::Config(format!(
                "error parsing cluster config_base {:?}: {e}",
                cluster.config_base
            ))
        })?;
        Ok(Self {
            vfs,
            cluster,
            cluster_config_base,
            acl_policy: Arc::new(ClusterAclPolicy::with_default_strategies()),
            features: FeatureFlags::default(),
        })
    }

    pub fn with_acl_policy(mut self, policy: Arc<dyn AclPolicy>) -> Self {
        self.acl_policy = policy;
        self
    }

    pub fn with_features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    pub fn vfs(&self) -> &VfsContext {
        &self.vfs
    }

    pub fn cluster(&self) -> &ClusterSpec {
        &self.cluster
    }

    /// Default root for managed files that set no explicit base.
    pub fn cluster_config_base(&self) -> &Arc<dyn VfsPath> {
        &self.cluster_config_base
    }

    pub fn acl_policy(&self) -> &dyn AclPolicy {
        self.acl_policy.as_ref()
    }

    pub fn features(&self) -> FeatureFlags {
        self.features
    }
}

impl fmt::Debug for CloudupContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudupContext")
            .field("cluster", &self.cluster.name)
            .field("config_base", &self.cluster_config_base.path())
            .field("features", &self.features)
            .finish()
    }
}
