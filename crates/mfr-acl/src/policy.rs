use mfr_types::Acl;
use mfr_vfs::VfsPath;

use crate::cluster::ClusterSpec;
use crate::error::AclResult;
use crate::strategies::ObjectStoreAclStrategy;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Resolves the default ACL for a path under cluster policy.
pub trait AclPolicy: Send + Sync {
    /// `Ok(None)` means the backend default applies.
    fn resolve(&self, path: &dyn VfsPath, cluster: &ClusterSpec) -> AclResult<Option<Acl>>;
}

/// One backend-specific opinion about default ACLs.
///
/// A strategy returns `Ok(None)` for paths it does not handle so that later
/// strategies get a chance. The trait is object-safe and `Send + Sync` so
/// strategies can be stored in a `Vec<Box<dyn AclStrategy>>`.
pub trait AclStrategy: Send + Sync {
    /// Human-readable name (e.g. "object-store").
    fn name(&self) -> &str;

    fn acl(&self, path: &dyn VfsPath, cluster: &ClusterSpec) -> AclResult<Option<Acl>>;
}

// ---------------------------------------------------------------------------
// ClusterAclPolicy
// ---------------------------------------------------------------------------

/// An ordered chain of strategies; the first `Some` wins.
pub struct ClusterAclPolicy {
    strategies: Vec<Box<dyn AclStrategy>>,
}

impl ClusterAclPolicy {
    /// A policy with no strategies: every path gets the backend default.
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// A policy with the built-in strategies.
    pub fn with_default_strategies() -> Self {
        let mut policy = Self::new();
        policy.add_strategy(Box::new(ObjectStoreAclStrategy));
        policy
    }

    /// Append a strategy to the end of the chain.
    pub fn add_strategy(&mut self, strategy: Box<dyn AclStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn strategy_count(&self) -> usize {
        self.strategies.len()
    }
}

impl Default for ClusterAclPolicy {
    fn default() -> Self {
        Self::with_default_strategies()
    }
}

impl AclPolicy for ClusterAclPolicy {
    fn resolve(&self, path: &dyn VfsPath, cluster: &ClusterSpec) -> AclResult<Option<Acl>> {
        for strategy in &self.strategies {
            if let Some(acl) = strategy.acl(path, cluster)? {
                tracing::debug!(
                    strategy = strategy.name(),
                    path = %path,
                    %acl,
                    "cluster ACL resolved"
                );
                return Ok(Some(acl));
            }
        }
        tracing::debug!(path = %path, "no ACL strategy applied; using backend default");
        Ok(None)
    }
}

impl std::fmt::Debug for ClusterAclPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("ClusterAclPolicy")
            .field("strategies", &names)
            .finish()
    }
}
