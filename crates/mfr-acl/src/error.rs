use mfr_vfs::VfsError;

/// Errors that can occur while resolving a cluster ACL.
#[derive(Debug, thiserror::Error)]
pub enum AclError {
    /// A strategy could not decide for a path it claims.
    #[error("ACL strategy '{strategy}' failed: {message}")]
    Strategy { strategy: String, message: String },

    /// Inspecting the path failed.
    #[error(transparent)]
    Vfs(#[from] VfsError),
}

impl AclError {
    /// Create a strategy error with a name and message.
    pub fn strategy(strategy: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Strategy {
            strategy: strategy.into(),
            message: message.into(),
        }
    }
}

/// Result alias for ACL resolution.
pub type AclResult<T> = Result<T, AclError>;
