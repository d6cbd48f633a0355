use mfr_iac::IacError;

/// Errors from storage path operations.
#[derive(Debug, thiserror::Error)]
pub enum VfsError {
    /// The path string uses a scheme no backend understands.
    #[error("unsupported path scheme: {0}")]
    UnsupportedScheme(String),

    /// The path string or key is structurally invalid.
    #[error("malformed path {path:?}: {reason}")]
    MalformedPath { path: String, reason: String },

    /// An `s3://` path names a bucket that was never registered.
    #[error("unknown bucket: {0}")]
    UnknownBucket(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored ACL metadata could not be decoded.
    #[error("corrupt ACL metadata for {path}: {reason}")]
    CorruptAcl { path: String, reason: String },

    /// The ACL cannot be expressed by this backend.
    #[error("ACL {acl} is not supported for {path}")]
    UnsupportedAcl { path: String, acl: String },

    /// A backend lock was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    /// Emitting an IaC declaration failed.
    #[error("terraform rendering failed: {0}")]
    Iac(#[from] IacError),
}

impl VfsError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for storage path operations.
pub type VfsResult<T> = Result<T, VfsError>;
