use std::path::PathBuf;

/// Errors from IaC declaration output.
#[derive(Debug, thiserror::Error)]
pub enum IacError {
    /// A resource with this type and name was already declared.
    #[error("duplicate resource {resource_type}.{name}")]
    DuplicateResource { resource_type: String, name: String },

    /// Two distinct names sanitize to the same Terraform name.
    #[error("resource names {existing:?} and {name:?} both sanitize to {resource_type}.{sanitized}")]
    NameCollision {
        resource_type: String,
        existing: String,
        name: String,
        sanitized: String,
    },

    /// A resource or asset name was empty after sanitization.
    #[error("invalid resource name: {0:?}")]
    InvalidName(String),

    /// Reading a content stream into an asset failed.
    #[error("error reading asset {asset}: {source}")]
    AssetRead {
        asset: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing output to disk failed.
    #[error("error writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A resource body could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for IaC operations.
pub type IacResult<T> = Result<T, IacError>;
