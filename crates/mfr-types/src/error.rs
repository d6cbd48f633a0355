use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown canned ACL: {0}")]
    UnknownCannedAcl(String),

    #[error("unknown lifecycle: {0}")]
    UnknownLifecycle(String),
}
