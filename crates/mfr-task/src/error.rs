use mfr_acl::AclError;
use mfr_types::Lifecycle;
use mfr_vfs::VfsError;

/// Broad classification of a [`TaskError`], for callers deciding how to report it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed base path or a backend lacking a required capability.
    Configuration,
    /// Missing required field or an attempt to change an immutable one.
    Validation,
    /// A public ACL was requested where policy forbids it.
    Policy,
    /// A read, write or stream against storage or content failed.
    Io,
}

/// Errors from reconciling a managed file.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Context or path configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The explicit base could not be parsed into a storage root.
    #[error("error parsing ManagedFile Base {base:?}: {source}")]
    InvalidBase {
        base: String,
        #[source]
        source: VfsError,
    },

    /// A required field is missing or empty.
    #[error("required field missing: {0}")]
    RequiredField(&'static str),

    /// The change would modify a field that is immutable once created.
    #[error("cannot change field: {0}")]
    CannotChangeField(&'static str),

    /// The requested ACL is not allowed for this path.
    #[error("policy violation: {0}")]
    Policy(String),

    /// The lifecycle forbids what convergence would need to do.
    #[error("lifecycle set to {lifecycle} for {name:?}, but {reason}")]
    Lifecycle {
        name: String,
        lifecycle: Lifecycle,
        reason: String,
    },

    /// Producing the desired content failed.
    #[error("error reading contents of ManagedFile: {0}")]
    Content(#[source] std::io::Error),

    /// Reading the current object failed for a reason other than absence.
    #[error("error reading ManagedFile {location:?}: {source}")]
    Read {
        location: String,
        #[source]
        source: VfsError,
    },

    /// Writing the object failed.
    #[error("error creating ManagedFile {location:?}: {source}")]
    Write {
        location: String,
        #[source]
        source: VfsError,
    },

    /// Emitting the IaC declaration failed.
    #[error("error declaring ManagedFile {location:?}: {source}")]
    Declare {
        location: String,
        #[source]
        source: VfsError,
    },

    /// Cluster ACL policy resolution failed.
    #[error(transparent)]
    Acl(#[from] AclError),
}

impl TaskError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) | Self::InvalidBase { .. } => ErrorKind::Configuration,
            Self::RequiredField(_) | Self::CannotChangeField(_) | Self::Lifecycle { .. } => {
                ErrorKind::Validation
            }
            Self::Policy(_) => ErrorKind::Policy,
            Self::Content(_)
            | Self::Read { .. }
            | Self::Write { .. }
            | Self::Declare { .. }
            | Self::Acl(_) => ErrorKind::Io,
        }
    }
}

/// Result alias for reconciliation operations.
pub type TaskResult<T> = Result<T, TaskError>;
