use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Policy controlling whether convergence may create or modify a resource.
///
/// The reconciler never interprets this value; it is copied through to the
/// observed state so it never shows up as a difference. The task executor
/// decides what each mode means.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Create or update the resource to match the desired state.
    #[default]
    Sync,
    /// Skip the resource entirely.
    Ignore,
    /// Like `Sync`, but tolerate permission failures while probing.
    WarnIfInsufficientAccess,
    /// The resource must already exist and match; never write.
    ExistsAndValidates,
    /// The resource must already exist; differences are only reported.
    ExistsAndWarnIfChanges,
}

impl Lifecycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sync => "Sync",
            Self::Ignore => "Ignore",
            Self::WarnIfInsufficientAccess => "WarnIfInsufficientAccess",
            Self::ExistsAndValidates => "ExistsAndValidates",
            Self::ExistsAndWarnIfChanges => "ExistsAndWarnIfChanges",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lifecycle {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sync" => Ok(Self::Sync),
            "Ignore" => Ok(Self::Ignore),
            "WarnIfInsufficientAccess" => Ok(Self::WarnIfInsufficientAccess),
            "ExistsAndValidates" => Ok(Self::ExistsAndValidates),
            "ExistsAndWarnIfChanges" => Ok(Self::ExistsAndWarnIfChanges),
            other => Err(TypeError::UnknownLifecycle(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sync() {
        assert_eq!(Lifecycle::default(), Lifecycle::Sync);
    }

    #[test]
    fn parse_display_agree() {
        for lc in [
            Lifecycle::Sync,
            Lifecycle::Ignore,
            Lifecycle::WarnIfInsufficientAccess,
            Lifecycle::ExistsAndValidates,
            Lifecycle::ExistsAndWarnIfChanges,
        ] {
            assert_eq!(lc.to_string().parse::<Lifecycle>().unwrap(), lc);
        }
    }

    #[test]
    fn parse_unknown() {
        assert!(matches!(
            "Delete".parse::<Lifecycle>(),
            Err(TypeError::UnknownLifecycle(_))
        ));
    }
}
