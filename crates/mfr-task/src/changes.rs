//! Field-level diff between an observed managed file and its desired spec.

use mfr_types::{ManagedFileSpec, ObservedState, PublicAcl};

use crate::error::{TaskError, TaskResult};
use crate::task::ChangeSet;

/// Desired values for every field that differs from the observed state.
///
/// A field is `Some` when the desired spec sets it and the object either does
/// not exist or holds a different value. Lifecycle is never a change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ManagedFileChanges {
    pub name: Option<String>,
    pub base: Option<String>,
    pub location: Option<String>,
    pub contents: Option<Vec<u8>>,
    pub public_acl: Option<PublicAcl>,
}

impl ManagedFileChanges {
    /// Diff `expected` against `actual`, materializing desired contents.
    pub fn build(actual: Option<&ObservedState>, expected: &ManagedFileSpec) -> TaskResult<Self> {
        let mut changes = Self {
            name: changed(&expected.name, actual.map(|a| &a.name)),
            base: changed(&expected.base, actual.map(|a| &a.base)),
            location: changed(&expected.location, actual.map(|a| &a.location)),
            ..Default::default()
        };

        if let Some(contents) = &expected.contents {
            let desired = contents.materialize().map_err(TaskError::Content)?;
            if actual.map_or(true, |a| a.contents != desired) {
                changes.contents = Some(desired);
            }
        }

        // Backends that cannot report public-readability leave the observed
        // value unset; there is nothing to compare against.
        if expected.public_acl.is_set() {
            let differs = match actual {
                None => true,
                Some(a) => a.public_acl.is_set() && a.public_acl != expected.public_acl,
            };
            if differs {
                changes.public_acl = Some(expected.public_acl);
            }
        }

        Ok(changes)
    }
}

impl ChangeSet for ManagedFileChanges {
    fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    fn fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("Name");
        }
        if self.base.is_some() {
            fields.push("Base");
        }
        if self.location.is_some() {
            fields.push("Location");
        }
        if self.contents.is_some() {
            fields.push("Contents");
        }
        if self.public_acl.is_some() {
            fields.push("PublicACL");
        }
        fields
    }
}

fn changed(desired: &Option<String>, actual: Option<&Option<String>>) -> Option<String> {
    let desired = desired.as_ref().filter(|d| !d.is_empty())?;
    match actual {
        Some(Some(a)) if a == desired => None,
        _ => Some(desired.clone()),
    }
}
