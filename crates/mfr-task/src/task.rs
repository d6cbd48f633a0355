use mfr_iac::TerraformTarget;
use mfr_types::Lifecycle;

use crate::context::CloudupContext;
use crate::error::TaskResult;

/// The field-level difference between actual and desired state.
pub trait ChangeSet {
    /// Returns `true` if actual already matches desired.
    fn is_empty(&self) -> bool;

    /// Names of the fields that differ, in declaration order.
    fn fields(&self) -> Vec<&'static str>;
}

/// The three-phase reconciliation protocol a resource type plugs into.
///
/// The executor drives each resource through
/// `find -> normalize -> changes -> check_changes -> render`. `self` is always
/// the desired state. Every phase runs synchronously on the caller's thread.
pub trait Task: Sized {
    /// Snapshot of what the backend currently holds.
    type Actual;
    type Changes: ChangeSet;

    /// Identifier used in logs and errors.
    fn name(&self) -> &str;

    fn lifecycle(&self) -> Lifecycle;

    /// Probe the backend. `Ok(None)` means the resource does not exist (or is
    /// not specified well enough to look for).
    fn find(&self, ctx: &CloudupContext) -> TaskResult<Option<Self::Actual>>;

    /// The desired state with defaults filled in from what `find` observed,
    /// so the diff compares concrete values rather than unset-vs-value.
    fn normalize(&self, actual: Option<&Self::Actual>) -> Self;

    /// Compute the difference between `actual` and `self`.
    fn changes(&self, actual: Option<&Self::Actual>) -> TaskResult<Self::Changes>;

    /// Reject illegal transitions before any mutation. Must not perform I/O.
    fn check_changes(&self, actual: Option<&Self::Actual>, changes: &Self::Changes)
        -> TaskResult<()>;

    /// Apply the desired state directly to storage.
    fn render(
        &self,
        ctx: &CloudupContext,
        actual: Option<&Self::Actual>,
        changes: &Self::Changes,
    ) -> TaskResult<()>;

    /// Apply the desired state by declaring it in `target`.
    fn render_terraform(
        &self,
        ctx: &CloudupContext,
        target: &mut TerraformTarget,
        actual: Option<&Self::Actual>,
        changes: &Self::Changes,
    ) -> TaskResult<()>;
}
