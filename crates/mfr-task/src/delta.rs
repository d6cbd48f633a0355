//! Single-resource delta driver.
//!
//! Runs a [`Task`] through its phases the way a task executor would:
//! probe, normalize, diff, validate, then render only when something
//! differs. Lifecycle modes are honoured here, never by the task itself.

use mfr_iac::TerraformTarget;
use mfr_types::Lifecycle;

use crate::context::CloudupContext;
use crate::error::{TaskError, TaskResult};
use crate::task::{ChangeSet, Task};

/// What a delta run did to one resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeltaOutcome {
    /// Actual state already matched desired.
    Unchanged,
    /// The listed fields differed and the resource was rendered.
    Applied { fields: Vec<&'static str> },
    /// The lifecycle told the driver to leave the resource alone.
    Skipped { lifecycle: Lifecycle, reason: String },
}

impl DeltaOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Desired state, actual state and their diff, ready to render.
struct Pending<T: Task> {
    expected: T,
    actual: Option<T::Actual>,
    changes: T::Changes,
}

enum Step<T: Task> {
    Done(DeltaOutcome),
    Render(Pending<T>),
}

/// Reconcile `task` directly against storage.
pub fn run_delta<T: Task>(task: &T, ctx: &CloudupContext) -> TaskResult<DeltaOutcome> {
    let pending = match plan(task, ctx, true)? {
        Step::Done(outcome) => return Ok(outcome),
        Step::Render(pending) => pending,
    };

    pending
        .expected
        .render(ctx, pending.actual.as_ref(), &pending.changes)?;
    Ok(DeltaOutcome::Applied {
        fields: pending.changes.fields(),
    })
}

/// Reconcile `task` by declaring it in `target`.
///
/// Declarations are computed against an absent actual state: the
/// provisioning run that consumes `target` owns the comparison with what
/// exists. Lifecycles that forbid taking ownership are skipped.
pub fn run_delta_terraform<T: Task>(
    task: &T,
    ctx: &CloudupContext,
    target: &mut TerraformTarget,
) -> TaskResult<DeltaOutcome> {
    let pending = match plan(task, ctx, false)? {
        Step::Done(outcome) => return Ok(outcome),
        Step::Render(pending) => pending,
    };

    pending
        .expected
        .render_terraform(ctx, target, pending.actual.as_ref(), &pending.changes)?;
    Ok(DeltaOutcome::Applied {
        fields: pending.changes.fields(),
    })
}

fn plan<T: Task>(task: &T, ctx: &CloudupContext, probe: bool) -> TaskResult<Step<T>> {
    let lifecycle = task.lifecycle();
    let name = task.name();

    match lifecycle {
        Lifecycle::Ignore => {
            tracing::debug!(resource = name, "lifecycle is Ignore, skipping");
            return Ok(skipped(lifecycle, "lifecycle is Ignore"));
        }
        Lifecycle::ExistsAndValidates | Lifecycle::ExistsAndWarnIfChanges if !probe => {
            tracing::warn!(resource = name, %lifecycle, "not declaring a resource this run does not own");
            return Ok(skipped(lifecycle, "resource is not owned by this run"));
        }
        _ => {}
    }

    let actual = if probe {
        match task.find(ctx) {
            Ok(actual) => actual,
            Err(e) if lifecycle == Lifecycle::WarnIfInsufficientAccess => {
                tracing::warn!(resource = name, error = %e, "unable to read resource, skipping");
                return Ok(skipped(lifecycle, &e.to_string()));
            }
            Err(e) => return Err(e),
        }
    } else {
        None
    };

    let exists_only = matches!(
        lifecycle,
        Lifecycle::ExistsAndValidates | Lifecycle::ExistsAndWarnIfChanges
    );
    if exists_only && actual.is_none() {
        return Err(lifecycle_error(name, lifecycle, "resource was not found"));
    }

    let expected = task.normalize(actual.as_ref());
    let changes = expected.changes(actual.as_ref())?;

    if actual.is_some() && changes.is_empty() {
        tracing::debug!(resource = name, "no changes");
        return Ok(Step::Done(DeltaOutcome::Unchanged));
    }

    match lifecycle {
        Lifecycle::ExistsAndValidates => {
            return Err(lifecycle_error(
                name,
                lifecycle,
                &format!("fields differ: {}", changes.fields().join(", ")),
            ));
        }
        Lifecycle::ExistsAndWarnIfChanges => {
            let fields = changes.fields().join(", ");
            tracing::warn!(resource = name, %fields, "resource differs but lifecycle forbids changes");
            return Ok(skipped(lifecycle, &format!("fields differ: {fields}")));
        }
        _ => {}
    }

    expected.check_changes(actual.as_ref(), &changes)?;

    tracing::debug!(resource = name, fields = ?changes.fields(), "changes detected");
    Ok(Step::Render(Pending {
        expected,
        actual,
        changes,
    }))
}

fn skipped<T: Task>(lifecycle: Lifecycle, reason: &str) -> Step<T> {
    Step::Done(DeltaOutcome::Skipped {
        lifecycle,
        reason: reason.to_string(),
    })
}

fn lifecycle_error(name: &str, lifecycle: Lifecycle, reason: &str) -> TaskError {
    TaskError::Lifecycle {
        name: name.to_string(),
        lifecycle,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fixtures, ErrorKind, FeatureFlags};
    use mfr_types::{ManagedFileSpec, PublicAcl, StringResource};

    fn spec(contents: &str) -> ManagedFileSpec {
        ManagedFileSpec::new("foo", "config/foo.yaml", StringResource(contents.into()))
    }

    fn seed(ctx: &CloudupContext, contents: &[u8]) {
        ctx.cluster_config_base()
            .join("config/foo.yaml")
            .write_file(contents, None)
            .unwrap();
    }

    fn stored(ctx: &CloudupContext) -> Option<Vec<u8>> {
        ctx.cluster_config_base()
            .join("config/foo.yaml")
            .read_file()
            .unwrap()
    }

    // -----------------------------------------------------------------------
    // Sync
    // -----------------------------------------------------------------------

    #[test]
    fn creates_missing_object() {
        let ctx = fixtures::memfs_context();
        let outcome = run_delta(&spec("a: 1"), &ctx).unwrap();
        assert_eq!(
            outcome,
            DeltaOutcome::Applied {
                fields: vec!["Name", "Location", "Contents"]
            }
        );
        assert_eq!(stored(&ctx).as_deref(), Some(&b"a: 1"[..]));
    }

    #[test]
    fn second_run_is_unchanged() {
        let ctx = fixtures::memfs_context();
        assert!(run_delta(&spec("a: 1"), &ctx).unwrap().is_applied());
        assert_eq!(run_delta(&spec("a: 1"), &ctx).unwrap(), DeltaOutcome::Unchanged);
    }

    #[test]
    fn updates_changed_contents() {
        let ctx = fixtures::memfs_context();
        seed(&ctx, b"a: 0");
        let outcome = run_delta(&spec("a: 1"), &ctx).unwrap();
        assert_eq!(
            outcome,
            DeltaOutcome::Applied {
                fields: vec!["Contents"]
            }
        );
        assert_eq!(stored(&ctx).as_deref(), Some(&b"a: 1"[..]));
    }

    #[test]
    fn flips_public_acl_on_object_store() {
        let (_dir, ctx) = fixtures::bucket_context();
        run_delta(&spec("a: 1"), &ctx).unwrap();

        let public = spec("a: 1").with_public_acl(PublicAcl::Public);
        assert_eq!(
            run_delta(&public, &ctx).unwrap(),
            DeltaOutcome::Applied {
                fields: vec!["PublicACL"]
            }
        );
        assert_eq!(run_delta(&public, &ctx).unwrap(), DeltaOutcome::Unchanged);
    }

    #[test]
    fn validation_failure_prevents_write() {
        let ctx = fixtures::memfs_context();
        let mut spec = spec("a: 1");
        spec.contents = None;
        let err = run_delta(&spec, &ctx).unwrap_err();
        assert!(matches!(err, TaskError::RequiredField("Contents")));
        assert!(ctx.vfs().memfs().is_empty());
    }

    // -----------------------------------------------------------------------
    // Lifecycles
    // -----------------------------------------------------------------------

    #[test]
    fn ignore_never_touches_storage() {
        let ctx = fixtures::memfs_context();
        let spec = spec("a: 1").with_lifecycle(Lifecycle::Ignore);
        let outcome = run_delta(&spec, &ctx).unwrap();
        assert!(matches!(outcome, DeltaOutcome::Skipped { lifecycle: Lifecycle::Ignore, .. }));
        assert!(ctx.vfs().memfs().is_empty());
    }

    #[test]
    fn warn_if_insufficient_access_skips_on_read_error() {
        let (_dir, ctx) = fixtures::bucket_context();
        let spec = ManagedFileSpec::new("foo", "a/../b", StringResource("x".into()))
            .with_lifecycle(Lifecycle::WarnIfInsufficientAccess);
        let outcome = run_delta(&spec, &ctx).unwrap();
        assert!(matches!(outcome, DeltaOutcome::Skipped { .. }));

        let sync = ManagedFileSpec::new("foo", "a/../b", StringResource("x".into()));
        assert_eq!(run_delta(&sync, &ctx).unwrap_err().kind(), ErrorKind::Io);
    }

    #[test]
    fn exists_and_validates() {
        let ctx = fixtures::memfs_context();
        let spec_for = |c: &str| spec(c).with_lifecycle(Lifecycle::ExistsAndValidates);

        let err = run_delta(&spec_for("a: 1"), &ctx).unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert_eq!(err.kind(), ErrorKind::Validation);

        seed(&ctx, b"a: 1");
        assert_eq!(run_delta(&spec_for("a: 1"), &ctx).unwrap(), DeltaOutcome::Unchanged);

        let err = run_delta(&spec_for("a: 2"), &ctx).unwrap_err();
        assert!(err.to_string().contains("Contents"));
        assert_eq!(stored(&ctx).as_deref(), Some(&b"a: 1"[..]));
    }

    #[test]
    fn exists_and_warn_if_changes() {
        let ctx = fixtures::memfs_context();
        let spec = spec("a: 2").with_lifecycle(Lifecycle::ExistsAndWarnIfChanges);
        assert!(run_delta(&spec, &ctx).is_err());

        seed(&ctx, b"a: 1");
        let outcome = run_delta(&spec, &ctx).unwrap();
        assert!(matches!(outcome, DeltaOutcome::Skipped { ref reason, .. } if reason.contains("Contents")));
        assert_eq!(stored(&ctx).as_deref(), Some(&b"a: 1"[..]));
    }

    // -----------------------------------------------------------------------
    // Terraform
    // -----------------------------------------------------------------------

    #[test]
    fn terraform_declares_without_probing() {
        let ctx = fixtures::memfs_context().with_features(FeatureFlags {
            terraform_managed_files: true,
        });
        seed(&ctx, b"a: 1");
        let out = tempfile::tempdir().unwrap();
        let mut target = TerraformTarget::new(out.path());

        let outcome = run_delta_terraform(&spec("a: 1"), &ctx, &mut target).unwrap();
        assert!(outcome.is_applied());
        assert!(target.writer().resource("aws_s3_object", "foo").is_some());
    }

    #[test]
    fn terraform_skips_unowned_lifecycles() {
        let ctx = fixtures::memfs_context().with_features(FeatureFlags {
            terraform_managed_files: true,
        });
        let out = tempfile::tempdir().unwrap();
        let mut target = TerraformTarget::new(out.path());

        let spec = spec("a: 1").with_lifecycle(Lifecycle::ExistsAndValidates);
        let outcome = run_delta_terraform(&spec, &ctx, &mut target).unwrap();
        assert!(matches!(outcome, DeltaOutcome::Skipped { .. }));
        assert!(target.writer().is_empty());
    }

    #[test]
    fn terraform_without_feature_writes_directly() {
        let ctx = fixtures::memfs_context();
        let out = tempfile::tempdir().unwrap();
        let mut target = TerraformTarget::new(out.path());

        run_delta_terraform(&spec("a: 1"), &ctx, &mut target).unwrap();
        assert!(target.writer().is_empty());
        assert_eq!(stored(&ctx).as_deref(), Some(&b"a: 1"[..]));
    }
}
