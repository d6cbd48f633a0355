use mfr_iac::TerraformTarget;
use mfr_types::{Lifecycle, ManagedFileSpec, ObservedState, PublicAcl};

use crate::acl::resolve_acl;
use crate::base::base_path;
use crate::changes::ManagedFileChanges;
use crate::context::CloudupContext;
use crate::error::{TaskError, TaskResult};
use crate::task::Task;

impl Task for ManagedFileSpec {
    type Actual = ObservedState;
    type Changes = ManagedFileChanges;

    fn name(&self) -> &str {
        self.name_str()
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn find(&self, ctx: &CloudupContext) -> TaskResult<Option<ObservedState>> {
        let base = base_path(self, ctx)?;
        let location = self.location_str();
        if location.is_empty() {
            return Ok(None);
        }

        let path = base.join(location);
        let read_err = |source| TaskError::Read {
            location: location.to_string(),
            source,
        };

        let Some(contents) = path.read_file().map_err(read_err)? else {
            tracing::debug!(path = %path, "managed file not found");
            return Ok(None);
        };

        let public_acl = match path.as_public_readable() {
            Some(readable) => PublicAcl::from_flag(readable.is_public().map_err(read_err)?),
            None => PublicAcl::Unset,
        };

        tracing::debug!(
            path = %path,
            bytes = contents.len(),
            public_acl = %public_acl,
            "found managed file"
        );

        Ok(Some(ObservedState {
            name: self.name.clone(),
            lifecycle: self.lifecycle,
            base: self.base.clone(),
            location: self.location.clone(),
            contents,
            public_acl,
        }))
    }

    fn normalize(&self, actual: Option<&ObservedState>) -> Self {
        let mut expected = self.clone();
        if actual.is_some_and(|a| a.public_acl.is_set()) {
            expected.public_acl = expected.public_acl.or_private();
        }
        expected
    }

    fn changes(&self, actual: Option<&ObservedState>) -> TaskResult<ManagedFileChanges> {
        ManagedFileChanges::build(actual, self)
    }

    fn check_changes(
        &self,
        actual: Option<&ObservedState>,
        changes: &ManagedFileChanges,
    ) -> TaskResult<()> {
        if actual.is_some() && changes.name.is_some() {
            return Err(TaskError::CannotChangeField("Name"));
        }
        if self.contents.is_none() {
            return Err(TaskError::RequiredField("Contents"));
        }
        Ok(())
    }

    fn render(
        &self,
        ctx: &CloudupContext,
        _actual: Option<&ObservedState>,
        _changes: &ManagedFileChanges,
    ) -> TaskResult<()> {
        let location = self.location_str();
        if location.is_empty() {
            return Err(TaskError::RequiredField("Location"));
        }

        let contents = self
            .contents
            .as_ref()
            .ok_or(TaskError::RequiredField("Contents"))?;
        let data = contents.materialize().map_err(TaskError::Content)?;

        let path = base_path(self, ctx)?.join(location);
        let acl = resolve_acl(self.public_acl, path.as_ref(), ctx)?;

        path.write_file(&data, acl.as_ref())
            .map_err(|source| TaskError::Write {
                location: location.to_string(),
                source,
            })?;

        tracing::info!(
            path = %path,
            bytes = data.len(),
            acl = ?acl,
            "wrote managed file"
        );
        Ok(())
    }

    fn render_terraform(
        &self,
        ctx: &CloudupContext,
        target: &mut TerraformTarget,
        actual: Option<&ObservedState>,
        changes: &ManagedFileChanges,
    ) -> TaskResult<()> {
        if !ctx.features().terraform_managed_files {
            return self.render(ctx, actual, changes);
        }

        let location = self.location_str();
        if location.is_empty() {
            return Err(TaskError::RequiredField("Location"));
        }

        let path = base_path(self, ctx)?.join(location);
        let acl = resolve_acl(self.public_acl, path.as_ref(), ctx)?;

        let terraform = path.as_terraform().ok_or_else(|| {
            TaskError::Config(format!(
                "path {:?} must be of a type that can render in Terraform",
                path.path()
            ))
        })?;

        let name = self.name_str();
        if name.is_empty() {
            return Err(TaskError::RequiredField("Name"));
        }
        let contents = self
            .contents
            .as_ref()
            .ok_or(TaskError::RequiredField("Contents"))?;
        let mut reader = contents.open().map_err(TaskError::Content)?;

        terraform
            .render_terraform(target.writer_mut(), name, &mut reader, acl.as_ref())
            .map_err(|source| TaskError::Declare {
                location: location.to_string(),
                source,
            })
    }
}
