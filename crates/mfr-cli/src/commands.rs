use anyhow::Context;
use colored::Colorize;
use mfr_iac::TerraformTarget;
use mfr_task::{run_delta, run_delta_terraform, ChangeSet, CloudupContext, DeltaOutcome, Task};
use mfr_types::{content_fingerprint, Lifecycle, ManagedFileSpec};
use similar::TextDiff;

use crate::cli::*;
use crate::manifest::Manifest;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let manifest = Manifest::load(&cli.manifest)?;
    let ctx = manifest.context()?;
    let specs = manifest.specs()?;

    match cli.command {
        Command::Plan(args) => cmd_plan(&ctx, &specs, args),
        Command::Apply(_) => cmd_apply(&ctx, &specs),
        Command::Terraform(args) => cmd_terraform(&ctx, &specs, args),
    }
}

fn cmd_plan(ctx: &CloudupContext, specs: &[ManagedFileSpec], args: PlanArgs) -> anyhow::Result<()> {
    let mut pending = 0;
    for spec in specs {
        let name = spec.name_str();
        if spec.lifecycle == Lifecycle::Ignore {
            println!("  {} {} (lifecycle {})", "skip".dimmed(), name, spec.lifecycle);
            continue;
        }

        let actual = spec
            .find(ctx)
            .with_context(|| format!("probing managed file {name:?}"))?;
        let expected = spec.normalize(actual.as_ref());
        let changes = expected.changes(actual.as_ref())?;

        match &actual {
            None => {
                pending += 1;
                println!("  {} {} -> {}", "+".green().bold(), name.bold(), spec.location_str());
            }
            Some(_) if changes.is_empty() => {
                println!("  {} {}", "=".dimmed(), name);
            }
            Some(actual) => {
                pending += 1;
                println!(
                    "  {} {} ({})",
                    "~".yellow().bold(),
                    name.bold(),
                    changes.fields().join(", ").cyan()
                );
                if let (Some(desired), false) = (&changes.contents, args.no_diff) {
                    print!("{}", content_diff(&actual.contents, desired));
                }
            }
        }
    }

    if pending == 0 {
        println!("{} No changes.", "✓".green().bold());
    } else {
        println!("{} managed file(s) to write.", pending.to_string().bold());
    }
    Ok(())
}

fn cmd_apply(ctx: &CloudupContext, specs: &[ManagedFileSpec]) -> anyhow::Result<()> {
    let mut failed = 0;
    for spec in specs {
        let name = spec.name_str();
        match run_delta(spec, ctx) {
            Ok(outcome) => print_outcome(name, &outcome),
            Err(e) => {
                failed += 1;
                println!("  {} {}: {}", "✗".red().bold(), name.bold(), e);
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} managed file(s) failed", specs.len());
    }
    Ok(())
}

fn cmd_terraform(
    ctx: &CloudupContext,
    specs: &[ManagedFileSpec],
    args: TerraformArgs,
) -> anyhow::Result<()> {
    if !ctx.features().terraform_managed_files {
        tracing::warn!("terraform_managed_files is off; managed files are written directly");
    }

    let mut target = TerraformTarget::new(&args.out);
    for spec in specs {
        let name = spec.name_str();
        let outcome = run_delta_terraform(spec, ctx, &mut target)
            .with_context(|| format!("declaring managed file {name:?}"))?;
        print_outcome(name, &outcome);
    }

    if target.writer().is_empty() {
        println!("No Terraform resources declared.");
        return Ok(());
    }
    for path in target.finish()? {
        println!("  {} {}", "wrote".green(), path.display());
    }
    Ok(())
}

fn print_outcome(name: &str, outcome: &DeltaOutcome) {
    match outcome {
        DeltaOutcome::Unchanged => println!("  {} {}", "=".dimmed(), name),
        DeltaOutcome::Applied { fields } => println!(
            "  {} {} ({})",
            "✓".green().bold(),
            name.bold(),
            fields.join(", ").cyan()
        ),
        DeltaOutcome::Skipped { lifecycle, reason } => println!(
            "  {} {} (lifecycle {}: {})",
            "skip".yellow(),
            name,
            lifecycle,
            reason
        ),
    }
}

/// Unified diff of stored against desired contents. Binary contents are
/// summarised by fingerprint.
fn content_diff(current: &[u8], desired: &[u8]) -> String {
    match (std::str::from_utf8(current), std::str::from_utf8(desired)) {
        (Ok(old), Ok(new)) => TextDiff::from_lines(old, new)
            .unified_diff()
            .context_radius(3)
            .header("current", "desired")
            .to_string(),
        _ => format!(
            "Binary contents differ ({} -> {})\n",
            content_fingerprint(current),
            content_fingerprint(desired)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_diff_is_unified() {
        let diff = content_diff(b"a: 1\nb: 2\n", b"a: 1\nb: 3\n");
        assert!(diff.starts_with("--- current\n+++ desired\n"));
        assert!(diff.contains("-b: 2\n"));
        assert!(diff.contains("+b: 3\n"));
    }

    #[test]
    fn binary_diff_uses_fingerprints() {
        let diff = content_diff(&[0xff, 0xfe], b"text");
        assert!(diff.starts_with("Binary contents differ"));
        assert!(diff.contains(&content_fingerprint(b"text")));
    }
}
