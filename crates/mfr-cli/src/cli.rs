use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mfr",
    about = "Managed file reconciler: converge stored configuration objects",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Manifest describing the cluster, buckets and managed files
    #[arg(short, long, global = true, default_value = "mfr.toml")]
    pub manifest: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show what apply would change, without writing
    Plan(PlanArgs),
    /// Write every managed file that differs from the manifest
    Apply(ApplyArgs),
    /// Declare managed files as Terraform resources
    Terraform(TerraformArgs),
}

#[derive(Args)]
pub struct PlanArgs {
    /// Only list changed fields; skip content diffs
    #[arg(long)]
    pub no_diff: bool,
}

#[derive(Args)]
pub struct ApplyArgs {}

#[derive(Args)]
pub struct TerraformArgs {
    /// Directory for kubernetes.tf.json and its data/ assets
    #[arg(short, long, default_value = "out/terraform")]
    pub out: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plan() {
        let cli = Cli::try_parse_from(["mfr", "plan"]).unwrap();
        assert!(matches!(cli.command, Command::Plan(_)));
        assert_eq!(cli.manifest, PathBuf::from("mfr.toml"));
    }

    #[test]
    fn parse_plan_no_diff() {
        let cli = Cli::try_parse_from(["mfr", "plan", "--no-diff"]).unwrap();
        if let Command::Plan(args) = cli.command {
            assert!(args.no_diff);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_apply_with_manifest() {
        let cli = Cli::try_parse_from(["mfr", "apply", "--manifest", "/etc/mfr.toml"]).unwrap();
        assert!(matches!(cli.command, Command::Apply(_)));
        assert_eq!(cli.manifest, PathBuf::from("/etc/mfr.toml"));
    }

    #[test]
    fn parse_terraform_out() {
        let cli = Cli::try_parse_from(["mfr", "terraform", "--out", "/tmp/tf"]).unwrap();
        if let Command::Terraform(args) = cli.command {
            assert_eq!(args.out, PathBuf::from("/tmp/tf"));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["mfr", "--verbose", "apply"]).unwrap();
        assert!(cli.verbose);
    }
}
