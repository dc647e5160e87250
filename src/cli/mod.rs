//! Command-line interface for unify-config
//!
//! A single command: merge a base config with overlays, derive parallelism and
//! batch fields, apply manual overrides, and write the result.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::pipeline::{self, UnifyRequest};

const OVERRIDE_FORMAT_HELP: &str = "Manually override keys in the unified config file to a \
specific value. Each override has the format `k1/k2/.../kn:v`, which assigns \
`config[k1][k2]...[kn] = v`, e.g. 'optimizer/zero_stage:0'. If `v` reads as an integer or \
float it is cast before the assignment.";

/// Unify layered YAML run configs into a single file
#[derive(Parser)]
#[command(name = "unify-config")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path of the base configuration YAML file
    #[arg(long, value_name = "PATH")]
    pub base_config_path: PathBuf,

    /// Configuration YAML files merged over the base, in order
    #[arg(long, value_name = "PATH", num_args = 1.., required = true)]
    pub new_config_paths: Vec<PathBuf>,

    /// Where the unified YAML file is written
    #[arg(long, value_name = "PATH")]
    pub out_path: PathBuf,

    /// Number of nodes; with --gpus-per-node, infers dp so that tp*dp*pp = world size
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub nnodes: Option<u64>,

    /// GPUs per node; with --nnodes, infers dp so that tp*dp*pp = world size
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub gpus_per_node: Option<u64>,

    #[arg(long, value_name = "K1/../KN:V", num_args = 0.., help = OVERRIDE_FORMAT_HELP)]
    pub overrides: Vec<String>,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    pub verbose: bool,
}

impl From<Cli> for UnifyRequest {
    fn from(cli: Cli) -> Self {
        Self {
            base_config_path: cli.base_config_path,
            new_config_paths: cli.new_config_paths,
            out_path: cli.out_path,
            nnodes: cli.nnodes,
            gpus_per_node: cli.gpus_per_node,
            overrides: cli.overrides,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    pipeline::run(&cli.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_full_surface() {
        let cli = Cli::try_parse_from([
            "unify-config",
            "--base-config-path",
            "base.yaml",
            "--new-config-paths",
            "a.yaml",
            "b.yaml",
            "--out-path",
            "out.yaml",
            "--nnodes",
            "2",
            "--gpus-per-node",
            "8",
            "--overrides",
            "optimizer/zero_stage:0",
            "tokens/micro_batch_size:4",
        ])
        .expect("parse");

        let request = UnifyRequest::from(cli);
        assert_eq!(request.new_config_paths, vec![PathBuf::from("a.yaml"), "b.yaml".into()]);
        assert_eq!(request.nnodes, Some(2));
        assert_eq!(request.gpus_per_node, Some(8));
        assert_eq!(request.overrides.len(), 2);
    }

    #[test]
    fn test_overrides_accepts_zero_values() {
        let cli = Cli::try_parse_from([
            "unify-config",
            "--base-config-path",
            "base.yaml",
            "--new-config-paths",
            "a.yaml",
            "--out-path",
            "out.yaml",
            "--overrides",
        ])
        .expect("parse");
        assert!(cli.overrides.is_empty());
        assert_eq!(cli.nnodes, None);
    }

    #[test]
    fn test_requires_overlay_paths() {
        let result = Cli::try_parse_from([
            "unify-config",
            "--base-config-path",
            "base.yaml",
            "--out-path",
            "out.yaml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_zero_nodes() {
        let result = Cli::try_parse_from([
            "unify-config",
            "--base-config-path",
            "base.yaml",
            "--new-config-paths",
            "a.yaml",
            "--out-path",
            "out.yaml",
            "--nnodes",
            "0",
            "--gpus-per-node",
            "8",
        ]);
        assert!(result.is_err());
    }
}
