//! Schemaguard CLI - backward-compatibility check for API schema snapshots

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use schemaguard_core::{
    report::format_changes, verify_snapshot_file, CatalogEngine, GuardConfig, GuardError,
    SnapshotGuard, ToolCatalog,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schemaguard")]
#[command(about = "Schemaguard - Block unapproved breaking changes in API schemas")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Check a schema against its snapshot and update the snapshot
    Check {
        /// Tool catalog JSON describing the current schema
        #[arg(short, long)]
        schema: PathBuf,

        /// Snapshot file path (overrides the config file)
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Record breaking changes instead of failing
        #[arg(long)]
        allow_breaking_changes: bool,

        /// Label for change-log entries recorded by this run
        #[arg(long)]
        run_label: Option<String>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Check that a snapshot file was not edited by hand
    Verify {
        /// Snapshot file path
        #[arg(long, default_value = "schema.snapshot")]
        snapshot: PathBuf,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            schema,
            snapshot,
            allow_breaking_changes,
            run_label,
            config,
        } => {
            let mut guard_config = match config {
                Some(path) => GuardConfig::from_toml_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => GuardConfig::default(),
            };
            if let Some(snapshot) = snapshot {
                guard_config.snapshot_location = snapshot;
            }
            if allow_breaking_changes {
                guard_config.allow_breaking_changes = true;
            }
            if run_label.is_some() {
                guard_config.run_label = run_label;
            }
            tracing::debug!("Guard configuration: {:?}", guard_config);

            let text = std::fs::read_to_string(&schema)
                .with_context(|| format!("reading schema {}", schema.display()))?;
            let catalog = ToolCatalog::from_json_str(&text)
                .with_context(|| format!("parsing schema {}", schema.display()))?;

            let guard = SnapshotGuard::new(guard_config, CatalogEngine)?;
            match guard.check(&catalog) {
                Ok(report) => {
                    println!("{}", report.outcome);
                    Ok(exit_code(report.outcome.exit_code()))
                }
                Err(err) => match err.outcome() {
                    Some(outcome) => {
                        if let GuardError::BreakingChangesBlocked { changes } = &err {
                            eprintln!("{}", format_changes("BREAKING CHANGES", changes));
                        }
                        eprintln!("{}", outcome);
                        Ok(exit_code(outcome.exit_code()))
                    }
                    None => Err(err.into()),
                },
            }
        }
        Commands::Verify { snapshot } => {
            if verify_snapshot_file(&snapshot)? {
                println!("Snapshot signature is valid: {}", snapshot.display());
                Ok(ExitCode::SUCCESS)
            } else {
                eprintln!(
                    "Snapshot signature is invalid (edited by hand?): {}",
                    snapshot.display()
                );
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map(ExitCode::from).unwrap_or(ExitCode::FAILURE)
}
