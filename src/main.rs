use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jarsmith::{ArchiveError, create_from_args, validate_from_args};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exit status when an archive is rejected by policy
const EXIT_REJECTED: u8 = 1;
/// Exit status when the tool itself could not do its job
const EXIT_TOOL_ERROR: u8 = 2;

/// Deterministic class archives for build graphs
#[derive(Parser)]
#[command(name = "jarsmith", version, about)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pack input files as flat entries: <output-archive> <input-file>...
    Create {
        /// Also print the summary as JSON on stdout
        #[arg(long)]
        json: bool,

        #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Check class namespaces: <output-report> <input-archive> <expected-prefix>...
    Validate {
        /// Also print the report as JSON on stdout
        #[arg(long)]
        json: bool,

        #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("jarsmith: {err:#}");
            ExitCode::from(EXIT_TOOL_ERROR)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Create { json, args } => {
            let summary = create_from_args(&args).map_err(with_usage("create"))?;

            if json {
                let rendered = serde_json::to_string_pretty(&summary)
                    .context("Failed to serialize archive summary")?;
                println!("{rendered}");
            }

            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { json, args } => {
            let report = validate_from_args(&args).map_err(with_usage("validate"))?;

            if json {
                let rendered = serde_json::to_string_pretty(&report)
                    .context("Failed to serialize validation report")?;
                println!("{rendered}");
            }

            if report.passed() {
                Ok(ExitCode::SUCCESS)
            } else {
                eprint!("{}", report.render());
                Ok(ExitCode::from(EXIT_REJECTED))
            }
        }
    }
}

/// Attach the subcommand name to a library error
fn with_usage(subcommand: &'static str) -> impl Fn(ArchiveError) -> anyhow::Error {
    move |err| {
        let usage = err.is_usage_error();
        let err = anyhow::Error::new(err);
        if usage {
            err.context(format!(
                "usage error in `{subcommand}` (see `jarsmith {subcommand} --help`)"
            ))
        } else {
            err.context(format!("`{subcommand}` failed"))
        }
    }
}
