//! Version Gate Runner
//!
//! Evaluates constraint expressions against the configured cluster version so
//! that shell-driven suites can decide whether to run a group of tests:
//! - Loads harness configuration from the environment and `.env`
//! - Prints `run` or `skip: <reason>` (or a JSON report)
//! - Exits 0 to run, 3 to skip, 1 on error

use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;

use harness::{ConstraintSet, Gate, HarnessConfig};

const EXIT_SKIP: u8 = 3;

#[derive(Parser)]
#[command(name = "harness")]
#[command(about = "Decide whether version-gated integration tests apply to the cluster under test")]
struct Args {
    /// Version constraint, e.g. ">=0.10.1.0" (repeat for AND)
    #[arg(long = "require", value_name = "EXPR")]
    requirements: Vec<String>,

    /// Cluster version to test against (overrides KAFKA_VERSION)
    #[arg(long)]
    kafka_version: Option<String>,

    /// Print a JSON report instead of plain text
    #[arg(long)]
    json: bool,

    /// Enable verbose tracing output
    #[arg(long)]
    verbose: bool,
}

#[derive(Serialize)]
struct GateReport<'a> {
    cluster_version: String,
    constraints: Vec<String>,
    decision: &'static str,
    reason: Option<String>,
    config: &'a HarnessConfig,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_SKIP),
        Err(e) => {
            report_failure(e.as_ref());
            ExitCode::FAILURE
        }
    }
}

/// Log a failed run, installing a default subscriber if `run` stopped before it could
fn report_failure(error: &dyn std::error::Error) {
    shared::logging::init_tracing(None);
    shared::logging::log_error("harness", "Version gate", &error);
    eprintln!("error: {error}");
}

fn run(args: &Args) -> Result<bool, Box<dyn std::error::Error>> {
    let config = HarnessConfig::from_env_with_version(args.kafka_version.as_deref())?;

    let log_level = if args.verbose { "debug" } else { config.log_level.as_str() };
    shared::logging::init_tracing(Some(log_level));

    let constraints = ConstraintSet::parse_all(&args.requirements)?;
    tracing::debug!(
        "🔍 Evaluating {} constraints against cluster version {}",
        constraints.constraints().len(),
        config.cluster_version
    );

    let gate = constraints.gate(&config.cluster_version);

    if args.json {
        let report = GateReport {
            cluster_version: config.cluster_version.to_string(),
            constraints: constraints.constraints().iter().map(ToString::to_string).collect(),
            decision: if gate.should_run() { "run" } else { "skip" },
            reason: match &gate {
                Gate::Run => None,
                Gate::Skip(reason) => Some(reason.detail()),
            },
            config: &config,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match &gate {
            Gate::Run => println!("run"),
            Gate::Skip(reason) => println!("skip: {} ({})", reason, reason.detail()),
        }
    }

    Ok(gate.should_run())
}
