//! # meshsnr - Main Entry Point
//!
//! Supports two subcommands:
//! - **probe** (`meshsnr probe <TARGET>`): verify a direct neighbor, then trace it
//!   repeatedly and print the averages
//! - **convert** (`meshsnr convert <LOG>`): turn a saved run log into CSV

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use meshsnr::analysis::summarize;
use meshsnr::cli::{Args, Command, ConvertArgs, ProbeArgs};
use meshsnr::domain::{ConvertError, NodeId, ReachabilityError};
use meshsnr::export::convert_file;
use meshsnr::link::MeshtasticCli;
use meshsnr::node_table::NodeRecord;
use meshsnr::preflight::run_preflight_checks;
use meshsnr::scheduler::{ProbeScheduler, TokioSleeper};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_NOT_FOUND: i32 = 3;
const EXIT_NOT_DIRECT: i32 = 4;
const EXIT_MALFORMED: i32 = 5;
const EXIT_NO_INPUT: i32 = 6;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            if is_early_abort(&e) {
                eprintln!("{e}");
            } else {
                eprintln!("error: {e:#}");
            }
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(reach) = err.downcast_ref::<ReachabilityError>() {
        return match reach {
            ReachabilityError::TargetNotFound(_) => EXIT_NOT_FOUND,
            ReachabilityError::NotDirect { .. } => EXIT_NOT_DIRECT,
            ReachabilityError::MalformedHops { .. } | ReachabilityError::MissingField { .. } => {
                EXIT_MALFORMED
            }
            ReachabilityError::Query(_) => EXIT_ERROR,
        };
    }
    if let Some(ConvertError::InputNotFound { .. }) = err.downcast_ref::<ConvertError>() {
        return EXIT_NO_INPUT;
    }
    EXIT_ERROR
}

/// Unknown or relayed targets end the run quietly, without the error prefix.
fn is_early_abort(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<ReachabilityError>(),
        Some(ReachabilityError::TargetNotFound(_) | ReachabilityError::NotDirect { .. })
    )
}

#[tokio::main(flavor = "current_thread")]
async fn run() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Probe(probe_args) => probe(&probe_args).await,
        Command::Convert(convert_args) => convert(&convert_args),
    }
}

async fn probe(args: &ProbeArgs) -> Result<()> {
    let quiet = args.quiet;
    let wanted = NodeId::from(args.target.as_str());
    let link = MeshtasticCli::new(args.link_config());

    if !quiet {
        println!("Checking on {wanted}...");
    }

    // ── Pre-flight: target must be listed 0 hops away ───────────────────
    let target = run_preflight_checks(&link, &wanted, |record| {
        if args.info {
            print_record(record);
        }
    })
    .await?;

    if !quiet {
        println!("Success: {} verified as 0 hops away", target.id);
        println!("Starting {} iterations...", args.iterations);
    }

    // ── Traces ──────────────────────────────────────────────────────────
    let scheduler = ProbeScheduler::new(&link, TokioSleeper, args.probe_config());
    let history = scheduler
        .run(&target.id, &mut std::io::stdout().lock())
        .await
        .context("Failed to write trace report")?;

    match summarize(&history) {
        Some(summary) => println!("\n{summary}"),
        None => info!("no trace produced a usable sample"),
    }

    Ok(())
}

fn print_record(record: &NodeRecord) {
    match serde_json::to_string_pretty(record) {
        Ok(json) => println!("{json}"),
        Err(e) => warn!("could not render node info: {e}"),
    }
}

fn convert(args: &ConvertArgs) -> Result<()> {
    let (output, count) = convert_file(&args.input)?;
    println!(
        "Processed {count} traces from '{}' into '{}'.",
        args.input.display(),
        output.display()
    );
    Ok(())
}
