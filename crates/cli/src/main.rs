use anyhow::{Context, Result};
use clap::Parser;
use cli::apply::{self, DeletionOutcome};
use culler_core::config::{self, CullerConfig};
use culler_core::models::{Classification, FileOutcome, ScanReport, UnknownReason};
use culler_core::pipeline;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut raw = config::load().context("load configuration")?;
    if let Some(threshold) = cli.threshold {
        raw.threshold = threshold;
    }
    raw.exclude.extend(cli.exclude.iter().cloned());
    let cfg = CullerConfig::try_from(raw).context("invalid configuration")?;

    let provider = pipeline::build_provider(&cfg);
    let json = cli.json;
    let report = pipeline::run_scan(&cli.path, &cfg, provider.as_ref(), |outcome| {
        if !json {
            print_progress(outcome);
        }
    })
    .await?;

    let dry_run = !cli.live;
    if json {
        let outcomes = apply::apply_deletions(&report.candidates, dry_run);
        print_json(&report, &outcomes)?;
    } else {
        apply::report_and_apply(&report.candidates, dry_run, &mut std::io::stdout().lock())
            .context("write deletion report")?;
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "movie-culler")]
#[command(about = "Delete movies rated below a threshold", long_about = None)]
struct Cli {
    /// Directory to scan for movies
    path: PathBuf,

    /// Actually delete files; without this only a report is printed
    #[arg(long)]
    live: bool,

    /// Override the rating threshold (0-10)
    #[arg(long)]
    threshold: Option<f64>,

    /// Skip paths matching these globs (comma-separated)
    #[arg(long, value_delimiter = ',', default_values_t = Vec::<String>::new())]
    exclude: Vec<String>,

    /// Output the scan report as JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_progress(outcome: &FileOutcome) {
    let file = outcome
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let Some(n) = &outcome.normalized else {
        println!("Could not derive a title from: {file}");
        return;
    };
    match &outcome.classification {
        Classification::Keep { rating } | Classification::Delete { rating } => {
            println!("Found: {} : Rating: {}", n.title, rating);
        }
        Classification::Unknown { reason } => match reason {
            UnknownReason::Unrated => {
                println!("Unreliable rating (0.0) for: {} -> skipping", n.title)
            }
            UnknownReason::LookupFailed { error } => {
                println!("Lookup failed for: {file} -> Tried: {} ({error})", n.query)
            }
            UnknownReason::NotFound | UnknownReason::Unparsable => {
                println!("Could not find rating for: {file} -> Tried: {}", n.query)
            }
        },
    }
}

fn print_json(report: &ScanReport, outcomes: &[DeletionOutcome]) -> Result<()> {
    let summary = serde_json::json!({
        "status": "ok",
        "report": report,
        "deletions": outcomes,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
