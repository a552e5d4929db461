mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

use pxediag::output;
use pxediag::{DiagError, EngineConfig, Report, ReportProcessor, ReportStore};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = EngineConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(dir) = cli.reports_dir {
        config.reports_dir = dir;
    }

    let store = ReportStore::new(&config.reports_dir);
    tracing::debug!(reports_dir = %store.root().display(), "report store");

    match cli.command {
        Commands::Analyze { hostname, output } => {
            let report = fetch(&store, &hostname)?;

            let record = ReportProcessor::new(config)
                .analyze(&report)
                .with_context(|| format!("analyzing report for {}", hostname))?;
            output::display_analysis(&record, &output)?;
        }
        Commands::List { output } => {
            let reports = store.scan_reports().context("scanning reports")?;
            output::display_reports(&reports, &output)?;
        }
        Commands::Show { hostname } => {
            let report = fetch(&store, &hostname)?;
            println!("{}", serde_json::to_string_pretty(&output::report_json(&report))?);
        }
        Commands::Stats { output } => {
            let stats = store.stats(chrono::Utc::now()).context("scanning reports")?;
            output::display_stats(&stats, &output)?;
        }
    }

    Ok(())
}

fn fetch(store: &ReportStore, hostname: &str) -> pxediag::Result<Report> {
    store
        .get_report(hostname)?
        .ok_or_else(|| DiagError::NotFound(format!("report for hostname {}", hostname)))
}
