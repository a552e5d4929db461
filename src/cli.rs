use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pxediag")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_TIME"), ")"))]
#[command(about = "Diagnostic report analysis and health scoring", long_about = None)]
pub struct Cli {
    /// Directory holding one subdirectory per host
    #[arg(long, global = true, env = "PXEDIAG_REPORTS_DIR")]
    pub reports_dir: Option<PathBuf>,

    /// TOML config file (scoring weights, thresholds, rules)
    #[arg(long, global = true, env = "PXEDIAG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a host's report and print its health assessment
    #[command(arg_required_else_help = true)]
    Analyze {
        /// Host whose report to analyze
        hostname: String,

        /// Output format (text or json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// List stored reports, newest first
    List {
        /// Output format (text or json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// Print a stored report as JSON
    #[command(arg_required_else_help = true)]
    Show {
        hostname: String,
    },

    /// Summarize stored reports
    Stats {
        /// Output format (text or json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },
}
