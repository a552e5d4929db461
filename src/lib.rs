//! Diagnostic report analysis: interprets collected tool output (sysbench,
//! stress-ng, memtester, SMART, fio, iperf3, ethtool) into per-subsystem
//! statuses, a 0-100 health score and remediation advice.

pub mod analysis;
pub mod config;
pub mod output;
pub mod report;
pub mod store;
pub mod utils;

pub use analysis::record::AnalysisRecord;
pub use analysis::ReportProcessor;
pub use config::EngineConfig;
pub use report::Report;
pub use store::ReportStore;
pub use utils::{DiagError, Result};
