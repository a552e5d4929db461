//! Performance aggregator: runs each subsystem analyzer whose directory exists.

use std::path::Path;

use crate::analysis::reader::probe_dir;
use crate::analysis::record::PerformanceAnalysis;
use crate::analysis::subsystem::SubsystemAnalyzer;
use crate::config::EngineConfig;
use crate::utils::{Result, Subsystem};

/// Subsystems without a directory under `perf_dir` are left out, not zeroed.
pub fn analyze_performance(perf_dir: &Path, config: &EngineConfig) -> Result<PerformanceAnalysis> {
    let mut performance = PerformanceAnalysis::default();

    for subsystem in Subsystem::ALL {
        let dir = perf_dir.join(subsystem.dir_name());
        if !probe_dir(&dir)? {
            tracing::debug!(%subsystem, "not tested");
            continue;
        }
        let result = SubsystemAnalyzer::new(subsystem, config).analyze(&dir)?;
        performance.set(subsystem, result);
    }

    Ok(performance)
}
