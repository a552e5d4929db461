//! Recommendation generator.

use crate::analysis::record::PerformanceAnalysis;
use crate::utils::{Status, Subsystem};

pub const HEALTHY: &str = "System appears to be healthy. Continue monitoring for any changes.";

fn advisory(subsystem: Subsystem) -> &'static str {
    match subsystem {
        Subsystem::Cpu => {
            "CPU performance is poor. Consider checking for thermal throttling or background processes."
        }
        Subsystem::Memory => {
            "Memory tests failed. Check for faulty RAM modules or memory configuration."
        }
        Subsystem::Disk => {
            "Disk performance is poor. Check SMART status and consider replacing failing drives."
        }
        Subsystem::Network => {
            "Network performance is poor. Check cable connections and switch configuration."
        }
    }
}

/// One advisory per `poor` subsystem in CPU, memory, disk, network order;
/// the healthy message when there are none.
pub fn recommendations(performance: Option<&PerformanceAnalysis>) -> Vec<String> {
    let mut out: Vec<String> = Subsystem::ALL
        .into_iter()
        .filter(|&s| {
            performance
                .and_then(|p| p.get(s))
                .map_or(false, |r| r.status == Status::Poor)
        })
        .map(|s| advisory(s).to_string())
        .collect();

    if out.is_empty() {
        out.push(HEALTHY.to_string());
    }
    out
}
