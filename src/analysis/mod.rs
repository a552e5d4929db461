//! Diagnostic analysis: artifact rules, subsystem analyzers, health scoring
//! and recommendations, driven by `ReportProcessor`.

pub mod performance;
pub mod reader;
pub mod recommend;
pub mod record;
pub mod rules;
pub mod scorer;
pub mod subsystem;

use chrono::{SecondsFormat, Utc};

use crate::config::EngineConfig;
use crate::report::Report;
use crate::utils::Result;
use reader::probe_dir;
use record::{Analysis, AnalysisRecord, SystemBlock};

/// Turns one decoded report plus its artifact tree into an `AnalysisRecord`.
///
/// Holds only configuration, so one processor can serve any number of
/// reports, from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct ReportProcessor {
    config: EngineConfig,
}

impl ReportProcessor {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Missing or unreadable artifacts and malformed report fields degrade the
    /// result. Errors are reserved for failing to stat or list the artifact
    /// tree itself.
    pub fn analyze(&self, report: &Report) -> Result<AnalysisRecord> {
        tracing::info!(hostname = %report.hostname, root = %report.artifact_root.display(), "analyzing report");

        let system = SystemBlock::from_info(report.system_info.as_ref());

        let perf_dir = report.performance_dir();
        let performance = if probe_dir(&perf_dir)? {
            Some(performance::analyze_performance(&perf_dir, &self.config)?)
        } else {
            tracing::debug!(path = %perf_dir.display(), "no performance artifacts");
            None
        };

        let health_score = scorer::health_score(
            report.system_info.is_some(),
            performance.as_ref(),
            &self.config.weights,
        );
        let recommendations = recommend::recommendations(performance.as_ref());

        tracing::info!(hostname = %report.hostname, health_score, "analysis complete");

        Ok(AnalysisRecord {
            hostname: report.hostname.clone(),
            timestamp: report.timestamp.clone(),
            processed_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            analysis: Analysis { system, performance },
            health_score,
            issues: Vec::new(),
            recommendations,
        })
    }
}
