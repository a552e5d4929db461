//! Health scorer: weighted 0-100 figure over the parts of a report that were
//! actually tested.

use crate::analysis::record::PerformanceAnalysis;
use crate::config::Weights;

/// Earned and attainable points. Untested parts add to neither side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreAccumulator {
    pub earned: f64,
    pub possible: f64,
}

impl ScoreAccumulator {
    pub fn add(&mut self, earned: f64, possible: f64) {
        self.earned += earned;
        self.possible += possible;
    }

    /// `round(earned / possible * 100)` clamped to 0..=100, or 0 when nothing
    /// was attainable.
    pub fn percent(&self) -> u32 {
        if self.possible <= 0.0 {
            return 0;
        }
        let pct = (self.earned / self.possible * 100.0).round();
        pct.clamp(0.0, 100.0) as u32
    }
}

/// The system weight is awarded in full unless the report carried neither
/// system info nor any tested subsystem. Each tested subsystem contributes
/// `score / 100` of its weight.
pub fn health_score(
    system_reported: bool,
    performance: Option<&PerformanceAnalysis>,
    weights: &Weights,
) -> u32 {
    let mut acc = ScoreAccumulator::default();

    let anything_tested = performance.map_or(false, |p| !p.is_empty());
    if system_reported || anything_tested {
        acc.add(weights.system, weights.system);
    }

    if let Some(perf) = performance {
        for (_, result) in perf.tested() {
            acc.add(result.score as f64 / 100.0 * weights.per_subsystem, weights.per_subsystem);
        }
    }

    acc.percent()
}
