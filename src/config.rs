//! Engine configuration: reports location, artifact read cap, scoring weights,
//! status thresholds and the artifact rule table.
//!
//! Every field has a default, so a config file only needs the keys it changes:
//!
//! ```toml
//! reports_dir = "/srv/reports"
//! max_artifact_bytes = 1048576
//!
//! [thresholds.network]
//! good = 100
//! fair = 50
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::rules::RuleTable;
use crate::utils::{DiagError, Result, Status, Subsystem};

pub const DEFAULT_REPORTS_DIR: &str = "/var/lib/foreman-reports";
pub const DEFAULT_MAX_ARTIFACT_BYTES: u64 = 4 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub reports_dir: PathBuf,
    /// Bytes read from a single artifact before the rest is ignored.
    pub max_artifact_bytes: u64,
    /// Clamp per-subsystem scores to 100 before classification and weighting.
    /// Disk and network accumulate per device and can otherwise exceed it.
    pub cap_subsystem_scores: bool,
    pub weights: Weights,
    pub thresholds: SubsystemThresholds,
    pub rules: RuleTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
            max_artifact_bytes: DEFAULT_MAX_ARTIFACT_BYTES,
            cap_subsystem_scores: true,
            weights: Weights::default(),
            thresholds: SubsystemThresholds::default(),
            rules: RuleTable::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    /// Points for the system-info block.
    pub system: f64,
    /// Points for each tested subsystem, scaled by its 0-100 score.
    pub per_subsystem: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self { system: 25.0, per_subsystem: 18.75 }
    }
}

/// Lower bounds for `good` and `fair`; anything below `fair` is `poor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub good: u32,
    pub fair: u32,
}

impl Thresholds {
    pub fn classify(&self, score: u32) -> Status {
        if score >= self.good {
            Status::Good
        } else if score >= self.fair {
            Status::Fair
        } else {
            Status::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubsystemThresholds {
    pub cpu: Thresholds,
    pub memory: Thresholds,
    pub disk: Thresholds,
    pub network: Thresholds,
}

impl Default for SubsystemThresholds {
    fn default() -> Self {
        Self {
            // two 25-point checks, so 50 is the ceiling
            cpu:     Thresholds { good: 50, fair: 25 },
            memory:  Thresholds { good: 75, fair: 50 },
            disk:    Thresholds { good: 50, fair: 25 },
            network: Thresholds { good: 75, fair: 50 },
        }
    }
}

impl SubsystemThresholds {
    pub fn get(&self, subsystem: Subsystem) -> Thresholds {
        match subsystem {
            Subsystem::Cpu => self.cpu,
            Subsystem::Memory => self.memory,
            Subsystem::Disk => self.disk,
            Subsystem::Network => self.network,
        }
    }
}

impl EngineConfig {
    /// Reads `path` when given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path)
            .map_err(|e| DiagError::Config(format!("{}: {}", path.display(), e)))?;
        let cfg = Self::from_toml_str(&text)
            .map_err(|e| DiagError::Config(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Self = toml::from_str(text).map_err(|e| DiagError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let w = &self.weights;
        if !w.system.is_finite() || !w.per_subsystem.is_finite() || w.system < 0.0 || w.per_subsystem < 0.0 {
            return Err(DiagError::Config(format!(
                "weights must be finite and non-negative (system={}, per_subsystem={})",
                w.system, w.per_subsystem
            )));
        }

        for subsystem in Subsystem::ALL {
            let t = self.thresholds.get(subsystem);
            if t.fair > t.good {
                return Err(DiagError::Config(format!(
                    "{} thresholds: fair ({}) is above good ({})",
                    subsystem, t.fair, t.good
                )));
            }
        }

        if self.max_artifact_bytes == 0 {
            return Err(DiagError::Config("max_artifact_bytes must be positive".to_string()));
        }

        self.rules.validate()
    }
}
