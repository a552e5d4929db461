//! Analysis output: the record handed back to the caller.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::report::SystemInfo;
use crate::utils::{Status, Subsystem};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub hostname: String,
    pub timestamp: String,
    pub processed_at: String,
    pub analysis: Analysis,
    pub health_score: u32,
    /// Always empty; kept for consumers that read it.
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub system: SystemBlock,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemBlock {
    pub cpu_count: u64,
    pub memory_gb: f64,
    pub architecture: String,
    pub kernel: String,
}

impl SystemBlock {
    pub fn from_info(info: Option<&SystemInfo>) -> Self {
        let info = info.cloned().unwrap_or_default();
        Self {
            cpu_count:    info.cpu_count.unwrap_or(0),
            memory_gb:    info.memory_gb.unwrap_or(0.0),
            architecture: info.architecture.unwrap_or_else(|| "unknown".to_string()),
            kernel:       info.kernel.unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

/// A check outcome, or per-device outcomes keyed by check name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Detail {
    Outcome(String),
    Device(BTreeMap<String, String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsystemResult {
    pub status: Status,
    pub score: u32,
    pub details: BTreeMap<String, Detail>,
}

impl SubsystemResult {
    pub fn outcome(&self, key: &str) -> Option<&str> {
        match self.details.get(key)? {
            Detail::Outcome(s) => Some(s),
            Detail::Device(_) => None,
        }
    }

    pub fn device(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        match self.details.get(name)? {
            Detail::Device(m) => Some(m),
            Detail::Outcome(_) => None,
        }
    }
}

/// Results for the subsystems that were tested. Untested ones stay `None`
/// and are left out of the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<SubsystemResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<SubsystemResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<SubsystemResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<SubsystemResult>,
}

impl PerformanceAnalysis {
    pub fn get(&self, subsystem: Subsystem) -> Option<&SubsystemResult> {
        match subsystem {
            Subsystem::Cpu => self.cpu.as_ref(),
            Subsystem::Memory => self.memory.as_ref(),
            Subsystem::Disk => self.disk.as_ref(),
            Subsystem::Network => self.network.as_ref(),
        }
    }

    pub fn set(&mut self, subsystem: Subsystem, result: SubsystemResult) {
        let slot = match subsystem {
            Subsystem::Cpu => &mut self.cpu,
            Subsystem::Memory => &mut self.memory,
            Subsystem::Disk => &mut self.disk,
            Subsystem::Network => &mut self.network,
        };
        *slot = Some(result);
    }

    /// Tested subsystems in CPU, memory, disk, network order.
    pub fn tested(&self) -> impl Iterator<Item = (Subsystem, &SubsystemResult)> {
        Subsystem::ALL
            .into_iter()
            .filter_map(move |s| self.get(s).map(|r| (s, r)))
    }

    pub fn is_empty(&self) -> bool {
        self.tested().next().is_none()
    }
}
