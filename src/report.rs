//! Diagnostic report as uploaded by a test run (`report.json`).
//!
//! Decoding is lenient: wrong-typed or missing fields fall back to defaults
//! instead of rejecting the whole report.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub cpu_count: Option<u64>,
    pub memory_gb: Option<f64>,
    pub architecture: Option<String>,
    pub kernel: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub hostname: String,
    pub timestamp: String,
    /// `None` when the report carried no `system_info` object at all.
    pub system_info: Option<SystemInfo>,
    /// `test_results.overall` as written by the test runner.
    pub overall_status: Option<String>,
    /// Directory holding `report.json` and the `performance/` tree.
    pub artifact_root: PathBuf,
    /// Decoded document, unknown fields included.
    pub raw: serde_json::Value,
}

impl Report {
    pub fn new(hostname: &str, timestamp: &str, system_info: Option<SystemInfo>, artifact_root: &Path) -> Self {
        Self {
            hostname: hostname.to_string(),
            timestamp: timestamp.to_string(),
            system_info,
            overall_status: None,
            artifact_root: artifact_root.to_path_buf(),
            raw: serde_json::Value::Null,
        }
    }

    pub fn from_value(raw: serde_json::Value, artifact_root: &Path) -> Self {
        let hostname = raw["hostname"].as_str().unwrap_or("unknown").to_string();
        let timestamp = raw["timestamp"].as_str().unwrap_or("").to_string();
        let system_info = raw["system_info"].as_object().map(|s| SystemInfo {
            cpu_count:    s.get("cpu_count").and_then(|v| v.as_u64()),
            memory_gb:    s.get("memory_gb").and_then(|v| v.as_f64()),
            architecture: s.get("architecture").and_then(|v| v.as_str()).map(String::from),
            kernel:       s.get("kernel").and_then(|v| v.as_str()).map(String::from),
        });
        let overall_status = raw["test_results"]["overall"].as_str().map(String::from);

        Self {
            hostname,
            timestamp,
            system_info,
            overall_status,
            artifact_root: artifact_root.to_path_buf(),
            raw,
        }
    }

    pub fn performance_dir(&self) -> PathBuf {
        self.artifact_root.join("performance")
    }
}
