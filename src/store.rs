//! Report store: one directory per host under the reports root, each holding
//! `report.json` next to the artifact tree.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::report::Report;
use crate::utils::{DiagError, Result};

const REPORT_FILE: &str = "report.json";
const RECENT_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct ReportStore {
    root: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportStats {
    pub total_reports: usize,
    pub recent_reports_7d: usize,
    /// Count per `test_results.overall`, "unknown" when absent.
    pub status_distribution: BTreeMap<String, usize>,
    pub last_report: Option<String>,
}

impl ReportStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `Ok(None)` when the host has no report or it cannot be decoded.
    pub fn get_report(&self, hostname: &str) -> Result<Option<Report>> {
        validate_hostname(hostname)?;
        Ok(load_report(&self.root.join(hostname)))
    }

    /// Every decodable report, newest `timestamp` first.
    pub fn scan_reports(&self) -> Result<Vec<Report>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(root = %self.root.display(), "reports directory does not exist");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut reports: Vec<Report> = entries
            .flatten()
            .filter(|e| e.path().is_dir())
            .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
            .filter_map(|e| load_report(&e.path()))
            .collect();

        // ISO-8601 strings sort chronologically
        reports.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(reports)
    }

    pub fn stats(&self, now: DateTime<Utc>) -> Result<ReportStats> {
        Ok(compute_stats(&self.scan_reports()?, now))
    }
}

/// Expects `reports` newest first, as returned by `scan_reports`.
pub fn compute_stats(reports: &[Report], now: DateTime<Utc>) -> ReportStats {
    let cutoff = now - Duration::days(RECENT_DAYS);

    let recent_reports_7d = reports
        .iter()
        .filter(|r| parse_timestamp(&r.timestamp).map_or(false, |t| t > cutoff))
        .count();

    let mut status_distribution = BTreeMap::new();
    for r in reports {
        let status = r.overall_status.clone().unwrap_or_else(|| "unknown".to_string());
        *status_distribution.entry(status).or_insert(0) += 1;
    }

    ReportStats {
        total_reports: reports.len(),
        recent_reports_7d,
        status_distribution,
        last_report: reports.first().map(|r| r.timestamp.clone()),
    }
}

/// RFC 3339, or naive ISO-8601 taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|t| Utc.from_utc_datetime(&t))
}

fn validate_hostname(hostname: &str) -> Result<()> {
    if hostname.is_empty()
        || hostname.starts_with('.')
        || hostname.contains('/')
        || hostname.contains('\\')
        || hostname.contains('\0')
    {
        return Err(DiagError::InvalidHostname(hostname.to_string()));
    }
    Ok(())
}

fn load_report(dir: &Path) -> Option<Report> {
    let path = dir.join(REPORT_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read report");
            return None;
        }
    };

    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(raw) => Some(Report::from_value(raw, dir)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to decode report");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn put(root: &Path, dir: &str, body: &serde_json::Value) {
        fs::create_dir_all(root.join(dir)).unwrap();
        fs::write(root.join(dir).join(REPORT_FILE), body.to_string()).unwrap();
    }

    #[test]
    fn get_report_sets_artifact_root() {
        let tmp = TempDir::new().unwrap();
        put(tmp.path(), "node-1", &json!({"hostname": "node-1", "timestamp": "2024-03-01T00:00:00Z"}));

        let store = ReportStore::new(tmp.path());
        let r = store.get_report("node-1").unwrap().unwrap();
        assert_eq!(r.hostname, "node-1");
        assert_eq!(r.artifact_root, tmp.path().join("node-1"));
        assert!(store.get_report("node-2").unwrap().is_none());
    }

    #[test]
    fn undecodable_report_is_none() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("broken")).unwrap();
        fs::write(tmp.path().join("broken").join(REPORT_FILE), "{ not json").unwrap();

        assert!(ReportStore::new(tmp.path()).get_report("broken").unwrap().is_none());
    }

    #[test]
    fn rejects_path_like_hostnames() {
        let store = ReportStore::new("/tmp");
        for bad in ["", "..", "../etc", "a/b", ".hidden"] {
            assert!(
                matches!(store.get_report(bad), Err(DiagError::InvalidHostname(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn scan_sorts_newest_first_and_skips_noise() {
        let tmp = TempDir::new().unwrap();
        put(tmp.path(), "a", &json!({"hostname": "a", "timestamp": "2024-01-01T00:00:00Z"}));
        put(tmp.path(), "b", &json!({"hostname": "b", "timestamp": "2024-06-01T00:00:00Z"}));
        put(tmp.path(), "c", &json!({"hostname": "c"}));
        put(tmp.path(), ".staging", &json!({"hostname": "hidden", "timestamp": "2030-01-01T00:00:00Z"}));
        fs::create_dir(tmp.path().join("empty")).unwrap();
        fs::write(tmp.path().join("upload.tar.gz"), "x").unwrap();

        let names: Vec<String> = ReportStore::new(tmp.path())
            .scan_reports()
            .unwrap()
            .into_iter()
            .map(|r| r.hostname)
            .collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn missing_root_scans_empty() {
        let store = ReportStore::new("/nonexistent/pxediag-reports");
        assert!(store.scan_reports().unwrap().is_empty());
    }

    #[test]
    fn stats_count_recent_and_statuses() {
        let tmp = TempDir::new().unwrap();
        put(tmp.path(), "a", &json!({"timestamp": "2024-06-10T12:00:00Z", "test_results": {"overall": "passed"}}));
        put(tmp.path(), "b", &json!({"timestamp": "2024-06-09T08:30:00", "test_results": {"overall": "failed"}}));
        put(tmp.path(), "c", &json!({"timestamp": "2024-05-01T00:00:00Z", "test_results": {"overall": "passed"}}));
        put(tmp.path(), "d", &json!({"timestamp": "yesterday"}));

        let now = Utc.with_ymd_and_hms(2024, 6, 12, 0, 0, 0).unwrap();
        let stats = ReportStore::new(tmp.path()).stats(now).unwrap();

        assert_eq!(stats.total_reports, 4);
        assert_eq!(stats.recent_reports_7d, 2);
        assert_eq!(stats.status_distribution.get("passed"), Some(&2));
        assert_eq!(stats.status_distribution.get("failed"), Some(&1));
        assert_eq!(stats.status_distribution.get("unknown"), Some(&1));
        // "yesterday" sorts above the digits
        assert_eq!(stats.last_report.as_deref(), Some("yesterday"));
    }

    #[test]
    fn stats_of_nothing() {
        let stats = compute_stats(&[], Utc::now());
        assert_eq!(stats.total_reports, 0);
        assert_eq!(stats.last_report, None);
        assert!(stats.status_distribution.is_empty());
    }

    #[test]
    fn parses_both_timestamp_styles() {
        let z = parse_timestamp("2024-06-10T12:00:00Z").unwrap();
        let naive = parse_timestamp("2024-06-10T12:00:00.250000").unwrap();
        assert_eq!((naive - z).num_milliseconds(), 250);
        assert!(parse_timestamp("2024-06-10T14:00:00+02:00").unwrap() == z);
        assert!(parse_timestamp("").is_none());
    }
}
