//! Subsystem analyzers. One rule-driven implementation serves CPU, memory,
//! disk and network; the rule table decides which artifacts each one reads.

use std::collections::BTreeMap;
use std::path::Path;

use crate::analysis::reader::{device_dirs, Artifact, ArtifactReader};
use crate::analysis::record::{Detail, SubsystemResult};
use crate::analysis::rules::{Outcome, Rule, RuleTable, Scope};
use crate::config::{EngineConfig, Thresholds};
use crate::utils::{Result, Subsystem};

const MAX_SCORE: u32 = 100;

/// How per-device outcomes are recorded in the details map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeviceLayout {
    /// `{device: {check: outcome}}`, present for every device directory.
    Nested,
    /// `{device: outcome}`, only for devices that produced an outcome.
    Flat,
}

fn device_layout(subsystem: Subsystem) -> DeviceLayout {
    match subsystem {
        Subsystem::Network => DeviceLayout::Flat,
        _ => DeviceLayout::Nested,
    }
}

/// First non-passing outcome, else the first rule's pass label. `None` when
/// the device produced no outcome at all.
fn flat_label(outcomes: &[(&Rule, Outcome)]) -> Option<String> {
    let (rule, outcome) = outcomes
        .iter()
        .find(|(_, o)| *o != Outcome::Passed)
        .or_else(|| outcomes.first())?;
    Some(outcome.label(rule).to_string())
}

pub struct SubsystemAnalyzer<'a> {
    subsystem: Subsystem,
    rules: &'a RuleTable,
    reader: ArtifactReader,
    thresholds: Thresholds,
    cap_score: bool,
}

impl<'a> SubsystemAnalyzer<'a> {
    pub fn new(subsystem: Subsystem, config: &'a EngineConfig) -> Self {
        Self {
            subsystem,
            rules: &config.rules,
            reader: ArtifactReader::new(config.max_artifact_bytes),
            thresholds: config.thresholds.get(subsystem),
            cap_score: config.cap_subsystem_scores,
        }
    }

    /// Scores `dir` (`performance/<subsystem>/`). Only a failure to list
    /// device directories is returned as an error.
    pub fn analyze(&self, dir: &Path) -> Result<SubsystemResult> {
        let mut score = 0u32;
        let mut details = BTreeMap::new();

        for rule in self.rules.select(self.subsystem, Scope::Subsystem) {
            if let Some(outcome) = self.apply(rule, &dir.join(&rule.artifact)) {
                score = score.saturating_add(outcome.points(rule));
                details.insert(rule.check.clone(), Detail::Outcome(outcome.label(rule).to_string()));
            }
        }

        if self.rules.has_device_rules(self.subsystem) {
            for (device, path) in device_dirs(dir, self.subsystem.ignored_devices())? {
                // table order
                let mut outcomes: Vec<(&Rule, Outcome)> = Vec::new();
                for rule in self.rules.select(self.subsystem, Scope::Device) {
                    if let Some(outcome) = self.apply(rule, &path.join(&rule.artifact)) {
                        score = score.saturating_add(outcome.points(rule));
                        outcomes.push((rule, outcome));
                    }
                }

                match device_layout(self.subsystem) {
                    DeviceLayout::Nested => {
                        let checks = outcomes
                            .iter()
                            .map(|(rule, outcome)| (rule.check.clone(), outcome.label(rule).to_string()))
                            .collect();
                        details.insert(device, Detail::Device(checks));
                    }
                    DeviceLayout::Flat => {
                        if let Some(label) = flat_label(&outcomes) {
                            details.insert(device, Detail::Outcome(label));
                        }
                    }
                }
            }
        }

        if self.cap_score && score > MAX_SCORE {
            tracing::debug!(subsystem = %self.subsystem, raw = score, "score capped at {}", MAX_SCORE);
            score = MAX_SCORE;
        }

        let status = self.thresholds.classify(score);
        tracing::debug!(subsystem = %self.subsystem, score, %status, checks = details.len(), "subsystem analyzed");

        Ok(SubsystemResult { status, score, details })
    }

    /// `None` when the artifact is absent; such checks leave no detail entry.
    fn apply(&self, rule: &Rule, path: &Path) -> Option<Outcome> {
        if rule.is_presence_only() {
            return self.reader.exists(path).then_some(Outcome::Passed);
        }

        match self.reader.read(path) {
            Artifact::Missing => None,
            Artifact::Text(content) => Some(rule.evaluate(&content)),
            Artifact::Truncated(content) => Some(rule.evaluate_truncated(&content)),
            Artifact::Unreadable(_) => Some(Outcome::Error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Status;
    use std::fs;
    use tempfile::TempDir;

    const SMART_OK: &str = "SMART overall-health self-assessment test result: PASSED\n";
    const FIO_OK: &str = "  read: IOPS=45.2k, BW=177MiB/s (185MB/s)\n";

    fn analyze(subsystem: Subsystem, dir: &Path) -> SubsystemResult {
        let config = EngineConfig::default();
        SubsystemAnalyzer::new(subsystem, &config).analyze(dir).unwrap()
    }

    fn disk(root: &Path, name: &str, smart: Option<&str>, fio: Option<&str>) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        if let Some(s) = smart {
            fs::write(dir.join("smart.txt"), s).unwrap();
        }
        if let Some(f) = fio {
            fs::write(dir.join("fio_randread.txt"), f).unwrap();
        }
    }

    #[test]
    fn cpu_with_sysbench_only_is_fair() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("sysbench_cpu.txt"), "execution time: 3.2s").unwrap();

        let r = analyze(Subsystem::Cpu, tmp.path());
        assert_eq!(r.score, 25);
        assert_eq!(r.status, Status::Fair);
        assert_eq!(r.outcome("sysbench"), Some("completed"));
        assert_eq!(r.outcome("stress_ng"), None);
    }

    #[test]
    fn cpu_both_checks_is_good_at_fifty() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("sysbench_cpu.txt"), "execution time: 3.2s").unwrap();
        fs::write(tmp.path().join("stress_ng.txt"), "stress-ng: info: successful run completed").unwrap();

        let r = analyze(Subsystem::Cpu, tmp.path());
        assert_eq!(r.score, 50);
        assert_eq!(r.status, Status::Good);
    }

    #[test]
    fn cpu_failed_and_unreadable_checks_score_nothing() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("sysbench_cpu.txt"), "FATAL: no such test").unwrap();
        fs::create_dir(tmp.path().join("stress_ng.txt")).unwrap();

        let r = analyze(Subsystem::Cpu, tmp.path());
        assert_eq!(r.score, 0);
        assert_eq!(r.status, Status::Poor);
        assert_eq!(r.outcome("sysbench"), Some("failed"));
        assert_eq!(r.outcome("stress_ng"), Some("error"));
    }

    #[test]
    fn empty_directory_is_poor_with_no_details() {
        let tmp = TempDir::new().unwrap();
        let r = analyze(Subsystem::Memory, tmp.path());
        assert_eq!(r.score, 0);
        assert_eq!(r.status, Status::Poor);
        assert!(r.details.is_empty());
    }

    #[test]
    fn memtester_pass_only_is_fair() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("memtester.txt"), "PASS").unwrap();

        let r = analyze(Subsystem::Memory, tmp.path());
        assert_eq!(r.score, 50);
        assert_eq!(r.status, Status::Fair);
        assert_eq!(r.outcome("memtester"), Some("passed"));
    }

    #[test]
    fn memtester_with_a_fail_line_fails() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("memtester.txt"), "Random Value : PASS\nSolid Bits : FAIL\n").unwrap();
        fs::write(tmp.path().join("stress_ng_memory.txt"), "completed").unwrap();

        let r = analyze(Subsystem::Memory, tmp.path());
        assert_eq!(r.score, 50);
        assert_eq!(r.outcome("memtester"), Some("failed"));
        assert_eq!(r.outcome("stress_ng"), Some("completed"));
    }

    #[test]
    fn two_healthy_disks_accumulate() {
        let tmp = TempDir::new().unwrap();
        disk(tmp.path(), "sda", Some(SMART_OK), Some(FIO_OK));
        disk(tmp.path(), "nvme0n1", Some(SMART_OK), Some(FIO_OK));

        let r = analyze(Subsystem::Disk, tmp.path());
        assert_eq!(r.score, 70);
        assert_eq!(r.status, Status::Good);
        let sda = r.device("sda").unwrap();
        assert_eq!(sda.get("smart").map(String::as_str), Some("passed"));
        assert_eq!(sda.get("fio_read").map(String::as_str), Some("completed"));
    }

    #[test]
    fn three_disks_are_capped_at_one_hundred() {
        let tmp = TempDir::new().unwrap();
        for name in ["sda", "sdb", "sdc"] {
            disk(tmp.path(), name, Some(SMART_OK), Some(FIO_OK));
        }

        let r = analyze(Subsystem::Disk, tmp.path());
        assert_eq!(r.score, 100);
        assert_eq!(r.status, Status::Good);
    }

    #[test]
    fn uncapped_scores_keep_accumulating() {
        let tmp = TempDir::new().unwrap();
        for name in ["sda", "sdb", "sdc"] {
            disk(tmp.path(), name, Some(SMART_OK), Some(FIO_OK));
        }

        let config = EngineConfig { cap_subsystem_scores: false, ..Default::default() };
        let r = SubsystemAnalyzer::new(Subsystem::Disk, &config).analyze(tmp.path()).unwrap();
        assert_eq!(r.score, 105);
        assert_eq!(r.status, Status::Good);
    }

    #[test]
    fn disk_without_artifacts_still_listed() {
        let tmp = TempDir::new().unwrap();
        disk(tmp.path(), "sda", Some("SMART overall-health self-assessment test result: FAILED!"), None);
        disk(tmp.path(), "loop0", None, None);
        fs::write(tmp.path().join("lsblk.txt"), "NAME SIZE").unwrap();

        let r = analyze(Subsystem::Disk, tmp.path());
        assert_eq!(r.score, 0);
        assert_eq!(r.status, Status::Poor);
        assert!(r.device("loop0").unwrap().is_empty());
        assert_eq!(r.device("sda").unwrap().get("smart").map(String::as_str), Some("failed"));
        assert_eq!(r.details.len(), 2);
    }

    #[test]
    fn network_counts_interfaces_but_not_loopback() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("iperf3_localhost.txt"),
            "[  5]   0.00-10.00  sec  42.1 GBytes  36.2 Gbits/sec    sender\n\
             [  5]   0.00-10.04  sec  42.1 GBytes  36.0 Gbits/sec    receiver\n",
        )
        .unwrap();
        for iface in ["eth0", "lo", "wlan0"] {
            fs::create_dir(tmp.path().join(iface)).unwrap();
            fs::write(tmp.path().join(iface).join("ethtool.txt"), "Link detected: yes").unwrap();
        }
        fs::create_dir(tmp.path().join("eth1")).unwrap();

        let r = analyze(Subsystem::Network, tmp.path());
        assert_eq!(r.score, 100);
        assert_eq!(r.status, Status::Good);
        assert_eq!(r.outcome("iperf3"), Some("completed"));
        assert_eq!(r.outcome("eth0"), Some("configured"));
        assert_eq!(r.outcome("wlan0"), Some("configured"));
        assert!(!r.details.contains_key("lo"));
        assert!(!r.details.contains_key("eth1"));
    }

    #[test]
    fn memtester_failure_past_the_read_limit_is_not_a_pass() {
        let tmp = TempDir::new().unwrap();
        let body = format!("Loop 1: PASS\n{}\nLoop 2: FAIL\n", "-".repeat(64));
        fs::write(tmp.path().join("memtester.txt"), body).unwrap();

        let config = EngineConfig { max_artifact_bytes: 32, ..Default::default() };
        let r = SubsystemAnalyzer::new(Subsystem::Memory, &config).analyze(tmp.path()).unwrap();
        assert_eq!(r.outcome("memtester"), Some("failed"));
        assert_eq!(r.score, 0);
    }

    #[test]
    fn flat_interface_label_reports_the_first_problem() {
        let mut rules: Vec<Rule> = RuleTable::default().iter().cloned().collect();
        rules.push(Rule {
            subsystem: Subsystem::Network,
            scope: Scope::Device,
            artifact: "link.txt".to_string(),
            check: "link".to_string(),
            require: vec!["Link detected: yes".to_string()],
            forbid: vec![],
            points: 10,
            pass_label: "up".to_string(),
        });
        let config = EngineConfig { rules: RuleTable::new(rules), ..Default::default() };

        let tmp = TempDir::new().unwrap();
        for (iface, link) in [("eth0", "Link detected: yes"), ("eth1", "Link detected: no")] {
            fs::create_dir(tmp.path().join(iface)).unwrap();
            fs::write(tmp.path().join(iface).join("ethtool.txt"), "Speed: 1000Mb/s").unwrap();
            fs::write(tmp.path().join(iface).join("link.txt"), link).unwrap();
        }
        fs::create_dir(tmp.path().join("eth2")).unwrap();
        fs::write(tmp.path().join("eth2").join("link.txt"), "Link detected: yes").unwrap();

        let r = SubsystemAnalyzer::new(Subsystem::Network, &config).analyze(tmp.path()).unwrap();
        assert_eq!(r.outcome("eth0"), Some("configured"));
        assert_eq!(r.outcome("eth1"), Some("failed"));
        assert_eq!(r.outcome("eth2"), Some("up"));
        // 25 + 10, 25, 10
        assert_eq!(r.score, 70);
    }

    #[test]
    fn network_one_interface_without_iperf_is_poor() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("eth0")).unwrap();
        fs::write(tmp.path().join("eth0").join("ethtool.txt"), "").unwrap();

        let r = analyze(Subsystem::Network, tmp.path());
        assert_eq!(r.score, 25);
        assert_eq!(r.status, Status::Poor);
    }
}
