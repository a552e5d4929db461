//! Artifact rules: which tool output a check reads, which phrases make it pass,
//! and how many points a pass is worth.
//!
//! Matching is plain substring search over the artifact text. A rule with no
//! `require` and no `forbid` phrases is presence-only and never reads the file.

use serde::{Deserialize, Serialize};

use crate::utils::{DiagError, Result, Subsystem};

pub const FAILED_LABEL: &str = "failed";
pub const ERROR_LABEL: &str = "error";

/// Where the artifact lives relative to the subsystem directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Directly inside `performance/<subsystem>/`.
    #[default]
    Subsystem,
    /// Inside each per-device child directory.
    Device,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub subsystem: Subsystem,
    #[serde(default)]
    pub scope: Scope,
    /// File name of the tool output.
    pub artifact: String,
    /// Key the outcome is recorded under in the result details.
    pub check: String,
    #[serde(default)]
    pub require: Vec<String>,
    #[serde(default)]
    pub forbid: Vec<String>,
    pub points: u32,
    #[serde(default = "default_pass_label")]
    pub pass_label: String,
}

fn default_pass_label() -> String {
    "completed".to_string()
}

impl Rule {
    #[allow(clippy::too_many_arguments)]
    fn new(
        subsystem: Subsystem,
        scope: Scope,
        artifact: &str,
        check: &str,
        require: &[&str],
        forbid: &[&str],
        points: u32,
        pass_label: &str,
    ) -> Self {
        Self {
            subsystem,
            scope,
            artifact: artifact.to_string(),
            check: check.to_string(),
            require: require.iter().map(|s| s.to_string()).collect(),
            forbid: forbid.iter().map(|s| s.to_string()).collect(),
            points,
            pass_label: pass_label.to_string(),
        }
    }

    pub fn is_presence_only(&self) -> bool {
        self.require.is_empty() && self.forbid.is_empty()
    }

    /// True when every required phrase occurs and no forbidden phrase does.
    pub fn matches(&self, content: &str) -> bool {
        self.require.iter().all(|p| content.contains(p.as_str()))
            && !self.forbid.iter().any(|p| content.contains(p.as_str()))
    }

    pub fn evaluate(&self, content: &str) -> Outcome {
        if self.matches(content) { Outcome::Passed } else { Outcome::Failed }
    }

    /// Like `evaluate`, for text cut off at the read limit. A forbidden phrase
    /// may sit in the unread tail, so such rules cannot pass.
    pub fn evaluate_truncated(&self, content: &str) -> Outcome {
        if self.forbid.is_empty() { self.evaluate(content) } else { Outcome::Failed }
    }
}

/// Result of applying one rule to one present artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
    /// The artifact exists but could not be read.
    Error,
}

impl Outcome {
    pub fn points(self, rule: &Rule) -> u32 {
        match self {
            Outcome::Passed => rule.points,
            Outcome::Failed | Outcome::Error => 0,
        }
    }

    pub fn label(self, rule: &Rule) -> &str {
        match self {
            Outcome::Passed => &rule.pass_label,
            Outcome::Failed => FAILED_LABEL,
            Outcome::Error => ERROR_LABEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable(Vec<Rule>);

impl Default for RuleTable {
    fn default() -> Self {
        use Scope::{Device, Subsystem as Top};
        use Subsystem::*;

        Self(vec![
            Rule::new(Cpu, Top, "sysbench_cpu.txt", "sysbench", &["execution time"], &[], 25, "completed"),
            Rule::new(Cpu, Top, "stress_ng.txt", "stress_ng", &["completed"], &[], 25, "completed"),

            Rule::new(Memory, Top, "memtester.txt", "memtester", &["PASS"], &["FAIL"], 50, "passed"),
            Rule::new(Memory, Top, "stress_ng_memory.txt", "stress_ng", &["completed"], &[], 50, "completed"),

            Rule::new(
                Disk, Device, "smart.txt", "smart",
                &["SMART overall-health self-assessment test result: PASSED"], &[],
                20, "passed",
            ),
            Rule::new(Disk, Device, "fio_randread.txt", "fio_read", &["IOPS"], &[], 15, "completed"),

            Rule::new(Network, Top, "iperf3_localhost.txt", "iperf3", &["receiver", "sender"], &[], 50, "completed"),
            Rule::new(Network, Device, "ethtool.txt", "ethtool", &[], &[], 25, "configured"),
        ])
    }
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self(rules)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.0.iter()
    }

    /// Rules for one subsystem and scope, in table order.
    pub fn select(&self, subsystem: Subsystem, scope: Scope) -> impl Iterator<Item = &Rule> {
        self.0
            .iter()
            .filter(move |r| r.subsystem == subsystem && r.scope == scope)
    }

    pub fn has_device_rules(&self, subsystem: Subsystem) -> bool {
        self.select(subsystem, Scope::Device).next().is_some()
    }

    pub fn validate(&self) -> Result<()> {
        for rule in &self.0 {
            let name = &rule.artifact;
            if name.is_empty() || name.contains('/') || name.contains('\\') || name == "." || name == ".." {
                return Err(DiagError::Config(format!(
                    "{} rule {:?}: artifact must be a plain file name, got {:?}",
                    rule.subsystem, rule.check, name
                )));
            }
            if rule.check.is_empty() {
                return Err(DiagError::Config(format!(
                    "{} rule for {}: check name is empty",
                    rule.subsystem, name
                )));
            }
        }
        Ok(())
    }
}
