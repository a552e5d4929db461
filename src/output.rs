//! 输出层：渲染分析结果、报告列表与统计，text 或 json

use std::fmt::Write;

use crate::analysis::record::{AnalysisRecord, Detail, SubsystemResult};
use crate::report::Report;
use crate::store::ReportStats;
use crate::utils::{DiagError, Result, Status};

pub fn display_analysis(record: &AnalysisRecord, format: &str) -> Result<()> {
    print!("{}", render_analysis(record, format)?);
    Ok(())
}

pub fn display_reports(reports: &[Report], format: &str) -> Result<()> {
    print!("{}", render_reports(reports, format)?);
    Ok(())
}

pub fn display_stats(stats: &ReportStats, format: &str) -> Result<()> {
    print!("{}", render_stats(stats, format)?);
    Ok(())
}

pub fn render_analysis(record: &AnalysisRecord, format: &str) -> Result<String> {
    match format {
        "json" => to_json(record),
        "text" => Ok(analysis_text(record)),
        other  => Err(DiagError::Format(other.to_string())),
    }
}

pub fn render_reports(reports: &[Report], format: &str) -> Result<String> {
    match format {
        "json" => {
            let docs: Vec<serde_json::Value> = reports.iter().map(report_json).collect();
            to_json(&serde_json::json!({ "count": docs.len(), "reports": docs }))
        }
        "text" => Ok(reports_text(reports)),
        other  => Err(DiagError::Format(other.to_string())),
    }
}

pub fn render_stats(stats: &ReportStats, format: &str) -> Result<String> {
    match format {
        "json" => to_json(stats),
        "text" => Ok(stats_text(stats)),
        other  => Err(DiagError::Format(other.to_string())),
    }
}

/// Stored document with its location, as listed to API consumers.
pub fn report_json(report: &Report) -> serde_json::Value {
    let mut doc = match &report.raw {
        serde_json::Value::Object(map) => map.clone(),
        _ => serde_json::Map::new(),
    };
    doc.insert(
        "_path".to_string(),
        serde_json::Value::String(report.artifact_root.to_string_lossy().into_owned()),
    );
    serde_json::Value::Object(doc)
}

// ── JSON ────────────────────────────────────────────────────────────────────

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)
        .map_err(|e| DiagError::Parse(format!("JSON serialize: {}", e)))?;
    json.push('\n');
    Ok(json)
}

// ── Text ────────────────────────────────────────────────────────────────────

fn analysis_text(r: &AnalysisRecord) -> String {
    let mut out = String::new();

    section(&mut out, "REPORT");
    line(&mut out, format_args!("  Hostname     : {}", r.hostname));
    line(&mut out, format_args!("  Timestamp    : {}", or_none(&r.timestamp)));
    line(&mut out, format_args!("  Processed at : {}", r.processed_at));

    section(&mut out, "SYSTEM");
    let s = &r.analysis.system;
    line(&mut out, format_args!("  CPUs         : {}", s.cpu_count));
    line(&mut out, format_args!("  Memory       : {} GB", s.memory_gb));
    line(&mut out, format_args!("  Arch         : {}", s.architecture));
    line(&mut out, format_args!("  Kernel       : {}", s.kernel));

    section(&mut out, "PERFORMANCE");
    match r.analysis.performance.as_ref().filter(|p| !p.is_empty()) {
        Some(perf) => {
            for (subsystem, result) in perf.tested() {
                subsystem_text(&mut out, &subsystem.to_string(), result);
            }
        }
        None => line(&mut out, format_args!("  (no performance artifacts)")),
    }

    section(&mut out, &format!("HEALTH SCORE: {}/100", r.health_score));
    if !r.issues.is_empty() {
        line(&mut out, format_args!("  Issues:"));
        for issue in &r.issues {
            line(&mut out, format_args!("    ⚠ {}", issue));
        }
    }
    line(&mut out, format_args!("  Recommendations:"));
    for rec in &r.recommendations {
        line(&mut out, format_args!("    - {}", rec));
    }

    out
}

fn subsystem_text(out: &mut String, name: &str, result: &SubsystemResult) {
    line(out, format_args!("  {} {:<8} [{}]  score {}", status_icon(result.status), name, result.status, result.score));

    for (key, detail) in &result.details {
        match detail {
            Detail::Outcome(outcome) => {
                line(out, format_args!("      {:<14}: {}", key, outcome));
            }
            Detail::Device(checks) if checks.is_empty() => {
                line(out, format_args!("      {:<14}: (no results)", key));
            }
            Detail::Device(checks) => {
                let joined: Vec<String> = checks.iter().map(|(c, o)| format!("{}={}", c, o)).collect();
                line(out, format_args!("      {:<14}: {}", key, joined.join("  ")));
            }
        }
    }
}

fn reports_text(reports: &[Report]) -> String {
    let mut out = String::new();
    section(&mut out, &format!("REPORTS ({})", reports.len()));

    let width = reports.iter().map(|r| r.hostname.len()).max().unwrap_or(0).max(8);
    for r in reports {
        line(&mut out, format_args!(
            "  {:<w$}  {:<27}  {}",
            r.hostname,
            or_none(&r.timestamp),
            r.overall_status.as_deref().unwrap_or("unknown"),
            w = width,
        ));
    }
    out
}

fn stats_text(s: &ReportStats) -> String {
    let mut out = String::new();
    section(&mut out, "STATS");
    line(&mut out, format_args!("  Total reports : {}", s.total_reports));
    line(&mut out, format_args!("  Last 7 days   : {}", s.recent_reports_7d));
    line(&mut out, format_args!("  Last report   : {}", s.last_report.as_deref().unwrap_or("(none)")));
    if !s.status_distribution.is_empty() {
        line(&mut out, format_args!("  By status:"));
        for (status, count) in &s.status_distribution {
            line(&mut out, format_args!("    {:<12} {}", status, count));
        }
    }
    out
}

// ── 格式化工具 ───────────────────────────────────────────────────────────────

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", "─".repeat(60));
    let _ = writeln!(out, "  {}", title);
    let _ = writeln!(out, "{}", "─".repeat(60));
}

fn line(out: &mut String, args: std::fmt::Arguments<'_>) {
    let _ = out.write_fmt(args);
    out.push('\n');
}

fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Good    => "●",
        Status::Fair    => "◐",
        Status::Poor    => "⚠",
        Status::Unknown => "?",
    }
}

fn or_none(s: &str) -> &str {
    if s.is_empty() { "(none)" } else { s }
}
