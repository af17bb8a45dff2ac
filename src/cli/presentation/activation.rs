//! Activation presentation: reports of open, close, and dry runs.

use super::shared::{format_section_heading, to_pretty_json};
use crate::engine::{ActivationReport, ActivationStatus, BucketReport, CloseReport};
use crate::error::ApiError;
use crate::launcher::LaunchOutcome;
use crate::platform::recording::PlatformCall;
use crate::terminal::SessionStatus;
use crate::types::short_id;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;

fn bucket_table(buckets: &[BucketReport]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Application", "Launcher", "Items", "Done", "Failed"]);
    for bucket in buckets {
        table.add_row(vec![
            bucket.family.to_string(),
            bucket.kind.label().to_string(),
            bucket.items.to_string(),
            bucket.outcome.completed.to_string(),
            bucket.outcome.failures.len().to_string(),
        ]);
    }
    table
}

pub fn format_activation_report_text(report: &ActivationReport) -> String {
    let name = report
        .context_name
        .clone()
        .unwrap_or_else(|| report.context_id.to_string());
    match report.status {
        ActivationStatus::ContextNotFound => {
            return format!("Context '{}' no longer exists; nothing opened.", name)
        }
        ActivationStatus::AlreadyActive => return format!("'{}' is already active.", name),
        ActivationStatus::Activated => {}
    }

    let mut out = format_section_heading(&format!("Opened {}", name));
    for closed in &report.closed {
        out.push_str(&format!(
            "\n  Closed {} first ({} applications)",
            short_id(&closed.context_id),
            closed.buckets.len()
        ));
    }
    if !report.buckets.is_empty() {
        out.push_str(&format!("\n{}", bucket_table(&report.buckets)));
    }
    for session in &report.terminals {
        let status = match &session.status {
            SessionStatus::Started => "started".to_string(),
            SessionStatus::Skipped => "skipped (no command)".to_string(),
            SessionStatus::Failed(reason) => format!("failed: {}", reason),
        };
        out.push_str(&format!("\n  Terminal {}: {}", session.title, status));
    }
    if !report.unresolved.is_empty() {
        out.push_str(&format!(
            "\n  {} item(s) had no application to open them",
            report.unresolved.len()
        ));
    }
    let failures = report.failures();
    if !failures.is_empty() {
        out.push_str(&format!("\n\nProblems ({}):", failures.len()));
        for failure in failures {
            out.push_str(&format!("\n  - {}", failure.reason));
        }
    }
    out
}

pub fn format_activation_report_json(report: &ActivationReport) -> Result<String, ApiError> {
    to_pretty_json(report)
}

pub fn format_close_report_text(report: &CloseReport, name: &str) -> String {
    if !report.was_active {
        return format!("'{}' is not active; nothing to close.", name);
    }
    let mut out = format!("Closed {}", name);
    let failures: Vec<&str> = report
        .buckets
        .iter()
        .flat_map(|b| b.outcome.failures.iter().map(|f| f.reason.as_str()))
        .collect();
    for reason in failures {
        out.push_str(&format!("\n  - {}", reason));
    }
    out
}

pub fn format_launch_outcome_text(outcome: &LaunchOutcome, item_name: &str) -> String {
    if outcome.is_clean() {
        return format!("Opened {}", item_name);
    }
    let mut out = format!("Could not open {}", item_name);
    for failure in &outcome.failures {
        out.push_str(&format!("\n  - {}", failure.reason));
    }
    out
}

/// The automation steps a dry run would have performed.
pub fn format_dry_run_actions(actions: &[PlatformCall]) -> String {
    if actions.is_empty() {
        return "Dry run: no automation steps.".to_string();
    }
    let mut out = format!("Dry run: {} automation step(s)", actions.len());
    for (index, action) in actions.iter().enumerate() {
        let text = action.to_string();
        let mut lines = text.lines();
        if let Some(first) = lines.next() {
            out.push_str(&format!("\n  {}. {}", index + 1, first));
        }
        for line in lines {
            out.push_str(&format!("\n       {}", line));
        }
    }
    out
}
