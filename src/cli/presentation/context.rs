//! Context presentation: list, show and plan formatters.

use super::shared::{format_section_heading, to_pretty_json, yes_no};
use crate::context::Context;
use crate::error::ApiError;
use crate::family::Partition;
use crate::types::{short_id, ContextId};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde_json::json;

pub fn format_context_list_text(contexts: &[Context], active: &[ContextId]) -> String {
    if contexts.is_empty() {
        return "No contexts. Create one with `flitro create <name>`.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["#", "Id", "Name", "Items", "Last used", "Active"]);
    for (index, context) in contexts.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            short_id(&context.id),
            context.name.clone(),
            context.items().len().to_string(),
            context.last_used.format("%Y-%m-%d %H:%M").to_string(),
            yes_no(active.contains(&context.id)).to_string(),
        ]);
    }
    format!("{}\n{}", format_section_heading("Contexts"), table)
}

pub fn format_context_list_json(
    contexts: &[Context],
    active: &[ContextId],
) -> Result<String, ApiError> {
    let rows: Vec<serde_json::Value> = contexts
        .iter()
        .map(|c| {
            json!({
                "id": c.id,
                "name": c.name,
                "items": c.items().len(),
                "lastUsed": c.last_used,
                "active": active.contains(&c.id),
            })
        })
        .collect();
    to_pretty_json(&rows)
}

pub fn format_context_show_text(context: &Context, active: bool) -> String {
    let mut out = format_section_heading(&context.name);
    out.push_str(&format!("\n  Id: {}", context.id));
    if let Some(icon) = &context.icon {
        out.push_str(&format!("\n  Icon: {}", icon.name));
        if let Some(bg) = &icon.background_color {
            out.push_str(&format!(" on {}", bg));
        }
    }
    out.push_str(&format!("\n  Created: {}", context.created_at.to_rfc3339()));
    out.push_str(&format!("\n  Last used: {}", context.last_used.to_rfc3339()));
    if active {
        out.push_str("\n  Active in this session");
    }

    if context.items().is_empty() {
        out.push_str("\n\nNo items.");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["#", "Id", "Kind", "Name", "Target"]);
    for (index, item) in context.items().iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            short_id(&item.id()),
            item.kind().label().to_string(),
            item.display_name().to_string(),
            item.target().to_string(),
        ]);
    }
    out.push_str(&format!("\n\n{}", table));
    out
}

pub fn format_context_show_json(context: &Context) -> Result<String, ApiError> {
    to_pretty_json(context)
}

pub fn format_plan_text(context: &Context, plan: &Partition) -> String {
    let mut out = format_section_heading(&format!("Plan for {}", context.name));
    if plan.buckets.is_empty() && plan.terminals.is_empty() && plan.unresolved.is_empty() {
        out.push_str("\n  Nothing to open.");
        return out;
    }
    for (family, items) in &plan.buckets {
        out.push_str(&format!("\n  {} ({})", family, family.kind().label()));
        for item in items {
            out.push_str(&format!(
                "\n    - {} {}",
                item.kind().label(),
                item.display_name()
            ));
        }
    }
    if !plan.terminals.is_empty() {
        out.push_str("\n  Terminal");
        for session in &plan.terminals {
            let command = session.runnable_command().unwrap_or("(no command, skipped)");
            out.push_str(&format!(
                "\n    - {} in {}: {}",
                session.title, session.working_directory, command
            ));
        }
    }
    if !plan.unresolved.is_empty() {
        out.push_str("\n  No application found");
        for item in &plan.unresolved {
            out.push_str(&format!("\n    - {} {}", item.kind().label(), item.display_name()));
        }
    }
    out
}

pub fn format_plan_json(context: &Context, plan: &Partition) -> Result<String, ApiError> {
    let buckets: Vec<serde_json::Value> = plan
        .buckets
        .iter()
        .map(|(family, items)| {
            json!({
                "family": family,
                "kind": family.kind(),
                "items": items.iter().map(|i| i.id()).collect::<Vec<_>>(),
            })
        })
        .collect();
    to_pretty_json(&json!({
        "contextId": context.id,
        "buckets": buckets,
        "terminals": plan.terminals.iter().map(|t| t.id).collect::<Vec<_>>(),
        "unresolved": plan.unresolved.iter().map(|i| i.id()).collect::<Vec<_>>(),
    }))
}
