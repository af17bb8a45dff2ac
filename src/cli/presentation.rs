//! CLI presentation: text and json formatters per command family.

mod activation;
mod context;
mod shared;

pub use activation::{
    format_activation_report_json, format_activation_report_text, format_close_report_text,
    format_dry_run_actions, format_launch_outcome_text,
};
pub use context::{
    format_context_list_json, format_context_list_text, format_context_show_json,
    format_context_show_text, format_plan_json, format_plan_text,
};
pub use shared::{check_format, format_section_heading};
