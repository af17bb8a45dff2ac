//! CLI help and command-name contract for logging and routing.

use crate::cli::parse::{AddCommands, Commands, SessionCommands};

/// Command name string for log fields (e.g. "open", "add.tab").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::List { .. } => "list".to_string(),
        Commands::Show { .. } => "show".to_string(),
        Commands::Create { .. } => "create".to_string(),
        Commands::Rename { .. } => "rename".to_string(),
        Commands::Delete { .. } => "delete".to_string(),
        Commands::Capture { .. } => "capture".to_string(),
        Commands::Reorder { .. } => "reorder".to_string(),
        Commands::Add { item } => format!("add.{}", add_command_name(item)),
        Commands::RemoveItem { .. } => "remove_item".to_string(),
        Commands::MoveItem { .. } => "move_item".to_string(),
        Commands::Plan { .. } => "plan".to_string(),
        Commands::Open { .. } => "open".to_string(),
        Commands::OpenItem { .. } => "open_item".to_string(),
        Commands::Session => "session".to_string(),
    }
}

pub fn add_command_name(command: &AddCommands) -> &'static str {
    match command {
        AddCommands::App { .. } => "app",
        AddCommands::Document { .. } => "document",
        AddCommands::Tab { .. } => "tab",
        AddCommands::Terminal { .. } => "terminal",
    }
}

pub fn session_command_name(command: &SessionCommands) -> &'static str {
    match command {
        SessionCommands::Activate { .. } => "activate",
        SessionCommands::Close { .. } => "close",
        SessionCommands::CloseAll => "close-all",
        SessionCommands::Active => "active",
        SessionCommands::List => "list",
        SessionCommands::Quit => "quit",
    }
}

/// Banner printed when an interactive session starts.
pub fn session_banner() -> &'static str {
    "Flitro session. Commands: activate <context> [--policy replace|additive], \
     close <context>, close-all, active, list, help, quit"
}
