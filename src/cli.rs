//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to the context manager.

mod help;
mod output;
mod parse;
mod presentation;
mod route;
mod session;

pub use help::command_name;
pub use output::map_error;
pub use parse::{AddCommands, Cli, Commands, PolicyArg, SessionCommands, SessionLine};
pub use route::RunContext;
pub use session::{split_command_line, SessionStep};
