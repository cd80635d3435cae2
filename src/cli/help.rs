//! CLI command-name contract for logging and routing.

use crate::cli::parse::Commands;

/// Command name string used in log records (e.g. "replay", "health").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Split { .. } => "split",
        Commands::Resolve { .. } => "resolve",
        Commands::Replay { live: true, .. } => "replay.live",
        Commands::Replay { .. } => "replay",
        Commands::Config => "config",
        Commands::Health => "health",
    }
}
