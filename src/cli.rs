//! CLI domain: parse, route, help, output, and presentation only.
//! No policy semantics live here; the route table hands off to the engine.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_health, format_resolved, format_snapshot_json, format_snapshot_text, format_split_json,
    format_split_text,
};
pub use route::RunContext;
