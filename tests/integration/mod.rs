//! Integration tests for the policy interpreter and its surfaces

mod context_menu;
mod dispatch_flow;
mod test_utils;
mod tree_replay;

pub use test_utils::{click, input, right_click, session_for, with_isolated_config, StubBackend};
