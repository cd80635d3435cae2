//! When Engine: interpreter and dispatcher for declarative interaction policies
//!
//! Binds "when" policies to DOM interaction events and evaluates them at event
//! time: argument splitting, context marker substitution, attribute updates,
//! context writes, backend callbacks and context-menu toggling.

pub mod binder;
pub mod cli;
pub mod config;
pub mod context;
pub mod dom;
pub mod error;
pub mod interpreter;
pub mod logging;
pub mod menu;
pub mod registry;
pub mod session;
pub mod splitter;
pub mod submit;
pub mod types;
