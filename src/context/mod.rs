//! Context domain: the key/value context store and marker resolution against it.
//! Interpreters read and write context only through the `ContextStore` contract.

pub mod resolver;
pub mod store;

pub use resolver::{quote_literal, resolve_context_markers, ResolverSettings, CONTEXT_MARKER};
pub use store::{ContextEntry, ContextStore, InMemoryContextStore};
