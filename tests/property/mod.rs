//! Property-based tests for tokenization, resolution and dispatch ordering

mod ordering;
mod splitter;
