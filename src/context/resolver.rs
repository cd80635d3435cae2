//! Context marker resolution.
//!
//! Replaces each `_context_value(<key>)` in a policy string with the stored value,
//! one marker per pass, until none remain. Markers do not nest: a match ends at
//! the first `)`. Passes that fail to reduce the marker count are bounded, so a
//! stored value that reintroduces a marker cannot loop forever.

use crate::context::store::ContextStore;
use crate::error::PolicyError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

pub const CONTEXT_MARKER: &str = "_context_value";

static MARKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{}\(([^)]*)\)", CONTEXT_MARKER))
        .expect("context marker pattern is valid")
});

/// Resolution limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Maximum substitutions that leave the marker count unchanged or higher
    pub max_passes: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self { max_passes: 64 }
    }
}

/// Quote capitalized, non-numeric values so the backend reads them as strings.
///
/// Digit-only values (including the empty string) and anything not starting with
/// an upper-case character pass through unchanged.
pub fn quote_literal(value: &str) -> String {
    let numeric = value.chars().all(|c| c.is_ascii_digit());
    let capitalized = value.chars().next().is_some_and(char::is_uppercase);
    if !numeric && capitalized {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}

/// Whether the string still holds at least one context marker
pub fn has_marker(policy: &str) -> bool {
    MARKER_PATTERN.is_match(policy)
}

/// Substitute every context marker in `policy` from `store`.
///
/// A key missing from the store resolves to the empty string. Only a
/// substitution that leaves at least as many markers as before counts against
/// `max_passes`, so any number of distinct markers resolves.
pub fn resolve_context_markers(
    policy: &str,
    store: &dyn ContextStore,
    settings: &ResolverSettings,
) -> Result<String, PolicyError> {
    let mut resolved = policy.to_string();
    let mut remaining = marker_count(&resolved);
    let mut stalled_passes = 0;

    loop {
        let Some(captures) = MARKER_PATTERN.captures(&resolved) else {
            return Ok(resolved);
        };
        let (range, key) = match (captures.get(0), captures.get(1)) {
            (Some(whole), Some(key)) => (whole.range(), key.as_str().to_string()),
            _ => return Ok(resolved),
        };

        let value = store.retrieve_context_value(&key).unwrap_or_else(|| {
            debug!(key = %key, "Context key not set; substituting empty value");
            String::new()
        });
        resolved.replace_range(range, &quote_literal(&value));

        let now = marker_count(&resolved);
        if now >= remaining {
            stalled_passes += 1;
            if stalled_passes > settings.max_passes {
                return Err(PolicyError::ResolveLimitExceeded {
                    limit: settings.max_passes,
                    policy: resolved,
                });
            }
        }
        remaining = now;
    }
}

fn marker_count(policy: &str) -> usize {
    MARKER_PATTERN.find_iter(policy).count()
}
