//! Context interpreter: `(key,value...)` writes one pair into the context store.
//!
//! A `_value` marker in the value is replaced by the live `target.value` of the
//! triggering event. An empty live value cancels the write.

use crate::dom::DomEvent;
use crate::error::PolicyError;
use crate::interpreter::DispatchContext;
use crate::splitter::{split_arguments, strip_outer_parens};
use crate::types::Policy;
use tracing::debug;

pub const LIVE_VALUE_MARKER: &str = "_value";

pub fn interpret(
    ctx: &DispatchContext,
    policy: &Policy,
    event: Option<&DomEvent>,
) -> Result<(), PolicyError> {
    let tokens = split_arguments(strip_outer_parens(&policy.policy));
    if tokens.len() < 2 {
        return Err(PolicyError::Arity {
            interaction: "context",
            policy: policy.policy.clone(),
            expected: 2,
            actual: tokens.len(),
        });
    }
    let key = tokens[0].as_str();
    let mut value = tokens[1..].join(",");

    if value.contains(LIVE_VALUE_MARKER) {
        if let Some(live) = event.and_then(|e| e.target_value.as_deref()) {
            if live.is_empty() {
                debug!(key, "Live input value is empty; context left unchanged");
                return Ok(());
            }
            value = value.replacen(LIVE_VALUE_MARKER, live, 1);
        }
    }

    debug!(key, value = %value, "Context set");
    ctx.context.add_context(key, &value);
    Ok(())
}
