//! Callback interpreter: resolve context markers, then submit to the backend.

use crate::context::resolve_context_markers;
use crate::error::PolicyError;
use crate::interpreter::DispatchContext;
use crate::types::Policy;
use tracing::debug;

/// Rewrites `policy.policy` to its resolved form and hands the policy to the
/// submission channel. Nothing is submitted when resolution exceeds its pass limit.
pub fn interpret(ctx: &DispatchContext, policy: &mut Policy) -> Result<(), PolicyError> {
    policy.policy = resolve_context_markers(&policy.policy, ctx.context.as_ref(), &ctx.resolver)?;
    debug!(function = %policy.policy, "Submitting callback policy");
    ctx.submitter.policy_post(policy);
    Ok(())
}
