//! Policy interpreters: one semantic effect per interaction type.
//!
//! Every interpreter shares the same contract: a parsed policy plus the
//! triggering event (absent for load-time evaluation), with effects applied
//! through the collaborators in `DispatchContext`.

pub mod callback;
pub mod context;
pub mod show_menu;
pub mod update;

use crate::context::{ContextStore, ResolverSettings};
use crate::dom::DomEvent;
use crate::error::PolicyError;
use crate::menu::MenuRegistry;
use crate::registry::{ElementRegistry, NoopTagPropagator, TagPropagator};
use crate::submit::PolicySubmitter;
use crate::types::{InteractionType, Policy};
use std::sync::Arc;
use tracing::debug;

/// Collaborators every interpreter may touch
#[derive(Clone)]
pub struct DispatchContext {
    pub elements: Arc<dyn ElementRegistry>,
    pub context: Arc<dyn ContextStore>,
    pub submitter: Arc<dyn PolicySubmitter>,
    pub tags: Arc<dyn TagPropagator>,
    pub menus: Arc<MenuRegistry>,
    pub resolver: ResolverSettings,
}

impl DispatchContext {
    pub fn new(
        elements: Arc<dyn ElementRegistry>,
        context: Arc<dyn ContextStore>,
        submitter: Arc<dyn PolicySubmitter>,
        menus: Arc<MenuRegistry>,
    ) -> Self {
        Self {
            elements,
            context,
            submitter,
            tags: Arc::new(NoopTagPropagator),
            menus,
            resolver: ResolverSettings::default(),
        }
    }

    pub fn with_tag_propagator(mut self, tags: Arc<dyn TagPropagator>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_resolver(mut self, resolver: ResolverSettings) -> Self {
        self.resolver = resolver;
        self
    }
}

/// Run the interpreter matching the policy's interaction type.
///
/// The callback interpreter rewrites `policy.policy` in place; callers pass a
/// per-dispatch copy. Unknown interaction types are skipped.
pub fn interpret(
    ctx: &DispatchContext,
    policy: &mut Policy,
    event: Option<&mut DomEvent>,
) -> Result<(), PolicyError> {
    let interaction = policy.interaction_type.clone();
    match interaction {
        InteractionType::Update => update::interpret(ctx, policy),
        InteractionType::Context => context::interpret(ctx, policy, event.as_deref()),
        InteractionType::Call | InteractionType::Callback => callback::interpret(ctx, policy),
        InteractionType::ShowContextMenu => show_menu::interpret(ctx, policy, event),
        InteractionType::Unknown(label) => {
            debug!(interaction = %label, policy = %policy.policy, "Skipping unknown interaction type");
            Ok(())
        }
    }
}
