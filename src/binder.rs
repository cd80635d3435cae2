//! Event Binder
//!
//! Attaches one listener per interaction kind that has applicable policies, and
//! dispatches the policies of that kind, in order, when the listener fires.
//! Load policies are evaluated once at bind time instead; only context policies
//! are honored there.

use crate::dom::{DomEvent, EventKind, EventTarget, Page};
use crate::interpreter::{interpret, DispatchContext};
use crate::registry::ElementNode;
use crate::types::{ActionType, InteractionType, Policy};
use std::sync::Arc;
use tracing::{debug, warn};

const POINTER_CURSOR: &str = "pointer";

/// Policies of one action type, in dispatch order.
///
/// Order is a stable sort on the interaction label, descending lexically, so
/// `update` runs before `show_context_menu`, `context`, `callback` and `call`.
pub fn applicable_policies(policies: &[Policy], action: &ActionType) -> Vec<Policy> {
    let mut applicable: Vec<Policy> = policies
        .iter()
        .filter(|p| &p.action_type == action)
        .cloned()
        .collect();
    applicable.sort_by(|a, b| b.interaction_type.label().cmp(a.interaction_type.label()));
    applicable
}

/// Run each policy through its interpreter, logging and skipping failures.
///
/// Each policy is dispatched from a fresh copy so the bound originals are never
/// rewritten.
pub fn dispatch_policies(
    ctx: &DispatchContext,
    element_id: &str,
    policies: &[Policy],
    mut event: Option<&mut DomEvent>,
) {
    for policy in policies {
        let mut working = policy.clone();
        if let Err(e) = interpret(ctx, &mut working, event.as_deref_mut()) {
            warn!(
                element = element_id,
                action = %policy.action_type,
                interaction = %policy.interaction_type,
                policy = %policy.policy,
                error = %e,
                "Policy evaluation failed"
            );
        }
    }
}

pub struct EventBinder {
    ctx: Arc<DispatchContext>,
}

impl EventBinder {
    pub fn new(ctx: DispatchContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    pub fn context(&self) -> &DispatchContext {
        &self.ctx
    }

    /// Bind an element's policies to its event target
    pub fn bind(&self, target: &mut EventTarget, policies: &[Policy]) {
        for action in ActionType::BOUND.iter() {
            let applicable = applicable_policies(policies, action);
            if applicable.is_empty() {
                continue;
            }

            let kind = match EventKind::for_action(action) {
                Some(EventKind::Load) => {
                    self.evaluate_on_load(&target.id, &applicable);
                    continue;
                }
                Some(kind) => kind,
                None => continue,
            };

            if kind == EventKind::Click {
                target.cursor = Some(POINTER_CURSOR.to_string());
            }

            debug!(
                element = %target.id,
                event = %kind,
                policies = applicable.len(),
                "Listener attached"
            );
            let ctx = Arc::clone(&self.ctx);
            let element_id = target.id.clone();
            target.add_listener(
                kind,
                Arc::new(move |event: &mut DomEvent| {
                    dispatch_policies(&ctx, &element_id, &applicable, Some(event));
                }),
            );
        }
    }

    /// Register menus, bind every node of a tree, and install the document handlers
    pub fn bind_tree(&self, root: &ElementNode, page: &mut Page) {
        let nodes = root.walk();
        for node in nodes.iter().filter(|n| n.is_menu()) {
            self.ctx.menus.register(&node.id);
        }
        for node in nodes {
            let mut target = EventTarget::new(node.id.clone());
            self.bind(&mut target, &node.policies);
            page.insert(target);
        }
        self.ctx.menus.install(&mut page.document);
    }

    fn evaluate_on_load(&self, element_id: &str, policies: &[Policy]) {
        let (honored, ignored): (Vec<Policy>, Vec<Policy>) = policies
            .iter()
            .cloned()
            .partition(|p| p.interaction_type == InteractionType::Context);

        for policy in &ignored {
            debug!(
                element = element_id,
                interaction = %policy.interaction_type,
                "Ignoring non-context load policy"
            );
        }
        dispatch_policies(&self.ctx, element_id, &honored, None);
    }
}

/// Build a page for an element tree with every node bound
pub fn page_from_tree(binder: &EventBinder, root: &ElementNode) -> Page {
    let mut page = Page::new();
    binder.bind_tree(root, &mut page);
    page
}
