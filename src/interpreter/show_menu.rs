//! ShowMenu interpreter: right-click toggles the context menu named by the policy.

use crate::dom::DomEvent;
use crate::error::PolicyError;
use crate::interpreter::DispatchContext;
use crate::types::Policy;
use tracing::debug;

pub fn interpret(
    ctx: &DispatchContext,
    policy: &Policy,
    event: Option<&mut DomEvent>,
) -> Result<(), PolicyError> {
    let key = policy.policy.trim();

    let coordinates = match event {
        Some(event) => {
            event.prevent_default();
            event.stop_propagation();
            event.page_coordinates()
        }
        None => None,
    };

    // Open state must be read before everything is closed.
    let was_open = ctx.menus.is_open(key);
    ctx.menus.close_all();

    if ctx.menus.menu(key).is_none() {
        debug!(menu = key, "No context menu registered under this key");
        return Ok(());
    }
    if was_open {
        debug!(menu = key, "Context menu hidden");
        return Ok(());
    }

    match coordinates {
        Some((x, y)) => {
            ctx.menus.show_at(key, x, y);
            debug!(menu = key, x, y, "Context menu shown");
        }
        None => debug!(menu = key, "Event has no pointer coordinates; menu not shown"),
    }
    Ok(())
}
