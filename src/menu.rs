//! Context-menu coordinator.
//!
//! Tracks every registered menu and its display state. A menu is open iff its
//! display is `block`. The document-level handlers installed here close all open
//! menus on any click or right-click that reaches the document.

use crate::dom::{Document, DomEvent, EventKind};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    None,
    Block,
}

/// Visual state of one menu node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuState {
    pub key: String,
    pub display: Display,
    pub left: Option<f64>,
    pub top: Option<f64>,
}

impl MenuState {
    fn hidden(key: &str) -> Self {
        Self {
            key: key.to_string(),
            display: Display::None,
            left: None,
            top: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.display == Display::Block
    }
}

/// Registry of context menus, in registration order
#[derive(Debug, Default)]
pub struct MenuRegistry {
    menus: Mutex<Vec<MenuState>>,
}

impl MenuRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a hidden menu; re-registering an existing key is a no-op
    pub fn register(&self, key: &str) {
        let mut menus = self.menus.lock();
        if !menus.iter().any(|m| m.key == key) {
            menus.push(MenuState::hidden(key));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.menus.lock().is_empty()
    }

    /// Every registered menu, in registration order
    pub fn menus(&self) -> Vec<MenuState> {
        self.menus.lock().clone()
    }

    pub fn menu(&self, key: &str) -> Option<MenuState> {
        self.menus.lock().iter().find(|m| m.key == key).cloned()
    }

    pub fn is_open(&self, key: &str) -> bool {
        self.menu(key).is_some_and(|m| m.is_open())
    }

    /// Keys of every open menu
    pub fn open_menus(&self) -> Vec<String> {
        self.menus
            .lock()
            .iter()
            .filter(|m| m.is_open())
            .map(|m| m.key.clone())
            .collect()
    }

    /// Show a menu at page coordinates. Returns false for an unknown key.
    pub fn show_at(&self, key: &str, x: f64, y: f64) -> bool {
        let mut menus = self.menus.lock();
        match menus.iter_mut().find(|m| m.key == key) {
            Some(menu) => {
                menu.display = Display::Block;
                menu.left = Some(x);
                menu.top = Some(y);
                true
            }
            None => false,
        }
    }

    pub fn hide(&self, key: &str) -> bool {
        let mut menus = self.menus.lock();
        match menus.iter_mut().find(|m| m.key == key) {
            Some(menu) => {
                menu.display = Display::None;
                true
            }
            None => false,
        }
    }

    /// Hide every open menu; returns whether any menu was open
    pub fn close_all(&self) -> bool {
        let mut closed_any = false;
        for menu in self.menus.lock().iter_mut().filter(|m| m.is_open()) {
            menu.display = Display::None;
            closed_any = true;
        }
        closed_any
    }

    /// Install the document-level click and right-click handlers
    pub fn install(self: &Arc<Self>, document: &mut Document) {
        for kind in [EventKind::Click, EventKind::ContextMenu] {
            let menus = Arc::clone(self);
            document.add_listener(
                kind,
                Arc::new(move |event: &mut DomEvent| {
                    if menus.is_empty() {
                        return;
                    }
                    if menus.close_all() {
                        debug!(event = %event.kind, "Closed open context menus");
                        event.prevent_default();
                    }
                }),
            );
        }
    }
}
