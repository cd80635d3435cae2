//! DOM surface consumed by the binder: event kinds, event objects, and
//! listener lists for elements and the document.
//!
//! Listener lists are explicit and additive; any number of observers can be
//! registered for the same kind.

use crate::types::ActionType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Click,
    Input,
    ContextMenu,
    Load,
}

impl EventKind {
    pub fn dom_name(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Input => "input",
            EventKind::ContextMenu => "contextmenu",
            EventKind::Load => "load",
        }
    }

    /// DOM event that fires policies of the given action type
    pub fn for_action(action: &ActionType) -> Option<EventKind> {
        match action {
            ActionType::Click => Some(EventKind::Click),
            ActionType::Input => Some(EventKind::Input),
            ActionType::RightClick => Some(EventKind::ContextMenu),
            ActionType::Load => Some(EventKind::Load),
            ActionType::Unknown(_) => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dom_name())
    }
}

/// A fired DOM event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomEvent {
    pub kind: EventKind,
    /// `target.value` for form controls
    #[serde(default)]
    pub target_value: Option<String>,
    #[serde(default)]
    pub page_x: Option<f64>,
    #[serde(default)]
    pub page_y: Option<f64>,
    #[serde(skip)]
    pub default_prevented: bool,
    #[serde(skip)]
    pub propagation_stopped: bool,
}

impl DomEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            target_value: None,
            page_x: None,
            page_y: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn click() -> Self {
        Self::new(EventKind::Click)
    }

    pub fn input(value: impl Into<String>) -> Self {
        Self {
            target_value: Some(value.into()),
            ..Self::new(EventKind::Input)
        }
    }

    pub fn context_menu_at(x: f64, y: f64) -> Self {
        Self {
            page_x: Some(x),
            page_y: Some(y),
            ..Self::new(EventKind::ContextMenu)
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Pointer position, when the event carries both coordinates
    pub fn page_coordinates(&self) -> Option<(f64, f64)> {
        self.page_x.zip(self.page_y)
    }
}

pub type Listener = Arc<dyn Fn(&mut DomEvent) + Send + Sync>;

#[derive(Default, Clone)]
struct ListenerList {
    listeners: Vec<(EventKind, Listener)>,
}

impl ListenerList {
    fn add(&mut self, kind: EventKind, listener: Listener) {
        self.listeners.push((kind, listener));
    }

    fn count(&self, kind: EventKind) -> usize {
        self.listeners.iter().filter(|(k, _)| *k == kind).count()
    }

    fn dispatch(&self, event: &mut DomEvent) {
        let kind = event.kind;
        for (_, listener) in self.listeners.iter().filter(|(k, _)| *k == kind) {
            listener(event);
        }
    }
}

/// One bound element: its listeners and the pointer affordance
#[derive(Default, Clone)]
pub struct EventTarget {
    pub id: String,
    pub cursor: Option<String>,
    listeners: ListenerList,
}

impl EventTarget {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn add_listener(&mut self, kind: EventKind, listener: Listener) {
        self.listeners.add(kind, listener);
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.count(kind)
    }

    pub fn dispatch(&self, event: &mut DomEvent) {
        self.listeners.dispatch(event);
    }
}

/// Document-level listeners, run after element listeners unless propagation stops
#[derive(Default, Clone)]
pub struct Document {
    listeners: ListenerList,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, kind: EventKind, listener: Listener) {
        self.listeners.add(kind, listener);
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.count(kind)
    }

    pub fn dispatch(&self, event: &mut DomEvent) {
        self.listeners.dispatch(event);
    }
}

/// Element targets plus the document they bubble to
#[derive(Default)]
pub struct Page {
    pub document: Document,
    targets: HashMap<String, EventTarget>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, target: EventTarget) {
        self.targets.insert(target.id.clone(), target);
    }

    pub fn target(&self, id: &str) -> Option<&EventTarget> {
        self.targets.get(id)
    }

    /// Fire an event at an element, then bubble it to the document.
    ///
    /// An unknown id behaves like a hit on bare document space.
    pub fn fire(&self, id: &str, event: &mut DomEvent) {
        if let Some(target) = self.targets.get(id) {
            target.dispatch(event);
        }
        if !event.propagation_stopped {
            self.document.dispatch(event);
        }
    }
}
