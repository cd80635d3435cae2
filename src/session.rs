//! Session: one loaded element tree with its collaborators and bound page.
//!
//! Wires the in-memory registry, context store, menu registry and a submitter
//! into an `EventBinder`, binds the whole tree, and replays scripted events
//! against the resulting page.

use crate::binder::{page_from_tree, EventBinder};
use crate::context::{ContextEntry, ContextStore, InMemoryContextStore, ResolverSettings};
use crate::dom::{DomEvent, EventKind, Page};
use crate::error::ApiError;
use crate::interpreter::DispatchContext;
use crate::menu::{MenuRegistry, MenuState};
use crate::registry::{ElementNode, ElementRegistry, InMemoryElementRegistry};
use crate::submit::{PolicySubmitter, RecordingSubmitter, SolverRequest};
use crate::types::Attribute;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// One step of an event script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedEvent {
    /// Element id the event is fired at; unknown ids hit the bare document
    pub target: String,
    pub kind: EventKind,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

impl ScriptedEvent {
    pub fn to_dom_event(&self) -> DomEvent {
        DomEvent {
            target_value: self.value.clone(),
            page_x: self.x,
            page_y: self.y,
            ..DomEvent::new(self.kind)
        }
    }

    pub fn load_script(path: &Path) -> Result<Vec<Self>, ApiError> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| ApiError::InvalidScript(e.to_string()))
    }
}

/// Element attributes at snapshot time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementSnapshot {
    pub id: String,
    pub attributes: Vec<Attribute>,
}

/// Observable state after a replay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub context: Vec<ContextEntry>,
    pub elements: Vec<ElementSnapshot>,
    pub menus: Vec<MenuState>,
    pub submissions: Vec<SolverRequest>,
}

pub struct Session {
    elements: Arc<InMemoryElementRegistry>,
    context: Arc<InMemoryContextStore>,
    menus: Arc<MenuRegistry>,
    recorder: Option<Arc<RecordingSubmitter>>,
    binder: EventBinder,
    page: Page,
}

impl Session {
    /// Session whose callbacks are recorded in memory
    pub fn from_tree(root: &ElementNode, resolver: ResolverSettings) -> Self {
        let mut recorder = None;
        let session = Self::with_submitter(root, resolver, |context| {
            let recording = Arc::new(RecordingSubmitter::with_context(context));
            recorder = Some(Arc::clone(&recording));
            recording as Arc<dyn PolicySubmitter>
        });
        Self { recorder, ..session }
    }

    /// Session with a caller-built submitter; it receives the session's context store
    pub fn with_submitter<F>(
        root: &ElementNode,
        resolver: ResolverSettings,
        make_submitter: F,
    ) -> Self
    where
        F: FnOnce(Arc<dyn ContextStore>) -> Arc<dyn PolicySubmitter>,
    {
        let elements = Arc::new(InMemoryElementRegistry::from_tree(root));
        let context = Arc::new(InMemoryContextStore::new());
        let menus = MenuRegistry::shared();
        let submitter = make_submitter(context.clone() as Arc<dyn ContextStore>);

        let ctx = DispatchContext::new(
            elements.clone() as Arc<dyn ElementRegistry>,
            context.clone(),
            submitter,
            menus.clone(),
        )
        .with_resolver(resolver);
        let binder = EventBinder::new(ctx);
        let page = page_from_tree(&binder, root);

        Self {
            elements,
            context,
            menus,
            recorder: None,
            binder,
            page,
        }
    }

    pub fn fire(&self, scripted: &ScriptedEvent) -> DomEvent {
        let mut event = scripted.to_dom_event();
        debug!(element = %scripted.target, event = %scripted.kind, "Firing scripted event");
        self.page.fire(&scripted.target, &mut event);
        event
    }

    pub fn replay(&self, script: &[ScriptedEvent]) {
        for scripted in script {
            self.fire(scripted);
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn elements(&self) -> &InMemoryElementRegistry {
        &self.elements
    }

    pub fn context(&self) -> &InMemoryContextStore {
        &self.context
    }

    pub fn menus(&self) -> &MenuRegistry {
        &self.menus
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let elements = self
            .elements
            .ids()
            .into_iter()
            .filter_map(|id| {
                self.elements
                    .attributes(&id)
                    .map(|attributes| ElementSnapshot { id, attributes })
            })
            .collect();
        let menus = self.menus.menus();
        let submissions = self
            .recorder
            .as_ref()
            .map(|r| r.records().into_iter().map(|rec| rec.request).collect())
            .unwrap_or_default();

        SessionSnapshot {
            context: self.context.entries(),
            elements,
            menus,
            submissions,
        }
    }
}
