//! Element Registry
//!
//! Maps an element id to its current attribute set, an optional native object
//! (held weakly, lookup only) and an optional tag binding used to push attribute
//! changes into bound markup.

pub mod tree;

pub use tree::ElementNode;

use crate::types::Attribute;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

/// Native object capability: receives the full attribute sequence after an update
pub trait AttributeSink: Send + Sync {
    fn set_attributes(&self, attributes: &[Attribute]);
}

/// Opaque handle to the markup node an element is rendered into
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagBinding(pub String);

/// Pushes attribute changes into tag-bound markup
pub trait TagPropagator: Send + Sync {
    fn set_child_tag_attributes(&self, tag: &TagBinding, element: &ElementEntry);
}

/// Propagator for hosts without tag-bound markup
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTagPropagator;

impl TagPropagator for NoopTagPropagator {
    fn set_child_tag_attributes(&self, _tag: &TagBinding, _element: &ElementEntry) {}
}

/// Registry entry for one element
#[derive(Clone, Default)]
pub struct ElementEntry {
    pub id: String,
    pub element_type: Option<String>,
    pub attributes: Vec<Attribute>,
    pub object: Option<Weak<dyn AttributeSink>>,
    pub tag: Option<TagBinding>,
}

impl ElementEntry {
    pub fn new(id: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            id: id.into(),
            attributes,
            ..Default::default()
        }
    }

    /// Live native object, if one is attached and still alive
    pub fn native_object(&self) -> Option<Arc<dyn AttributeSink>> {
        self.object.as_ref().and_then(Weak::upgrade)
    }
}

impl fmt::Debug for ElementEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementEntry")
            .field("id", &self.id)
            .field("element_type", &self.element_type)
            .field("attributes", &self.attributes)
            .field("object", &self.native_object().is_some())
            .field("tag", &self.tag)
            .finish()
    }
}

/// Element registry interface
pub trait ElementRegistry: Send + Sync {
    fn get_element(&self, id: &str) -> Option<ElementEntry>;

    /// Replace the attribute sequence of a registered element.
    /// Returns false when the id is unknown.
    fn store_attributes(&self, id: &str, attributes: Vec<Attribute>) -> bool;
}

/// In-memory element registry
#[derive(Default)]
pub struct InMemoryElementRegistry {
    elements: RwLock<HashMap<String, ElementEntry>>,
}

impl InMemoryElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every node of an element tree by id
    pub fn from_tree(root: &ElementNode) -> Self {
        let registry = Self::new();
        for node in root.walk() {
            registry.register(ElementEntry {
                id: node.id.clone(),
                element_type: Some(node.element_type.clone()),
                attributes: node.attributes.clone(),
                object: None,
                tag: None,
            });
        }
        registry
    }

    /// Insert or replace an entry
    pub fn register(&self, entry: ElementEntry) {
        self.elements.write().insert(entry.id.clone(), entry);
    }

    /// Attach a native object; the registry keeps only a weak reference
    pub fn attach_object(&self, id: &str, object: &Arc<dyn AttributeSink>) -> bool {
        match self.elements.write().get_mut(id) {
            Some(entry) => {
                entry.object = Some(Arc::downgrade(object));
                true
            }
            None => false,
        }
    }

    pub fn bind_tag(&self, id: &str, tag: TagBinding) -> bool {
        match self.elements.write().get_mut(id) {
            Some(entry) => {
                entry.tag = Some(tag);
                true
            }
            None => false,
        }
    }

    pub fn attributes(&self, id: &str) -> Option<Vec<Attribute>> {
        self.elements.read().get(id).map(|e| e.attributes.clone())
    }

    /// Registered ids, sorted
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.elements.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.elements.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.read().is_empty()
    }
}

impl ElementRegistry for InMemoryElementRegistry {
    fn get_element(&self, id: &str) -> Option<ElementEntry> {
        self.elements.read().get(id).cloned()
    }

    fn store_attributes(&self, id: &str, attributes: Vec<Attribute>) -> bool {
        match self.elements.write().get_mut(id) {
            Some(entry) => {
                entry.attributes = attributes;
                true
            }
            None => false,
        }
    }
}
