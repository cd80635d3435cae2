//! Element tree as served by the backend: nested nodes carrying attributes and
//! "do" policies.

use crate::error::ApiError;
use crate::types::{Attribute, Policy};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Element types rendered as context menus
const MENU_TYPES: [&str; 2] = ["context_menu", "contextmenu"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementNode {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(default)]
    pub parent: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(rename = "do", default)]
    pub policies: Vec<Policy>,
    #[serde(default)]
    pub children: Vec<ElementNode>,
}

impl ElementNode {
    pub fn from_json(raw: &str) -> Result<Self, ApiError> {
        serde_json::from_str(raw).map_err(|e| ApiError::InvalidTree(e.to_string()))
    }

    pub fn from_path(path: &Path) -> Result<Self, ApiError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn is_menu(&self) -> bool {
        MENU_TYPES.contains(&self.element_type.as_str())
    }

    /// Depth-first, pre-order walk over this node and its descendants
    pub fn walk(&self) -> Vec<&ElementNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }
}
