//! Core data model: policies, their trigger tags, and element attributes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trigger side of a policy: which DOM interaction fires it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    Click,
    Input,
    RightClick,
    /// Evaluated once at bind time, never through a listener
    Load,
    Unknown(String),
}

impl ActionType {
    /// Every action kind the binder attaches listeners for, in binding order
    pub const BOUND: [ActionType; 4] = [
        ActionType::Click,
        ActionType::Input,
        ActionType::RightClick,
        ActionType::Load,
    ];

    pub fn label(&self) -> &str {
        match self {
            ActionType::Click => "click",
            ActionType::Input => "input",
            ActionType::RightClick => "right_click",
            ActionType::Load => "load",
            ActionType::Unknown(raw) => raw,
        }
    }
}

impl From<&str> for ActionType {
    fn from(raw: &str) -> Self {
        match raw {
            "click" => ActionType::Click,
            "input" => ActionType::Input,
            "right_click" => ActionType::RightClick,
            "load" => ActionType::Load,
            other => ActionType::Unknown(other.to_string()),
        }
    }
}

impl From<String> for ActionType {
    fn from(raw: String) -> Self {
        ActionType::from(raw.as_str())
    }
}

impl From<ActionType> for String {
    fn from(action: ActionType) -> Self {
        action.label().to_string()
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Effect side of a policy: which interpreter runs it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InteractionType {
    Update,
    Context,
    Call,
    Callback,
    ShowContextMenu,
    Unknown(String),
}

impl InteractionType {
    pub fn label(&self) -> &str {
        match self {
            InteractionType::Update => "update",
            InteractionType::Context => "context",
            InteractionType::Call => "call",
            InteractionType::Callback => "callback",
            InteractionType::ShowContextMenu => "show_context_menu",
            InteractionType::Unknown(raw) => raw,
        }
    }
}

impl From<&str> for InteractionType {
    fn from(raw: &str) -> Self {
        match raw {
            "update" => InteractionType::Update,
            "context" => InteractionType::Context,
            "call" => InteractionType::Call,
            "callback" => InteractionType::Callback,
            "show_context_menu" => InteractionType::ShowContextMenu,
            other => InteractionType::Unknown(other.to_string()),
        }
    }
}

impl From<String> for InteractionType {
    fn from(raw: String) -> Self {
        InteractionType::from(raw.as_str())
    }
}

impl From<InteractionType> for String {
    fn from(interaction: InteractionType) -> Self {
        interaction.label().to_string()
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A "when" policy: trigger tags plus the textual effect expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub action_type: ActionType,
    pub interaction_type: InteractionType,
    pub policy: String,
}

impl Policy {
    pub fn new(
        action_type: impl Into<ActionType>,
        interaction_type: impl Into<InteractionType>,
        policy: impl Into<String>,
    ) -> Self {
        Self {
            action_type: action_type.into(),
            interaction_type: interaction_type.into(),
            policy: policy.into(),
        }
    }
}

/// Key/value pair scoped to one element id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub id: String,
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(id: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Replace the entry with the same key in place, or append.
///
/// Any later duplicates of the key are dropped so at most one entry per key survives.
pub fn upsert_attribute(attributes: &mut Vec<Attribute>, attribute: Attribute) {
    match attributes.iter().position(|a| a.key == attribute.key) {
        Some(index) => {
            let key = attribute.key.clone();
            attributes[index] = attribute;
            let mut position = 0;
            attributes.retain(|a| {
                let keep = a.key != key || position == index;
                position += 1;
                keep
            });
        }
        None => attributes.push(attribute),
    }
}
