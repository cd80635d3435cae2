//! Update interpreter: `(id,key,value)` upserts one attribute on an element.

use crate::error::PolicyError;
use crate::interpreter::DispatchContext;
use crate::splitter::{split_arguments, strip_outer_parens};
use crate::types::{upsert_attribute, Attribute, Policy};
use tracing::debug;

pub fn interpret(ctx: &DispatchContext, policy: &Policy) -> Result<(), PolicyError> {
    let tokens = split_arguments(strip_outer_parens(&policy.policy));
    if tokens.len() < 3 {
        return Err(PolicyError::Arity {
            interaction: "update",
            policy: policy.policy.clone(),
            expected: 3,
            actual: tokens.len(),
        });
    }
    let id = tokens[0].as_str();
    let key = tokens[1].as_str();
    // Extra top-level tokens belong to the value: `(id,label,a,b)` stores "a,b".
    let value = tokens[2..].join(",");

    let Some(mut element) = ctx.elements.get_element(id) else {
        return Err(PolicyError::ElementNotFound {
            id: id.to_string(),
            key: key.to_string(),
            value,
        });
    };

    upsert_attribute(&mut element.attributes, Attribute::new(id, key, value));
    ctx.elements.store_attributes(id, element.attributes.clone());

    if let Some(object) = element.native_object() {
        object.set_attributes(&element.attributes);
    }
    if let Some(tag) = &element.tag {
        ctx.tags.set_child_tag_attributes(tag, &element);
    }

    debug!(id, key, "Attribute updated");
    Ok(())
}
