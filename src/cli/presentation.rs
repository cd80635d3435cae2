//! CLI presentation: text and json rendering for split, resolve, replay and health.

use crate::menu::Display;
use crate::session::SessionSnapshot;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Tokens from `whenctl split`; `unbalanced_at` is the offset of a stray `)`
pub fn format_split_text(tokens: &[String], unbalanced_at: Option<usize>) -> String {
    let mut out = String::new();
    for (index, token) in tokens.iter().enumerate() {
        out.push_str(&format!("{:>3}  {:?}\n", index, token));
    }
    out.push_str(&format!("\nTotal: {} token(s)\n", tokens.len()));
    if let Some(position) = unbalanced_at {
        out.push_str(&format!(
            "Warning: unbalanced ')' at offset {}; tokenization stopped early\n",
            position
        ));
    }
    out
}

pub fn format_split_json(tokens: &[String], unbalanced_at: Option<usize>) -> String {
    let out = json!({ "tokens": tokens, "unbalanced_at": unbalanced_at });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_resolved(policy: &str) -> String {
    policy.to_string()
}

pub fn format_health(url: &str, body: &serde_json::Value) -> String {
    format!("Backend {} is healthy: {}", url, body)
}

/// Replay result as headed comfy-table sections
pub fn format_snapshot_text(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n\n", format_section_heading("Context")));
    if snapshot.context.is_empty() {
        out.push_str("  (empty)\n\n");
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Key", "Value"]);
        for entry in &snapshot.context {
            table.add_row(vec![entry.key.clone(), entry.value.clone()]);
        }
        out.push_str(&format!("{}\n\n", table));
    }

    let with_attributes: Vec<_> = snapshot
        .elements
        .iter()
        .filter(|e| !e.attributes.is_empty())
        .collect();
    out.push_str(&format!("{}\n\n", format_section_heading("Element attributes")));
    if with_attributes.is_empty() {
        out.push_str("  (none)\n\n");
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Element", "Key", "Value"]);
        for element in with_attributes {
            for attribute in &element.attributes {
                table.add_row(vec![
                    element.id.clone(),
                    attribute.key.clone(),
                    attribute.value.clone(),
                ]);
            }
        }
        out.push_str(&format!("{}\n\n", table));
    }

    if !snapshot.menus.is_empty() {
        out.push_str(&format!("{}\n\n", format_section_heading("Context menus")));
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Menu", "Display", "Position"]);
        for menu in &snapshot.menus {
            let display = match menu.display {
                Display::Block => "block",
                Display::None => "none",
            };
            let position = match (menu.left, menu.top) {
                (Some(left), Some(top)) => format!("{}, {}", left, top),
                _ => "-".to_string(),
            };
            table.add_row(vec![menu.key.clone(), display.to_string(), position]);
        }
        out.push_str(&format!("{}\n\n", table));
    }

    out.push_str(&format!("{}\n\n", format_section_heading("Submissions")));
    if snapshot.submissions.is_empty() {
        out.push_str("  (none)\n");
    } else {
        for (index, request) in snapshot.submissions.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", index + 1, request.function));
        }
    }
    out
}

pub fn format_snapshot_json(snapshot: &SessionSnapshot) -> String {
    serde_json::to_string_pretty(snapshot).unwrap_or_else(|_| "{}".to_string())
}
