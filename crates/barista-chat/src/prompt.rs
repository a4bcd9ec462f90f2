//! Instruction prompts for the oracle.
//!
//! The prompt carries the conversational rules, the current menu, the
//! order state, and the exact response schema. Domain validity (which
//! sizes, temperatures, and milks make sense for which drinks) is the
//! oracle's job, stated here as rules; the engine only bookkeeps.

use std::fmt::Write;

use barista_core::types::{OrderLineItem, PendingItem};
use barista_menu::types::{MenuEntry, MenuSnapshot};

/// Render the menu as one line per item.
fn render_menu(menu: &MenuSnapshot) -> String {
    if menu.is_empty() {
        return "(the menu is currently empty — decline all item requests)".to_string();
    }
    let mut out = String::new();
    for (item, entry) in &menu.entries {
        match entry {
            MenuEntry::Flat(price) => {
                let _ = writeln!(out, "- {}: ${:.2}", item, price);
            }
            MenuEntry::Sized(sizes) => {
                let sizes = sizes
                    .iter()
                    .map(|(size, price)| format!("{} ${:.2}", size, price))
                    .collect::<Vec<_>>()
                    .join(", ");
                let _ = writeln!(out, "- {}: {}", item, sizes);
            }
        }
    }
    out
}

/// System prompt for the multi-turn conversational path.
pub fn conversation_prompt(
    menu: &MenuSnapshot,
    completed: &[OrderLineItem],
    pending: Option<&PendingItem>,
) -> String {
    let completed_json =
        serde_json::to_string(completed).unwrap_or_else(|_| "[]".to_string());
    let pending_json = pending
        .and_then(|p| serde_json::to_string(p).ok())
        .unwrap_or_else(|| "null".to_string());

    format!(
        "You are a friendly counter assistant taking a food and drink order.\n\
        \n\
        Rules:\n\
        - Only items on the menu below may be ordered; politely decline anything else.\n\
        - Work on one item at a time. Ask for exactly one missing attribute per turn.\n\
        - Sized drinks need a size. Espresso-based drinks need a temperature and a milk \
        choice where applicable; never ask for attributes that make no sense for the item \
        (no milk for plain espresso, no temperature for pastries or cold brew).\n\
        - When the current item has everything it needs, emit action \"add_item\" with the \
        completed item in pending_item.\n\
        - When the customer indicates they are done and at least one item was added, emit \
        action \"finalize_order\" with order_complete true.\n\
        - For requests that cannot be fulfilled, emit action \"invalid_request\".\n\
        \n\
        Menu:\n{menu}\n\
        Items already in the order: {completed}\n\
        Item currently being clarified: {pending}\n\
        \n\
        Respond with a single JSON object and nothing else:\n\
        {{\n\
        \x20 \"reply\": string,            // what to say to the customer\n\
        \x20 \"needs_more_info\": boolean, // true while the order needs clarification\n\
        \x20 \"order_complete\": boolean,  // true only when the whole order is done\n\
        \x20 \"pending_item\": {{\"item\": string, \"size\": string?, \"temperature\": string?, \
        \"milk\": string?, \"modifications\": [string]}} or null,\n\
        \x20 \"action\": one of \"ask_size\", \"ask_temperature\", \"ask_milk\", \
        \"ask_modifications\", \"add_item\", \"finalize_order\", \"invalid_request\"\n\
        }}\n\
        pending_item is a full replacement: return every attribute gathered so far, not \
        just the new one.",
        menu = render_menu(menu),
        completed = completed_json,
        pending = pending_json,
    )
}

/// System prompt for the one-shot order path.
pub fn single_turn_prompt(menu: &MenuSnapshot) -> String {
    format!(
        "You are a counter assistant parsing a complete food and drink order from a \
        single message.\n\
        \n\
        Rules:\n\
        - Only items on the menu below are valid; price each line from the menu.\n\
        - If nothing in the message can be ordered, return an empty items list and a \
        total of 0 with a reply explaining why.\n\
        \n\
        Menu:\n{menu}\n\
        Respond with a single JSON object and nothing else:\n\
        {{\n\
        \x20 \"response\": string,  // what to say to the customer\n\
        \x20 \"items\": [{{\"item\": string, \"size\": string?, \"temperature\": string?, \
        \"milk\": string?, \"modifications\": [string], \"price\": number}}],\n\
        \x20 \"total\": number      // sum of the item prices\n\
        }}",
        menu = render_menu(menu),
    )
}

// =============================================================================
// Tests
// =============================================================================
