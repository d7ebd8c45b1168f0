//! # Menu Builders
//!
//! Pure functions mapping data to menu layouts. A menu is a markdown list
//! pairing a label with the callback token to send back; handlers append
//! the menu to their reply text.

use crate::domain::models::Event;

fn entry(label: &str, token: &str) -> String {
    format!("{label} → `{token}`\n")
}

pub fn main_menu() -> String {
    let mut menu = String::new();
    menu.push_str(&entry("🎭 Playbill", "events_list"));
    menu.push_str(&entry("🎫 My tickets", "my_tickets"));
    menu.push_str(&entry("ℹ️ About", "about"));
    menu
}

pub fn events_list(events: &[Event]) -> String {
    let mut menu = String::new();
    for event in events {
        menu.push_str(&entry(
            &format!("🎭 {}", event.title),
            &format!("event_{}", event.id),
        ));
    }
    menu.push_str(&entry("◀️ Back", "main_menu"));
    menu
}

pub fn event_detail(event_id: i32, has_ticket: bool) -> String {
    let mut menu = String::new();
    if has_ticket {
        menu.push_str(&entry("▶️ Watch the stream", &format!("watch_{event_id}")));
    } else {
        menu.push_str(&entry("🎫 Buy a ticket", &format!("buy_{event_id}")));
    }
    menu.push_str(&entry("◀️ Back to playbill", "events_list"));
    menu
}

pub fn admin_menu() -> String {
    let mut menu = String::new();
    menu.push_str(&entry("➕ Create event", "admin_create_event"));
    menu.push_str(&entry("📋 Event list", "admin_events_list"));
    menu.push_str(&entry("📊 Statistics", "admin_stats"));
    menu.push_str(&entry("🤖 AI content", "admin_ai_content"));
    menu
}

pub fn back_to_main() -> String {
    entry("◀️ Main menu", "main_menu")
}
