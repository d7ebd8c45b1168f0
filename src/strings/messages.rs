//! # Messages
//!
//! Constant strings and format functions for user-facing messages.
//! Handlers compose replies exclusively from here so wording stays in one place.

use chrono::{DateTime, Utc};

use crate::domain::models::{Event, TicketSummary};

/// Display format for event start times, also the format the creation
/// form expects as input.
pub const DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

pub fn format_start_time(ts: DateTime<Utc>) -> String {
    ts.format(DATE_FORMAT).to_string()
}

// --- User-facing screens ---

pub fn welcome(first_name: Option<&str>) -> String {
    let name = first_name.unwrap_or("friend");
    format!(
        "🎭 **Welcome, {name}!**\n\n\
         This is a bot for watching live-streamed theater performances.\n\n\
         Here you can:\n\
         • Browse the playbill of upcoming performances\n\
         • Buy tickets for the streams\n\
         • Watch performances online\n\n\
         Choose an action:"
    )
}

pub const MAIN_MENU: &str = "🎭 **Main menu**\n\nChoose an action:";

pub const EVENTS_EMPTY: &str = "🎭 **Playbill**\n\n\
    Unfortunately there are no scheduled performances yet.\n\
    Stay tuned!";

pub fn events_header(count: usize) -> String {
    format!(
        "🎭 **Playbill of upcoming performances**\n\n\
         Performances found: {count}\n\
         Pick one for details:"
    )
}

/// Detail card for a single event. `sold` is the number of tickets already
/// sold, used to render remaining capacity when the event has one.
pub fn event_card(event: &Event, sold: i64) -> String {
    let mut text = format!(
        "🎭 **{}**\n\n📅 Date: {}\n⏱ Duration: {} min\n💰 Price: {} ₽\n\n",
        event.title,
        format_start_time(event.start_time),
        event.duration_minutes,
        event.price,
    );

    if let Some(description) = &event.description {
        text.push_str(description);
        text.push_str("\n\n");
    }

    if let Some(max_viewers) = event.max_viewers {
        let available = i64::from(max_viewers) - sold;
        text.push_str(&format!(
            "🎫 Seats available: {available} of {max_viewers}\n"
        ));
    }

    text
}

pub const EVENT_NOT_FOUND: &str = "❌ Performance not found";

pub fn buy_stub(title: &str, price: &rust_decimal::Decimal) -> String {
    format!(
        "🎫 **Ticket purchase**\n\n\
         Performance: {title}\n\
         Price: {price} ₽\n\n\
         ⚠️ Payment is not available yet.\n\
         To buy a ticket, contact an administrator."
    )
}

pub const STREAM_NOT_READY: &str =
    "⚠️ The stream link is not ready yet. Please try again later.";

pub fn watch_stream(title: &str, invite_link: &str) -> String {
    format!(
        "▶️ **Stream: {title}**\n\n\
         Follow the link to watch:\n{invite_link}\n\n\
         Enjoy the show! 🎭"
    )
}

pub const TICKETS_EMPTY: &str = "🎫 **My tickets**\n\n\
    You have no tickets yet.\n\
    Check the playbill and pick a performance!";

pub fn tickets_header(count: usize) -> String {
    format!("🎫 **My tickets**\n\nTickets: {count}\n")
}

pub fn ticket_line(ticket: &TicketSummary) -> String {
    let status = if ticket.is_used { "used" } else { "valid" };
    format!(
        "🎟 **{}** — {} ({status})\n   token: `{}`\n",
        ticket.event_title,
        format_start_time(ticket.start_time),
        ticket.access_token,
    )
}

pub const ABOUT: &str = "ℹ️ **About**\n\n\
    🎭 A platform for live-streamed theater.\n\n\
    We bring quality stage productions to your home. All streams run in \
    high quality with interactive features.\n\n\
    Partnership inquiries: @support";

// --- Admin screens ---

pub const ADMIN_PANEL: &str = "👨‍💼 **Admin panel**\n\nChoose an action:";

pub const ADMIN_EVENTS_EMPTY: &str = "📋 **Event list**\n\nNo events yet.";

pub fn admin_events_header(total: usize) -> String {
    format!("📋 **Event list**\n\nTotal: {total}\n\n")
}

pub fn admin_event_line(event: &Event) -> String {
    format!(
        "{} **{}**\n   ID: {} | {} | {} ₽ | delete: `admin_delete_{}`\n\n",
        event.status.glyph(),
        event.title,
        event.id,
        format_start_time(event.start_time),
        event.price,
        event.id,
    )
}

pub const STATS_PLACEHOLDER: &str = "📊 **Statistics**\n\n\
    Users: -\n\
    Events: -\n\
    Tickets sold: -\n\
    Revenue: - ₽\n\n\
    ⚠️ Under development";

pub const AI_CONTENT_PLACEHOLDER: &str = "🤖 **AI content generation**\n\n\
    ⚠️ Under development\n\n\
    Planned:\n\
    • Performance announcements\n\
    • Poster generation\n\
    • Auto-posting to the channel";

pub fn event_created(event: &Event) -> String {
    format!(
        "✅ **Event created!**\n\n\
         🎭 {}\n📅 {}\n⏱ {} min\n💰 {} ₽\nID: {}",
        event.title,
        format_start_time(event.start_time),
        event.duration_minutes,
        event.price,
        event.id,
    )
}

pub fn event_deleted(id: i32) -> String {
    format!("🗑 Event {id} deleted.")
}

pub fn event_status_updated(id: i32, status: &str) -> String {
    format!("✅ Event {id} status set to `{status}`.")
}

pub fn stream_link_set(id: i32) -> String {
    format!("✅ Stream link set for event {id}.")
}

pub const SETSTREAM_USAGE: &str = "Usage: `/setstream <event_id> <url>`";

// --- Creation form prompts ---

pub const FORM_STEP_TITLE: &str =
    "➕ **New event**\n\nStep 1/6: Enter the performance title:";

pub const FORM_STEP_DESCRIPTION: &str =
    "Step 2/6: Enter the description\n(or send '-' to skip):";

pub const FORM_STEP_START_TIME: &str = "Step 3/6: Enter the start date and time\n\
    Format: DD.MM.YYYY HH:MM\n\
    For example: 25.12.2024 19:00";

pub const FORM_STEP_DURATION: &str =
    "Step 4/6: Enter the duration in minutes\n(or '-' for the default of 120):";

pub const FORM_STEP_PRICE: &str =
    "Step 5/6: Enter the ticket price\n(0 for a free performance):";

pub const FORM_STEP_MAX_VIEWERS: &str =
    "Step 6/6: Enter the maximum number of viewers\n(or '-' for unlimited):";

pub const INVALID_DATE: &str = "❌ Invalid date format!\n\
    Use: DD.MM.YYYY HH:MM\n\
    For example: 25.12.2024 19:00";

pub const INVALID_NUMBER: &str = "❌ Enter a number!";

pub const INVALID_NUMBER_OR_SKIP: &str = "❌ Enter a number or '-'!";

// --- Access & lifecycle ---

pub const AUTH_DENIED: &str = "🚫 **Authorization denied**.";

pub const STARTUP_NOTICE: &str = "🎭 **Bot started!**\n\n\
    The live-theater system is up and running.";

pub const SHUTDOWN_NOTICE: &str = "⚠️ **Bot stopped**";
