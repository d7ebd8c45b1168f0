//! # Event Browsing Handlers
//!
//! Playbill listing, event detail, and the (stubbed) purchase and stream
//! flows. Purchase performs no state change: payment is not integrated.

use anyhow::Result;
use sqlx::PgConnection;

use crate::application::middleware::SenderProfile;
use crate::application::services::{EventService, TicketService};
use crate::domain::models::Event;
use crate::domain::traits::ChatProvider;
use crate::interface::menus;
use crate::strings::messages;

/// Unknown ids get a not-found alert and end the interaction; nothing is
/// sent or mutated beyond the alert.
async fn require_event(chat: &impl ChatProvider, event: Option<Event>) -> Option<Event> {
    if event.is_none() {
        let _ = chat.send_notification(messages::EVENT_NOT_FOUND).await;
    }
    event
}

pub async fn list(conn: &mut PgConnection, chat: &impl ChatProvider) -> Result<()> {
    let events = EventService::new(conn).upcoming().await?;

    let text = if events.is_empty() {
        format!("{}\n\n{}", messages::EVENTS_EMPTY, menus::back_to_main())
    } else {
        format!(
            "{}\n\n{}",
            messages::events_header(events.len()),
            menus::events_list(&events)
        )
    };

    chat.send_message(&text).await.map_err(anyhow::Error::msg)?;
    Ok(())
}

pub async fn detail(
    conn: &mut PgConnection,
    chat: &impl ChatProvider,
    profile: Option<&SenderProfile>,
    event_id: i32,
) -> Result<()> {
    let found = EventService::new(&mut *conn).get(event_id).await?;
    let Some(event) = require_event(chat, found).await else {
        return Ok(());
    };

    let sold = if event.max_viewers.is_some() {
        EventService::new(&mut *conn).sold_tickets(event_id).await?
    } else {
        0
    };

    let has_ticket = match profile {
        Some(p) => {
            TicketService::new(&mut *conn)
                .has_ticket(&p.id, event_id)
                .await?
        }
        None => false,
    };

    let text = format!(
        "{}\n{}",
        messages::event_card(&event, sold),
        menus::event_detail(event_id, has_ticket)
    );
    chat.send_message(&text).await.map_err(anyhow::Error::msg)?;
    Ok(())
}

/// Purchase stub: informational only, no order is created.
pub async fn buy(
    conn: &mut PgConnection,
    chat: &impl ChatProvider,
    profile: Option<&SenderProfile>,
    event_id: i32,
) -> Result<()> {
    let found = EventService::new(conn).get(event_id).await?;
    let Some(event) = require_event(chat, found).await else {
        return Ok(());
    };

    let _ = chat
        .send_notification(&messages::buy_stub(&event.title, &event.price))
        .await;

    if let Some(profile) = profile {
        tracing::info!(
            "User {} attempted to buy a ticket for event {event_id}",
            profile.id
        );
    }
    Ok(())
}

pub async fn watch(
    conn: &mut PgConnection,
    chat: &impl ChatProvider,
    profile: Option<&SenderProfile>,
    event_id: i32,
) -> Result<()> {
    let found = EventService::new(conn).get(event_id).await?;
    let Some(event) = require_event(chat, found).await else {
        return Ok(());
    };

    let Some(invite_link) = &event.invite_link else {
        let _ = chat.send_notification(messages::STREAM_NOT_READY).await;
        return Ok(());
    };

    chat.send_message(&messages::watch_stream(&event.title, invite_link))
        .await
        .map_err(anyhow::Error::msg)?;

    if let Some(profile) = profile {
        tracing::info!("User {} is watching event {event_id}", profile.id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::EventStatus;
    use crate::interface::commands::testing::MockChat;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn event(id: i32) -> Event {
        Event {
            id,
            title: "Hamlet".into(),
            description: None,
            poster_url: None,
            start_time: Utc::now(),
            duration_minutes: 120,
            price: Decimal::from(500),
            max_viewers: None,
            stream_url: None,
            invite_link: None,
            status: EventStatus::Upcoming,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_unknown_event_alerts_and_sends_nothing() {
        let chat = MockChat::default();

        assert!(require_event(&chat, None).await.is_none());

        assert_eq!(
            chat.notices.lock().unwrap().as_slice(),
            [messages::EVENT_NOT_FOUND]
        );
        assert!(chat.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_known_event_passes_through_silently() {
        let chat = MockChat::default();

        let found = require_event(&chat, Some(event(3))).await;

        assert_eq!(found.map(|e| e.id), Some(3));
        assert!(chat.sent.lock().unwrap().is_empty());
        assert!(chat.notices.lock().unwrap().is_empty());
    }
}
