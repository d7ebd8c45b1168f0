//! # Admin Handlers
//!
//! The admin panel, event listing, the multi-step event creation form,
//! and the manual event management actions. Admin gating happens in the
//! router before any of these run.

use anyhow::Result;
use sqlx::PgConnection;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::middleware::SenderProfile;
use crate::application::services::EventService;
use crate::application::state::{BotState, EventForm, FormAdvance, FormError, FormKey};
use crate::domain::models::{Event, EventStatus};
use crate::domain::traits::ChatProvider;
use crate::interface::menus;
use crate::strings::messages;

pub async fn panel(chat: &impl ChatProvider) -> Result<()> {
    let text = format!("{}\n\n{}", messages::ADMIN_PANEL, menus::admin_menu());
    chat.send_message(&text).await.map_err(anyhow::Error::msg)?;
    Ok(())
}

/// All events, newest start time first, truncated to ten.
pub async fn events_list(conn: &mut PgConnection, chat: &impl ChatProvider) -> Result<()> {
    let events = EventService::new(conn).all().await?;

    let mut text = if events.is_empty() {
        messages::ADMIN_EVENTS_EMPTY.to_string()
    } else {
        let mut text = messages::admin_events_header(events.len());
        for event in events.iter().take(10) {
            text.push_str(&messages::admin_event_line(event));
        }
        text
    };
    text.push('\n');
    text.push_str(&menus::back_to_main());

    chat.send_message(&text).await.map_err(anyhow::Error::msg)?;
    Ok(())
}

pub async fn stats(chat: &impl ChatProvider) -> Result<()> {
    let text = format!(
        "{}\n\n{}",
        messages::STATS_PLACEHOLDER,
        menus::back_to_main()
    );
    chat.send_message(&text).await.map_err(anyhow::Error::msg)?;
    Ok(())
}

pub async fn ai_content(chat: &impl ChatProvider) -> Result<()> {
    let text = format!(
        "{}\n\n{}",
        messages::AI_CONTENT_PLACEHOLDER,
        menus::back_to_main()
    );
    chat.send_message(&text).await.map_err(anyhow::Error::msg)?;
    Ok(())
}

/// Open a fresh creation form for this (room, sender) conversation.
pub async fn create_start(
    chat: &impl ChatProvider,
    state: &Arc<Mutex<BotState>>,
    profile: Option<&SenderProfile>,
) -> Result<()> {
    let Some(profile) = profile else {
        return Ok(());
    };

    let form = EventForm::Title;
    let prompt = form.prompt();
    state
        .lock()
        .await
        .set_form((chat.room_id(), profile.id.clone()), form);

    chat.send_message(prompt).await.map_err(anyhow::Error::msg)?;
    Ok(())
}

/// Advance the active form by one input line. Invalid input re-prompts and
/// leaves the stored step untouched; the terminal step commits the event
/// and clears the conversation.
pub async fn form_step(
    conn: &mut PgConnection,
    chat: &impl ChatProvider,
    state: &Arc<Mutex<BotState>>,
    key: FormKey,
    form: &EventForm,
    input: &str,
) -> Result<()> {
    match form.apply(input) {
        Ok(FormAdvance::Next(next)) => {
            let prompt = next.prompt();
            state.lock().await.set_form(key, next);
            chat.send_message(prompt).await.map_err(anyhow::Error::msg)?;
        }
        Ok(FormAdvance::Complete(new_event)) => {
            let event = EventService::new(conn).create(&new_event).await?;
            finish_form(chat, state, key, &event).await?;
        }
        Err(err) => {
            chat.send_message(form_error_text(err))
                .await
                .map_err(anyhow::Error::msg)?;
        }
    }
    Ok(())
}

/// Confirm the created event, then discard the conversation. The form is
/// only cleared once the confirmation went out; a failed send keeps it,
/// and the surrounding transaction rolls back with the insert.
async fn finish_form(
    chat: &impl ChatProvider,
    state: &Arc<Mutex<BotState>>,
    key: FormKey,
    event: &Event,
) -> Result<()> {
    let text = format!(
        "{}\n\n{}",
        messages::event_created(event),
        menus::admin_menu()
    );
    chat.send_message(&text).await.map_err(anyhow::Error::msg)?;

    state.lock().await.clear_form(&key);
    Ok(())
}

fn form_error_text(err: FormError) -> &'static str {
    match err {
        FormError::BadDate => messages::INVALID_DATE,
        FormError::BadNumber => messages::INVALID_NUMBER,
        FormError::BadNumberOrSkip => messages::INVALID_NUMBER_OR_SKIP,
    }
}

pub async fn delete(conn: &mut PgConnection, chat: &impl ChatProvider, event_id: i32) -> Result<()> {
    if EventService::new(conn).delete(event_id).await? {
        chat.send_message(&messages::event_deleted(event_id))
            .await
            .map_err(anyhow::Error::msg)?;
    } else {
        let _ = chat.send_notification(messages::EVENT_NOT_FOUND).await;
    }
    Ok(())
}

pub async fn set_status(
    conn: &mut PgConnection,
    chat: &impl ChatProvider,
    event_id: i32,
    status: EventStatus,
) -> Result<()> {
    if EventService::new(conn).update_status(event_id, status).await? {
        chat.send_message(&messages::event_status_updated(event_id, status.as_str()))
            .await
            .map_err(anyhow::Error::msg)?;
    } else {
        let _ = chat.send_notification(messages::EVENT_NOT_FOUND).await;
    }
    Ok(())
}

/// `/setstream <event_id> <url>`
pub async fn set_stream(conn: &mut PgConnection, chat: &impl ChatProvider, args: &str) -> Result<()> {
    let parsed = args
        .split_once(char::is_whitespace)
        .map(|(id, url)| (id.trim(), url.trim()))
        .and_then(|(id, url)| Some((id.parse::<i32>().ok()?, url)))
        .filter(|(_, url)| !url.is_empty());

    let Some((event_id, url)) = parsed else {
        let _ = chat.send_notification(messages::SETSTREAM_USAGE).await;
        return Ok(());
    };

    if EventService::new(conn).set_invite_link(event_id, url).await? {
        chat.send_message(&messages::stream_link_set(event_id))
            .await
            .map_err(anyhow::Error::msg)?;
    } else {
        let _ = chat.send_notification(messages::EVENT_NOT_FOUND).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::commands::testing::MockChat;

    #[tokio::test]
    async fn test_panel_shows_admin_tokens() {
        let chat = MockChat::default();
        panel(&chat).await.unwrap();
        let sent = chat.last_message();
        assert!(sent.contains("`admin_create_event`"));
        assert!(sent.contains("`admin_events_list`"));
    }

    #[tokio::test]
    async fn test_create_start_opens_a_keyed_form() {
        let chat = MockChat::default();
        let state = Arc::new(Mutex::new(BotState::default()));
        let profile = SenderProfile {
            id: "@boss:example.org".into(),
            username: Some("boss".into()),
            display_name: None,
        };

        create_start(&chat, &state, Some(&profile)).await.unwrap();

        let key = (chat.room_id(), profile.id.clone());
        assert_eq!(
            state.lock().await.active_form(&key),
            Some(EventForm::Title)
        );
        assert!(chat.last_message().contains("Step 1/6"));
    }

    #[tokio::test]
    async fn test_create_start_without_sender_is_a_no_op() {
        let chat = MockChat::default();
        let state = Arc::new(Mutex::new(BotState::default()));
        create_start(&chat, &state, None).await.unwrap();
        assert!(chat.sent.lock().unwrap().is_empty());
    }

    fn created_event() -> Event {
        Event {
            id: 7,
            title: "Hamlet".into(),
            description: None,
            poster_url: None,
            start_time: chrono::Utc::now(),
            duration_minutes: 120,
            price: rust_decimal::Decimal::from(500),
            max_viewers: None,
            stream_url: None,
            invite_link: None,
            status: EventStatus::Upcoming,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_form_cleared_only_after_confirmation_is_delivered() {
        let chat = MockChat::default();
        let state = Arc::new(Mutex::new(BotState::default()));
        let key = ("!stage:example.org".to_string(), "@boss:example.org".to_string());
        state.lock().await.set_form(key.clone(), EventForm::Title);

        finish_form(&chat, &state, key.clone(), &created_event())
            .await
            .unwrap();

        assert!(state.lock().await.active_form(&key).is_none());
        assert!(chat.last_message().contains("Event created"));
    }

    #[tokio::test]
    async fn test_form_survives_a_failed_confirmation_send() {
        let chat = MockChat {
            fail_sends: true,
            ..Default::default()
        };
        let state = Arc::new(Mutex::new(BotState::default()));
        let key = ("!stage:example.org".to_string(), "@boss:example.org".to_string());
        state.lock().await.set_form(key.clone(), EventForm::Title);

        let result = finish_form(&chat, &state, key.clone(), &created_event()).await;

        assert!(result.is_err());
        assert_eq!(
            state.lock().await.active_form(&key),
            Some(EventForm::Title)
        );
    }

    #[test]
    fn test_form_error_messages() {
        assert_eq!(form_error_text(FormError::BadDate), messages::INVALID_DATE);
        assert_eq!(
            form_error_text(FormError::BadNumber),
            messages::INVALID_NUMBER
        );
        assert_eq!(
            form_error_text(FormError::BadNumberOrSkip),
            messages::INVALID_NUMBER_OR_SKIP
        );
    }
}
