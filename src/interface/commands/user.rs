//! # User Handlers
//!
//! `/start`, `/menu`, `/help`, the ticket list, and the about screen.

use anyhow::Result;
use sqlx::PgConnection;

use crate::application::middleware::SenderProfile;
use crate::application::services::TicketService;
use crate::domain::models::User;
use crate::domain::traits::ChatProvider;
use crate::interface::menus;
use crate::strings::{help, messages};

pub async fn start(chat: &impl ChatProvider, user: Option<&User>) -> Result<()> {
    let first_name = user.and_then(|u| u.first_name.as_deref());
    let text = format!("{}\n\n{}", messages::welcome(first_name), menus::main_menu());
    chat.send_message(&text).await.map_err(anyhow::Error::msg)?;

    if let Some(user) = user {
        tracing::info!("User {} started the bot", user.matrix_id);
    }
    Ok(())
}

pub async fn menu(chat: &impl ChatProvider) -> Result<()> {
    let text = format!("{}\n\n{}", messages::MAIN_MENU, menus::main_menu());
    chat.send_message(&text).await.map_err(anyhow::Error::msg)?;
    Ok(())
}

pub async fn my_tickets(
    conn: &mut PgConnection,
    chat: &impl ChatProvider,
    profile: Option<&SenderProfile>,
) -> Result<()> {
    let Some(profile) = profile else {
        return Ok(());
    };

    let tickets = TicketService::new(conn).for_user(&profile.id).await?;

    let mut text = if tickets.is_empty() {
        messages::TICKETS_EMPTY.to_string()
    } else {
        let mut text = messages::tickets_header(tickets.len());
        for ticket in &tickets {
            text.push_str(&messages::ticket_line(ticket));
        }
        text
    };
    text.push_str("\n\n");
    text.push_str(&menus::back_to_main());

    chat.send_message(&text).await.map_err(anyhow::Error::msg)?;
    Ok(())
}

pub async fn about(chat: &impl ChatProvider) -> Result<()> {
    let text = format!("{}\n\n{}", messages::ABOUT, menus::back_to_main());
    chat.send_message(&text).await.map_err(anyhow::Error::msg)?;
    Ok(())
}

pub async fn help(chat: &impl ChatProvider) -> Result<()> {
    chat.send_message(help::MAIN)
        .await
        .map_err(anyhow::Error::msg)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::commands::testing::MockChat;

    #[tokio::test]
    async fn test_start_greets_by_first_name_and_shows_menu() {
        let chat = MockChat::default();
        let user = User {
            matrix_id: "@alice:example.org".into(),
            username: Some("alice".into()),
            first_name: Some("Alice".into()),
            last_name: None,
            language_code: "en".into(),
            role: crate::domain::models::UserRole::User,
            is_premium: false,
            balance: rust_decimal::Decimal::ZERO,
            created_at: chrono::Utc::now(),
            last_active: None,
        };

        start(&chat, Some(&user)).await.unwrap();

        let sent = chat.last_message();
        assert!(sent.contains("Welcome, Alice!"));
        assert!(sent.contains("`events_list`"));
    }

    #[tokio::test]
    async fn test_start_without_user_context_still_replies() {
        let chat = MockChat::default();
        start(&chat, None).await.unwrap();
        assert!(chat.last_message().contains("Welcome, friend!"));
    }

    #[tokio::test]
    async fn test_menu_lists_tokens() {
        let chat = MockChat::default();
        menu(&chat).await.unwrap();
        let sent = chat.last_message();
        assert!(sent.contains("`my_tickets`"));
        assert!(sent.contains("`about`"));
    }
}
