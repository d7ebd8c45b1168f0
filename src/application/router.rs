//! # Router
//!
//! Parses inbound messages into interactions (slash command, callback
//! token, or free text) and dispatches them to the handlers in
//! `interface::commands`. Each dispatch runs inside one database
//! transaction: committed when the handler returns, rolled back on fault.

use anyhow::{Context, Result};
use sqlx::PgPool;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::middleware::{self, SenderProfile};
use crate::application::state::BotState;
use crate::domain::config::AppConfig;
use crate::domain::models::{EventStatus, User};
use crate::domain::traits::ChatProvider;
use crate::interface::commands;
use crate::strings::messages;

/// One inbound message, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction<'a> {
    Command { name: &'a str, args: &'a str },
    Callback(Callback),
    Text(&'a str),
}

/// The opaque menu tokens users send back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    MainMenu,
    EventsList,
    MyTickets,
    About,
    Event(i32),
    Buy(i32),
    Watch(i32),
    AdminCreateEvent,
    AdminEventsList,
    AdminStats,
    AdminAiContent,
    AdminDelete(i32),
    AdminStatus(i32, EventStatus),
}

impl<'a> Interaction<'a> {
    pub fn parse(msg: &'a str) -> Self {
        if let Some(rest) = msg.strip_prefix('/') {
            let (name, args) = match rest.split_once(char::is_whitespace) {
                Some((name, args)) => (name, args.trim()),
                None => (rest, ""),
            };
            return Interaction::Command { name, args };
        }

        match Callback::parse(msg) {
            Some(callback) => Interaction::Callback(callback),
            None => Interaction::Text(msg),
        }
    }
}

impl Callback {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "main_menu" => return Some(Callback::MainMenu),
            "events_list" => return Some(Callback::EventsList),
            "my_tickets" => return Some(Callback::MyTickets),
            "about" => return Some(Callback::About),
            "admin_create_event" => return Some(Callback::AdminCreateEvent),
            "admin_events_list" => return Some(Callback::AdminEventsList),
            "admin_stats" => return Some(Callback::AdminStats),
            "admin_ai_content" => return Some(Callback::AdminAiContent),
            _ => {}
        }

        if let Some(rest) = token.strip_prefix("admin_status_") {
            let (id, status) = rest.split_once('_')?;
            return Some(Callback::AdminStatus(
                id.parse().ok()?,
                EventStatus::from_str(status).ok()?,
            ));
        }
        if let Some(rest) = token.strip_prefix("admin_delete_") {
            return Some(Callback::AdminDelete(rest.parse().ok()?));
        }
        if let Some(rest) = token.strip_prefix("event_") {
            return Some(Callback::Event(rest.parse().ok()?));
        }
        if let Some(rest) = token.strip_prefix("buy_") {
            return Some(Callback::Buy(rest.parse().ok()?));
        }
        if let Some(rest) = token.strip_prefix("watch_") {
            return Some(Callback::Watch(rest.parse().ok()?));
        }

        None
    }

    pub fn requires_admin(self) -> bool {
        matches!(
            self,
            Callback::AdminCreateEvent
                | Callback::AdminEventsList
                | Callback::AdminStats
                | Callback::AdminAiContent
                | Callback::AdminDelete(_)
                | Callback::AdminStatus(_, _)
        )
    }
}

/// Capability check for admin-only routes, evaluated once before dispatch
/// regardless of the interaction variant.
pub fn is_staff(config: &AppConfig, profile: Option<&SenderProfile>, user: Option<&User>) -> bool {
    let configured = profile
        .map(|p| config.is_configured_admin(&p.id))
        .unwrap_or(false);
    configured || user.map(|u| u.role.is_staff()).unwrap_or(false)
}

pub struct Router {
    config: AppConfig,
    pool: PgPool,
    state: Arc<Mutex<BotState>>,
}

impl Router {
    pub fn new(config: AppConfig, pool: PgPool, state: Arc<Mutex<BotState>>) -> Self {
        Self {
            config,
            pool,
            state,
        }
    }

    pub async fn route<C>(&self, chat: &C, message: &str, profile: Option<&SenderProfile>) -> Result<()>
    where
        C: ChatProvider,
    {
        let msg = message.trim();
        if msg.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to open transaction")?;

        // Middleware: exactly one upsert per interaction with a sender.
        let user = match profile {
            Some(p) => Some(middleware::resolve_user(tx.as_mut(), p).await?),
            None => None,
        };
        let staff = is_staff(&self.config, profile, user.as_ref());

        tracing::debug!(
            sender = profile.map(|p| p.id.as_str()).unwrap_or("<none>"),
            staff,
            "Routing message"
        );

        match Interaction::parse(msg) {
            Interaction::Command { name, args } => match name {
                "start" => commands::user::start(chat, user.as_ref()).await?,
                "menu" => commands::user::menu(chat).await?,
                "events" => commands::events::list(tx.as_mut(), chat).await?,
                "tickets" => commands::user::my_tickets(tx.as_mut(), chat, profile).await?,
                "help" => commands::user::help(chat).await?,
                "admin" => {
                    if staff {
                        commands::admin::panel(chat).await?;
                    } else {
                        let _ = chat.send_notification(messages::AUTH_DENIED).await;
                    }
                }
                "setstream" => {
                    if staff {
                        commands::admin::set_stream(tx.as_mut(), chat, args).await?;
                    } else {
                        let _ = chat.send_notification(messages::AUTH_DENIED).await;
                    }
                }
                _ => {}
            },

            Interaction::Callback(callback) => {
                if callback.requires_admin() && !staff {
                    let _ = chat.send_notification(messages::AUTH_DENIED).await;
                } else {
                    self.dispatch_callback(tx.as_mut(), chat, profile, callback)
                        .await?;
                }
            }

            // Free text only means something to an active creation form.
            Interaction::Text(text) => {
                if let Some(p) = profile {
                    let key = (chat.room_id(), p.id.clone());
                    let form = self.state.lock().await.active_form(&key);
                    if let Some(form) = form {
                        commands::admin::form_step(tx.as_mut(), chat, &self.state, key, &form, text)
                            .await?;
                    }
                }
            }
        }

        tx.commit().await.context("Failed to commit transaction")?;
        Ok(())
    }

    async fn dispatch_callback<C>(
        &self,
        conn: &mut sqlx::PgConnection,
        chat: &C,
        profile: Option<&SenderProfile>,
        callback: Callback,
    ) -> Result<()>
    where
        C: ChatProvider,
    {
        match callback {
            Callback::MainMenu => commands::user::menu(chat).await,
            Callback::EventsList => commands::events::list(conn, chat).await,
            Callback::MyTickets => commands::user::my_tickets(conn, chat, profile).await,
            Callback::About => commands::user::about(chat).await,
            Callback::Event(id) => commands::events::detail(conn, chat, profile, id).await,
            Callback::Buy(id) => commands::events::buy(conn, chat, profile, id).await,
            Callback::Watch(id) => commands::events::watch(conn, chat, profile, id).await,
            Callback::AdminCreateEvent => {
                commands::admin::create_start(chat, &self.state, profile).await
            }
            Callback::AdminEventsList => commands::admin::events_list(conn, chat).await,
            Callback::AdminStats => commands::admin::stats(chat).await,
            Callback::AdminAiContent => commands::admin::ai_content(chat).await,
            Callback::AdminDelete(id) => commands::admin::delete(conn, chat, id).await,
            Callback::AdminStatus(id, status) => {
                commands::admin::set_status(conn, chat, id, status).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{
        DatabaseConfig, MatrixConfig, PaymentConfig, RedisConfig,
    };

    #[test]
    fn test_command_parsing() {
        assert_eq!(
            Interaction::parse("/events"),
            Interaction::Command {
                name: "events",
                args: ""
            }
        );
        assert_eq!(
            Interaction::parse("/setstream 3 https://x.org/s"),
            Interaction::Command {
                name: "setstream",
                args: "3 https://x.org/s"
            }
        );
    }

    #[test]
    fn test_callback_parsing() {
        assert_eq!(
            Interaction::parse("events_list"),
            Interaction::Callback(Callback::EventsList)
        );
        assert_eq!(Callback::parse("event_3"), Some(Callback::Event(3)));
        assert_eq!(Callback::parse("buy_12"), Some(Callback::Buy(12)));
        assert_eq!(Callback::parse("watch_7"), Some(Callback::Watch(7)));
        assert_eq!(
            Callback::parse("admin_delete_5"),
            Some(Callback::AdminDelete(5))
        );
        assert_eq!(
            Callback::parse("admin_status_4_live"),
            Some(Callback::AdminStatus(4, EventStatus::Live))
        );
    }

    #[test]
    fn test_malformed_tokens_are_plain_text() {
        assert_eq!(Interaction::parse("event_x"), Interaction::Text("event_x"));
        assert_eq!(Interaction::parse("buy_"), Interaction::Text("buy_"));
        assert_eq!(
            Interaction::parse("admin_status_4_archived"),
            Interaction::Text("admin_status_4_archived")
        );
        assert_eq!(Interaction::parse("Hamlet"), Interaction::Text("Hamlet"));
    }

    #[test]
    fn test_admin_only_tokens() {
        assert!(Callback::AdminCreateEvent.requires_admin());
        assert!(Callback::AdminDelete(1).requires_admin());
        assert!(!Callback::Event(1).requires_admin());
        assert!(!Callback::MainMenu.requires_admin());
    }

    fn test_config(admins: &[&str]) -> AppConfig {
        AppConfig {
            matrix: MatrixConfig {
                homeserver: "https://matrix.example.org".into(),
                username: "boxoffice".into(),
                password: "pw".into(),
            },
            admin_ids: admins.iter().map(|s| s.to_string()).collect(),
            database: DatabaseConfig {
                host: "localhost".into(),
                port: 5432,
                name: "boxoffice".into(),
                user: "postgres".into(),
                password: "pw".into(),
            },
            redis: RedisConfig {
                host: "localhost".into(),
                port: 6379,
                db: 0,
            },
            openai_api_key: "sk".into(),
            payments: PaymentConfig {
                yukassa_shop_id: String::new(),
                yukassa_secret_key: String::new(),
            },
            stream_channel_id: "!c:example.org".into(),
            log_level: "info".into(),
        }
    }

    #[test]
    fn test_staff_check_uses_config_list() {
        let config = test_config(&["@boss:example.org"]);
        let profile = SenderProfile {
            id: "@boss:example.org".into(),
            username: Some("boss".into()),
            display_name: None,
        };
        assert!(is_staff(&config, Some(&profile), None));

        let stranger = SenderProfile {
            id: "@guest:example.org".into(),
            username: Some("guest".into()),
            display_name: None,
        };
        assert!(!is_staff(&config, Some(&stranger), None));
        assert!(!is_staff(&config, None, None));
    }
}
