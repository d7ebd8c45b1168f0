#![recursion_limit = "256"]
//! # Main Entry Point
//!
//! Wires the layers together:
//! - Domain: configuration and entities
//! - Infrastructure: Matrix adapter, Postgres pool
//! - Application: router, middleware, services, conversation state
//! - Interface: command handlers and menus

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use matrix_sdk::{
    Client,
    config::SyncSettings,
    room::Room,
    ruma::UserId,
    ruma::events::room::{
        member::{MembershipState, StrippedRoomMemberEvent},
        message::{MessageType, RoomMessageEventContent, SyncRoomMessageEvent},
    },
};
use std::fs;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::middleware::SenderProfile;
use crate::application::router::Router;
use crate::application::services::UserService;
use crate::application::state::BotState;
use crate::domain::config::AppConfig;
use crate::infrastructure::db;
use crate::infrastructure::matrix::MatrixService;
use crate::strings::messages;

#[derive(Parser)]
#[command(name = "boxoffice", about = "Chat bot for live-streamed theater ticketing")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the bot (the default).
    Run,
    /// Ensure the database schema exists, then exit.
    InitDb,
    /// Grant the admin role to a user (defaults to the first configured admin).
    CreateAdmin { matrix_id: Option<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    let _guard = init_tracing(&config)?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(config).await,
        Command::InitDb => init_db(config).await,
        Command::CreateAdmin { matrix_id } => create_admin(config, matrix_id).await,
    }
}

fn init_tracing(config: &AppConfig) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    fs::create_dir_all("logs").context("Failed to create logs directory")?;

    let file_appender = tracing_appender::rolling::daily("logs", "boxoffice.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "{},matrix_sdk=warn,matrix_sdk_base=warn,matrix_sdk_crypto=error,ruma=warn,hyper=warn,sqlx=warn",
            config.log_level
        ))
    });

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);
    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    Ok(guard)
}

async fn run(config: AppConfig) -> Result<()> {
    tracing::info!("Starting boxoffice...");

    let pool = db::connect(&config.database).await?;
    db::ensure_schema(&pool).await?;

    let client = Client::builder()
        .homeserver_url(&config.matrix.homeserver)
        .build()
        .await?;

    client
        .matrix_auth()
        .login_username(&config.matrix.username, &config.matrix.password)
        .send()
        .await?;

    tracing::info!("Logged in as {}", config.matrix.username);

    notify_admins(&client, &config, messages::STARTUP_NOTICE).await;

    let state = Arc::new(Mutex::new(BotState::default()));
    let router = Arc::new(Router::new(config.clone(), pool.clone(), state));

    let start_time = std::time::SystemTime::now();
    let handler_router = router.clone();

    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
        let router = handler_router.clone();

        async move {
            let Some(original_msg) = ev.as_original() else {
                return;
            };

            // Ignore events delivered from before this process started.
            let ts = ev.origin_server_ts();
            let event_time =
                std::time::UNIX_EPOCH + std::time::Duration::from_millis(ts.get().into());
            if event_time < start_time {
                return;
            }

            let MessageType::Text(text_content) = &original_msg.content.msgtype else {
                return;
            };
            if original_msg.sender == room.own_user_id() {
                return;
            }

            let display_name = room
                .get_member(&original_msg.sender)
                .await
                .ok()
                .flatten()
                .and_then(|member| member.display_name().map(str::to_string));
            let profile = SenderProfile {
                id: original_msg.sender.to_string(),
                username: Some(original_msg.sender.localpart().to_string()),
                display_name,
            };

            let chat = MatrixService::new(room);
            if let Err(e) = router
                .route(&chat, &text_content.body, Some(&profile))
                .await
            {
                tracing::error!("Failed to route message: {e:#}");
            }
        }
    });

    // Accept invites so admins can pull the bot into rooms.
    client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
        if ev.content.membership == MembershipState::Invite {
            let _ = room.join().await;
        }
    });

    let sync_client = client.clone();
    let mut sync_handle =
        tokio::spawn(async move { sync_client.sync(SyncSettings::default()).await });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            sync_handle.abort();
        }
        result = &mut sync_handle => {
            match result {
                Ok(Ok(())) => tracing::info!("Matrix sync finished"),
                Ok(Err(e)) => tracing::error!("Matrix sync failed: {e}"),
                Err(e) => tracing::error!("Matrix sync panicked: {e}"),
            }
        }
    }

    notify_admins(&client, &config, messages::SHUTDOWN_NOTICE).await;
    pool.close().await;
    tracing::info!("Database pool closed, bye");

    Ok(())
}

/// DM every configured admin. Failures are logged and swallowed; a dead
/// admin account must never prevent startup or shutdown.
async fn notify_admins(client: &Client, config: &AppConfig, text: &str) {
    for admin in &config.admin_ids {
        let user_id = match UserId::parse(admin) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Invalid admin id {admin}: {e}");
                continue;
            }
        };

        let result = match client.create_dm(&user_id).await {
            Ok(room) => room
                .send(RoomMessageEventContent::text_markdown(text))
                .await
                .map(|_| ())
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        if let Err(e) = result {
            tracing::warn!("Failed to notify admin {admin}: {e}");
        }
    }
}

async fn init_db(config: AppConfig) -> Result<()> {
    let pool = db::connect(&config.database).await?;
    db::ensure_schema(&pool).await?;
    pool.close().await;
    Ok(())
}

async fn create_admin(config: AppConfig, matrix_id: Option<String>) -> Result<()> {
    let target = matrix_id
        .or_else(|| config.admin_ids.first().cloned())
        .context("No matrix id given and ADMIN_IDS is empty")?;

    let pool = db::connect(&config.database).await?;
    db::ensure_schema(&pool).await?;

    let mut tx = pool.begin().await?;
    let mut users = UserService::new(tx.as_mut());
    users
        .get_or_create(&target, None, Some("Admin"), None, "en")
        .await?;
    users.set_admin(&target, true).await?;
    tx.commit().await?;

    tracing::info!("User {target} granted admin role");
    pool.close().await;
    Ok(())
}
