//! # Database Setup
//!
//! Pool construction and idempotent schema creation. There is no migration
//! tooling; the schema is ensured at startup.

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::domain::config::DatabaseConfig;

/// Statements are individually idempotent so startup can re-run them.
const SCHEMA: &[&str] = &[
    "DO $$ BEGIN
        CREATE TYPE user_role AS ENUM ('user', 'admin', 'moderator');
    EXCEPTION WHEN duplicate_object THEN NULL; END $$",
    "DO $$ BEGIN
        CREATE TYPE event_status AS ENUM ('upcoming', 'live', 'finished', 'cancelled');
    EXCEPTION WHEN duplicate_object THEN NULL; END $$",
    "DO $$ BEGIN
        CREATE TYPE order_status AS ENUM ('pending', 'paid', 'cancelled', 'refunded');
    EXCEPTION WHEN duplicate_object THEN NULL; END $$",
    "CREATE TABLE IF NOT EXISTS users (
        matrix_id     TEXT PRIMARY KEY,
        username      TEXT,
        first_name    TEXT,
        last_name     TEXT,
        language_code TEXT NOT NULL DEFAULT 'en',
        role          user_role NOT NULL DEFAULT 'user',
        is_premium    BOOLEAN NOT NULL DEFAULT FALSE,
        balance       NUMERIC(10, 2) NOT NULL DEFAULT 0,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
        last_active   TIMESTAMPTZ
    )",
    "CREATE TABLE IF NOT EXISTS events (
        id               SERIAL PRIMARY KEY,
        title            TEXT NOT NULL,
        description      TEXT,
        poster_url       TEXT,
        start_time       TIMESTAMPTZ NOT NULL,
        duration_minutes INTEGER NOT NULL DEFAULT 120,
        price            NUMERIC(10, 2) NOT NULL DEFAULT 0,
        max_viewers      INTEGER,
        stream_url       TEXT,
        invite_link      TEXT,
        status           event_status NOT NULL DEFAULT 'upcoming',
        created_at       TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS orders (
        id         SERIAL PRIMARY KEY,
        user_id    TEXT NOT NULL REFERENCES users(matrix_id),
        event_id   INTEGER NOT NULL REFERENCES events(id),
        amount     NUMERIC(10, 2) NOT NULL,
        status     order_status NOT NULL DEFAULT 'pending',
        payment_id TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        paid_at    TIMESTAMPTZ
    )",
    "CREATE TABLE IF NOT EXISTS tickets (
        id           SERIAL PRIMARY KEY,
        order_id     INTEGER NOT NULL UNIQUE REFERENCES orders(id),
        user_id      TEXT NOT NULL REFERENCES users(matrix_id),
        event_id     INTEGER NOT NULL REFERENCES events(id),
        access_token TEXT NOT NULL UNIQUE,
        qr_code      TEXT,
        is_used      BOOLEAN NOT NULL DEFAULT FALSE,
        used_at      TIMESTAMPTZ,
        created_at   TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS content_posts (
        id             SERIAL PRIMARY KEY,
        content_type   TEXT NOT NULL,
        content_text   TEXT,
        content_url    TEXT,
        scheduled_time TIMESTAMPTZ,
        published_at   TIMESTAMPTZ,
        status         TEXT NOT NULL DEFAULT 'pending',
        channel_id     TEXT,
        message_id     TEXT,
        created_at     TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
];

pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.url())
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database {}", config.name);
    Ok(pool)
}

pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Failed to apply schema statement")?;
    }

    tracing::info!("Database schema ensured");
    Ok(())
}
