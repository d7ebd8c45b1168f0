//! # Application Configuration
//!
//! Typed configuration read from the environment (`.env` supported via
//! `dotenvy` in `main`). Connection strings are derived, never stored.

use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub matrix: MatrixConfig,
    /// Matrix user IDs with unconditional admin access.
    pub admin_ids: Vec<String>,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub openai_api_key: String,
    pub payments: PaymentConfig,
    /// Room the promotional channel posts go to.
    pub stream_channel_id: String,
    pub log_level: String,
}

/// Credentials for the Matrix service.
#[derive(Debug, Clone)]
pub struct MatrixConfig {
    pub homeserver: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub db: u32,
}

impl RedisConfig {
    pub fn url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }
}

#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub yukassa_shop_id: String,
    pub yukassa_secret_key: String,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            matrix: MatrixConfig {
                homeserver: required("MATRIX_HOMESERVER")?,
                username: required("MATRIX_USERNAME")?,
                password: required("MATRIX_PASSWORD")?,
            },
            admin_ids: parse_admin_list(&required("ADMIN_IDS")?),
            database: DatabaseConfig {
                host: optional("DB_HOST", "localhost"),
                port: parsed("DB_PORT", 5432)?,
                name: optional("DB_NAME", "boxoffice"),
                user: optional("DB_USER", "postgres"),
                password: required("DB_PASSWORD")?,
            },
            redis: RedisConfig {
                host: optional("REDIS_HOST", "localhost"),
                port: parsed("REDIS_PORT", 6379)?,
                db: parsed("REDIS_DB", 0)?,
            },
            openai_api_key: required("OPENAI_API_KEY")?,
            payments: PaymentConfig {
                yukassa_shop_id: optional("YUKASSA_SHOP_ID", ""),
                yukassa_secret_key: optional("YUKASSA_SECRET_KEY", ""),
            },
            stream_channel_id: required("STREAM_CHANNEL_ID")?,
            log_level: optional("LOG_LEVEL", "info"),
        })
    }

    /// Capability check against the configured admin list.
    pub fn is_configured_admin(&self, sender: &str) -> bool {
        self.admin_ids
            .iter()
            .any(|a| a.eq_ignore_ascii_case(sender))
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn optional(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("{key} is not a valid number: {raw}")),
        Err(_) => Ok(default),
    }
}

fn parse_admin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_admins(admins: &[&str]) -> AppConfig {
        AppConfig {
            matrix: MatrixConfig {
                homeserver: "https://matrix.example.org".into(),
                username: "boxoffice".into(),
                password: "secret".into(),
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
            openai_api_key: "sk-test".into(),
            payments: PaymentConfig {
                yukassa_shop_id: String::new(),
                yukassa_secret_key: String::new(),
            },
            stream_channel_id: "!channel:example.org".into(),
            log_level: "info".into(),
        }
    }

    #[test]
    fn test_admin_list_parsing() {
        let admins = parse_admin_list("@a:x.org, @b:x.org ,,  ");
        assert_eq!(admins, vec!["@a:x.org", "@b:x.org"]);
    }

    #[test]
    fn test_admin_check_is_case_insensitive() {
        let config = config_with_admins(&["@Admin:example.org"]);
        assert!(config.is_configured_admin("@admin:example.org"));
        assert!(!config.is_configured_admin("@user:example.org"));
    }

    #[test]
    fn test_database_url() {
        let config = config_with_admins(&[]);
        assert_eq!(
            config.database.url(),
            "postgres://postgres:pw@localhost:5432/boxoffice"
        );
    }

    #[test]
    fn test_redis_url() {
        let config = config_with_admins(&[]);
        assert_eq!(config.redis.url(), "redis://localhost:6379/0");
    }
}
