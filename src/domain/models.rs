//! # Database Entities
//!
//! The five persisted entities and their status enumerations. Enum values
//! map onto Postgres enum types created by `infrastructure::db::ensure_schema`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
    Moderator,
}

impl UserRole {
    /// Moderators share the admin surface.
    pub fn is_staff(self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Moderator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Live,
    Finished,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Live => "live",
            EventStatus::Finished => "finished",
            EventStatus::Cancelled => "cancelled",
        }
    }

    /// Glyph used in admin listings.
    pub fn glyph(self) -> &'static str {
        match self {
            EventStatus::Upcoming => "🔜",
            EventStatus::Live => "🔴",
            EventStatus::Finished => "✅",
            EventStatus::Cancelled => "❌",
        }
    }
}

impl std::str::FromStr for EventStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(EventStatus::Upcoming),
            "live" => Ok(EventStatus::Live),
            "finished" => Ok(EventStatus::Finished),
            "cancelled" => Ok(EventStatus::Cancelled),
            _ => Err(()),
        }
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Cancelled,
    Refunded,
}

/// A platform user, keyed by their Matrix user ID. Created on first
/// interaction, refreshed on every subsequent one, never deleted.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub matrix_id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language_code: String,
    pub role: UserRole,
    pub is_premium: bool,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub last_active: Option<DateTime<Utc>>,
}

/// A scheduled performance.
#[derive(Debug, Clone, FromRow)]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub price: Decimal,
    pub max_viewers: Option<i32>,
    pub stream_url: Option<String>,
    pub invite_link: Option<String>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
}

/// The field set collected by the admin creation form, committed as one row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub price: Decimal,
    pub max_viewers: Option<i32>,
}

/// A purchase intent linking a user to an event.
#[allow(dead_code)]
#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub id: i32,
    pub user_id: String,
    pub event_id: i32,
    pub amount: Decimal,
    pub status: OrderStatus,
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Entitlement artifact issued after a paid order. One ticket per order.
#[allow(dead_code)]
#[derive(Debug, Clone, FromRow)]
pub struct Ticket {
    pub id: i32,
    pub order_id: i32,
    pub user_id: String,
    pub event_id: i32,
    pub access_token: String,
    pub qr_code: Option<String>,
    pub is_used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A ticket joined with the event it grants access to, for listing screens.
#[derive(Debug, Clone, FromRow)]
pub struct TicketSummary {
    pub access_token: String,
    pub is_used: bool,
    pub event_title: String,
    pub start_time: DateTime<Utc>,
}

/// A scheduled/published promotional post. Schema only; no implemented
/// flow writes these yet.
#[allow(dead_code)]
#[derive(Debug, Clone, FromRow)]
pub struct ContentPost {
    pub id: i32,
    pub content_type: String,
    pub content_text: Option<String>,
    pub content_url: Option<String>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub status: String,
    pub channel_id: Option<String>,
    pub message_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_glyphs() {
        assert_eq!(EventStatus::Upcoming.glyph(), "🔜");
        assert_eq!(EventStatus::Live.glyph(), "🔴");
        assert_eq!(EventStatus::Finished.glyph(), "✅");
        assert_eq!(EventStatus::Cancelled.glyph(), "❌");
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            EventStatus::Upcoming,
            EventStatus::Live,
            EventStatus::Finished,
            EventStatus::Cancelled,
        ] {
            assert_eq!(EventStatus::from_str(status.as_str()), Ok(status));
        }
        assert!(EventStatus::from_str("archived").is_err());
    }

    #[test]
    fn test_staff_roles() {
        assert!(UserRole::Admin.is_staff());
        assert!(UserRole::Moderator.is_staff());
        assert!(!UserRole::User.is_staff());
    }
}
