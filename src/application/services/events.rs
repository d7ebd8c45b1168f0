//! # Event Service
//!
//! CRUD over events plus the upcoming/all listing filters.

use sqlx::PgConnection;

use crate::domain::models::{Event, EventStatus, NewEvent};

pub struct EventService<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> EventService<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Commit a completed creation form as one new row, status `upcoming`.
    pub async fn create(&mut self, new: &NewEvent) -> sqlx::Result<Event> {
        let event = sqlx::query_as::<_, Event>(
            "INSERT INTO events (title, description, start_time, duration_minutes, price, max_viewers, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.start_time)
        .bind(new.duration_minutes)
        .bind(new.price)
        .bind(new.max_viewers)
        .bind(EventStatus::Upcoming)
        .fetch_one(&mut *self.conn)
        .await?;

        tracing::info!("Created event {}: {}", event.id, event.title);
        Ok(event)
    }

    pub async fn get(&mut self, id: i32) -> sqlx::Result<Option<Event>> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await
    }

    /// Upcoming events only: status `upcoming` and a start time still in
    /// the future, soonest first.
    pub async fn upcoming(&mut self) -> sqlx::Result<Vec<Event>> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events
             WHERE status = $1 AND start_time > now()
             ORDER BY start_time ASC",
        )
        .bind(EventStatus::Upcoming)
        .fetch_all(&mut *self.conn)
        .await
    }

    /// Every event regardless of status, newest start time first.
    pub async fn all(&mut self) -> sqlx::Result<Vec<Event>> {
        sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY start_time DESC")
            .fetch_all(&mut *self.conn)
            .await
    }

    /// Manual status transition. Returns false for an unknown id.
    pub async fn update_status(&mut self, id: i32, status: EventStatus) -> sqlx::Result<bool> {
        let result = sqlx::query("UPDATE events SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() > 0 {
            tracing::info!("Event {id} status changed to {}", status.as_str());
        }
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_invite_link(&mut self, id: i32, invite_link: &str) -> sqlx::Result<bool> {
        let result = sqlx::query("UPDATE events SET invite_link = $2 WHERE id = $1")
            .bind(id)
            .bind(invite_link)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() > 0 {
            tracing::info!("Stream link set for event {id}");
        }
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&mut self, id: i32) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() > 0 {
            tracing::info!("Event {id} deleted");
        }
        Ok(result.rows_affected() > 0)
    }

    /// Tickets already issued for this event. Tickets only exist for paid
    /// orders, so the row count is the sold count.
    pub async fn sold_tickets(&mut self, id: i32) -> sqlx::Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tickets WHERE event_id = $1")
            .bind(id)
            .fetch_one(&mut *self.conn)
            .await
    }
}
