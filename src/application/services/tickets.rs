//! # Ticket Service
//!
//! Read-side queries over issued tickets.

use sqlx::PgConnection;

use crate::domain::models::TicketSummary;

pub struct TicketService<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> TicketService<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// A user's tickets joined with the events they grant access to,
    /// newest first.
    pub async fn for_user(&mut self, matrix_id: &str) -> sqlx::Result<Vec<TicketSummary>> {
        sqlx::query_as::<_, TicketSummary>(
            "SELECT t.access_token, t.is_used, e.title AS event_title, e.start_time
             FROM tickets t
             JOIN events e ON e.id = t.event_id
             WHERE t.user_id = $1
             ORDER BY t.created_at DESC",
        )
        .bind(matrix_id)
        .fetch_all(&mut *self.conn)
        .await
    }

    pub async fn has_ticket(&mut self, matrix_id: &str, event_id: i32) -> sqlx::Result<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM tickets WHERE user_id = $1 AND event_id = $2)",
        )
        .bind(matrix_id)
        .bind(event_id)
        .fetch_one(&mut *self.conn)
        .await
    }
}
