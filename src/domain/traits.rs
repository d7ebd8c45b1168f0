//! # Domain Traits
//!
//! Abstract interface for the chat transport. Allows handlers to be
//! exercised against an in-memory implementation in tests.

use async_trait::async_trait;

/// Abstract interface for a chat provider (e.g. Matrix, Console).
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a message to the room.
    async fn send_message(&self, content: &str) -> Result<String, String>;

    /// Send a short transient notice (not-found alerts, denials).
    async fn send_notification(&self, content: &str) -> Result<(), String>;

    /// Get the current room ID.
    fn room_id(&self) -> String;
}
