//! # Command Handlers
//!
//! Handler functions for each command and callback token, invoked by the
//! router with the interaction's transaction connection.

pub mod admin;
pub mod events;
pub mod user;
