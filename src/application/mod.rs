//! # Application Layer
//!
//! Routing, auth/context middleware, domain services, and the
//! per-conversation form state.

pub mod middleware;
pub mod router;
pub mod services;
pub mod state;
