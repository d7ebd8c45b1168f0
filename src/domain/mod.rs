//! # Domain Layer
//!
//! Configuration, entities, and the abstract interfaces the rest of the
//! application is written against.

pub mod config;
pub mod models;
pub mod traits;
