//! # Infrastructure Layer
//!
//! Concrete adapters: Matrix transport and the Postgres connection pool.

pub mod db;
pub mod matrix;
