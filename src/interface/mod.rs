//! # Interface Layer
//!
//! Command/callback handlers and the menu builders they reply with.

pub mod commands;
pub mod menus;
