//! # Domain Services
//!
//! Thin single-entity services over the active transaction. Each router
//! dispatch opens one transaction; services borrow its connection, so all
//! mutations in one interaction commit or roll back together.

pub mod events;
pub mod tickets;
pub mod users;

pub use events::EventService;
pub use tickets::TicketService;
pub use users::UserService;
