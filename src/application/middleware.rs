//! # Auth/Context Middleware
//!
//! Runs before dispatch: resolves the sender into a `User` row (creating it
//! on first contact, refreshing profile fields otherwise) inside the
//! interaction's transaction. Interactions without a sender identity skip
//! the lookup and are dispatched without user context.

use sqlx::PgConnection;

use crate::application::services::UserService;
use crate::domain::models::User;

/// Identity attached to an inbound interaction.
#[derive(Debug, Clone)]
pub struct SenderProfile {
    /// Full Matrix user id, e.g. `@alice:example.org`.
    pub id: String,
    /// The localpart of the user id.
    pub username: Option<String>,
    /// Room display name, when known.
    pub display_name: Option<String>,
}

impl SenderProfile {
    /// First/last name derived from the display name, split on the first
    /// whitespace. A single-word display name has no last name.
    pub fn name_parts(&self) -> (Option<&str>, Option<&str>) {
        match self.display_name.as_deref().map(str::trim) {
            None | Some("") => (None, None),
            Some(name) => match name.split_once(char::is_whitespace) {
                Some((first, last)) => (Some(first), Some(last.trim_start())),
                None => (Some(name), None),
            },
        }
    }
}

const DEFAULT_LOCALE: &str = "en";

/// One upsert per interaction.
pub async fn resolve_user(
    conn: &mut PgConnection,
    profile: &SenderProfile,
) -> sqlx::Result<User> {
    let (first_name, last_name) = profile.name_parts();

    UserService::new(conn)
        .get_or_create(
            &profile.id,
            profile.username.as_deref(),
            first_name,
            last_name,
            DEFAULT_LOCALE,
        )
        .await
}
