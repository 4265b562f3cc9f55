//! Session keys.

/// Key for storing the user ID in the session.
pub const SESSION_USER_ID_KEY: &str = "user_id";
