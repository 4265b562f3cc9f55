//! # API crate — shared fullstack server functions for CourseHub
//!
//! Every Dioxus server function the web frontend calls lives in this crate,
//! along with the supporting modules.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`auth`] | `server` | Argon2 password hashing and the session key |
//! | [`db`] | — | PostgreSQL connection pool (lazy `OnceCell` singleton) |
//! | [`market`] | — | Course catalog, orders/purchases, lecture management |
//! | [`models`] | — | Database rows and their client-safe projections |
//! | [`otp`] | `server` | One-time codes for email-change confirmation |
//! | [`payments`] | `server` | Payment-gateway client (hosted checkout) |
//!
//! ## Server functions exposed here
//!
//! Each public `async fn` is annotated with `#[get(...)]` or `#[post(...)]`
//! and compiled twice: full logic behind `#[cfg(feature = "server")]` and a
//! thin client stub that forwards the call over HTTP.
//!
//! - **Authentication**: `get_current_user`, `register`, `login`, `logout`
//! - **Profile**: `update_profile`, `verify_email_change`,
//!   `check_current_password`, `update_password`
//! - **Marketplace** (in [`market`]): `list_courses`, `get_course`,
//!   `create_order`, `confirm_purchase`, `add_lecture`, `update_lecture`,
//!   `delete_lecture`

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

pub mod auth;
pub mod db;
pub mod market;
pub mod models;
#[cfg(feature = "server")]
pub mod otp;
#[cfg(feature = "server")]
pub mod payments;

pub use market::{
    add_lecture, confirm_purchase, create_order, delete_lecture, get_course, list_courses,
    update_lecture,
};
pub use models::{
    format_price, CourseDetail, CourseSummary, LectureInfo, OrderInfo, ProfileInfo,
    ROLE_INSTRUCTOR, ROLE_LEARNER,
};
pub use profile::{PhotoFile, ProfileFields};

/// Largest accepted profile photo.
pub const MAX_PHOTO_BYTES: usize = 2 * 1024 * 1024;

/// Outcome of a profile update. `otp_sent` means the email change was
/// accepted but is not live yet: a one-time code was issued and the new
/// address only takes effect after [`verify_email_change`] succeeds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileUpdate {
    pub message: String,
    pub otp_sent: bool,
}

/// Look up the authenticated user behind the session, or fail.
#[cfg(feature = "server")]
async fn require_user(
    session: &tower_sessions::Session,
) -> Result<models::User, ServerFnError> {
    use crate::db::get_pool;

    let user_id: Option<String> = session
        .get(auth::SESSION_USER_ID_KEY)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let Some(user_id) = user_id else {
        return Err(ServerFnError::new("Not authenticated"));
    };

    let user_uuid =
        uuid::Uuid::parse_str(&user_id).map_err(|e| ServerFnError::new(e.to_string()))?;

    let pool = get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let user: Option<models::User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_uuid)
        .fetch_optional(pool)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    user.ok_or_else(|| ServerFnError::new("Not authenticated"))
}

/// Empty strings store as NULL so absent and cleared fields look the same.
#[cfg(feature = "server")]
fn nullable(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Pre-write validation of a profile update, returning the trimmed name
/// and normalised email. Everything here runs before the first row is
/// touched, so a rejected save leaves the stored profile exactly as it
/// was. A discarded upload (removal marker set) is not size-checked.
#[cfg(feature = "server")]
fn validate_profile_update(
    fields: &ProfileFields,
    photo: Option<&PhotoFile>,
    remove_photo: bool,
) -> Result<(String, String), String> {
    let name = fields.name.trim().to_string();
    if name.is_empty() {
        return Err("Name is required".to_string());
    }
    let email = fields.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err("Invalid email address".to_string());
    }
    if !remove_photo {
        if let Some(file) = photo {
            if file.bytes.len() > MAX_PHOTO_BYTES {
                return Err("Photo is larger than 2 MB".to_string());
            }
        }
    }
    Ok((name, email))
}

/// Get the current authenticated user from the session.
#[cfg(feature = "server")]
#[get("/api/auth/me", session: tower_sessions::Session)]
pub async fn get_current_user() -> Result<Option<ProfileInfo>, ServerFnError> {
    use crate::db::get_pool;
    use crate::models::User;

    let user_id: Option<String> = session
        .get(auth::SESSION_USER_ID_KEY)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let Some(user_id) = user_id else {
        return Ok(None);
    };

    let pool = get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let user_uuid = uuid::Uuid::parse_str(&user_id)
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_uuid)
        .fetch_optional(pool)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(user.map(|u| u.to_info()))
}

#[cfg(not(feature = "server"))]
#[get("/api/auth/me")]
pub async fn get_current_user() -> Result<Option<ProfileInfo>, ServerFnError> {
    Ok(None)
}

/// Register a new account with email and password.
#[cfg(feature = "server")]
#[post("/api/auth/register", session: tower_sessions::Session)]
pub async fn register(
    email: String,
    password: String,
    name: String,
    role: String,
) -> Result<ProfileInfo, ServerFnError> {
    use crate::db::get_pool;

    let email = email.trim().to_lowercase();
    let name = name.trim().to_string();

    if email.is_empty() || !email.contains('@') {
        return Err(ServerFnError::new("Invalid email address"));
    }
    if password.len() < 8 {
        return Err(ServerFnError::new(
            "Password must be at least 8 characters",
        ));
    }
    if name.is_empty() {
        return Err(ServerFnError::new("Name is required"));
    }
    if role != models::ROLE_LEARNER && role != models::ROLE_INSTRUCTOR {
        return Err(ServerFnError::new("Unknown account role"));
    }

    let pool = get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let existing: Option<(i64,)> =
        sqlx::query_as("SELECT 1 as n FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(pool)
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))?;

    if existing.is_some() {
        return Err(ServerFnError::new(
            "An account with this email already exists",
        ));
    }

    let password_hash = auth::hash_password(&password).map_err(ServerFnError::new)?;

    let user: models::User = sqlx::query_as(
        "INSERT INTO users (email, name, role, password_hash) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&email)
    .bind(&name)
    .bind(&role)
    .bind(&password_hash)
    .fetch_one(pool)
    .await
    .map_err(|e| ServerFnError::new(e.to_string()))?;

    session
        .insert(auth::SESSION_USER_ID_KEY, user.id.to_string())
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(user.to_info())
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/register")]
pub async fn register(
    email: String,
    password: String,
    name: String,
    role: String,
) -> Result<ProfileInfo, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Log in with email and password.
#[cfg(feature = "server")]
#[post("/api/auth/login", session: tower_sessions::Session)]
pub async fn login(email: String, password: String) -> Result<ProfileInfo, ServerFnError> {
    use crate::db::get_pool;

    let email = email.trim().to_lowercase();

    let pool = get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let user: Option<models::User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let Some(user) = user else {
        return Err(ServerFnError::new("Invalid email or password"));
    };

    let valid =
        auth::verify_password(&password, &user.password_hash).map_err(ServerFnError::new)?;

    if !valid {
        return Err(ServerFnError::new("Invalid email or password"));
    }

    session
        .insert(auth::SESSION_USER_ID_KEY, user.id.to_string())
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(user.to_info())
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/login")]
pub async fn login(email: String, password: String) -> Result<ProfileInfo, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Log out the current user by clearing the session.
#[cfg(feature = "server")]
#[post("/api/auth/logout", session: tower_sessions::Session)]
pub async fn logout() -> Result<(), ServerFnError> {
    session
        .flush()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(())
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/logout")]
pub async fn logout() -> Result<(), ServerFnError> {
    Ok(())
}

/// Update the current user's profile.
///
/// Text fields and the photo apply immediately. An email change is
/// deferred: the new address gets a one-time code (stored in
/// `pending_email_changes`, one row per user) and only goes live after
/// [`verify_email_change`]. When both a new photo and the removal marker
/// arrive, removal wins.
#[cfg(feature = "server")]
#[post("/api/profile/update", session: tower_sessions::Session)]
pub async fn update_profile(
    fields: ProfileFields,
    photo: Option<PhotoFile>,
    remove_photo: bool,
) -> Result<ProfileUpdate, ServerFnError> {
    use crate::db::get_pool;

    let user = require_user(&session).await?;

    let (name, email) = validate_profile_update(&fields, photo.as_ref(), remove_photo)
        .map_err(ServerFnError::new)?;

    let pool = get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    // Every rejection happens before the first write so a failed save
    // never leaves a half-applied profile behind.
    let email_changed = email != user.email.to_lowercase();
    if email_changed {
        let taken: Option<(i64,)> =
            sqlx::query_as("SELECT 1 as n FROM users WHERE email = $1 AND id != $2")
                .bind(&email)
                .bind(user.id)
                .fetch_optional(pool)
                .await
                .map_err(|e| ServerFnError::new(e.to_string()))?;

        if taken.is_some() {
            return Err(ServerFnError::new(
                "An account with this email already exists",
            ));
        }
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    sqlx::query(
        "UPDATE users SET name = $1, biography = $2, linkedin = $3, instagram = $4, twitter = $5, updated_at = NOW()
         WHERE id = $6",
    )
    .bind(&name)
    .bind(nullable(&fields.biography))
    .bind(nullable(&fields.linkedin))
    .bind(nullable(&fields.instagram))
    .bind(nullable(&fields.twitter))
    .bind(user.id)
    .execute(&mut *tx)
    .await
    .map_err(|e| ServerFnError::new(e.to_string()))?;

    if remove_photo {
        sqlx::query(
            "UPDATE users SET photo = NULL, photo_content_type = NULL, updated_at = NOW() WHERE id = $1",
        )
        .bind(user.id)
        .execute(&mut *tx)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;
    } else if let Some(file) = photo {
        sqlx::query(
            "UPDATE users SET photo = $1, photo_content_type = $2, updated_at = NOW() WHERE id = $3",
        )
        .bind(&file.bytes)
        .bind(&file.content_type)
        .bind(user.id)
        .execute(&mut *tx)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;
    }

    if !email_changed {
        tx.commit()
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))?;
        return Ok(ProfileUpdate {
            message: "Profile updated".to_string(),
            otp_sent: false,
        });
    }

    // Email changed: issue a code instead of applying it.
    let code = otp::generate_code();
    let expires_at = otp::expiry_from(chrono::Utc::now());

    sqlx::query(
        "INSERT INTO pending_email_changes (user_id, new_email, code, expires_at)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (user_id) DO UPDATE SET
            new_email = $2,
            code = $3,
            expires_at = $4,
            issued_at = NOW()",
    )
    .bind(user.id)
    .bind(&email)
    .bind(&code)
    .bind(expires_at)
    .execute(&mut *tx)
    .await
    .map_err(|e| ServerFnError::new(e.to_string()))?;

    tx.commit()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    // Mail delivery is outside this repo; surface the code in the server log.
    tracing::info!(user_id = %user.id, email = %email, code = %code, "issued email change code");

    Ok(ProfileUpdate {
        message: format!("Verification code sent to {email}"),
        otp_sent: true,
    })
}

#[cfg(not(feature = "server"))]
#[post("/api/profile/update")]
pub async fn update_profile(
    fields: ProfileFields,
    photo: Option<PhotoFile>,
    remove_photo: bool,
) -> Result<ProfileUpdate, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Confirm a pending email change with the one-time code.
#[cfg(feature = "server")]
#[post("/api/profile/verify-email", session: tower_sessions::Session)]
pub async fn verify_email_change(email: String, code: String) -> Result<String, ServerFnError> {
    use crate::db::get_pool;

    let user = require_user(&session).await?;

    let pool = get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let row: Option<(String, String, chrono::DateTime<chrono::Utc>)> = sqlx::query_as(
        "SELECT new_email, code, expires_at FROM pending_email_changes WHERE user_id = $1",
    )
    .bind(user.id)
    .fetch_optional(pool)
    .await
    .map_err(|e| ServerFnError::new(e.to_string()))?;

    let Some((new_email, stored_code, expires_at)) = row else {
        return Err(ServerFnError::new(otp::OtpError::NotFound.to_string()));
    };

    let pending = otp::PendingCode {
        new_email,
        code: stored_code,
        expires_at,
    };
    otp::validate(&pending, &email, &code, chrono::Utc::now())
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    sqlx::query("UPDATE users SET email = $1, updated_at = NOW() WHERE id = $2")
        .bind(&pending.new_email)
        .bind(user.id)
        .execute(pool)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    sqlx::query("DELETE FROM pending_email_changes WHERE user_id = $1")
        .bind(user.id)
        .execute(pool)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok("Email address updated".to_string())
}

#[cfg(not(feature = "server"))]
#[post("/api/profile/verify-email")]
pub async fn verify_email_change(email: String, code: String) -> Result<String, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Live check of the current password, gating the change-password dialog.
#[cfg(feature = "server")]
#[post("/api/profile/check-password", session: tower_sessions::Session)]
pub async fn check_current_password(current_password: String) -> Result<bool, ServerFnError> {
    let user = require_user(&session).await?;
    auth::verify_password(&current_password, &user.password_hash).map_err(ServerFnError::new)
}

#[cfg(not(feature = "server"))]
#[post("/api/profile/check-password")]
pub async fn check_current_password(current_password: String) -> Result<bool, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Change the account password.
#[cfg(feature = "server")]
#[post("/api/profile/update-password", session: tower_sessions::Session)]
pub async fn update_password(
    current_password: String,
    new_password: String,
) -> Result<String, ServerFnError> {
    use crate::db::get_pool;

    let user = require_user(&session).await?;

    let valid = auth::verify_password(&current_password, &user.password_hash)
        .map_err(ServerFnError::new)?;
    if !valid {
        return Err(ServerFnError::new("Current password is incorrect"));
    }
    if new_password.len() < 8 {
        return Err(ServerFnError::new(
            "Password must be at least 8 characters",
        ));
    }

    let password_hash = auth::hash_password(&new_password).map_err(ServerFnError::new)?;

    let pool = get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
        .bind(&password_hash)
        .bind(user.id)
        .execute(pool)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok("Password updated".to_string())
}

#[cfg(not(feature = "server"))]
#[post("/api/profile/update-password")]
pub async fn update_password(
    current_password: String,
    new_password: String,
) -> Result<String, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

#[cfg(all(test, feature = "server"))]
mod tests {
    use super::*;

    fn fields() -> ProfileFields {
        ProfileFields {
            name: "Ada".to_string(),
            email: "a@x.com".to_string(),
            ..Default::default()
        }
    }

    fn photo(len: usize) -> PhotoFile {
        PhotoFile {
            filename: "me.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0; len],
        }
    }

    #[test]
    fn oversized_photo_rejected_before_any_write() {
        let file = photo(MAX_PHOTO_BYTES + 1);
        let err = validate_profile_update(&fields(), Some(&file), false).unwrap_err();
        assert!(err.contains("2 MB"));
    }

    #[test]
    fn photo_at_the_limit_is_accepted() {
        let file = photo(MAX_PHOTO_BYTES);
        assert!(validate_profile_update(&fields(), Some(&file), false).is_ok());
    }

    #[test]
    fn removal_skips_the_size_check_on_the_discarded_upload() {
        let file = photo(MAX_PHOTO_BYTES + 1);
        assert!(validate_profile_update(&fields(), Some(&file), true).is_ok());
    }

    #[test]
    fn identity_fields_come_back_trimmed_and_lowercased() {
        let mut f = fields();
        f.name = " Ada Lovelace ".to_string();
        f.email = " A@X.com ".to_string();
        assert_eq!(
            validate_profile_update(&f, None, false),
            Ok(("Ada Lovelace".to_string(), "a@x.com".to_string()))
        );
    }

    #[test]
    fn blank_name_and_malformed_email_are_rejected() {
        let mut f = fields();
        f.name = "  ".to_string();
        assert!(validate_profile_update(&f, None, false).is_err());

        let mut f = fields();
        f.email = "not-an-address".to_string();
        assert!(validate_profile_update(&f, None, false).is_err());
    }
}
