//! # User model
//!
//! Two representations of a CourseHub account:
//!
//! - [`User`] (server only) — the full `users` row, loaded via
//!   [`sqlx::FromRow`]. Carries the argon2 `password_hash`, the raw photo
//!   bytes, and audit timestamps, none of which may reach the client.
//! - [`ProfileInfo`] — the client-safe projection crossing the server
//!   function boundary. The photo travels as a URL (served by the web
//!   crate's media route), never as bytes, and the `Uuid` becomes a
//!   `String` so the type works in WASM.
//!
//! [`User::to_info`] performs the projection; [`ProfileInfo::to_snapshot`]
//! bridges into the [`profile`] crate's change-detection types.

use serde::{Deserialize, Serialize};

use profile::ProfileSnapshot;

#[cfg(feature = "server")]
use chrono::{DateTime, Utc};
#[cfg(feature = "server")]
use sqlx::FromRow;
#[cfg(feature = "server")]
use uuid::Uuid;

/// Account role. Instructors additionally manage courses and lectures.
pub const ROLE_LEARNER: &str = "learner";
pub const ROLE_INSTRUCTOR: &str = "instructor";

/// Full user record from the database.
#[cfg(feature = "server")]
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub biography: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub photo: Option<Vec<u8>>,
    pub photo_content_type: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "server")]
impl User {
    /// Convert to the client-safe projection.
    pub fn to_info(&self) -> ProfileInfo {
        ProfileInfo {
            id: self.id.to_string(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role.clone(),
            biography: self.biography.clone(),
            linkedin: self.linkedin.clone(),
            instagram: self.instagram.clone(),
            twitter: self.twitter.clone(),
            photo_url: self
                .photo
                .is_some()
                .then(|| format!("/media/photo/{}", self.id)),
        }
    }
}

/// Profile information safe to send to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileInfo {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub biography: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub photo_url: Option<String>,
}

impl ProfileInfo {
    pub fn is_instructor(&self) -> bool {
        self.role == ROLE_INSTRUCTOR
    }

    /// Project into the editable snapshot the settings form works against.
    pub fn to_snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot {
            name: self.name.clone(),
            email: self.email.clone(),
            biography: self.biography.clone(),
            linkedin: self.linkedin.clone(),
            instagram: self.instagram.clone(),
            twitter: self.twitter.clone(),
            photo_url: self.photo_url.clone(),
        }
    }
}
