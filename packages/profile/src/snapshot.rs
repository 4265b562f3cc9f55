//! The server-confirmed profile record.

use serde::{Deserialize, Serialize};

/// Last known server-confirmed state of the user's profile.
///
/// The client holds a read-only copy, replaced wholesale after every
/// successful fetch or mutation. The optional fields may be absent on the
/// server; for change detection they compare as empty strings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub name: String,
    pub email: String,
    pub biography: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub photo_url: Option<String>,
}

impl ProfileSnapshot {
    pub fn biography(&self) -> &str {
        opt_str(&self.biography)
    }

    pub fn linkedin(&self) -> &str {
        opt_str(&self.linkedin)
    }

    pub fn instagram(&self) -> &str {
        opt_str(&self.instagram)
    }

    pub fn twitter(&self) -> &str {
        opt_str(&self.twitter)
    }

    /// Whether the server currently stores a profile photo.
    pub fn has_photo(&self) -> bool {
        self.photo_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// Absent optional fields compare as empty strings.
fn opt_str(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or("")
}
