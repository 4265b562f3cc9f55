//! Local email/password authentication.

#[cfg(feature = "server")]
mod password;
#[cfg(feature = "server")]
mod session;

#[cfg(feature = "server")]
pub use password::{hash_password, verify_password};
#[cfg(feature = "server")]
pub use session::SESSION_USER_ID_KEY;
