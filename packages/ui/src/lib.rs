//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

pub mod components;

mod auth;
pub use auth::{use_auth, AuthProvider, AuthState, LogoutButton};

mod toast;
pub use toast::{use_toasts, ToastKind, ToastProvider, Toasts};

mod navbar;
pub use navbar::Navbar;

mod footer;
pub use footer::Footer;

mod course_card;
pub use course_card::CourseCard;

mod search_box;
pub use search_box::SearchBox;

mod checkout;
pub use checkout::{provide_checkout, use_checkout, CheckoutHandler, CheckoutRequest};

mod profile_form;
pub use profile_form::ProfileSettings;

mod email_verification;
pub use email_verification::EmailVerificationDialog;

mod password_dialog;
pub use password_dialog::PasswordDialog;

/// One-second sleep for countdown ticking, platform-split the same way the
/// rest of the crate handles wasm vs native.
pub(crate) async fn sleep_one_sec() {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(std::time::Duration::from_secs(1)).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
}

/// Extract a user-facing message from a failed server call, with a generic
/// fallback when the payload carries nothing useful.
pub fn server_message(err: &ServerFnError, fallback: &str) -> String {
    let text = err.to_string();
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

/// Navigate by URL, usable from shared components that do not know the
/// app's route enum.
pub(crate) fn redirect(path: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(path);
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        tracing::debug!("redirect to {path} ignored outside the browser");
    }
}
