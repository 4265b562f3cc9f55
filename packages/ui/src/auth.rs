//! Authentication context and hooks for the UI.

use api::ProfileInfo;
use dioxus::prelude::*;

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<ProfileInfo>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

/// Get the current authentication state.
/// Returns a signal that updates when the user logs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// Provider component that manages authentication state.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let mut auth_state = use_signal(AuthState::default);

    // Fetch the current user on mount
    let _ = use_resource(move || async move {
        match api::get_current_user().await {
            Ok(user) => {
                auth_state.set(AuthState {
                    user,
                    loading: false,
                });
            }
            Err(e) => {
                tracing::warn!("failed to load current user: {e}");
                auth_state.set(AuthState {
                    user: None,
                    loading: false,
                });
            }
        }
    });

    use_context_provider(|| auth_state);

    rsx! {
        {children}
    }
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Log out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let mut auth_state = use_auth();

    let onclick = move |_| async move {
        if let Ok(()) = api::logout().await {
            auth_state.set(AuthState {
                user: None,
                loading: false,
            });
            crate::redirect("/login");
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}
