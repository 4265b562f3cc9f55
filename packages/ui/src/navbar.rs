//! Top navigation chrome.

use dioxus::prelude::*;

use crate::auth::use_auth;
use crate::LogoutButton;

/// Navigation bar: brand, the links the app passes as children, and the
/// auth controls on the right.
#[component]
pub fn Navbar(children: Element) -> Element {
    let auth = use_auth();
    let state = auth();

    rsx! {
        div {
            class: "navbar",
            a { class: "navbar-brand", href: "/", "CourseHub" }
            div {
                class: "navbar-links",
                {children}
            }
            div {
                class: "navbar-auth",
                if state.loading {
                    span { class: "navbar-muted", "…" }
                } else if let Some(user) = &state.user {
                    a { class: "navbar-user", href: "/profile", "{user.name}" }
                    LogoutButton { class: "navbar-logout" }
                } else {
                    a { class: "navbar-login", href: "/login", "Log in" }
                }
            }
        }
    }
}
