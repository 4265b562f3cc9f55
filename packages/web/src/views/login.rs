//! Login page view with email/password form.

use dioxus::prelude::*;
use ui::components::{Button, ButtonVariant, Input};
use ui::use_auth;

use crate::Route;

/// Login page component.
#[component]
pub fn Login() -> Element {
    let mut auth = use_auth();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);
    let nav = use_navigator();

    // If already logged in, go to the catalog
    if !auth().loading && auth().user.is_some() {
        nav.replace(Route::Courses {});
    }

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        spawn(async move {
            error.set(None);

            let e = email().trim().to_string();
            let p = password();

            if e.is_empty() || !e.contains('@') {
                error.set(Some("Please enter a valid email".to_string()));
                return;
            }
            if p.is_empty() {
                error.set(Some("Password is required".to_string()));
                return;
            }

            loading.set(true);
            match api::login(e, p).await {
                Ok(user) => {
                    let mut state = auth();
                    state.user = Some(user);
                    state.loading = false;
                    auth.set(state);
                    nav.replace(Route::Courses {});
                }
                Err(e) => {
                    loading.set(false);
                    error.set(Some(e.to_string()));
                }
            }
        });
    };

    rsx! {
        div {
            class: "auth-page",

            h1 { class: "auth-title", "CourseHub" }
            p { class: "auth-subtitle", "Sign in to your account" }

            form {
                onsubmit: handle_login,
                class: "auth-form",

                if let Some(err) = error() {
                    div { class: "auth-error", "{err}" }
                }

                Input {
                    class: "w-full",
                    r#type: "email",
                    placeholder: "Email",
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }

                Input {
                    class: "w-full",
                    r#type: "password",
                    placeholder: "Password",
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }

                Button {
                    variant: ButtonVariant::Primary,
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Signing in…" } else { "Sign in" }
                }
            }

            p {
                class: "auth-switch",
                "No account yet? "
                Link { to: Route::Register {}, "Create one" }
            }
        }
    }
}
