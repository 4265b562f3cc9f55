//! Account registration page.

use dioxus::prelude::*;
use ui::components::{Button, ButtonVariant, Input};
use ui::use_auth;

use crate::Route;

/// Registration page with name, email, password and role choice.
#[component]
pub fn Register() -> Element {
    let mut auth = use_auth();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut role = use_signal(|| api::ROLE_LEARNER.to_string());
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);
    let nav = use_navigator();

    if !auth().loading && auth().user.is_some() {
        nav.replace(Route::Courses {});
    }

    let handle_register = move |evt: FormEvent| {
        evt.prevent_default();
        spawn(async move {
            error.set(None);

            let n = name().trim().to_string();
            let e = email().trim().to_string();
            let p = password();

            if n.is_empty() {
                error.set(Some("Name is required".to_string()));
                return;
            }
            if e.is_empty() || !e.contains('@') {
                error.set(Some("Please enter a valid email".to_string()));
                return;
            }
            if p.len() < 8 {
                error.set(Some("Password must be at least 8 characters".to_string()));
                return;
            }
            if p != confirm() {
                error.set(Some("Passwords do not match".to_string()));
                return;
            }

            loading.set(true);
            match api::register(e, p, n, role()).await {
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
            p { class: "auth-subtitle", "Create your account" }

            form {
                onsubmit: handle_register,
                class: "auth-form",

                if let Some(err) = error() {
                    div { class: "auth-error", "{err}" }
                }

                Input {
                    class: "w-full",
                    placeholder: "Full name",
                    value: name(),
                    oninput: move |evt: FormEvent| name.set(evt.value()),
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
                    placeholder: "Password (min 8 characters)",
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }

                Input {
                    class: "w-full",
                    r#type: "password",
                    placeholder: "Confirm password",
                    value: confirm(),
                    oninput: move |evt: FormEvent| confirm.set(evt.value()),
                }

                div {
                    class: "auth-role",
                    label {
                        class: "auth-role-option",
                        input {
                            r#type: "radio",
                            name: "role",
                            checked: role() == api::ROLE_LEARNER,
                            onchange: move |_| role.set(api::ROLE_LEARNER.to_string()),
                        }
                        "I want to learn"
                    }
                    label {
                        class: "auth-role-option",
                        input {
                            r#type: "radio",
                            name: "role",
                            checked: role() == api::ROLE_INSTRUCTOR,
                            onchange: move |_| role.set(api::ROLE_INSTRUCTOR.to_string()),
                        }
                        "I want to teach"
                    }
                }

                Button {
                    variant: ButtonVariant::Primary,
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Creating account…" } else { "Create account" }
                }
            }

            p {
                class: "auth-switch",
                "Already have an account? "
                Link { to: Route::Login {}, "Sign in" }
            }
        }
    }
}
