//! Change-password dialog.
//!
//! The new/confirm inputs stay locked until the current password has been
//! confirmed against the server. The check fires from the input handler
//! once the minimum length is reached; an in-flight flag keeps overlapping
//! checks from piling up.

use dioxus::prelude::*;
use profile::{CurrentPasswordStatus, PasswordChangeAttempt, MIN_CURRENT_LEN};

use crate::components::{Button, ButtonVariant, Input, Label};
use crate::use_toasts;

#[component]
pub fn PasswordDialog(open: Signal<bool>) -> Element {
    let mut open = open;
    let mut toasts = use_toasts();
    let mut attempt = use_signal(PasswordChangeAttempt::default);
    let mut checking = use_signal(|| false);
    let mut submitting = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    let handle_current = move |evt: FormEvent| {
        let should_check = attempt.write().set_current(evt.value());
        if !should_check || checking() {
            return;
        }
        spawn(async move {
            checking.set(true);
            // Keystrokes that land while a check is in flight do not spawn
            // a second one, so loop until the answer we get is for the
            // value still in the field.
            loop {
                let checked = attempt.read().current.clone();
                match api::check_current_password(checked.clone()).await {
                    Ok(ok) => attempt.write().record_check(&checked, ok),
                    Err(e) => {
                        // Leave the status as-is; the user can keep typing.
                        tracing::warn!("current password check failed: {e}");
                        break;
                    }
                }
                let latest = attempt.read().current.clone();
                if latest == checked || latest.trim().len() < MIN_CURRENT_LEN {
                    break;
                }
            }
            checking.set(false);
        });
    };

    let mut close = move || {
        attempt.write().clear();
        error.set(None);
        open.set(false);
    };

    let handle_submit = move |_| {
        if submitting() {
            return;
        }
        error.set(None);
        if let Err(e) = attempt.read().validate() {
            error.set(Some(e.message().to_string()));
            return;
        }
        spawn(async move {
            submitting.set(true);
            let (current, new) = {
                let a = attempt.read();
                (a.current.clone(), a.new.clone())
            };
            match api::update_password(current, new).await {
                Ok(message) => {
                    toasts.success(message);
                    attempt.write().clear();
                    error.set(None);
                    open.set(false);
                }
                Err(e) => {
                    // Entered values are kept so the user can correct and retry.
                    error.set(Some(crate::server_message(
                        &e,
                        "Could not update the password",
                    )));
                }
            }
            submitting.set(false);
        });
    };

    let state = attempt();
    let unlocked = state.inputs_unlocked();

    rsx! {
        div {
            class: "dialog-overlay",
            div {
                class: "dialog",
                h2 { class: "dialog-title", "Change password" }

                div {
                    class: "dialog-field",
                    Label { html_for: "current-password", "Current password" }
                    Input {
                        id: "current-password",
                        class: "w-full",
                        r#type: "password",
                        value: state.current.clone(),
                        oninput: handle_current,
                    }
                    match state.status() {
                        CurrentPasswordStatus::Verified => rsx! {
                            p { class: "dialog-hint dialog-hint-ok", "Current password confirmed" }
                        },
                        CurrentPasswordStatus::Rejected => rsx! {
                            p { class: "dialog-hint dialog-hint-bad", "Current password is incorrect" }
                        },
                        CurrentPasswordStatus::Unknown => rsx! {},
                    }
                }

                div {
                    class: "dialog-field",
                    Label { html_for: "new-password", "New password" }
                    Input {
                        id: "new-password",
                        class: "w-full",
                        r#type: "password",
                        disabled: !unlocked,
                        value: state.new.clone(),
                        oninput: move |evt: FormEvent| attempt.write().new = evt.value(),
                    }
                }

                div {
                    class: "dialog-field",
                    Label { html_for: "confirm-password", "Confirm new password" }
                    Input {
                        id: "confirm-password",
                        class: "w-full",
                        r#type: "password",
                        disabled: !unlocked,
                        value: state.confirm.clone(),
                        oninput: move |evt: FormEvent| attempt.write().confirm = evt.value(),
                    }
                }

                if let Some(err) = error() {
                    p { class: "dialog-error", "{err}" }
                }

                div {
                    class: "dialog-actions",
                    Button {
                        variant: ButtonVariant::Primary,
                        disabled: submitting() || !unlocked,
                        onclick: handle_submit,
                        if submitting() { "Updating…" } else { "Update password" }
                    }
                    Button {
                        variant: ButtonVariant::Outline,
                        disabled: submitting(),
                        onclick: move |_| close(),
                        "Cancel"
                    }
                }
            }
        }
    }
}
