//! Email-change verification dialog.
//!
//! Renders while the [`EmailVerification`] machine is in `CodeIssued` and
//! owns the countdown task: exactly one task ticks the machine, and every
//! path that leaves or restarts the window cancels it first — verify
//! success, cancel, resend, and unmount.

use dioxus::core::Task;
use dioxus::prelude::*;
use profile::{EmailVerification, ProfileFields};

use crate::components::{Button, ButtonVariant, Input};
use crate::use_toasts;

#[component]
pub fn EmailVerificationDialog(
    verification: Signal<EmailVerification>,
    /// The text fields currently applied on the server; a resend re-sends
    /// them with the pending target email to trigger re-issuance.
    resend_fields: ProfileFields,
    /// Called with the now-live email address after the server confirms.
    on_verified: EventHandler<String>,
) -> Element {
    let mut verification = verification;
    let mut toasts = use_toasts();
    let mut busy = use_signal(|| false);
    let mut countdown = use_signal(|| Option::<Task>::None);

    // The one place a countdown task is born. Cancels any predecessor so
    // two tasks can never decrement the same window.
    let mut restart_countdown = move || {
        if let Some(task) = countdown.take() {
            task.cancel();
        }
        let task = spawn(async move {
            loop {
                crate::sleep_one_sec().await;
                if verification.write().tick() == 0 {
                    break;
                }
            }
        });
        countdown.set(Some(task));
    };

    use_hook(|| restart_countdown());
    use_drop(move || {
        if let Some(task) = countdown.take() {
            task.cancel();
        }
    });

    let handle_verify = move |_| {
        if busy() {
            return;
        }
        // Client-side gate: too-short codes and expired windows never
        // reach the network.
        let check = verification.read().check_verify();
        if let Err(reject) = check {
            verification.write().record_failure(reject.message().to_string());
            return;
        }
        spawn(async move {
            busy.set(true);
            let (target, code) = {
                let v = verification.read();
                (
                    v.target_email().unwrap_or_default().to_string(),
                    v.code().trim().to_string(),
                )
            };
            match api::verify_email_change(target, code).await {
                Ok(message) => {
                    if let Some(task) = countdown.take() {
                        task.cancel();
                    }
                    let live = verification.write().complete();
                    toasts.success(message);
                    if let Some(email) = live {
                        on_verified.call(email);
                    }
                }
                Err(e) => {
                    let msg = crate::server_message(&e, "Incorrect code — try again");
                    verification.write().record_failure(msg);
                }
            }
            busy.set(false);
        });
    };

    let handle_resend = {
        let resend_fields = resend_fields.clone();
        move |_| {
            if busy() || !verification.read().can_resend() {
                return;
            }
            let mut fields = resend_fields.clone();
            spawn(async move {
                busy.set(true);
                fields.email = verification
                    .read()
                    .target_email()
                    .unwrap_or_default()
                    .to_string();
                match api::update_profile(fields, None, false).await {
                    Ok(result) if result.otp_sent => {
                        verification.write().resend();
                        restart_countdown();
                        toasts.info(result.message);
                    }
                    Ok(result) => {
                        // The server no longer sees an email change; nothing
                        // left to verify.
                        if let Some(task) = countdown.take() {
                            task.cancel();
                        }
                        verification.write().cancel();
                        toasts.info(result.message);
                    }
                    Err(e) => {
                        let msg = crate::server_message(&e, "Could not resend the code");
                        verification.write().record_failure(msg);
                    }
                }
                busy.set(false);
            });
        }
    };

    let handle_cancel = move |_| {
        if let Some(task) = countdown.take() {
            task.cancel();
        }
        verification.write().cancel();
    };

    let state = verification();
    if !state.is_active() {
        return rsx! {};
    }
    let target = state.target_email().unwrap_or_default().to_string();
    let remaining = state.remaining();
    let expired = remaining == 0;

    rsx! {
        div {
            class: "dialog-overlay",
            div {
                class: "dialog",
                h2 { class: "dialog-title", "Confirm your new email" }
                p {
                    class: "dialog-text",
                    "We sent a 6-digit code to "
                    strong { "{target}" }
                    ". Your current address stays active until you confirm."
                }
                p {
                    class: if expired { "dialog-countdown dialog-countdown-expired" } else { "dialog-countdown" },
                    if expired {
                        "The code has expired."
                    } else {
                        "Code expires in {remaining}s"
                    }
                }
                Input {
                    class: "w-full dialog-code",
                    r#type: "text",
                    placeholder: "123456",
                    value: state.code().to_string(),
                    disabled: busy() || expired,
                    oninput: move |evt: FormEvent| verification.write().set_code(evt.value()),
                }
                if let Some(err) = state.last_error() {
                    p { class: "dialog-error", "{err}" }
                }
                div {
                    class: "dialog-actions",
                    Button {
                        variant: ButtonVariant::Primary,
                        disabled: busy() || !state.can_verify(),
                        onclick: handle_verify,
                        if busy() { "Verifying…" } else { "Verify" }
                    }
                    Button {
                        variant: ButtonVariant::Outline,
                        disabled: busy() || !state.can_resend(),
                        onclick: handle_resend,
                        "Resend code"
                    }
                    Button {
                        variant: ButtonVariant::Outline,
                        disabled: busy(),
                        onclick: handle_cancel,
                        "Cancel"
                    }
                }
            }
        }
    }
}
