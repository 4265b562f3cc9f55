//! Profile settings form.
//!
//! Two separate values drive the form: the confirmed snapshot (replaced
//! wholesale from server responses, never edited) and the draft (rebuilt
//! from the snapshot on load and after a plain save). A save with no
//! changes is rejected before any network call. When the server reports
//! that the email change needs confirmation, the snapshot stays untouched
//! and the verification dialog takes over.

use dioxus::prelude::*;
use profile::{
    build_payload, EditDraft, EmailVerification, PhotoAction, PhotoFile, PhotoSlot,
    ProfileFields, ProfileSnapshot, UpdatePayload,
};

use crate::components::{Button, ButtonVariant, Input, Label, Textarea};
use crate::{use_auth, use_toasts, EmailVerificationDialog, PasswordDialog};

#[component]
pub fn ProfileSettings() -> Element {
    let mut auth = use_auth();
    let mut toasts = use_toasts();
    let mut snapshot = use_signal(|| Option::<ProfileSnapshot>::None);
    let mut draft = use_signal(EditDraft::default);
    let mut saving = use_signal(|| false);
    let verification = use_signal(EmailVerification::default);
    let show_password = use_signal(|| false);
    let mut show_password_setter = show_password;

    // Load the snapshot on mount; the draft starts as its trimmed copy.
    let _loader = use_resource(move || async move {
        match api::get_current_user().await {
            Ok(Some(info)) => {
                let snap = info.to_snapshot();
                draft.set(EditDraft::from_snapshot(&snap));
                snapshot.set(Some(snap));
            }
            Ok(None) => {
                crate::redirect("/login");
            }
            Err(e) => {
                toasts.error(crate::server_message(&e, "Could not load your profile"));
            }
        }
    });

    let handle_photo = move |evt: FormEvent| {
        spawn(async move {
            let Some(file) = evt.files().first().cloned() else {
                return;
            };
            let name = file.name();
            match file.read_bytes().await {
                Ok(bytes) => draft.write().select_photo(PhotoFile {
                    content_type: content_type_for(&name).to_string(),
                    filename: name,
                    bytes: bytes.to_vec(),
                }),
                Err(_) => toasts.error("Could not read the selected file"),
            }
        });
    };

    let handle_save = move |_| {
        if saving() {
            return;
        }
        spawn(async move {
            let Some(snap) = snapshot() else {
                return;
            };
            // No-op saves never reach the network.
            let Some(payload) = build_payload(&draft(), &snap) else {
                toasts.info("No changes to save");
                return;
            };
            saving.set(true);

            let target_email = payload.fields().email.to_lowercase();
            let (fields, photo, remove_photo) = match payload {
                UpdatePayload::Structured(fields) => (fields, None, false),
                UpdatePayload::Multipart { fields, photo } => match photo {
                    PhotoAction::Upload(file) => (fields, Some(file), false),
                    PhotoAction::Remove => (fields, None, true),
                },
            };

            match api::update_profile(fields, photo, remove_photo).await {
                Ok(result) if result.otp_sent => {
                    // Email not live yet: keep the snapshot, open the
                    // verification window for the requested address.
                    let mut verification = verification;
                    verification.write().issue(target_email);
                    toasts.info(result.message);
                }
                Ok(result) => {
                    toasts.success(result.message);
                    // Replace the snapshot wholesale and rebuild the draft,
                    // which also resets the photo slot.
                    match api::get_current_user().await {
                        Ok(Some(info)) => {
                            auth.write().user = Some(info.clone());
                            let snap = info.to_snapshot();
                            draft.set(EditDraft::from_snapshot(&snap));
                            snapshot.set(Some(snap));
                        }
                        Ok(None) => {}
                        Err(e) => {
                            toasts.error(crate::server_message(
                                &e,
                                "Saved, but the profile could not be reloaded",
                            ));
                        }
                    }
                }
                Err(e) => {
                    // Draft untouched so the user can correct and resubmit.
                    toasts.error(crate::server_message(&e, "Could not save your profile"));
                }
            }
            saving.set(false);
        });
    };

    let on_verified = move |email: String| {
        if let Some(snap) = snapshot.write().as_mut() {
            snap.email = email.clone();
        }
        if let Some(user) = auth.write().user.as_mut() {
            user.email = email;
        }
    };

    let current = draft();
    let snap = snapshot();
    let dirty = snap
        .as_ref()
        .map(|s| current.has_changes(s))
        .unwrap_or(false);
    let photo_note = match current.photo() {
        PhotoSlot::Unchanged => None,
        PhotoSlot::New(file) => Some(format!("New photo selected: {}", file.filename)),
        PhotoSlot::PendingRemoval => Some("Photo will be removed on save".to_string()),
    };

    rsx! {
        div {
            class: "view-page",
            h1 { class: "view-title", "Profile" }

            if snap.is_none() {
                p { class: "view-muted", "Loading…" }
            } else {
                // Photo section
                div {
                    class: "mb-8",
                    h2 { class: "view-section-title", "Photo" }
                    if let Some(url) = snap.as_ref().and_then(|s| s.photo_url.clone()) {
                        img { class: "profile-photo", src: "{url}", alt: "Profile photo" }
                    }
                    div {
                        class: "profile-photo-actions",
                        input {
                            r#type: "file",
                            accept: "image/*",
                            onchange: handle_photo,
                        }
                        Button {
                            variant: ButtonVariant::Outline,
                            disabled: !current.can_remove_photo(),
                            onclick: move |_| {
                                draft.write().request_photo_removal();
                            },
                            "Remove photo"
                        }
                    }
                    if let Some(note) = photo_note {
                        p { class: "view-muted", "{note}" }
                    }
                }

                // Identity section
                div {
                    class: "mb-8",
                    h2 { class: "view-section-title", "Account" }
                    div {
                        class: "mb-4",
                        Label { html_for: "profile-name", "Name" }
                        Input {
                            id: "profile-name",
                            class: "w-full mt-1.5",
                            value: current.name.clone(),
                            oninput: move |evt: FormEvent| draft.write().name = evt.value(),
                        }
                    }
                    div {
                        class: "mb-4",
                        Label { html_for: "profile-email", "Email" }
                        Input {
                            id: "profile-email",
                            class: "w-full mt-1.5",
                            r#type: "email",
                            value: current.email.clone(),
                            oninput: move |evt: FormEvent| draft.write().email = evt.value(),
                        }
                        p {
                            class: "view-muted",
                            "Changing your email requires confirming a code sent to the new address."
                        }
                    }
                    div {
                        class: "mb-4",
                        Label { html_for: "profile-biography", "Biography" }
                        Textarea {
                            id: "profile-biography",
                            class: "w-full mt-1.5",
                            rows: 5,
                            placeholder: "Tell learners about yourself",
                            value: current.biography.clone(),
                            oninput: move |evt: FormEvent| draft.write().biography = evt.value(),
                        }
                    }
                }

                // Social links section
                div {
                    class: "mb-8",
                    h2 { class: "view-section-title", "Links" }
                    div {
                        class: "mb-4",
                        Label { html_for: "profile-linkedin", "LinkedIn" }
                        Input {
                            id: "profile-linkedin",
                            class: "w-full mt-1.5",
                            value: current.linkedin.clone(),
                            oninput: move |evt: FormEvent| draft.write().linkedin = evt.value(),
                        }
                    }
                    div {
                        class: "mb-4",
                        Label { html_for: "profile-instagram", "Instagram" }
                        Input {
                            id: "profile-instagram",
                            class: "w-full mt-1.5",
                            value: current.instagram.clone(),
                            oninput: move |evt: FormEvent| draft.write().instagram = evt.value(),
                        }
                    }
                    div {
                        class: "mb-4",
                        Label { html_for: "profile-twitter", "Twitter" }
                        Input {
                            id: "profile-twitter",
                            class: "w-full mt-1.5",
                            value: current.twitter.clone(),
                            oninput: move |evt: FormEvent| draft.write().twitter = evt.value(),
                        }
                    }
                }

                div {
                    class: "profile-actions",
                    Button {
                        variant: ButtonVariant::Primary,
                        disabled: saving(),
                        onclick: handle_save,
                        if saving() { "Saving…" } else { "Save changes" }
                    }
                    Button {
                        variant: ButtonVariant::Outline,
                        onclick: move |_| show_password_setter.set(true),
                        "Change password"
                    }
                    if dirty && !saving() {
                        span { class: "view-muted", "Unsaved changes" }
                    }
                }
            }

            if verification().is_active() {
                EmailVerificationDialog {
                    verification,
                    resend_fields: ProfileFields::from_draft(&current),
                    on_verified,
                }
            }
            if show_password() {
                PasswordDialog { open: show_password }
            }
        }
    }
}

/// Content type from the selected file's extension; the server stores it
/// alongside the bytes for the media route.
fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit('.').next().map(|e| e.to_ascii_lowercase()) {
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "gif" => "image/gif",
        Some(ext) if ext == "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
