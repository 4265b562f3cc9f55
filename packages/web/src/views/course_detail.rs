//! Course detail page: lectures, purchase flow, and the owning
//! instructor's lecture management.

use dioxus::prelude::*;
use ui::components::{Button, ButtonVariant, Input};
use ui::{use_checkout, use_toasts, CheckoutRequest, Footer, Navbar};

use crate::Route;

/// One course: summary, lecture list, and either a buy button or the
/// instructor's management controls.
#[component]
pub fn CourseDetail(course_id: String) -> Element {
    let mut toasts = use_toasts();
    let checkout = use_checkout();

    // Bumped after a confirmed purchase or a lecture edit to refetch.
    let mut refresh = use_signal(|| 0u32);

    let course = use_resource(use_reactive!(|course_id| async move {
        refresh();
        api::get_course(course_id).await
    }));

    let mut buying = use_signal(|| false);
    let detail_id = use_memo(move || {
        course
            .read()
            .as_ref()
            .and_then(|r| r.as_ref().ok())
            .map(|d| d.summary.id.clone())
    });

    let handle_buy = move |_| {
        let Some(id) = detail_id() else { return };
        if buying() {
            return;
        }
        buying.set(true);
        spawn(async move {
            match api::create_order(id).await {
                Ok(order) => {
                    checkout.0.call(CheckoutRequest {
                        order_ref: order.order_ref,
                        amount_cents: order.amount_cents,
                        currency: order.currency,
                        checkout_url: order.checkout_url,
                        on_success: EventHandler::new(move |message: String| {
                            buying.set(false);
                            toasts.success(message);
                            refresh += 1;
                        }),
                        on_failure: EventHandler::new(move |message: String| {
                            buying.set(false);
                            toasts.error(message);
                        }),
                    });
                }
                Err(e) => {
                    buying.set(false);
                    toasts.error(e.to_string());
                }
            }
        });
    };

    rsx! {
        Navbar {
            Link { class: "navbar-link", to: Route::Courses {}, "Courses" }
        }

        div {
            class: "view-page",

            match &*course.read() {
                Some(Ok(detail)) => {
                    let summary = detail.summary.clone();
                    let price = api::format_price(summary.price_cents, &summary.currency);
                    let playable = detail.enrolled || detail.owned;

                    rsx! {
                        h1 { class: "view-title", "{summary.title}" }
                        p { class: "course-instructor", "by {summary.instructor_name}" }
                        p { class: "course-description", "{summary.description}" }

                        if detail.owned {
                            span { class: "course-badge", "You teach this course" }
                        } else if detail.enrolled {
                            span { class: "course-badge", "Enrolled" }
                        } else {
                            div {
                                class: "course-buy",
                                span { class: "course-card-price", "{price}" }
                                Button {
                                    variant: ButtonVariant::Primary,
                                    disabled: buying(),
                                    onclick: handle_buy,
                                    if buying() { "Processing…" } else { "Buy this course" }
                                }
                            }
                        }

                        h2 { class: "view-subtitle", "Lectures" }
                        if detail.lectures.is_empty() {
                            p { class: "view-muted", "No lectures yet." }
                        }
                        ol {
                            class: "lecture-list",
                            for lecture in detail.lectures.iter().cloned() {
                                LectureRow {
                                    key: "{lecture.id}",
                                    lecture,
                                    playable,
                                    owned: detail.owned,
                                    on_changed: move |_| refresh += 1,
                                }
                            }
                        }

                        if detail.owned {
                            AddLectureForm {
                                course_id: summary.id.clone(),
                                on_added: move |_| refresh += 1,
                            }
                        }
                    }
                }
                Some(Err(e)) => rsx! {
                    p { class: "view-error", "Could not load this course: {e}" }
                },
                None => rsx! {
                    p { class: "view-muted", "Loading…" }
                },
            }
        }

        Footer {}
    }
}

/// A single lecture row. The owning instructor gets rename and delete
/// controls; enrolled users get the video link.
#[component]
fn LectureRow(
    lecture: api::LectureInfo,
    playable: bool,
    owned: bool,
    on_changed: EventHandler<()>,
) -> Element {
    let mut toasts = use_toasts();
    let mut editing = use_signal(|| false);
    let mut title = use_signal(|| lecture.title.clone());
    let original_title = lecture.title.clone();

    let lecture_id = lecture.id.clone();
    let handle_rename = move |_| {
        let id = lecture_id.clone();
        spawn(async move {
            match api::update_lecture(id, title()).await {
                Ok(()) => {
                    editing.set(false);
                    on_changed.call(());
                }
                Err(e) => toasts.error(e.to_string()),
            }
        });
    };

    let lecture_id = lecture.id.clone();
    let handle_delete = move |_| {
        let id = lecture_id.clone();
        spawn(async move {
            match api::delete_lecture(id).await {
                Ok(()) => {
                    toasts.info("Lecture deleted");
                    on_changed.call(());
                }
                Err(e) => toasts.error(e.to_string()),
            }
        });
    };

    rsx! {
        li {
            class: "lecture-row",
            if editing() {
                Input {
                    class: "lecture-title-input",
                    value: title(),
                    oninput: move |evt: FormEvent| title.set(evt.value()),
                }
                Button {
                    variant: ButtonVariant::Primary,
                    onclick: handle_rename,
                    "Save"
                }
                Button {
                    variant: ButtonVariant::Outline,
                    onclick: move |_| {
                        title.set(original_title.clone());
                        editing.set(false);
                    },
                    "Cancel"
                }
            } else {
                if playable {
                    if let Some(url) = lecture.video_url.as_ref() {
                        a { class: "lecture-link", href: "{url}", "{lecture.title}" }
                    } else {
                        span { class: "lecture-title", "{lecture.title}" }
                    }
                } else {
                    span { class: "lecture-title lecture-locked", "{lecture.title}" }
                }
                if owned {
                    div {
                        class: "lecture-actions",
                        Button {
                            variant: ButtonVariant::Outline,
                            onclick: move |_| editing.set(true),
                            "Rename"
                        }
                        Button {
                            variant: ButtonVariant::Danger,
                            onclick: handle_delete,
                            "Delete"
                        }
                    }
                }
            }
        }
    }
}

/// Instructor-only form appending a lecture to the course.
#[component]
fn AddLectureForm(course_id: String, on_added: EventHandler<()>) -> Element {
    let mut toasts = use_toasts();
    let mut title = use_signal(String::new);
    let mut video_url = use_signal(String::new);
    let mut busy = use_signal(|| false);

    let handle_add = move |evt: FormEvent| {
        evt.prevent_default();
        let id = course_id.clone();
        spawn(async move {
            if title().trim().is_empty() {
                toasts.error("Lecture title is required");
                return;
            }
            busy.set(true);
            match api::add_lecture(id, title(), video_url()).await {
                Ok(_) => {
                    busy.set(false);
                    title.set(String::new());
                    video_url.set(String::new());
                    on_added.call(());
                }
                Err(e) => {
                    busy.set(false);
                    toasts.error(e.to_string());
                }
            }
        });
    };

    rsx! {
        form {
            class: "lecture-add",
            onsubmit: handle_add,
            h3 { class: "view-subtitle", "Add a lecture" }
            Input {
                placeholder: "Lecture title",
                value: title(),
                oninput: move |evt: FormEvent| title.set(evt.value()),
            }
            Input {
                placeholder: "Video URL",
                value: video_url(),
                oninput: move |evt: FormEvent| video_url.set(evt.value()),
            }
            Button {
                variant: ButtonVariant::Primary,
                r#type: "submit",
                disabled: busy(),
                "Add lecture"
            }
        }
    }
}
