use api::{format_price, CourseSummary};
use dioxus::prelude::*;

/// A single course in the catalog grid.
#[component]
pub fn CourseCard(course: CourseSummary, on_open: EventHandler<String>) -> Element {
    let price = format_price(course.price_cents, &course.currency);
    let lectures = course.lecture_count;

    rsx! {
        div {
            class: "course-card",
            onclick: {
                let id = course.id.clone();
                move |_| on_open.call(id.clone())
            },
            h3 { class: "course-card-title", "{course.title}" }
            p { class: "course-card-description", "{course.description}" }
            div {
                class: "course-card-meta",
                span { "{course.instructor_name}" }
                span { "{lectures} lectures" }
                span { class: "course-card-price", "{price}" }
            }
        }
    }
}
