use dioxus::prelude::*;

#[component]
pub fn Footer() -> Element {
    rsx! {
        footer {
            class: "footer",
            span { "CourseHub" }
            span { class: "footer-muted", "Learn anything, teach everything." }
        }
    }
}
