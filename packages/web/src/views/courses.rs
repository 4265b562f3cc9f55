//! Course catalog with search.

use dioxus::prelude::*;
use ui::{CourseCard, Footer, Navbar, SearchBox};

use crate::Route;

/// Catalog page: search box plus a grid of course cards.
#[component]
pub fn Courses() -> Element {
    let mut search = use_signal(String::new);
    let nav = use_navigator();

    let courses = use_resource(move || async move {
        let term = search().trim().to_string();
        let term = (!term.is_empty()).then_some(term);
        api::list_courses(term).await
    });

    rsx! {
        Navbar {
            Link { class: "navbar-link", to: Route::Courses {}, "Courses" }
        }

        div {
            class: "view-page",

            h1 { class: "view-title", "Browse courses" }

            SearchBox {
                value: search(),
                on_change: move |value: String| search.set(value),
            }

            match &*courses.read() {
                Some(Ok(list)) if list.is_empty() => rsx! {
                    p { class: "view-muted", "No courses match your search." }
                },
                Some(Ok(list)) => rsx! {
                    div {
                        class: "course-grid",
                        for course in list.iter().cloned() {
                            CourseCard {
                                key: "{course.id}",
                                course,
                                on_open: move |id: String| {
                                    nav.push(Route::CourseDetail { course_id: id });
                                },
                            }
                        }
                    }
                },
                Some(Err(e)) => rsx! {
                    p { class: "view-error", "Could not load courses: {e}" }
                },
                None => rsx! {
                    p { class: "view-muted", "Loading…" }
                },
            }
        }

        Footer {}
    }
}
