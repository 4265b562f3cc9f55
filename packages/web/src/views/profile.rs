//! Profile settings page, wrapping the shared settings form in the app
//! chrome.

use dioxus::prelude::*;
use ui::{Footer, Navbar, ProfileSettings};

use crate::Route;

#[component]
pub fn Profile() -> Element {
    rsx! {
        Navbar {
            Link { class: "navbar-link", to: Route::Courses {}, "Courses" }
        }

        ProfileSettings {}

        Footer {}
    }
}
