use dioxus::prelude::*;

use crate::components::Input;

/// Controlled search input for the course catalog.
#[component]
pub fn SearchBox(
    value: String,
    #[props(default = "Search courses…".to_string())] placeholder: String,
    on_change: EventHandler<String>,
) -> Element {
    rsx! {
        div {
            class: "search-box",
            Input {
                class: "search-box-input",
                r#type: "search",
                placeholder,
                value,
                oninput: move |evt: FormEvent| on_change.call(evt.value()),
            }
        }
    }
}
