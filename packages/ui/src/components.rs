//! Small form controls shared across views.

use dioxus::prelude::*;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Outline,
    Danger,
}

impl ButtonVariant {
    fn class(self) -> &'static str {
        match self {
            ButtonVariant::Primary => "btn btn-primary",
            ButtonVariant::Outline => "btn btn-outline",
            ButtonVariant::Danger => "btn btn-danger",
        }
    }
}

#[component]
pub fn Button(
    #[props(default)] variant: ButtonVariant,
    #[props(default = String::new())] class: String,
    #[props(default = false)] disabled: bool,
    #[props(default = "button".to_string())] r#type: String,
    onclick: Option<EventHandler<MouseEvent>>,
    children: Element,
) -> Element {
    rsx! {
        button {
            class: "{variant.class()} {class}",
            r#type: "{r#type}",
            disabled,
            onclick: move |evt| {
                if let Some(handler) = &onclick {
                    handler.call(evt);
                }
            },
            {children}
        }
    }
}

#[component]
pub fn Input(
    #[props(default = String::new())] id: String,
    #[props(default = String::new())] class: String,
    #[props(default = "text".to_string())] r#type: String,
    #[props(default = String::new())] placeholder: String,
    #[props(default = String::new())] value: String,
    #[props(default = false)] disabled: bool,
    oninput: Option<EventHandler<FormEvent>>,
) -> Element {
    rsx! {
        input {
            id: "{id}",
            class: "input {class}",
            r#type: "{r#type}",
            placeholder: "{placeholder}",
            value: "{value}",
            disabled,
            oninput: move |evt| {
                if let Some(handler) = &oninput {
                    handler.call(evt);
                }
            },
        }
    }
}

#[component]
pub fn Label(
    #[props(default = String::new())] html_for: String,
    children: Element,
) -> Element {
    rsx! {
        label {
            class: "label",
            r#for: "{html_for}",
            {children}
        }
    }
}

#[component]
pub fn Textarea(
    #[props(default = String::new())] id: String,
    #[props(default = String::new())] class: String,
    #[props(default = String::new())] placeholder: String,
    #[props(default = String::new())] value: String,
    #[props(default = 4)] rows: i64,
    #[props(default = false)] disabled: bool,
    oninput: Option<EventHandler<FormEvent>>,
) -> Element {
    rsx! {
        textarea {
            id: "{id}",
            class: "textarea {class}",
            placeholder: "{placeholder}",
            value: "{value}",
            rows: "{rows}",
            disabled,
            oninput: move |evt| {
                if let Some(handler) = &oninput {
                    handler.call(evt);
                }
            },
        }
    }
}
