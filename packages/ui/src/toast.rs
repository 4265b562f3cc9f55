//! Toast notifications: a context-provided sink plus an overlay host.
//!
//! Any component can grab [`Toasts`] via [`use_toasts`] and push a
//! success/error/info message; the host renders the stack and each toast
//! dismisses itself after a few seconds.

use dioxus::prelude::*;

const TOAST_SECONDS: u64 = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    fn class(self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast-success",
            ToastKind::Error => "toast toast-error",
            ToastKind::Info => "toast toast-info",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Toast {
    id: u64,
    kind: ToastKind,
    text: String,
}

/// Handle for pushing notifications. Cheap to copy into event handlers.
#[derive(Clone, Copy)]
pub struct Toasts {
    items: Signal<Vec<Toast>>,
    next_id: Signal<u64>,
}

impl Toasts {
    pub fn push(&mut self, kind: ToastKind, text: impl Into<String>) {
        let id = {
            let mut next = self.next_id.write();
            *next += 1;
            *next
        };
        self.items.write().push(Toast {
            id,
            kind,
            text: text.into(),
        });

        let mut items = self.items;
        spawn(async move {
            for _ in 0..TOAST_SECONDS {
                crate::sleep_one_sec().await;
            }
            items.write().retain(|t| t.id != id);
        });
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(ToastKind::Success, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(ToastKind::Error, text);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(ToastKind::Info, text);
    }
}

/// Get the toast sink from context.
pub fn use_toasts() -> Toasts {
    use_context::<Toasts>()
}

/// Provider component: wraps the app and renders the toast overlay.
#[component]
pub fn ToastProvider(children: Element) -> Element {
    let items = use_signal(Vec::<Toast>::new);
    let next_id = use_signal(|| 0u64);
    let mut toasts = use_context_provider(|| Toasts { items, next_id });

    rsx! {
        {children}
        div {
            class: "toast-stack",
            for toast in items().iter() {
                div {
                    key: "{toast.id}",
                    class: "{toast.kind.class()}",
                    span { "{toast.text}" }
                    button {
                        class: "toast-dismiss",
                        onclick: {
                            let id = toast.id;
                            move |_| toasts.items.write().retain(|t| t.id != id)
                        },
                        "×"
                    }
                }
            }
        }
    }
}
