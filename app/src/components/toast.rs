//! Toast notifications.
//!
//! A toast manager lives in context; any component can push a message that
//! dismisses itself after a few seconds or when its close button is clicked.

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

/// At most this many toasts are on screen; the oldest goes first.
const MAX_TOASTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastSeverity {
    /// Confirmation of something the user did - 4 seconds
    Success,
    /// A failed request - 6 seconds
    Error,
}

impl ToastSeverity {
    fn duration_ms(self) -> u32 {
        match self {
            ToastSeverity::Success => 4000,
            ToastSeverity::Error => 6000,
        }
    }

    fn class(self) -> &'static str {
        match self {
            ToastSeverity::Success => "toast toast-success",
            ToastSeverity::Error => "toast toast-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub message: String,
    pub severity: ToastSeverity,
}

#[derive(Clone, Copy)]
pub struct ToastManager {
    toasts: Signal<Vec<Toast>>,
    next_id: Signal<u32>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self {
            toasts: Signal::new(vec![]),
            next_id: Signal::new(0),
        }
    }

    pub fn show(&mut self, message: impl Into<String>, severity: ToastSeverity) {
        let id = *self.next_id.peek();
        *self.next_id.write() += 1;

        {
            let mut toasts = self.toasts.write();
            if toasts.len() >= MAX_TOASTS {
                toasts.remove(0);
            }
            toasts.push(Toast {
                id,
                message: message.into(),
                severity,
            });
        }

        let mut toasts = self.toasts;
        spawn(async move {
            TimeoutFuture::new(severity.duration_ms()).await;
            toasts.write().retain(|t| t.id != id);
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(message, ToastSeverity::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(message, ToastSeverity::Error);
    }

    pub fn dismiss(&mut self, id: u32) {
        self.toasts.write().retain(|t| t.id != id);
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Call once in the root component.
pub fn use_toast_provider() -> ToastManager {
    use_context_provider(ToastManager::new)
}

pub fn use_toast() -> ToastManager {
    use_context::<ToastManager>()
}

/// Renders the active toasts. Place once at the end of the layout.
#[component]
pub fn ToastFrame() -> Element {
    let mut manager = use_toast();
    let toasts = manager.toasts.read();

    rsx! {
        div { class: "toast-container",
            for toast in toasts.iter() {
                div {
                    key: "{toast.id}",
                    class: toast.severity.class(),
                    role: "status",
                    span { class: "toast-message", "{toast.message}" }
                    button {
                        class: "toast-close",
                        onclick: {
                            let id = toast.id;
                            move |_| manager.dismiss(id)
                        },
                        "X"
                    }
                }
            }
        }
    }
}
