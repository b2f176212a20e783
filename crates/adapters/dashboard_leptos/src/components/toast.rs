//! Toast notifications: the browser side of the [`Notifier`] port.

use leptos::prelude::*;
use leptos::task::spawn_local;

use minermon_app::ports::{NoticeLevel, Notifier};

/// How long a toast stays up.
const DISMISS_AFTER_MS: u32 = 5000;

/// A single toast message.
#[derive(Debug, Clone)]
pub struct Toast {
    /// Unique id for keyed rendering.
    pub id: u32,
    pub level: NoticeLevel,
    pub text: String,
}

/// Pushes toasts into a reactive list rendered by [`ToastContainer`].
///
/// Copyable: it only holds signal handles.
#[derive(Debug, Clone, Copy)]
pub struct ToastNotifier {
    toasts: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u32>,
}

impl ToastNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    /// Dismiss a toast immediately by id.
    pub fn dismiss(&self, id: u32) {
        self.toasts.update(|list| list.retain(|t| t.id != id));
    }
}

impl Default for ToastNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, level: NoticeLevel, message: String) {
        tracing::debug!(%level, %message, "notice");

        let id = self.next_id.get_value();
        self.next_id.set_value(id.wrapping_add(1));
        self.toasts.update(|list| {
            list.push(Toast {
                id,
                level,
                text: message,
            });
        });

        let toasts = self.toasts;
        spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(DISMISS_AFTER_MS).await;
            toasts.try_update(|list| list.retain(|t| t.id != id));
        });
    }
}

/// Renders the active toasts of `notifier`.
#[component]
pub fn ToastContainer(notifier: ToastNotifier) -> impl IntoView {
    view! {
        <div class="toast-container">
            <For
                each=move || notifier.toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=format!("toast toast-{}", toast.level)>
                            <button class="toast-dismiss" on:click=move |_| notifier.dismiss(id)>
                                "\u{00D7}"
                            </button>
                            {toast.text}
                        </div>
                    }
                }
            />
        </div>
    }
}
