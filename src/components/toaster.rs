use std::time::Duration;

use leptos::prelude::*;

use crate::services::{Toast, ToastVariant, Toaster};

#[derive(Debug, Clone, PartialEq, Eq)]
struct ToastEntry {
    id: u64,
    toast: Toast,
}

/// Visible toasts. Each one dismisses itself after `duration`.
#[derive(Clone, Copy)]
pub struct ToastHub {
    entries: RwSignal<Vec<ToastEntry>>,
    next_id: StoredValue<u64>,
    duration: Duration,
}

impl ToastHub {
    pub fn new(duration: Duration) -> Self {
        Self {
            entries: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
            duration,
        }
    }

    pub fn dismiss(&self, id: u64) {
        self.entries.try_update(|entries| entries.retain(|e| e.id != id));
    }
}

impl Toaster for ToastHub {
    fn show(&self, toast: Toast) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.entries.update(|entries| entries.push(ToastEntry { id, toast }));

        let hub = *self;
        set_timeout(move || hub.dismiss(id), self.duration);
    }
}

#[component]
pub fn ToastStack(hub: ToastHub) -> impl IntoView {
    view! {
        <div class="toast-stack" aria-live="polite">
            <For
                each=move || hub.entries.get()
                key=|entry| entry.id
                children=move |entry| {
                    let class = match entry.toast.variant {
                        ToastVariant::Default => "toast",
                        ToastVariant::Destructive => "toast toast-destructive",
                    };
                    let id = entry.id;
                    view! {
                        <div class=class role="status" on:click=move |_| hub.dismiss(id)>
                            <strong class="toast-title">{entry.toast.title}</strong>
                            <p class="toast-description">{entry.toast.description}</p>
                        </div>
                    }
                }
            />
        </div>
    }
}
