use leptos::prelude::*;

/// Placeholder card while a page waits for its first answer from the device.
#[component]
pub fn Loading(
    /// What is being fetched, as in "Reading {what} from the device".
    what: &'static str,
) -> impl IntoView {
    view! {
        <div class="card card-pending" role="status" aria-live="polite">
            <span class="pulse"></span>
            {format!("Reading {what} from the device\u{2026}")}
        </div>
    }
}
