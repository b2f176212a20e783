use leptos::prelude::*;

use minermon_app::connection::ConnectionStatus;
use minermon_app::navigator::PageName;

/// Header with the page links, the connection badge and a refresh button.
#[component]
pub fn Nav(
    /// Page shown right now, `None` on the not-found view.
    current: ReadSignal<Option<PageName>>,
    /// Last ping outcome, `None` until the first probe returns.
    connection: ReadSignal<Option<ConnectionStatus>>,
    /// Re-mounts the current page.
    on_refresh: Callback<()>,
) -> impl IntoView {
    let badge = move || match connection.get() {
        Some(status) => (status.label(), format!("badge badge-{}", status.color().class())),
        None => ("Checking\u{2026}".to_string(), "badge badge-muted".to_string()),
    };

    view! {
        <header class="app-header">
            <h1 class="app-title">"Monitor Miner"</h1>
            <nav>
                <ul>
                    {PageName::ALL
                        .into_iter()
                        .map(|page| {
                            view! {
                                <li>
                                    <a
                                        href=format!("#{page}")
                                        class:active=move || current.get() == Some(page)
                                    >
                                        {page.title()}
                                    </a>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </nav>
            <span class=move || badge().1>{move || badge().0}</span>
            <button class="refresh" title="Refresh page" on:click=move |_| on_refresh.run(())>
                "\u{21BB}"
            </button>
        </header>
    }
}
