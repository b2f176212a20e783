use leptos::prelude::*;

use minermon_app::navigator::PageName;

/// Shown when the URL hash names no page. Lists the pages that do exist.
#[component]
pub fn NotFound(
    /// The hash that matched nothing, `#` included.
    requested: String,
) -> impl IntoView {
    view! {
        <section class="page page-unknown card">
            <h2>"Unknown page"</h2>
            <p>
                "Nothing is served at " <code>{requested}</code> ". Pick one of these instead:"
            </p>
            <ul class="page-links">
                {PageName::ALL
                    .into_iter()
                    .map(|page| view! { <li><a href=format!("#{page}")>{page.title()}</a></li> })
                    .collect_view()}
            </ul>
        </section>
    }
}
