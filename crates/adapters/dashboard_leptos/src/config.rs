//! Dashboard settings embedded in the served page.
//!
//! The host page may carry
//! `<meta name="minermon:config" content='{"api_base": "..."}'>`; missing or
//! invalid settings fall back to the defaults.

use leptos::prelude::document;

use minermon_app::config::DashboardConfig;

const SELECTOR: &str = r#"meta[name="minermon:config"]"#;

/// Read the configuration from the document.
pub fn from_document() -> DashboardConfig {
    let content = document()
        .query_selector(SELECTOR)
        .ok()
        .flatten()
        .and_then(|meta| meta.get_attribute("content"));

    let Some(json) = content else {
        tracing::debug!("no config meta tag, using defaults");
        return DashboardConfig::default();
    };

    match DashboardConfig::from_json(&json) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "invalid dashboard config, using defaults");
            DashboardConfig::default()
        }
    }
}
