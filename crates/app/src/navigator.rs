//! Page router.
//!
//! The [`Navigator`] holds the current page and guarantees that the outgoing
//! page is destroyed before the incoming one is built and rendered, so two
//! pages never poll at the same time.

use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;

use futures_util::future::LocalBoxFuture;

/// Every page of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageName {
    Dashboard,
    Sensors,
    Relays,
    Settings,
    System,
}

impl PageName {
    /// Navigation order.
    pub const ALL: [Self; 5] = [
        Self::Dashboard,
        Self::Sensors,
        Self::Relays,
        Self::Settings,
        Self::System,
    ];

    /// Route segment, also used as the URL hash.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Sensors => "sensors",
            Self::Relays => "relays",
            Self::Settings => "settings",
            Self::System => "system",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Sensors => "Sensors",
            Self::Relays => "Relays",
            Self::Settings => "Settings",
            Self::System => "System",
        }
    }

    /// Parse a location hash (`"#relays"`, `"relays"`). An empty hash is the
    /// dashboard.
    ///
    /// # Errors
    ///
    /// Returns the unknown segment.
    pub fn from_hash(hash: &str) -> Result<Self, UnknownPage> {
        let segment = hash.trim_start_matches('#').trim_start_matches('/');
        if segment.is_empty() {
            Ok(Self::Dashboard)
        } else {
            segment.parse()
        }
    }
}

impl fmt::Display for PageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A route that matches no page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("page not found: {0}")]
pub struct UnknownPage(pub String);

impl FromStr for PageName {
    type Err = UnknownPage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPage(s.to_string()))
    }
}

/// Something the navigator can activate and tear down.
pub trait Lifecycle {
    fn name(&self) -> PageName;

    /// Render synchronously; the returned future loads data and arms polling.
    fn mount(&self) -> LocalBoxFuture<'static, ()>;

    /// Stop all polling. Idempotent.
    fn destroy(&self);
}

/// Builds a fresh page for each visit.
pub trait PageFactory {
    type Screen: Lifecycle + Clone;

    fn build(&self, name: PageName) -> Self::Screen;
}

/// Owns the current page.
pub struct Navigator<F: PageFactory> {
    factory: F,
    current: RefCell<Option<F::Screen>>,
}

impl<F: PageFactory> Navigator<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            current: RefCell::new(None),
        }
    }

    /// Name of the current page, if any.
    #[must_use]
    pub fn current_name(&self) -> Option<PageName> {
        self.current.borrow().as_ref().map(Lifecycle::name)
    }

    #[must_use]
    pub fn current(&self) -> Option<F::Screen> {
        self.current.borrow().clone()
    }

    /// Switch to `name`.
    ///
    /// Returns `None` when `name` is already current (nothing happens).
    /// Otherwise the outgoing page is destroyed, the new page is built and
    /// rendered, and its loading future is returned for the caller to spawn.
    pub fn navigate(&self, name: PageName) -> Option<LocalBoxFuture<'static, ()>> {
        if self.current_name() == Some(name) {
            tracing::trace!(page = %name, "already on page");
            return None;
        }
        Some(self.activate(name))
    }

    /// Destroy and re-create the current page. `None` when there is none.
    pub fn reload(&self) -> Option<LocalBoxFuture<'static, ()>> {
        let name = self.current_name()?;
        Some(self.activate(name))
    }

    /// Destroy the current page and leave none active.
    pub fn clear(&self) {
        if let Some(previous) = self.current.borrow_mut().take() {
            previous.destroy();
        }
    }

    fn activate(&self, name: PageName) -> LocalBoxFuture<'static, ()> {
        self.clear();
        tracing::info!(page = %name, "navigating");
        let screen = self.factory.build(name);
        let loading = screen.mount();
        *self.current.borrow_mut() = Some(screen);
        loading
    }
}
