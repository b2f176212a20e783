//! Notifier port: transient user-facing messages (toasts).

use std::fmt;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Danger,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        })
    }
}

/// Shows notices to the user.
pub trait Notifier: Clone + 'static {
    fn notify(&self, level: NoticeLevel, message: String);

    fn success(&self, message: impl Into<String>) {
        self.notify(NoticeLevel::Success, message.into());
    }

    fn warning(&self, message: impl Into<String>) {
        self.notify(NoticeLevel::Warning, message.into());
    }

    fn danger(&self, message: impl Into<String>) {
        self.notify(NoticeLevel::Danger, message.into());
    }
}
