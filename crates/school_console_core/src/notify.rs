//! crates/school_console_core/src/notify.rs
//!
//! The Notification Channel: one transient message slot with auto-dismiss.
//! A new notice replaces whatever is showing (last wins, no backlog). Every
//! mutating operation notifies exactly once per outcome; keeping the slot
//! this small is what makes that contract auditable.

use chrono::{DateTime, Duration, Utc};

/// How long a notice stays visible.
const AUTO_DISMISS_SECONDS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
    expires_at: DateTime<Utc>,
}

/// Queue-of-one for transient success/error messages.
#[derive(Debug, Default)]
pub struct Notifier {
    current: Option<Notice>,
}

impl Notifier {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Enqueue a message, replacing any notice currently showing.
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity, now: DateTime<Utc>) {
        self.current = Some(Notice {
            message: message.into(),
            severity,
            expires_at: now + Duration::seconds(AUTO_DISMISS_SECONDS),
        });
    }

    pub fn success(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.notify(message, Severity::Success, now);
    }

    pub fn error(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.notify(message, Severity::Error, now);
    }

    /// The notice to show at `now`, if any; an expired notice is dropped.
    pub fn current(&mut self, now: DateTime<Utc>) -> Option<&Notice> {
        if let Some(notice) = &self.current {
            if notice.expires_at <= now {
                self.current = None;
            }
        }
        self.current.as_ref()
    }

    /// Explicit dismissal (the close button).
    pub fn dismiss(&mut self) {
        self.current = None;
    }
}
