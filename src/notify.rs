//! Player-facing notifications
//!
//! The simulation reports noteworthy moments (pickups, unlocks, shield use)
//! through a `NotificationSink`. Hosts either pass a closure or keep a
//! `NotificationLog` and draw its contents.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// How loudly a notification should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Danger,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }
}

/// A single message with its severity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

/// Receiver for notifications
pub trait NotificationSink {
    fn notify(&mut self, message: &str, severity: Severity);
}

impl<F> NotificationSink for F
where
    F: FnMut(&str, Severity),
{
    fn notify(&mut self, message: &str, severity: Severity) {
        self(message, severity)
    }
}

/// Maximum notifications kept on screen at once
pub const MAX_VISIBLE_NOTIFICATIONS: usize = 3;

/// Bounded queue of the most recent notifications (oldest dropped first)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationLog {
    entries: VecDeque<Notification>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visible notifications, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent notification
    pub fn latest(&self) -> Option<&Notification> {
        self.entries.back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl NotificationSink for NotificationLog {
    fn notify(&mut self, message: &str, severity: Severity) {
        self.entries.push_back(Notification {
            message: message.to_string(),
            severity,
        });
        while self.entries.len() > MAX_VISIBLE_NOTIFICATIONS {
            self.entries.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_keeps_three_most_recent() {
        let mut log = NotificationLog::new();
        for i in 0..5 {
            log.notify(&format!("msg {i}"), Severity::Info);
        }
        assert_eq!(log.len(), 3);
        let messages: Vec<_> = log.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["msg 2", "msg 3", "msg 4"]);
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |msg: &str, sev: Severity| seen.push((msg.to_string(), sev));
            sink.notify("hello", Severity::Danger);
        }
        assert_eq!(seen, vec![("hello".to_string(), Severity::Danger)]);
    }
}
