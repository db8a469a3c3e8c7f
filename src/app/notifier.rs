use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::models::{ExecutionOutcome, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Error,
    Info,
    Success,
}

#[derive(Debug)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub expires_at: Instant,
}

/// Short-lived toasts shown in the bottom-right corner.
#[derive(Debug, Default)]
pub struct Notifier {
    notifications: VecDeque<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>, duration_secs: u64) {
        self.add(message.into(), NotificationKind::Info, duration_secs);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.add(message.into(), NotificationKind::Error, 3);
    }

    /// Toast the verdict of a step execution.
    pub fn outcome(&mut self, step_number: usize, outcome: &ExecutionOutcome) {
        let (kind, word) = match outcome.verdict {
            Verdict::Pass => (NotificationKind::Success, "passed"),
            Verdict::Fail => (NotificationKind::Error, "failed"),
        };
        self.add(
            format!("Step {} {}: {}", step_number, word, outcome.message),
            kind,
            3,
        );
    }

    pub fn recent(&self) -> Option<&Notification> {
        self.notifications.back()
    }

    pub fn prune_expired(&mut self) {
        let now = Instant::now();
        self.notifications.retain(|n| n.expires_at > now);
    }

    fn add(&mut self, message: String, kind: NotificationKind, duration_secs: u64) {
        let expires_at = Instant::now() + Duration::from_secs(duration_secs);
        self.notifications.push_back(Notification {
            message,
            kind,
            expires_at,
        });
    }
}
