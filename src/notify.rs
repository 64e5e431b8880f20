//! Transient toast notifications

use std::time::{Duration, Instant};

use crate::constants::notifications;
use crate::tasks::Timers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub notice: Notification,
}

/// Visible toasts, each dismissed by its own timer
#[derive(Default)]
pub struct Toasts {
    next_id: u64,
    visible: Vec<Toast>,
    dismissals: Timers<u64>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notification, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        if self.visible.len() >= notifications::MAX_VISIBLE {
            let oldest = self.visible.remove(0).id;
            self.dismissals.cancel_where(|toast_id| *toast_id == oldest);
        }
        self.visible.push(Toast { id, notice });
        self.dismissals
            .schedule(now, Duration::from_millis(notifications::TOAST_DURATION_MS), id);
        id
    }

    pub fn success(&mut self, message: impl Into<String>, now: Instant) -> u64 {
        self.push(Notification::success(message), now)
    }

    pub fn error(&mut self, message: impl Into<String>, now: Instant) -> u64 {
        self.push(Notification::error(message), now)
    }

    /// Drop the toasts whose timers expired
    pub fn poll(&mut self, now: Instant) {
        for id in self.dismissals.poll(now) {
            self.visible.retain(|toast| toast.id != id);
        }
    }

    pub fn visible(&self) -> &[Toast] {
        &self.visible
    }

    #[cfg(test)]
    pub fn count(&self, level: NoticeLevel) -> usize {
        self.visible.iter().filter(|t| t.notice.level == level).count()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.dismissals.next_deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_expires_after_duration() {
        let start = Instant::now();
        let mut toasts = Toasts::new();
        toasts.success("Guardado", start);

        toasts.poll(start + Duration::from_millis(notifications::TOAST_DURATION_MS - 1));
        assert_eq!(toasts.visible().len(), 1);

        toasts.poll(start + Duration::from_millis(notifications::TOAST_DURATION_MS));
        assert!(toasts.visible().is_empty());
    }

    #[test]
    fn test_each_toast_has_its_own_timer() {
        let start = Instant::now();
        let mut toasts = Toasts::new();
        toasts.success("first", start);
        toasts.error("second", start + Duration::from_millis(1_000));

        toasts.poll(start + Duration::from_millis(notifications::TOAST_DURATION_MS));
        assert_eq!(toasts.visible().len(), 1);
        assert_eq!(toasts.visible()[0].notice.message, "second");
        assert_eq!(toasts.count(NoticeLevel::Error), 1);
    }

    #[test]
    fn test_oldest_dropped_when_full() {
        let now = Instant::now();
        let mut toasts = Toasts::new();
        for i in 0..notifications::MAX_VISIBLE + 1 {
            toasts.success(format!("toast {i}"), now);
        }
        assert_eq!(toasts.visible().len(), notifications::MAX_VISIBLE);
        assert_eq!(toasts.visible()[0].notice.message, "toast 1");
    }

    #[test]
    fn test_dropped_toast_cancels_its_timer() {
        let now = Instant::now();
        let mut toasts = Toasts::new();
        toasts.success("first", now);
        for i in 0..notifications::MAX_VISIBLE {
            toasts.success(format!("later {i}"), now + Duration::from_millis(500));
        }
        // Only the timers of the visible toasts remain
        assert_eq!(toasts.next_deadline(), Some(now + Duration::from_millis(500 + notifications::TOAST_DURATION_MS)));
    }
}
