//! Transient notifications.

use std::time::{Duration, Instant};

pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    Success,
    Error,
    #[default]
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    shown_at: Instant,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= TOAST_DURATION
    }
}

/// Holds at most one toast; a new one replaces the previous.
#[derive(Debug, Clone, Default)]
pub struct ToastSlot {
    current: Option<Toast>,
}

impl ToastSlot {
    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) {
        self.current = Some(Toast {
            message: message.into(),
            kind,
            shown_at: now,
        });
    }

    /// The toast still on screen at `now`.
    pub fn visible(&self, now: Instant) -> Option<&Toast> {
        self.current.as_ref().filter(|t| !t.is_expired(now))
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Drops an expired toast. Returns true if one was dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        if self.current.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.current = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_expires_after_three_seconds() {
        let start = Instant::now();
        let mut slot = ToastSlot::default();
        slot.show("New OTP sent to your email", ToastKind::Success, start);

        let shown = slot.visible(start + Duration::from_millis(2999)).unwrap();
        assert_eq!(shown.kind, ToastKind::Success);

        assert!(slot.visible(start + TOAST_DURATION).is_none());
        assert!(slot.expire(start + TOAST_DURATION));
        assert!(!slot.expire(start + TOAST_DURATION));
    }

    #[test]
    fn test_new_toast_replaces_old() {
        let start = Instant::now();
        let mut slot = ToastSlot::default();
        slot.show("first", ToastKind::Info, start);
        slot.show("second", ToastKind::Error, start + Duration::from_secs(2));

        let shown = slot.visible(start + Duration::from_secs(4)).unwrap();
        assert_eq!(shown.message, "second");
    }
}
