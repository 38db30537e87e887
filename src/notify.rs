//! Toast queue and busy overlay state.

use std::time::{Duration, Instant};

use crate::api::types::Severity;

/// A transient message on screen.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub created_at: Instant,
    pub duration: Duration,
    /// Slide-in progress (0.0 → 1.0).
    pub slide: f32,
}

impl Notification {
    pub fn expires_at(&self) -> Instant {
        self.created_at + self.duration
    }
}

/// Ordered list of visible toasts. Identical messages are not merged.
///
/// One toast is selected at a time for the close key. With no explicit
/// selection (or once the selected toast is gone) the newest one is.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    items: Vec<Notification>,
    next_id: u64,
    selected: Option<u64>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a toast and return its id.
    pub fn show(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        duration: Duration,
        now: Instant,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Notification {
            id,
            message: message.into(),
            severity,
            created_at: now,
            duration,
            slide: 0.0,
        });
        id
    }

    /// Remove a toast. Returns `false` if it was already gone.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// The toast the close key acts on.
    pub fn selected(&self) -> Option<&Notification> {
        self.selected
            .and_then(|id| self.items.iter().find(|n| n.id == id))
            .or_else(|| self.items.last())
    }

    pub fn select(&mut self, id: u64) -> bool {
        if self.items.iter().any(|n| n.id == id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    /// Move the selection one toast down the stack (towards older ones),
    /// wrapping back to the newest.
    pub fn select_next(&mut self) {
        let Some(current) = self.selected().map(|n| n.id) else {
            return;
        };
        let pos = self.items.iter().position(|n| n.id == current).unwrap_or(0);
        let next = if pos == 0 { self.items.len() - 1 } else { pos - 1 };
        self.selected = Some(self.items[next].id);
    }

    /// Close the selected toast and select its older neighbour.
    pub fn dismiss_selected(&mut self) -> bool {
        let Some(id) = self.selected().map(|n| n.id) else {
            return false;
        };
        let pos = self.items.iter().position(|n| n.id == id).unwrap_or(0);
        let removed = self.dismiss(id);
        self.selected = pos.checked_sub(1).map(|older| self.items[older].id);
        removed
    }

    /// Drop every toast whose time is up.
    pub fn prune_expired(&mut self, now: Instant) {
        self.items.retain(|n| n.expires_at() > now);
    }

    /// Advance slide-in animations.
    pub fn animate(&mut self, step: f32) {
        for n in &mut self.items {
            if n.slide < 1.0 {
                n.slide = (n.slide + step).min(1.0);
            }
        }
    }

    /// Most recent visible toast of the given severity.
    pub fn latest(&self, severity: Severity) -> Option<&Notification> {
        self.items.iter().rev().find(|n| n.severity == severity)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Full-screen "please wait" overlay shown while a vote is in flight.
#[derive(Debug, Default)]
pub struct BusyIndicator {
    message: Option<String>,
}

impl BusyIndicator {
    pub fn show(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn hide(&mut self) {
        self.message = None;
    }

    pub fn is_visible(&self) -> bool {
        self.message.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SECS_3: Duration = Duration::from_secs(3);

    #[test]
    fn repeated_messages_each_get_an_entry() {
        let now = Instant::now();
        let mut q = NotificationQueue::new();
        q.show("Thanks!", Severity::Success, SECS_3, now);
        q.show("Thanks!", Severity::Success, SECS_3, now);
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn dismiss_is_idempotent() {
        let now = Instant::now();
        let mut q = NotificationQueue::new();
        let id = q.show("bye", Severity::Info, SECS_3, now);
        assert!(q.dismiss(id));
        assert!(!q.dismiss(id));
        assert!(q.is_empty());
    }

    #[test]
    fn expired_toasts_are_pruned() {
        let now = Instant::now();
        let mut q = NotificationQueue::new();
        q.show("short", Severity::Info, Duration::from_millis(1500), now);
        q.show("long", Severity::Error, SECS_3, now);

        q.prune_expired(now + Duration::from_secs(2));
        let left: Vec<_> = q.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(left, vec!["long"]);

        q.prune_expired(now + SECS_3);
        assert!(q.is_empty());
    }

    #[test]
    fn latest_finds_most_recent_of_severity() {
        let now = Instant::now();
        let mut q = NotificationQueue::new();
        q.show("first", Severity::Success, SECS_3, now);
        q.show("oops", Severity::Error, SECS_3, now);
        q.show("second", Severity::Success, SECS_3, now);

        assert_eq!(q.latest(Severity::Success).map(|n| n.message.as_str()), Some("second"));
        assert_eq!(q.latest(Severity::Warning).map(|n| n.id), None);
    }

    #[test]
    fn selection_defaults_to_newest() {
        let now = Instant::now();
        let mut q = NotificationQueue::new();
        assert!(q.selected().is_none());
        q.show("a", Severity::Info, SECS_3, now);
        let b = q.show("b", Severity::Info, SECS_3, now);
        assert_eq!(q.selected().map(|n| n.id), Some(b));
    }

    #[test]
    fn middle_toast_closes_on_its_own() {
        let now = Instant::now();
        let mut q = NotificationQueue::new();
        q.show("oldest", Severity::Info, SECS_3, now);
        let middle = q.show("middle", Severity::Error, SECS_3, now);
        q.show("newest", Severity::Success, SECS_3, now);

        q.select_next();
        assert_eq!(q.selected().map(|n| n.id), Some(middle));
        assert!(q.dismiss_selected());

        let left: Vec<_> = q.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(left, vec!["oldest", "newest"]);
        assert_eq!(q.selected().map(|n| n.message.as_str()), Some("oldest"));
    }

    #[test]
    fn select_next_wraps_to_newest() {
        let now = Instant::now();
        let mut q = NotificationQueue::new();
        let oldest = q.show("oldest", Severity::Info, SECS_3, now);
        let newest = q.show("newest", Severity::Info, SECS_3, now);

        q.select_next();
        assert_eq!(q.selected().map(|n| n.id), Some(oldest));
        q.select_next();
        assert_eq!(q.selected().map(|n| n.id), Some(newest));
    }

    #[test]
    fn expired_selection_falls_back_to_newest() {
        let now = Instant::now();
        let mut q = NotificationQueue::new();
        let short = q.show("short", Severity::Info, Duration::from_millis(500), now);
        let long = q.show("long", Severity::Info, SECS_3, now);
        assert!(q.select(short));

        q.prune_expired(now + Duration::from_secs(1));
        assert_eq!(q.selected().map(|n| n.id), Some(long));
        assert!(!q.select(short));
    }

    #[test]
    fn slide_saturates_at_one() {
        let mut q = NotificationQueue::new();
        q.show("x", Severity::Info, SECS_3, Instant::now());
        for _ in 0..20 {
            q.animate(0.08);
        }
        assert_eq!(q.iter().next().map(|n| n.slide), Some(1.0));
    }

    #[test]
    fn busy_indicator_toggles() {
        let mut busy = BusyIndicator::default();
        busy.show("Sending vote…");
        assert_eq!(busy.message(), Some("Sending vote…"));
        busy.hide();
        assert!(!busy.is_visible());
    }
}
