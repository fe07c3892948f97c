use std::collections::HashMap;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use super::timer::{Scheduler, TimerHandle};
use super::{lock, NewNotification, Notification, NotificationEvent, NotificationId, NotificationKind, DEFAULT_DURATION};
use crate::observer::Subscribers;

struct State {
    notifications: Vec<Notification>,
    timers: HashMap<NotificationId, TimerHandle>,
    next_id: u64,
    subscribers: Subscribers<NotificationEvent>,
}

struct Inner {
    state: Mutex<State>,
    scheduler: Arc<dyn Scheduler>,
    default_duration: Duration,
}

/// Ordered collection of visible notifications with timed auto-expiry.
///
/// Cloning yields another handle to the same collection. Expiry timers hold
/// only a weak reference, so dropping every handle neuters them.
#[derive(Clone)]
pub struct NotificationManager {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for NotificationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.inner.state);
        f.debug_struct("NotificationManager")
            .field("notifications", &state.notifications.len())
            .field("pending_timers", &state.timers.len())
            .field("default_duration", &self.inner.default_duration)
            .finish()
    }
}

impl NotificationManager {
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self::with_default_duration(scheduler, DEFAULT_DURATION)
    }

    pub fn with_default_duration(scheduler: Arc<dyn Scheduler>, default_duration: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    notifications: Vec::new(),
                    timers: HashMap::new(),
                    next_id: 0,
                    subscribers: Subscribers::new(),
                }),
                scheduler,
                default_duration,
            }),
        }
    }

    pub fn default_duration(&self) -> Duration {
        self.inner.default_duration
    }

    pub fn subscribe(&self) -> Receiver<NotificationEvent> {
        lock(&self.inner.state).subscribers.subscribe()
    }

    /// Append a notification and arm its expiry timer unless the duration
    /// is zero. Returns without waiting on the timer.
    pub fn add(&self, request: NewNotification) -> NotificationId {
        let duration = request.duration.unwrap_or(self.inner.default_duration);
        let mut state = lock(&self.inner.state);

        state.next_id += 1;
        let id = NotificationId::new(state.next_id);
        let notification = Notification {
            id,
            kind: request.kind,
            title: request.title,
            message: request.message,
            duration,
            created_at: Utc::now(),
        };

        if !duration.is_zero() {
            let weak = Arc::downgrade(&self.inner);
            let handle = self
                .inner
                .scheduler
                .schedule(duration, Box::new(move || Self::expire(&weak, id)));
            state.timers.insert(id, handle);
        }

        debug!(%id, kind = %notification.kind, ?duration, "notification added");
        state.notifications.push(notification.clone());
        state.subscribers.publish(NotificationEvent::Added(notification));
        id
    }

    fn expire(weak: &Weak<Inner>, id: NotificationId) {
        if let Some(inner) = weak.upgrade() {
            let manager = NotificationManager { inner };
            lock(&manager.inner.state).timers.remove(&id);
            manager.remove(id);
        }
    }

    /// Remove a notification; unknown ids are ignored
    pub fn remove(&self, id: NotificationId) {
        let mut state = lock(&self.inner.state);
        if let Some(index) = state.notifications.iter().position(|n| n.id == id) {
            state.notifications.remove(index);
            debug!(%id, "notification removed");
            state.subscribers.publish(NotificationEvent::Removed(id));
        }
    }

    /// Empty the collection. Pending timers stay armed and later no-op.
    pub fn clear_all(&self) {
        let mut state = lock(&self.inner.state);
        state.notifications.clear();
        state.subscribers.publish(NotificationEvent::Cleared);
    }

    /// Disarm a notification's expiry timer so it stays until removed.
    ///
    /// Returns false when no timer was pending for `id`.
    pub fn cancel_expiry(&self, id: NotificationId) -> bool {
        let handle = lock(&self.inner.state).timers.remove(&id);
        handle.is_some_and(|handle| self.inner.scheduler.cancel(handle))
    }

    pub fn success(&self, message: impl Into<String>, title: Option<&str>, duration: Option<Duration>) -> NotificationId {
        self.produce(NotificationKind::Success, message.into(), title, duration)
    }

    pub fn error(&self, message: impl Into<String>, title: Option<&str>, duration: Option<Duration>) -> NotificationId {
        self.produce(NotificationKind::Error, message.into(), title, duration)
    }

    pub fn warning(&self, message: impl Into<String>, title: Option<&str>, duration: Option<Duration>) -> NotificationId {
        self.produce(NotificationKind::Warning, message.into(), title, duration)
    }

    pub fn info(&self, message: impl Into<String>, title: Option<&str>, duration: Option<Duration>) -> NotificationId {
        self.produce(NotificationKind::Info, message.into(), title, duration)
    }

    fn produce(&self, kind: NotificationKind, message: String, title: Option<&str>, duration: Option<Duration>) -> NotificationId {
        self.add(NewNotification {
            kind,
            message,
            title: title.map(str::to_string),
            duration,
        })
    }

    /// Snapshot in display order
    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.inner.state).notifications.clone()
    }

    pub fn get(&self, id: NotificationId) -> Option<Notification> {
        lock(&self.inner.state).notifications.iter().find(|n| n.id == id).cloned()
    }

    pub fn contains(&self, id: NotificationId) -> bool {
        lock(&self.inner.state).notifications.iter().any(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        lock(&self.inner.state).notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Expiry timers that have not fired or been cancelled
    pub fn pending_timers(&self) -> usize {
        lock(&self.inner.state).timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{ManualScheduler, TokioScheduler};

    fn manual() -> (Arc<ManualScheduler>, NotificationManager) {
        let scheduler = Arc::new(ManualScheduler::new());
        let manager = NotificationManager::new(scheduler.clone());
        (scheduler, manager)
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_zero_duration_is_never_removed() {
        let (scheduler, manager) = manual();
        let id = manager.add(NewNotification::new(NotificationKind::Success, "ok").duration(Duration::ZERO));

        assert_eq!(scheduler.pending(), 0);
        scheduler.advance(Duration::from_secs(3600));
        assert!(manager.contains(id));
        assert!(manager.get(id).unwrap().is_persistent());
    }

    #[test]
    fn test_expires_after_duration() {
        let (scheduler, manager) = manual();
        let id = manager.add(NewNotification::new(NotificationKind::Info, "x").duration(ms(100)));

        scheduler.advance(ms(99));
        assert!(manager.contains(id));

        scheduler.advance(ms(51));
        assert!(!manager.contains(id));
        assert_eq!(manager.pending_timers(), 0);
    }

    #[test]
    fn test_default_duration() {
        let (scheduler, manager) = manual();
        let id = manager.info("hello", None, None);
        assert_eq!(manager.get(id).unwrap().duration, DEFAULT_DURATION);

        scheduler.advance(ms(4999));
        assert!(manager.contains(id));
        scheduler.advance(ms(1));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_ids_are_distinct_and_ordered() {
        let (_scheduler, manager) = manual();
        let first = manager.success("a", None, None);
        let second = manager.error("b", Some("Oops"), None);
        let third = manager.warning("c", None, None);

        assert!(first < second && second < third);
        let listed: Vec<NotificationId> = manager.notifications().iter().map(|n| n.id).collect();
        assert_eq!(listed, vec![first, second, third]);

        let second = manager.get(second).unwrap();
        assert_eq!(second.kind, NotificationKind::Error);
        assert_eq!(second.title.as_deref(), Some("Oops"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (scheduler, manager) = manual();
        let id = manager.info("a", None, Some(ms(100)));
        manager.info("b", None, Some(Duration::ZERO));

        manager.remove(id);
        assert_eq!(manager.len(), 1);
        manager.remove(id);
        assert_eq!(manager.len(), 1);

        // The late timer for the removed id is harmless
        assert_eq!(scheduler.advance(ms(200)), 1);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_clear_all_leaves_timers_that_noop() {
        let (scheduler, manager) = manual();
        manager.info("a", None, Some(ms(100)));
        manager.info("b", None, Some(ms(200)));

        manager.clear_all();
        assert!(manager.is_empty());
        assert_eq!(manager.pending_timers(), 2);

        let late = manager.info("c", None, Some(ms(500)));
        assert_eq!(scheduler.advance(ms(250)), 2);
        assert_eq!(manager.pending_timers(), 1);
        assert!(manager.contains(late));
    }

    #[test]
    fn test_shorter_duration_expires_first() {
        let (scheduler, manager) = manual();
        let slow = manager.info("slow", None, Some(ms(300)));
        let fast = manager.info("fast", None, Some(ms(100)));

        scheduler.advance(ms(150));
        assert!(manager.contains(slow));
        assert!(!manager.contains(fast));
    }

    #[test]
    fn test_cancel_expiry_keeps_notification() {
        let (scheduler, manager) = manual();
        let id = manager.info("pinned", None, Some(ms(100)));

        assert!(manager.cancel_expiry(id));
        assert!(!manager.cancel_expiry(id));
        assert_eq!(scheduler.pending(), 0);

        scheduler.advance(ms(1000));
        assert!(manager.contains(id));
    }

    #[test]
    fn test_events_are_published() {
        let (scheduler, manager) = manual();
        let events = manager.subscribe();

        let id = manager.info("a", None, Some(ms(10)));
        scheduler.advance(ms(10));
        manager.clear_all();

        let received: Vec<NotificationEvent> = events.try_iter().collect();
        assert_eq!(received.len(), 3);
        assert!(matches!(&received[0], NotificationEvent::Added(n) if n.id == id));
        assert_eq!(received[1], NotificationEvent::Removed(id));
        assert_eq!(received[2], NotificationEvent::Cleared);
    }

    #[test]
    fn test_dropped_manager_neuters_timers() {
        let scheduler = Arc::new(ManualScheduler::new());
        let manager = NotificationManager::new(scheduler.clone());
        manager.info("a", None, Some(ms(10)));
        drop(manager);

        assert_eq!(scheduler.advance(ms(10)), 1);
    }

    #[tokio::test]
    async fn test_tokio_expiry() {
        let scheduler = Arc::new(TokioScheduler::new().unwrap());
        let manager = NotificationManager::new(scheduler);

        let expiring = manager.info("short", None, Some(ms(20)));
        let sticky = manager.success("stays", None, Some(Duration::ZERO));
        assert_eq!(manager.len(), 2);

        tokio::time::sleep(ms(200)).await;

        assert!(!manager.contains(expiring));
        assert!(manager.contains(sticky));
    }
}
