//! Notification queue with timed expiry.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use folio_core::NotificationId;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::AbortHandle;

use crate::types::{Notification, NotificationEvent, NotificationKind, RemovalReason};

/// Default broadcast channel capacity.
const DEFAULT_CAPACITY: usize = 64;

/// Cloneable handle to a shared notification queue.
///
/// Every clone publishes into the same queue. [`publish`](Self::publish)
/// spawns the expiry timer, so it must run inside a Tokio runtime.
#[derive(Clone)]
pub struct Broadcaster {
    inner: Arc<Inner>,
}

struct Inner {
    ttl: Duration,
    state: Mutex<State>,
    tx: broadcast::Sender<NotificationEvent>,
}

#[derive(Default)]
struct State {
    /// Insertion order is display order.
    queue: Vec<Notification>,
    timers: HashMap<NotificationId, AbortHandle>,
}

impl Broadcaster {
    /// Create a broadcaster whose notifications stay visible for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        let (tx, _) = broadcast::channel(DEFAULT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                ttl,
                state: Mutex::new(State::default()),
                tx,
            }),
        }
    }

    /// Visible duration applied to each notification.
    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// Append a notification and schedule its removal.
    pub fn publish(&self, message: impl Into<String>, kind: NotificationKind) -> NotificationId {
        let notification = Notification {
            id: NotificationId::new(),
            message: message.into(),
            kind,
            created_at: Utc::now(),
        };
        let id = notification.id.clone();

        {
            let mut state = self.inner.state.lock();
            state.queue.push(notification.clone());
            let timer = spawn_expiry(Arc::downgrade(&self.inner), id.clone(), self.inner.ttl);
            let _ = state.timers.insert(id.clone(), timer);
        }

        tracing::debug!(id = %id, ?kind, "notification published");
        let _ = self.inner.tx.send(NotificationEvent::Published(notification));
        id
    }

    /// Publish a success notification.
    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.publish(message, NotificationKind::Success)
    }

    /// Publish an error notification.
    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.publish(message, NotificationKind::Error)
    }

    /// Remove a notification before it expires.
    ///
    /// Returns `false` if it was already gone.
    pub fn dismiss(&self, id: &NotificationId) -> bool {
        self.inner.remove(id, RemovalReason::Dismissed)
    }

    /// Dismiss every visible notification.
    pub fn clear(&self) {
        let ids: Vec<NotificationId> = self
            .inner
            .state
            .lock()
            .queue
            .iter()
            .map(|n| n.id.clone())
            .collect();
        for id in ids {
            let _ = self.dismiss(&id);
        }
    }

    /// Snapshot of the queue in display order.
    pub fn visible(&self) -> Vec<Notification> {
        self.inner.state.lock().queue.clone()
    }

    /// Number of visible notifications.
    pub fn len(&self) -> usize {
        self.inner.state.lock().queue.len()
    }

    /// Whether nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribe to queue changes made after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.inner.tx.subscribe()
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new(Duration::from_millis(folio_core::constants::NOTIFICATION_TTL_MS))
    }
}

impl std::fmt::Debug for Broadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster")
            .field("ttl", &self.inner.ttl)
            .field("visible", &self.len())
            .finish()
    }
}

impl Inner {
    fn remove(&self, id: &NotificationId, reason: RemovalReason) -> bool {
        {
            let mut state = self.state.lock();
            let Some(pos) = state.queue.iter().position(|n| &n.id == id) else {
                return false;
            };
            let _ = state.queue.remove(pos);
            if let Some(timer) = state.timers.remove(id) {
                if reason == RemovalReason::Dismissed {
                    timer.abort();
                }
            }
        }

        tracing::debug!(id = %id, ?reason, "notification removed");
        let _ = self.tx.send(NotificationEvent::Removed {
            id: id.clone(),
            reason,
        });
        true
    }
}

/// Spawn the timer that expires `id`. Holds only a weak reference so a
/// dropped broadcaster doesn't outlive its handles.
fn spawn_expiry(inner: Weak<Inner>, id: NotificationId, ttl: Duration) -> AbortHandle {
    tokio::spawn(async move {
        tokio::time::sleep(ttl).await;
        if let Some(inner) = inner.upgrade() {
            let _ = inner.remove(&id, RemovalReason::Expired);
        }
    })
    .abort_handle()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const TTL: Duration = Duration::from_millis(3000);

    #[tokio::test(start_paused = true)]
    async fn publish_appends_in_order() {
        let b = Broadcaster::new(TTL);
        let first = b.success("saved");
        let second = b.error("failed");

        let visible = b.visible();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].id, first);
        assert_eq!(visible[0].kind, NotificationKind::Success);
        assert_eq!(visible[1].id, second);
        assert_eq!(visible[1].message, "failed");
    }

    #[tokio::test(start_paused = true)]
    async fn identical_messages_are_not_deduplicated() {
        let b = Broadcaster::new(TTL);
        let a = b.error("same");
        let c = b.error("same");
        assert_ne!(a, c);
        assert_eq!(b.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn still_visible_just_before_ttl() {
        let b = Broadcaster::new(TTL);
        let _ = b.success("hello");
        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(b.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expires_after_ttl() {
        let b = Broadcaster::new(TTL);
        let _ = b.success("hello");
        tokio::time::sleep(Duration::from_millis(3001)).await;
        assert!(b.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn staggered_notifications_expire_independently() {
        let b = Broadcaster::new(TTL);
        let _first = b.success("first");
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let second = b.success("second");

        tokio::time::sleep(Duration::from_millis(2001)).await;
        let visible = b.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, second);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(b.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_is_idempotent() {
        let b = Broadcaster::new(TTL);
        let id = b.error("oops");
        assert!(b.dismiss(&id));
        assert!(!b.dismiss(&id));
        assert!(b.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_one_keeps_the_other() {
        let b = Broadcaster::new(TTL);
        let first = b.success("first");
        let second = b.success("second");
        assert!(b.dismiss(&first));

        let visible = b.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, second);

        tokio::time::sleep(Duration::from_millis(3001)).await;
        assert!(b.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn subscriber_sees_publish_then_expiry() {
        let b = Broadcaster::new(TTL);
        let mut rx = b.subscribe();
        let id = b.success("hello");

        assert_matches!(rx.recv().await.unwrap(), NotificationEvent::Published(n) if n.id == id);
        assert_matches!(
            rx.recv().await.unwrap(),
            NotificationEvent::Removed { id: removed, reason: RemovalReason::Expired } if removed == id
        );
    }

    #[tokio::test(start_paused = true)]
    async fn dismissed_notification_does_not_expire_again() {
        let b = Broadcaster::new(TTL);
        let mut rx = b.subscribe();
        let id = b.success("hello");
        let _ = b.dismiss(&id);

        assert_matches!(rx.recv().await.unwrap(), NotificationEvent::Published(_));
        assert_matches!(
            rx.recv().await.unwrap(),
            NotificationEvent::Removed { reason: RemovalReason::Dismissed, .. }
        );

        tokio::time::sleep(Duration::from_millis(3001)).await;
        assert_matches!(rx.try_recv(), Err(broadcast::error::TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn clones_share_one_queue() {
        let b = Broadcaster::new(TTL);
        let other = b.clone();
        let _ = other.error("from clone");
        assert_eq!(b.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_removes_everything() {
        let b = Broadcaster::new(TTL);
        let _ = b.success("a");
        let _ = b.error("b");
        b.clear();
        assert!(b.is_empty());
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_fine() {
        let b = Broadcaster::default();
        assert_eq!(b.ttl(), Duration::from_millis(3000));
        let _ = b.success("nobody listening");
        assert_eq!(b.len(), 1);
    }
}
