// ── Notification center ──
//
// Transient, dismissible messages for the view layer. Each notification
// gets a UUID; non-zero durations schedule an auto-dismiss on the tokio
// runtime. Subscribers see the ordered list through a watch channel.

use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use indexmap::IndexMap;
use serde::Serialize;
use strum::Display;
use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

/// Auto-dismiss delay used by the convenience constructors.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    /// Zero means the notification stays until dismissed.
    pub duration_ms: u64,
}

/// Shared handle to the notification list. Clones share state.
#[derive(Clone)]
pub struct Notifications {
    inner: Arc<NotifyInner>,
}

struct NotifyInner {
    items: Mutex<IndexMap<Uuid, Notification>>,
    tx: watch::Sender<Vec<Notification>>,
}

impl NotifyInner {
    fn publish(&self, items: &IndexMap<Uuid, Notification>) {
        self.tx.send_replace(items.values().cloned().collect());
    }

    fn dismiss(&self, id: Uuid) -> bool {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        let removed = items.shift_remove(&id).is_some();
        if removed {
            self.publish(&items);
        }
        removed
    }
}

impl Notifications {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(NotifyInner {
                items: Mutex::new(IndexMap::new()),
                tx,
            }),
        }
    }

    /// Show a notification and return its id.
    pub fn notify(
        &self,
        kind: NotificationKind,
        message: impl Into<String>,
        duration: Duration,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let notification = Notification {
            id,
            kind,
            message: message.into(),
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        };
        debug!(%id, %kind, message = %notification.message, "notification");

        {
            let mut items = self.inner.items.lock().unwrap_or_else(PoisonError::into_inner);
            items.insert(id, notification);
            self.inner.publish(&items);
        }

        if !duration.is_zero() {
            self.schedule_dismiss(id, duration);
        }
        id
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.notify(NotificationKind::Success, message, DEFAULT_DURATION)
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.notify(NotificationKind::Error, message, DEFAULT_DURATION)
    }

    pub fn warning(&self, message: impl Into<String>) -> Uuid {
        self.notify(NotificationKind::Warning, message, DEFAULT_DURATION)
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.notify(NotificationKind::Info, message, DEFAULT_DURATION)
    }

    /// Remove one notification. Returns `false` if it was already gone.
    pub fn dismiss(&self, id: Uuid) -> bool {
        self.inner.dismiss(id)
    }

    pub fn clear_all(&self) {
        let mut items = self.inner.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.clear();
        self.inner.publish(&items);
    }

    /// Current notifications, oldest first.
    pub fn list(&self) -> Vec<Notification> {
        self.inner.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.inner.tx.subscribe()
    }

    fn schedule_dismiss(&self, id: Uuid, after: Duration) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(%id, "no tokio runtime; notification will not auto-dismiss");
            return;
        };
        let weak: Weak<NotifyInner> = Arc::downgrade(&self.inner);
        handle.spawn(async move {
            tokio::time::sleep(after).await;
            if let Some(inner) = weak.upgrade() {
                inner.dismiss(id);
            }
        });
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}
