// ── Analytics tracker ──
//
// Best-effort event reporting. `track()` never blocks and never fails:
// events go through a bounded channel to a background task, and are
// dropped when the channel is full or the tracker is disabled.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Default channel capacity.
pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    PageView {
        path: String,
    },
    Event {
        action: String,
        category: String,
        label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
    },
}

impl AnalyticsEvent {
    pub fn page_view(path: impl Into<String>) -> Self {
        Self::PageView { path: path.into() }
    }

    pub fn form_submission(form: &str) -> Self {
        Self::engagement("form_submit", format!("{form} form submitted"), None)
    }

    pub fn button_click(button: &str) -> Self {
        Self::engagement("button_click", format!("{button} button clicked"), None)
    }

    pub fn booking_step(step: u8) -> Self {
        Self::Event {
            action: "booking_step".into(),
            category: "booking".into(),
            label: format!("Booking step: {step}"),
            value: None,
        }
    }

    pub fn search(term: &str, results: usize) -> Self {
        Self::engagement(
            "search",
            "Search performed".into(),
            Some(serde_json::json!({ "search_term": term, "results_count": results })),
        )
    }

    fn engagement(action: &str, label: String, value: Option<Value>) -> Self {
        Self::Event {
            action: action.into(),
            category: "engagement".into(),
            label,
            value,
        }
    }
}

/// Delivers events somewhere. Called from the background task only.
pub trait AnalyticsSink: Send + Sync + 'static {
    fn record(&self, event: &AnalyticsEvent);
}

/// Writes events to the `hotelier::analytics` tracing target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn record(&self, event: &AnalyticsEvent) {
        match event {
            AnalyticsEvent::PageView { path } => {
                info!(target: "hotelier::analytics", path, "page view");
            }
            AnalyticsEvent::Event {
                action,
                category,
                label,
                value,
            } => {
                info!(target: "hotelier::analytics", action, category, label, value = ?value, "event");
            }
        }
    }
}

/// Cheap handle for reporting events. Clones share the channel.
#[derive(Clone)]
pub struct Tracker {
    tx: Option<mpsc::Sender<AnalyticsEvent>>,
    dropped: Arc<AtomicU64>,
}

impl Tracker {
    /// A tracker that discards everything.
    pub fn disabled() -> Self {
        Self {
            tx: None,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Start the delivery task. It runs until `cancel` fires or every
    /// tracker handle is dropped.
    pub fn spawn(
        sink: Arc<dyn AnalyticsSink>,
        capacity: usize,
        cancel: CancellationToken,
    ) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    event = rx.recv() => {
                        let Some(event) = event else { break };
                        sink.record(&event);
                    }
                }
            }
            debug!("analytics task stopped");
        });
        (
            Self {
                tx: Some(tx),
                dropped: Arc::new(AtomicU64::new(0)),
            },
            handle,
        )
    }

    pub fn track(&self, event: AnalyticsEvent) {
        let Some(tx) = &self.tx else { return };
        if tx.try_send(event).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Events discarded because the channel was full or closed.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Collecting(Mutex<Vec<AnalyticsEvent>>);

    impl AnalyticsSink for Collecting {
        fn record(&self, event: &AnalyticsEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[tokio::test]
    async fn delivers_in_order() {
        let sink = Arc::new(Collecting::default());
        let cancel = CancellationToken::new();
        let (tracker, handle) = Tracker::spawn(sink.clone(), 8, cancel.clone());

        tracker.track(AnalyticsEvent::page_view("/rooms"));
        tracker.track(AnalyticsEvent::booking_step(2));
        drop(tracker);
        handle.await.unwrap();

        let seen = sink.0.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                AnalyticsEvent::page_view("/rooms"),
                AnalyticsEvent::booking_step(2)
            ]
        );
    }

    #[tokio::test]
    async fn full_channel_drops_instead_of_blocking() {
        let sink = Arc::new(Collecting::default());
        let cancel = CancellationToken::new();
        // Cancel first so nothing drains the channel.
        cancel.cancel();
        let (tracker, handle) = Tracker::spawn(sink, 1, cancel);
        handle.await.unwrap();

        tracker.track(AnalyticsEvent::button_click("Book now"));
        tracker.track(AnalyticsEvent::button_click("Book now"));
        assert_eq!(tracker.dropped(), 2);
    }

    #[test]
    fn disabled_tracker_is_silent() {
        let tracker = Tracker::disabled();
        tracker.track(AnalyticsEvent::search("suite", 3));
        assert_eq!(tracker.dropped(), 0);
    }

    #[test]
    fn search_event_shape() {
        let json = serde_json::to_value(AnalyticsEvent::search("suite", 3)).unwrap();
        assert_eq!(json["type"], "event");
        assert_eq!(json["action"], "search");
        assert_eq!(json["value"]["results_count"], 3);
    }
}
