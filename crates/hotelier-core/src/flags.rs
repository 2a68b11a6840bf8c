// ── Feature flags ──
//
// A lock-free snapshot of named boolean flags. `refresh()` pulls from a
// pluggable source and falls back to the built-in defaults when the
// source fails; `spawn_polling` refreshes on an interval until cancelled.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use indexmap::IndexMap;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::CoreError;

/// Interval between background refreshes.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

pub type FlagMap = IndexMap<String, bool>;

/// Where flag values come from.
pub trait FlagSource: Send + Sync {
    fn fetch(&self) -> BoxFuture<'_, Result<FlagMap, CoreError>>;
}

/// A source that always answers with the defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFlags;

impl FlagSource for DefaultFlags {
    fn fetch(&self) -> BoxFuture<'_, Result<FlagMap, CoreError>> {
        async { Ok(default_flags()) }.boxed()
    }
}

/// Built-in flag set.
pub fn default_flags() -> FlagMap {
    [
        ("darkMode", true),
        ("newNavigation", false),
        ("enhancedSearch", true),
        ("instantBooking", true),
        ("splitStays", false),
        ("longTermStays", true),
        ("applePay", true),
        ("googlePay", true),
        ("cryptoPayments", false),
        ("loyaltyProgram", true),
        ("membershipTiers", false),
        ("virtualTours", false),
        ("arRoomView", false),
        ("whatsappSupport", true),
        ("chatSupport", true),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v))
    .collect()
}

#[derive(Debug, Clone)]
struct Snapshot {
    flags: FlagMap,
    fetched_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct FeatureFlags {
    inner: Arc<FlagsInner>,
}

struct FlagsInner {
    snapshot: ArcSwap<Snapshot>,
    source: Arc<dyn FlagSource>,
}

impl FeatureFlags {
    pub fn new(source: Arc<dyn FlagSource>) -> Self {
        Self {
            inner: Arc::new(FlagsInner {
                snapshot: ArcSwap::from_pointee(Snapshot {
                    flags: default_flags(),
                    fetched_at: None,
                }),
                source,
            }),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(Arc::new(DefaultFlags))
    }

    /// Fetch from the source. Fetched values overlay the defaults; on
    /// failure the defaults are restored and the error is returned.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        match self.inner.source.fetch().await {
            Ok(fetched) => {
                let mut flags = default_flags();
                flags.extend(fetched);
                debug!(count = flags.len(), "feature flags refreshed");
                self.inner.snapshot.store(Arc::new(Snapshot {
                    flags,
                    fetched_at: Some(Utc::now()),
                }));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "feature flag refresh failed; using defaults");
                self.inner.snapshot.store(Arc::new(Snapshot {
                    flags: default_flags(),
                    fetched_at: None,
                }));
                Err(e)
            }
        }
    }

    /// Unknown flags are disabled.
    pub fn is_enabled(&self, key: &str) -> bool {
        self.inner.snapshot.load().flags.get(key).copied().unwrap_or(false)
    }

    pub fn all_enabled(&self, keys: &[&str]) -> bool {
        let snap = self.inner.snapshot.load();
        keys.iter().all(|k| snap.flags.get(*k).copied().unwrap_or(false))
    }

    pub fn any_enabled(&self, keys: &[&str]) -> bool {
        let snap = self.inner.snapshot.load();
        keys.iter().any(|k| snap.flags.get(*k).copied().unwrap_or(false))
    }

    /// Force a value locally until the next refresh.
    pub fn override_flag(&self, key: &str, enabled: bool) {
        self.inner.snapshot.rcu(|current| {
            let mut next = Snapshot::clone(current);
            next.flags.insert(key.to_owned(), enabled);
            next
        });
    }

    pub fn snapshot(&self) -> FlagMap {
        self.inner.snapshot.load().flags.clone()
    }

    pub fn last_fetched(&self) -> Option<DateTime<Utc>> {
        self.inner.snapshot.load().fetched_at
    }

    /// Refresh now, then every `interval` until `cancel` fires.
    pub fn spawn_polling(&self, interval: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        let flags = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        // Failure already restored the defaults.
                        let _ = flags.refresh().await;
                    }
                }
            }
            debug!("feature flag polling stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Scripted {
        calls: AtomicUsize,
        fail: bool,
    }

    impl FlagSource for Scripted {
        fn fetch(&self) -> BoxFuture<'_, Result<FlagMap, CoreError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let fail = self.fail;
            async move {
                if fail {
                    Err(CoreError::Internal("flag service down".into()))
                } else {
                    Ok([("splitStays".to_owned(), true), ("betaCheckout".to_owned(), true)]
                        .into_iter()
                        .collect())
                }
            }
            .boxed()
        }
    }

    fn scripted(fail: bool) -> Arc<Scripted> {
        Arc::new(Scripted {
            calls: AtomicUsize::new(0),
            fail,
        })
    }

    #[test]
    fn defaults_before_first_refresh() {
        let flags = FeatureFlags::with_defaults();
        assert!(flags.is_enabled("instantBooking"));
        assert!(!flags.is_enabled("splitStays"));
        assert!(!flags.is_enabled("noSuchFlag"));
        assert!(flags.all_enabled(&["applePay", "googlePay"]));
        assert!(!flags.all_enabled(&["applePay", "cryptoPayments"]));
        assert!(flags.any_enabled(&["cryptoPayments", "chatSupport"]));
        assert!(flags.last_fetched().is_none());
    }

    #[tokio::test]
    async fn default_source_answers_with_builtin_set() {
        let fetched = DefaultFlags.fetch().await.unwrap();
        assert_eq!(fetched, default_flags());

        let flags = FeatureFlags::new(Arc::new(DefaultFlags));
        flags.refresh().await.unwrap();
        assert_eq!(flags.snapshot(), default_flags());
    }

    #[tokio::test]
    async fn refresh_overlays_fetched_values() {
        let flags = FeatureFlags::new(scripted(false));
        flags.refresh().await.unwrap();
        assert!(flags.is_enabled("splitStays"));
        assert!(flags.is_enabled("betaCheckout"));
        assert!(flags.is_enabled("instantBooking"));
        assert!(flags.last_fetched().is_some());
    }

    #[tokio::test]
    async fn failed_refresh_falls_back_to_defaults() {
        let flags = FeatureFlags::new(scripted(true));
        flags.override_flag("splitStays", true);
        assert!(flags.refresh().await.is_err());
        assert!(!flags.is_enabled("splitStays"));
        assert!(flags.is_enabled("instantBooking"));
    }

    #[tokio::test(start_paused = true)]
    async fn polling_refreshes_until_cancelled() {
        let source = scripted(false);
        let flags = FeatureFlags::new(source.clone());
        let cancel = CancellationToken::new();
        let handle = flags.spawn_polling(REFRESH_INTERVAL, cancel.clone());

        tokio::time::sleep(REFRESH_INTERVAL * 2 + Duration::from_secs(1)).await;
        cancel.cancel();
        handle.await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }
}
