// ── Polling coordinator ──
//
// One long-lived refresh loop per configuration entry. Owns the current
// snapshot and last-success flag; deduplicates concurrent refreshes so
// at most one fetch is in flight at any time.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use nobetci_api::{Pharmacy, PharmacyClient, TransportConfig};

use crate::config::EntryConfig;
use crate::error::CoreError;

/// Observable polling state: the current snapshot plus the outcome of
/// the most recent refresh.
#[derive(Debug, Clone)]
pub struct PollState {
    /// Current snapshot, replaced wholesale per successful refresh.
    /// `None` until the first success.
    pub data: Option<Arc<Vec<Pharmacy>>>,
    /// Whether the most recent refresh succeeded.
    pub last_update_success: bool,
    /// Completion time of the most recent successful refresh.
    pub last_refresh: Option<DateTime<Utc>>,
}

impl Default for PollState {
    fn default() -> Self {
        Self {
            data: None,
            last_update_success: true,
            last_refresh: None,
        }
    }
}

/// Polling coordinator for one configured (city, district) target.
///
/// Cheaply cloneable via `Arc` inner; all clones observe the same state.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    entry: EntryConfig,
    client: PharmacyClient,
    state: watch::Sender<PollState>,
    refresh_gate: Mutex<()>,
    generation: AtomicU64,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Coordinator {
    /// Create a coordinator around an existing client. Does NOT fetch --
    /// call [`start()`](Self::start) or [`refresh()`](Self::refresh).
    pub fn new(entry: EntryConfig, client: PharmacyClient) -> Self {
        let (state, _) = watch::channel(PollState::default());

        Self {
            inner: Arc::new(CoordinatorInner {
                entry,
                client,
                state,
                refresh_gate: Mutex::new(()),
                generation: AtomicU64::new(0),
                cancel: CancellationToken::new(),
                task: Mutex::new(None),
            }),
        }
    }

    /// Build the API client from the entry's credential and wrap it.
    pub fn from_entry(entry: EntryConfig) -> Result<Self, CoreError> {
        let client = PharmacyClient::new(&entry.api_key, &TransportConfig::default())?;
        Ok(Self::new(entry, client))
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn entry(&self) -> &EntryConfig {
        &self.inner.entry
    }

    /// Current state snapshot.
    pub fn state(&self) -> PollState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.inner.state.subscribe()
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Refresh now, deduplicated: a caller arriving while a fetch is in
    /// flight awaits that fetch instead of issuing a second request.
    ///
    /// Failures never surface here -- they are absorbed into
    /// `last_update_success` and logged.
    pub async fn refresh(&self) {
        let before = self.inner.generation.load(Ordering::Acquire);
        let _gate = self.inner.refresh_gate.lock().await;
        if self.inner.generation.load(Ordering::Acquire) != before {
            // Another caller completed a refresh while we waited.
            return;
        }

        self.fetch_and_apply().await;
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
    }

    async fn fetch_and_apply(&self) {
        let entry = &self.inner.entry;
        let district = entry.district.as_deref();

        match self.inner.client.fetch(&entry.city, district).await {
            Ok(result) => {
                if result.is_empty() {
                    warn!(
                        city = %entry.city,
                        district = district.unwrap_or("all"),
                        "no pharmacy data found"
                    );
                }
                self.inner.state.send_modify(|state| {
                    state.data = Some(Arc::new(result));
                    state.last_update_success = true;
                    state.last_refresh = Some(Utc::now());
                });
            }
            Err(e) => {
                error!(
                    city = %entry.city,
                    district = district.unwrap_or("all"),
                    error = %e,
                    "refresh failed"
                );
                self.inner
                    .state
                    .send_modify(|state| state.last_update_success = false);
            }
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Perform one immediate refresh, then spawn the fixed-interval loop.
    pub async fn start(&self) {
        self.refresh().await;

        let coordinator = self.clone();
        let cancel = self.inner.cancel.clone();
        let period = self.inner.entry.update_interval;
        let handle = tokio::spawn(refresh_task(coordinator, period, cancel));

        *self.inner.task.lock().await = Some(handle);
        debug!(
            city = %self.inner.entry.city,
            period_secs = self.inner.entry.update_interval.as_secs(),
            "coordinator started"
        );
    }

    /// Cancel the refresh loop and wait for it to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        if let Some(handle) = self.inner.task.lock().await.take() {
            let _ = handle.await;
        }
    }
}

/// Periodically refresh until cancelled.
async fn refresh_task(coordinator: Coordinator, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => coordinator.refresh().await,
        }
    }
}
