//! Teacher-side scanning session.
//!
//! A [`ScanSession`] owns the roster and the repeating discovery cadence
//! for one class sitting. The session is an explicit context object: all
//! state lives here, scoped to the session's lifetime, and is dropped with
//! it.
//!
//! The session has two states, Idle and Scanning. While Scanning, a cadence
//! task fires one discovery cycle per interval tick; cycles run as their own
//! tasks, so a slow interaction does not delay the next tick. Stopping is
//! cooperative: it prevents further ticks but lets an in-flight interaction
//! resolve, discarding its result.

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::Mutex;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use rollcall_types::{RollNumber, RosterEntry, matcher};

use crate::error::{Error, Result};
use crate::events::{EventDispatcher, EventReceiver, RosterEvent};
use crate::roster::{AttendanceRoster, RecordOutcome};
use crate::scan::DeviceCandidate;
use crate::traits::DiscoveryService;

/// Options for a scanning session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Cadence between discovery interactions.
    pub cycle_interval: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            cycle_interval: Duration::from_secs(5),
        }
    }
}

impl SessionOptions {
    /// Create new session options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cadence between discovery interactions.
    pub fn cycle_interval(mut self, cycle_interval: Duration) -> Self {
        self.cycle_interval = cycle_interval;
        self
    }

    /// Set the cadence in seconds.
    pub fn cycle_interval_secs(mut self, secs: u64) -> Self {
        self.cycle_interval = Duration::from_secs(secs);
        self
    }
}

/// A scanning session: roster plus discovery cadence.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use rollcall_core::{BleDiscovery, DiscoveryOptions, ScanSession, SessionOptions};
///
/// let discovery = BleDiscovery::new(DiscoveryOptions::default()).await?;
/// let session = ScanSession::new(Arc::new(discovery), SessionOptions::default());
///
/// session.start().await;
/// // ... let it run ...
/// session.stop().await;
///
/// for entry in session.snapshot().await {
///     println!("{} was present", entry.roll_number);
/// }
/// ```
pub struct ScanSession<D: DiscoveryService> {
    discovery: Arc<D>,
    options: SessionOptions,
    roster: Arc<Mutex<AttendanceRoster>>,
    dispatcher: EventDispatcher,
    /// Present while Scanning; cancelling it halts the cadence.
    scanning: Mutex<Option<CancellationToken>>,
}

impl<D: DiscoveryService + 'static> ScanSession<D> {
    /// Create an Idle session over the given discovery collaborator.
    pub fn new(discovery: Arc<D>, options: SessionOptions) -> Self {
        Self {
            discovery,
            options,
            roster: Arc::new(Mutex::new(AttendanceRoster::new())),
            dispatcher: EventDispatcher::default(),
            scanning: Mutex::new(None),
        }
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> EventReceiver {
        self.dispatcher.subscribe()
    }

    /// Idle → Scanning. Starting an already-scanning session is a no-op.
    ///
    /// The first discovery cycle fires immediately; subsequent cycles fire
    /// on the configured cadence.
    pub async fn start(&self) {
        let mut scanning = self.scanning.lock().await;
        if scanning.is_some() {
            debug!("Scan session already running");
            return;
        }

        let cancel = CancellationToken::new();
        tokio::spawn(run_cadence(
            Arc::clone(&self.discovery),
            Arc::clone(&self.roster),
            self.dispatcher.clone(),
            cancel.clone(),
            self.options.clone(),
        ));
        *scanning = Some(cancel);

        info!("Scanning started");
        self.dispatcher.send(RosterEvent::ScanStarted);
    }

    /// Scanning → Idle. Stopping an already-idle session is a no-op.
    ///
    /// Cancellation is cooperative: no further cycles are scheduled, but an
    /// interaction already awaiting the platform is allowed to resolve; its
    /// result is discarded.
    pub async fn stop(&self) {
        let mut scanning = self.scanning.lock().await;
        let Some(cancel) = scanning.take() else {
            debug!("Scan session already idle");
            return;
        };
        cancel.cancel();

        info!("Scanning stopped");
        self.dispatcher.send(RosterEvent::ScanStopped);
    }

    /// Whether the session is currently Scanning.
    pub async fn is_scanning(&self) -> bool {
        self.scanning.lock().await.is_some()
    }

    /// Roster entries in insertion order, as a value copy.
    pub async fn snapshot(&self) -> Vec<RosterEntry> {
        self.roster.lock().await.snapshot()
    }

    /// Number of recorded entries.
    pub async fn roster_len(&self) -> usize {
        self.roster.lock().await.len()
    }

    /// Empty the roster. Scanning state is unaffected.
    pub async fn clear_roster(&self) {
        self.roster.lock().await.clear();
        info!("Attendance roster cleared");
        self.dispatcher.send(RosterEvent::RosterCleared);
    }
}

/// The cadence task: one discovery cycle per tick until cancelled.
async fn run_cadence<D: DiscoveryService + 'static>(
    discovery: Arc<D>,
    roster: Arc<Mutex<AttendanceRoster>>,
    dispatcher: EventDispatcher,
    cancel: CancellationToken,
    options: SessionOptions,
) {
    let mut ticker = interval(options.cycle_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Scan cadence cancelled");
                break;
            }
            _ = ticker.tick() => {
                // Cycles are spawned, not awaited: the cadence keeps firing
                // even while a slow interaction is still settling.
                tokio::spawn(run_cycle(
                    Arc::clone(&discovery),
                    Arc::clone(&roster),
                    dispatcher.clone(),
                    cancel.clone(),
                ));
            }
        }
    }
}

/// One discovery cycle: surface, extract, record.
async fn run_cycle<D: DiscoveryService>(
    discovery: Arc<D>,
    roster: Arc<Mutex<AttendanceRoster>>,
    dispatcher: EventDispatcher,
    cancel: CancellationToken,
) {
    match discover_one(discovery.as_ref()).await {
        Ok(Some((roll_number, raw_label))) => {
            if cancel.is_cancelled() {
                debug!(
                    "Discarding {}: session stopped while the interaction was in flight",
                    roll_number
                );
                return;
            }

            let outcome = roster.lock().await.record_if_new(
                roll_number,
                raw_label,
                OffsetDateTime::now_utc(),
            );
            if let RecordOutcome::Inserted(entry) = outcome {
                info!("Detected student: {}", entry.roll_number);
                dispatcher.send(RosterEvent::StudentRecorded { entry });
            }
        }
        Ok(None) => {
            debug!("No device this cycle");
        }
        Err(Error::Cancelled) => {}
        Err(e @ Error::NoLabel { .. }) => {
            // Semi-expected: a bystander device with an unhelpful name.
            debug!("{}", e);
        }
        Err(e) => {
            warn!("Discovery cycle failed: {}", e);
        }
    }
}

/// One discovery interaction: ask for a candidate, extract a roll number
/// from its advertised name, and fall back to reading the roll-number
/// characteristic when the name yields nothing.
async fn discover_one<D: DiscoveryService>(
    discovery: &D,
) -> Result<Option<(RollNumber, String)>> {
    let Some(candidate) = discovery.request_device().await? else {
        return Ok(None);
    };

    if let Some(roll_number) = matcher::extract(candidate.local_name.as_deref()) {
        return Ok(Some((roll_number, candidate.display_label())));
    }

    match read_remote_roll_number(discovery, &candidate).await {
        Ok(roll_number) => Ok(Some((roll_number, candidate.display_label()))),
        Err(source) => Err(Error::no_label(candidate.identifier.clone(), source)),
    }
}

/// Connection fallback: read and decode the roll-number characteristic.
async fn read_remote_roll_number<D: DiscoveryService>(
    discovery: &D,
    candidate: &DeviceCandidate,
) -> Result<RollNumber> {
    let mut connection = discovery.connect(candidate).await?;
    let value = discovery.read_roll_number(&mut connection).await;
    discovery.disconnect(connection).await?;

    Ok(RollNumber::from_utf8(value?)?)
}
