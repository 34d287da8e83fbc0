//! Session event channel for roster and state notifications.
//!
//! Only state transitions are surfaced here; transient per-cycle failures
//! (a window with no device, a failed connection fallback) are logged but
//! never broadcast.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use rollcall_types::RosterEntry;

/// Events emitted by a scanning session.
///
/// All events are serializable for logging and IPC.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new event types
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum RosterEvent {
    /// The session entered the Scanning state.
    ScanStarted,
    /// The session returned to the Idle state.
    ScanStopped,
    /// A new roll number was recorded.
    StudentRecorded {
        /// The entry that was appended to the roster.
        entry: RosterEntry,
    },
    /// The roster was emptied.
    RosterCleared,
}

/// Sender for session events.
pub type EventSender = broadcast::Sender<RosterEvent>;

/// Receiver for session events.
pub type EventReceiver = broadcast::Receiver<RosterEvent>;

/// Event dispatcher fanning session events out to multiple receivers.
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    sender: EventSender,
}

impl EventDispatcher {
    /// Create a new event dispatcher.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events.
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Send an event.
    pub fn send(&self, event: RosterEvent) {
        // Ignore error if no receivers
        let _ = self.sender.send(event);
    }

    /// Get the number of active receivers.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new(100)
    }
}
