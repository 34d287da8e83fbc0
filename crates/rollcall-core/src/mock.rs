//! Mock discovery collaborator for testing.
//!
//! This module provides a scripted [`DiscoveryService`] implementation that
//! can be used for unit testing without BLE hardware: each `request_device`
//! call pops the next scripted outcome.
//!
//! # Features
//!
//! - **Scripted outcomes**: devices, empty windows, and outright failures
//! - **Failure injection**: make the next connections fail
//! - **Latency simulation**: delay interactions to exercise in-flight
//!   cancellation

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use rollcall_types::uuids::ROLL_NUMBER_CHARACTERISTIC;

use crate::error::{ConnectionFailureReason, Error, Result};
use crate::scan::DeviceCandidate;
use crate::traits::DiscoveryService;

/// One scripted discovery outcome.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Surface a device.
    Device {
        /// Advertised name, if any.
        name: Option<String>,
        /// Roll-number characteristic payload, if readable.
        characteristic: Option<Vec<u8>>,
    },
    /// Nothing selected this interaction.
    Nothing,
    /// The interaction failed outright.
    Fail(String),
}

impl MockOutcome {
    /// A device advertising the given name, with no readable characteristic.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Device {
            name: Some(name.into()),
            characteristic: None,
        }
    }

    /// A nameless device whose roll-number characteristic holds the bytes.
    pub fn characteristic(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Device {
            name: None,
            characteristic: Some(bytes.into()),
        }
    }

    /// A nameless device with nothing readable at all.
    pub fn silent() -> Self {
        Self::Device {
            name: None,
            characteristic: None,
        }
    }
}

/// A scripted discovery collaborator for testing.
///
/// # Example
///
/// ```
/// use rollcall_core::{DiscoveryService, MockDiscovery, MockOutcome};
///
/// #[tokio::main]
/// async fn main() {
///     let discovery = MockDiscovery::scripted([MockOutcome::named("RollNo_1001")]);
///
///     let candidate = discovery.request_device().await.unwrap().unwrap();
///     assert_eq!(candidate.local_name.as_deref(), Some("RollNo_1001"));
///
///     // The script is exhausted; further interactions surface nothing.
///     assert!(discovery.request_device().await.unwrap().is_none());
/// }
/// ```
#[derive(Debug, Default)]
pub struct MockDiscovery {
    script: Mutex<VecDeque<MockOutcome>>,
    /// Characteristic payloads for surfaced devices, keyed by identifier.
    payloads: Mutex<HashMap<String, Option<Vec<u8>>>>,
    request_count: AtomicU32,
    /// Simulated latency per discovery interaction in milliseconds.
    request_latency_ms: AtomicU64,
    /// Number of upcoming connect calls to fail.
    failing_connects: AtomicU32,
}

impl MockDiscovery {
    /// Create a mock with an empty script; every interaction surfaces
    /// nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that plays back the given outcomes in order.
    pub fn scripted(outcomes: impl IntoIterator<Item = MockOutcome>) -> Self {
        Self {
            script: Mutex::new(outcomes.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Append an outcome to the script.
    pub async fn push(&self, outcome: MockOutcome) {
        self.script.lock().await.push_back(outcome);
    }

    /// Delay every discovery interaction by the given duration.
    pub fn set_request_latency(&self, latency: Duration) {
        self.request_latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Make the next `count` connect calls fail.
    pub fn fail_next_connects(&self, count: u32) {
        self.failing_connects.store(count, Ordering::Relaxed);
    }

    /// How many discovery interactions have been performed.
    pub fn request_count(&self) -> u32 {
        self.request_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DiscoveryService for MockDiscovery {
    type Connection = MockConnection;

    async fn request_device(&self) -> Result<Option<DeviceCandidate>> {
        self.request_count.fetch_add(1, Ordering::Relaxed);

        let latency = self.request_latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        let outcome = self.script.lock().await.pop_front();
        match outcome {
            Some(MockOutcome::Device {
                name,
                characteristic,
            }) => {
                let identifier = format!("MOCK-{:06X}", rand::random::<u32>() % 0xFF_FFFF);
                self.payloads
                    .lock()
                    .await
                    .insert(identifier.clone(), characteristic);

                Ok(Some(DeviceCandidate {
                    local_name: name,
                    address: identifier.clone(),
                    identifier,
                    rssi: Some(-50),
                }))
            }
            Some(MockOutcome::Nothing) | None => Ok(None),
            Some(MockOutcome::Fail(message)) => Err(Error::connection_failed(
                None,
                ConnectionFailureReason::BleError(message),
            )),
        }
    }

    async fn connect(&self, candidate: &DeviceCandidate) -> Result<MockConnection> {
        if self
            .failing_connects
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(Error::connection_failed(
                Some(candidate.identifier.clone()),
                ConnectionFailureReason::Rejected,
            ));
        }

        let payload = self
            .payloads
            .lock()
            .await
            .get(&candidate.identifier)
            .cloned()
            .ok_or_else(|| {
                Error::connection_failed_str(
                    Some(candidate.identifier.clone()),
                    "unknown mock device",
                )
            })?;

        Ok(MockConnection { payload })
    }

    async fn read_roll_number(&self, connection: &mut MockConnection) -> Result<Vec<u8>> {
        connection.payload.clone().ok_or_else(|| {
            Error::characteristic_not_found(ROLL_NUMBER_CHARACTERISTIC.to_string(), 0)
        })
    }

    async fn disconnect(&self, _connection: MockConnection) -> Result<()> {
        Ok(())
    }
}

/// Connection handle produced by [`MockDiscovery::connect`].
#[derive(Debug)]
pub struct MockConnection {
    payload: Option<Vec<u8>>,
}
