//! BLE implementation of the discovery collaborator.
//!
//! This module connects the [`DiscoveryService`] contract to a real
//! Bluetooth adapter: each interaction listens for one advertisement
//! window, surfaces at most one device that has not been seen before in
//! this session, and can open a connection to read the roll-number
//! characteristic from devices whose advertised name gives nothing away.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{Characteristic, Peripheral as _};
use btleplug::platform::{Adapter, Peripheral};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use rollcall_types::uuids::ROLL_NUMBER_CHARACTERISTIC;

use crate::error::{Error, Result};
use crate::scan::{self, DeviceCandidate, DiscoveryOptions};
use crate::traits::DiscoveryService;

/// Default timeout for establishing a BLE connection.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default timeout for service discovery after connection.
const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for reading the roll-number characteristic.
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Discovery collaborator backed by a real Bluetooth adapter.
///
/// Candidates already surfaced in this session are remembered and skipped,
/// so each successful `request_device` yields a device the session has not
/// processed yet; once everything in range has been surfaced, further
/// interactions resolve to `Ok(None)` until a new device appears.
pub struct BleDiscovery {
    adapter: Adapter,
    options: DiscoveryOptions,
    /// Peripheral handles for surfaced candidates, keyed by identifier,
    /// kept for the connection fallback.
    surfaced: Mutex<HashMap<String, Peripheral>>,
}

impl std::fmt::Debug for BleDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BleDiscovery")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl BleDiscovery {
    /// Create a discovery collaborator on the first available adapter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AdapterUnavailable`] when the host has no Bluetooth
    /// adapter or Bluetooth is disabled.
    pub async fn new(options: DiscoveryOptions) -> Result<Self> {
        let adapter = scan::get_adapter().await?;
        Ok(Self::with_adapter(adapter, options))
    }

    /// Create a discovery collaborator on a specific adapter.
    pub fn with_adapter(adapter: Adapter, options: DiscoveryOptions) -> Self {
        Self {
            adapter,
            options,
            surfaced: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl DiscoveryService for BleDiscovery {
    type Connection = BleConnection;

    async fn request_device(&self) -> Result<Option<DeviceCandidate>> {
        let visible = scan::scan_window(&self.adapter, &self.options).await?;

        let mut surfaced = self.surfaced.lock().await;
        let mut fresh: Vec<_> = visible
            .into_iter()
            .filter(|(_, candidate)| !surfaced.contains_key(&candidate.identifier))
            .collect();

        // Prefer devices that advertise a name, then stronger signal.
        fresh.sort_by_key(|(_, candidate)| {
            (
                candidate.local_name.is_none(),
                std::cmp::Reverse(candidate.rssi.unwrap_or(i16::MIN)),
            )
        });

        let Some((peripheral, candidate)) = fresh.into_iter().next() else {
            debug!("No new device in this window");
            return Ok(None);
        };

        info!(
            "Surfaced device: {} ({})",
            candidate.display_label(),
            candidate.identifier
        );
        surfaced.insert(candidate.identifier.clone(), peripheral);
        Ok(Some(candidate))
    }

    async fn connect(&self, candidate: &DeviceCandidate) -> Result<BleConnection> {
        let peripheral = {
            let surfaced = self.surfaced.lock().await;
            surfaced.get(&candidate.identifier).cloned()
        };
        let peripheral = peripheral.ok_or_else(|| {
            Error::connection_failed_str(
                Some(candidate.identifier.clone()),
                "device was not surfaced by this session",
            )
        })?;

        debug!("Connecting to {}...", candidate.display_label());
        timeout(DEFAULT_CONNECT_TIMEOUT, peripheral.connect())
            .await
            .map_err(|_| Error::timeout("connect to device", DEFAULT_CONNECT_TIMEOUT))??;

        timeout(DEFAULT_DISCOVERY_TIMEOUT, peripheral.discover_services())
            .await
            .map_err(|_| Error::timeout("discover services", DEFAULT_DISCOVERY_TIMEOUT))??;

        Ok(BleConnection { peripheral })
    }

    async fn read_roll_number(&self, connection: &mut BleConnection) -> Result<Vec<u8>> {
        let characteristic = connection.find_characteristic(ROLL_NUMBER_CHARACTERISTIC)?;

        let value = timeout(
            DEFAULT_READ_TIMEOUT,
            connection.peripheral.read(&characteristic),
        )
        .await
        .map_err(|_| Error::timeout("read roll number", DEFAULT_READ_TIMEOUT))??;

        debug!("Read {} byte(s) from roll-number characteristic", value.len());
        Ok(value)
    }

    async fn disconnect(&self, connection: BleConnection) -> Result<()> {
        if let Err(e) = connection.peripheral.disconnect().await {
            warn!("Failed to disconnect cleanly: {}", e);
        }
        Ok(())
    }
}

/// An open connection to a surfaced device.
pub struct BleConnection {
    peripheral: Peripheral,
}

impl BleConnection {
    /// Locate a characteristic by UUID among the discovered services.
    fn find_characteristic(&self, uuid: Uuid) -> Result<Characteristic> {
        let services = self.peripheral.services();
        for service in &services {
            for characteristic in &service.characteristics {
                if characteristic.uuid == uuid {
                    return Ok(characteristic.clone());
                }
            }
        }

        Err(Error::characteristic_not_found(
            uuid.to_string(),
            services.len(),
        ))
    }
}
