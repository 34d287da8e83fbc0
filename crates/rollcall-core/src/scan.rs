//! Device discovery and scanning.
//!
//! This module provides the adapter plumbing for one discovery interaction:
//! listen for advertisements for a short window and snapshot what was seen.

use std::time::Duration;

use btleplug::api::{Central, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral, PeripheralId};
use tokio::time::sleep;
use tracing::debug;

use crate::error::{Error, Result};

/// Information about a device surfaced by one discovery interaction.
#[derive(Debug, Clone)]
pub struct DeviceCandidate {
    /// Advertised local name, if any.
    pub local_name: Option<String>,
    /// Connection identifier (peripheral ID on macOS, address elsewhere).
    pub identifier: String,
    /// The BLE address as a string (may be zeros on macOS, use `identifier`
    /// instead).
    pub address: String,
    /// RSSI signal strength at discovery time.
    pub rssi: Option<i16>,
}

impl DeviceCandidate {
    /// Label recorded in the roster: the advertised name, falling back to
    /// the identifier for nameless devices.
    #[must_use]
    pub fn display_label(&self) -> String {
        self.local_name
            .clone()
            .unwrap_or_else(|| self.identifier.clone())
    }
}

/// Options for one discovery interaction.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// How long to listen for advertisements per interaction.
    pub window: Duration,
    /// Only surface devices that advertise a local name.
    pub named_only: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(3),
            named_only: false,
        }
    }
}

impl DiscoveryOptions {
    /// Create new discovery options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the advertisement window.
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Set the advertisement window in seconds.
    pub fn window_secs(mut self, secs: u64) -> Self {
        self.window = Duration::from_secs(secs);
        self
    }

    /// Set whether to surface named devices only.
    pub fn named_only(mut self, named_only: bool) -> Self {
        self.named_only = named_only;
        self
    }
}

/// Get the first available Bluetooth adapter.
pub async fn get_adapter() -> Result<Adapter> {
    let manager = Manager::new().await?;
    let adapters = manager.adapters().await?;

    adapters.into_iter().next().ok_or(Error::AdapterUnavailable)
}

/// Listen for advertisements for the configured window and return the
/// peripherals currently visible, paired with their candidate snapshots.
pub(crate) async fn scan_window(
    adapter: &Adapter,
    options: &DiscoveryOptions,
) -> Result<Vec<(Peripheral, DeviceCandidate)>> {
    debug!("Listening for advertisements for {:?}...", options.window);

    adapter.start_scan(ScanFilter::default()).await?;
    sleep(options.window).await;
    adapter.stop_scan().await?;

    let mut visible = Vec::new();
    for peripheral in adapter.peripherals().await? {
        match candidate_from_peripheral(&peripheral).await {
            Ok(Some(candidate)) => {
                if options.named_only && candidate.local_name.is_none() {
                    continue;
                }
                visible.push((peripheral, candidate));
            }
            Ok(None) => {
                // No properties yet; advertisement not fully received.
            }
            Err(e) => {
                debug!("Error reading peripheral properties: {}", e);
            }
        }
    }

    debug!("Window closed with {} device(s) visible", visible.len());
    Ok(visible)
}

/// Snapshot a peripheral's advertised properties into a candidate.
async fn candidate_from_peripheral(peripheral: &Peripheral) -> Result<Option<DeviceCandidate>> {
    let properties = peripheral.properties().await?;
    let properties = match properties {
        Some(p) => p,
        None => return Ok(None),
    };

    let address = properties.address.to_string();
    let identifier = create_identifier(&address, &peripheral.id());

    Ok(Some(DeviceCandidate {
        local_name: properties.local_name,
        identifier,
        address,
        rssi: properties.rssi,
    }))
}

/// Format a peripheral ID as a string.
fn format_peripheral_id(id: &PeripheralId) -> String {
    format!("{:?}", id)
        .trim_start_matches("PeripheralId(")
        .trim_end_matches(')')
        .to_string()
}

/// Create an identifier string from an address and peripheral ID.
///
/// On macOS where addresses are 00:00:00:00:00:00, uses the peripheral ID.
/// On other platforms, uses the Bluetooth address.
fn create_identifier(address: &str, peripheral_id: &PeripheralId) -> String {
    if address == "00:00:00:00:00:00" {
        format_peripheral_id(peripheral_id)
    } else {
        address.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_label_prefers_the_advertised_name() {
        let candidate = DeviceCandidate {
            local_name: Some("RollNo_1001".to_string()),
            identifier: "AA:BB:CC:DD:EE:FF".to_string(),
            address: "AA:BB:CC:DD:EE:FF".to_string(),
            rssi: Some(-48),
        };
        assert_eq!(candidate.display_label(), "RollNo_1001");
    }

    #[test]
    fn display_label_falls_back_to_the_identifier() {
        let candidate = DeviceCandidate {
            local_name: None,
            identifier: "AA:BB:CC:DD:EE:FF".to_string(),
            address: "AA:BB:CC:DD:EE:FF".to_string(),
            rssi: None,
        };
        assert_eq!(candidate.display_label(), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn discovery_options_builder() {
        let options = DiscoveryOptions::new()
            .window_secs(7)
            .named_only(true);
        assert_eq!(options.window, Duration::from_secs(7));
        assert!(options.named_only);

        let options = DiscoveryOptions::default();
        assert_eq!(options.window, Duration::from_secs(3));
        assert!(!options.named_only);
    }
}
