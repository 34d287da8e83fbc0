//! Trait abstraction over the platform discovery primitive.
//!
//! The scanning session drives everything through [`DiscoveryService`],
//! which keeps the loop testable without BLE hardware
//! ([`crate::mock::MockDiscovery`]) and maps directly onto the real adapter
//! ([`crate::device::BleDiscovery`]).

use async_trait::async_trait;

use crate::error::Result;
use crate::scan::DeviceCandidate;

/// One-at-a-time device discovery collaborator.
///
/// The underlying platform primitive surfaces at most one device per
/// interaction and cannot passively stream results, so the contract is
/// shaped the same way: every cycle asks for one candidate, then (when the
/// advertised name yields nothing) opens a connection to read the
/// roll-number characteristic.
///
/// All operations are fallible and may suspend for platform I/O; none of
/// them imply a retry.
#[async_trait]
pub trait DiscoveryService: Send + Sync {
    /// Connection handle produced by [`connect`](Self::connect).
    type Connection: Send;

    /// Perform one discovery interaction and surface at most one candidate.
    ///
    /// `Ok(None)` means nothing was selected — no device in the window, or
    /// the interaction was dismissed — and is a normal outcome, not an
    /// error. Implementations backed by a user-mediated chooser may also
    /// return [`crate::error::Error::Cancelled`]; the session swallows it
    /// silently.
    async fn request_device(&self) -> Result<Option<DeviceCandidate>>;

    /// Open a connection to a previously surfaced candidate.
    async fn connect(&self, candidate: &DeviceCandidate) -> Result<Self::Connection>;

    /// Read the raw roll-number characteristic value.
    async fn read_roll_number(&self, connection: &mut Self::Connection) -> Result<Vec<u8>>;

    /// Release the connection.
    async fn disconnect(&self, connection: Self::Connection) -> Result<()>;
}
