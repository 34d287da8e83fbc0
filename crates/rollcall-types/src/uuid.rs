//! Bluetooth UUIDs for the attendance service.
//!
//! A student device that cannot put its roll number in the advertised name
//! exposes it through this custom GATT service instead.

use uuid::{Uuid, uuid};

/// Custom attendance service exposed by student devices.
pub const ATTENDANCE_SERVICE: Uuid = uuid!("0000abcd-0000-1000-8000-00805f9b34fb");

/// Characteristic holding the student's roll number as a UTF-8 string.
pub const ROLL_NUMBER_CHARACTERISTIC: Uuid = uuid!("0000abce-0000-1000-8000-00805f9b34fb");

/// Generic Access Profile (GAP) service.
pub const GAP_SERVICE: Uuid = uuid!("00001800-0000-1000-8000-00805f9b34fb");

/// Device name characteristic.
pub const DEVICE_NAME: Uuid = uuid!("00002a00-0000-1000-8000-00805f9b34fb");
