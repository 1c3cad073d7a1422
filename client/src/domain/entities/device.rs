//! Point-of-sale devices.

use serde::{Deserialize, Serialize};

use super::Identified;

/// Deployment state of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceStatus {
    /// In stock, not assigned.
    Available,
    /// Assigned to a merchant.
    Assigned,
    /// Withdrawn from service.
    Retired,
    /// A status this client does not know about.
    #[serde(other)]
    Unknown,
}

/// Terminal registered with the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Backend identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Manufacturer serial number, used in resource paths.
    pub serial_number: String,
    /// Device model.
    #[serde(default)]
    pub model: Option<String>,
    /// Merchant the device is assigned to.
    #[serde(default)]
    pub merchant_code: Option<String>,
    /// Deployment state.
    pub status: DeviceStatus,
}

impl Identified for Device {
    fn record_id(&self) -> &str {
        self.serial_number.as_str()
    }
}

/// Body of `POST /devices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDevice {
    /// Manufacturer serial number.
    pub serial_number: String,
    /// Device model.
    pub model: String,
}

/// Body of `PATCH /devices/{serial}/assign`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAssignment {
    /// Merchant receiving the device.
    pub merchant_code: String,
}
