// ── Device domain types ──

use serde::{Deserialize, Serialize};

use super::common::Coordinates;
use super::mac::MacAddress;

/// Canonical device type, normalized from the controller's `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DeviceType {
    AccessPoint,
    Switch,
    Gateway,
    Other,
}

/// Raw controller status code.
///
/// Omada reports 0 for disconnected and 20 for disconnected-while-migrating;
/// every other value means the device is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStatus(pub i32);

impl DeviceStatus {
    const OFFLINE: [i32; 2] = [0, 20];

    pub fn is_online(self) -> bool {
        !Self::OFFLINE.contains(&self.0)
    }
}

/// Load and memory statistics; missing values default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceStats {
    pub load_avg: f64,
    pub mem_used: u64,
    pub mem_buffer: u64,
    pub mem_total: u64,
}

/// Cumulative per-radio byte counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioCounters {
    pub tx_bytes: u64,
    pub rx_bytes: u64,
}

/// An SSID the AP broadcasts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsidOverride {
    pub ssid: String,
    pub enabled: bool,
}

/// A device as reported by the controller, after the summary and (for
/// access points) the detail response have been merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDevice {
    pub mac: MacAddress,
    /// The controller's own spelling, needed for per-device API paths.
    pub controller_mac: String,
    pub name: Option<String>,
    pub status: DeviceStatus,
    pub device_type: DeviceType,
    pub model: Option<String>,
    pub firmware: Option<String>,
    pub uplink: Option<MacAddress>,
    pub stats: DeviceStats,
    /// `None` when the controller does not report the override list at all.
    pub ssid_overrides: Option<Vec<SsidOverride>>,
    pub location: Option<Coordinates>,
    pub snmp_location: Option<String>,
    pub contact: Option<String>,
    pub radio_2g: Option<RadioCounters>,
    pub radio_5g: Option<RadioCounters>,
    pub channel_2g: Option<String>,
    pub channel_5g: Option<String>,
    pub uptime: Option<u64>,
}

impl RawDevice {
    /// Named (non-blank), online, and an access point.
    pub fn is_publishable_ap(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.trim().is_empty())
            && self.status.is_online()
            && self.device_type == DeviceType::AccessPoint
    }

    /// Sum of both radios' counters; absent radios contribute zero.
    pub fn radio_totals(&self) -> RadioCounters {
        [self.radio_2g, self.radio_5g]
            .into_iter()
            .flatten()
            .fold(RadioCounters::default(), |acc, r| RadioCounters {
                tx_bytes: acc.tx_bytes.saturating_add(r.tx_bytes),
                rx_bytes: acc.rx_bytes.saturating_add(r.rx_bytes),
            })
    }
}
