// ── Published output ──
//
// Field names are what respondd consumers read; do not rename.

use serde::{Deserialize, Serialize};

use super::mac::MacAddress;

/// One access point as published to the mesh status responder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessPointRecord {
    pub name: String,
    pub mac: MacAddress,
    pub snmp_location: Option<String>,
    pub client_count: u32,
    pub client_count24: u32,
    pub client_count5: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency24: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency5: Option<u32>,
    pub latitude: f64,
    pub longitude: f64,
    pub model: Option<String>,
    pub firmware: Option<String>,
    pub uptime: u64,
    pub contact: Option<String>,
    pub load_avg: f64,
    pub mem_used: u64,
    pub mem_total: u64,
    pub mem_buffer: u64,
    pub tx_bytes: u64,
    pub rx_bytes: u64,
    pub gateway: Option<String>,
    pub gateway6: Option<String>,
    pub gateway_nexthop: Option<String>,
    pub neighbour_macs: Vec<MacAddress>,
    pub domain_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoupdater: Option<bool>,
}

/// All records of one poll cycle, in site then device order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub accesspoints: Vec<AccessPointRecord>,
}

impl Snapshot {
    pub fn new(accesspoints: Vec<AccessPointRecord>) -> Self {
        Self { accesspoints }
    }

    pub fn len(&self) -> usize {
        self.accesspoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accesspoints.is_empty()
    }
}
