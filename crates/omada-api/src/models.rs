// Omada web API response types
//
// Models for the Omada controller's v2 JSON API. Every response is wrapped in
// the `OmadaResponse<T>` envelope. Fields use `#[serde(default)]` liberally
// because the controller is inconsistent about field presence across firmware
// releases; nothing downstream ever indexes into raw JSON.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard Omada API response envelope.
///
/// ```json
/// { "errorCode": 0, "msg": "Success.", "result": { ... } }
/// ```
#[derive(Debug, Deserialize)]
pub struct OmadaResponse<T> {
    #[serde(rename = "errorCode")]
    pub error_code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    /// Absent on errors; a missing `Option` field deserializes to `None`.
    pub result: Option<T>,
}

/// Paged list payload used by the client endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Paged<T> {
    #[serde(default)]
    pub total_rows: u64,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub data: Vec<T>,
}

// ── Controller / session ─────────────────────────────────────────────

/// Unauthenticated controller probe from `/api/info`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerInfo {
    /// Present on v5+ controllers; every API path is prefixed with it.
    #[serde(default)]
    pub omadac_id: Option<String>,
    #[serde(default)]
    pub controller_ver: Option<String>,
    #[serde(default)]
    pub api_ver: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResult {
    pub token: String,
}

/// The logged-in user from `users/current`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub privilege: Privilege,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Privilege {
    #[serde(default)]
    pub sites: Vec<SiteRef>,
}

/// A site the current user may access. `key` is the controller id used in
/// site-scoped URLs; `name` is what operators configure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRef {
    pub name: String,
    pub key: String,
}

// ── Site settings ────────────────────────────────────────────────────

/// Site settings from `sites/{key}/setting`. Only the parts we read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    #[serde(default)]
    pub auto_upgrade: Option<AutoUpgrade>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AutoUpgrade {
    #[serde(default)]
    pub enable: bool,
}

// ── Device ───────────────────────────────────────────────────────────

/// Device summary from `sites/{key}/devices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSummary {
    /// Hyphen-separated upper-case hex, e.g. `AA-BB-CC-DD-EE-FF`.
    pub mac: String,
    #[serde(default)]
    pub name: Option<String>,
    /// 0 = disconnected, 20 = disconnected (migrating); anything else is up.
    #[serde(default)]
    pub status: i32,
    /// `"ap"`, `"switch"`, `"gateway"`.
    #[serde(default, rename = "type")]
    pub device_type: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, alias = "firmwareVersion")]
    pub version: Option<String>,
    /// MAC of the upstream device this one is attached to.
    #[serde(default)]
    pub uplink: Option<String>,
    #[serde(default, rename = "sys_stats", alias = "sysStats")]
    pub sys_stats: Option<SysStats>,
    #[serde(default)]
    pub ssid_overrides: Option<Vec<SsidOverride>>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// System statistics nested inside `DeviceSummary`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SysStats {
    #[serde(default, rename = "loadavg_1")]
    pub load_1: Option<NumberOrText>,
    #[serde(default)]
    pub mem_used: Option<u64>,
    #[serde(default)]
    pub mem_buffer: Option<u64>,
    #[serde(default)]
    pub mem_total: Option<u64>,
}

/// Firmware releases disagree on whether load averages are JSON numbers or
/// strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Per-AP SSID override entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsidOverride {
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub ssid: Option<String>,
    #[serde(default, alias = "ssidEnable")]
    pub enable: bool,
}

/// Access point detail from `sites/{key}/eaps/{mac}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApDetail {
    #[serde(default)]
    pub uptime_long: Option<u64>,
    #[serde(default, rename = "wp2g")]
    pub wp2g: Option<RadioSetting>,
    #[serde(default, rename = "wp5g")]
    pub wp5g: Option<RadioSetting>,
    #[serde(default, rename = "radioTraffic2g")]
    pub radio_traffic_2g: Option<RadioTraffic>,
    #[serde(default, rename = "radioTraffic5g")]
    pub radio_traffic_5g: Option<RadioTraffic>,
    #[serde(default)]
    pub location: Option<DeviceLocation>,
    #[serde(default)]
    pub snmp: Option<SnmpInfo>,
    #[serde(default)]
    pub ssid_overrides: Option<Vec<SsidOverride>>,
    /// CPU utilisation in percent.
    #[serde(default)]
    pub cpu_util: Option<f64>,
    /// Memory utilisation in percent.
    #[serde(default)]
    pub mem_util: Option<f64>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioSetting {
    /// E.g. `"6/20MHz"` or `"N/A"` when the radio is off.
    #[serde(default)]
    pub actual_channel: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RadioTraffic {
    #[serde(default)]
    pub tx: u64,
    #[serde(default)]
    pub rx: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DeviceLocation {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnmpInfo {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
}

// ── Client (station) ─────────────────────────────────────────────────

/// Associated client from `sites/{key}/clients`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientEntry {
    pub mac: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "essid")]
    pub ssid: Option<String>,
    #[serde(default)]
    pub channel: Option<u32>,
    #[serde(default, alias = "ap_mac")]
    pub ap_mac: Option<String>,
    /// Bytes the AP sent to this client.
    #[serde(default, rename = "trafficDown", alias = "tx_bytes")]
    pub tx_bytes: Option<u64>,
    /// Bytes the AP received from this client.
    #[serde(default, rename = "trafficUp", alias = "rx_bytes")]
    pub rx_bytes: Option<u64>,
    #[serde(default)]
    pub wireless: Option<bool>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
