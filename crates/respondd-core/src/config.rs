// ── Runtime pipeline configuration ──
//
// These types describe *what* one poll cycle talks to and how it filters.
// They carry credential data and tuning, but never touch disk: the
// config crate builds a `PipelineConfig` and hands it in.

use std::collections::HashMap;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::MacAddress;

/// Routing domain published when no node-feed entry supplies one.
pub const DEFAULT_FALLBACK_DOMAIN: &str = "ffmuc_omada_respondd_fallback";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed controllers).
    DangerAcceptInvalid,
}

/// Controller connection and login data.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller URL (e.g., `https://omada.example.org:8043`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Per-request timeout, applied to every controller call.
    pub timeout: Duration,
}

/// Which device schema the controller speaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaMode {
    /// Decide per device: an SSID-override list means SSID-aware.
    #[default]
    Auto,
    /// Devices must carry a matching, enabled SSID override.
    SsidOverrides,
    /// Every qualifying AP is published; the SSID filter applies to clients.
    Legacy,
}

/// Where the published byte counters come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrafficSource {
    /// Sum of the AP's 2.4 GHz and 5 GHz radio counters.
    #[default]
    #[serde(alias = "radio")]
    RadioCounters,
    /// Sum of the matching client sessions' counters.
    #[serde(alias = "clients")]
    ClientSessions,
}

/// Whether an AP without an SNMP location string is published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnmpLocationPolicy {
    /// Skip APs that report no SNMP location.
    #[default]
    #[serde(alias = "require")]
    RequireSnmpLocation,
    /// Publish them with location-block or zero coordinates.
    #[serde(alias = "optional")]
    IncludeAll,
}

/// Geocoder endpoint and pacing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocoderConfig {
    /// Base URL of a Nominatim-compatible service; `search` is appended.
    pub url: String,
    /// Nominatim's usage policy requires an identifying User-Agent.
    pub user_agent: String,
    /// Minimum spacing between two lookups, shared process-wide.
    pub min_interval: Duration,
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub timeout: Duration,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            url: "https://nominatim.openstreetmap.org/".into(),
            user_agent: "ffmuc_respondd".into(),
            min_interval: Duration::from_secs(1),
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Everything one poll cycle needs.
///
/// Built by the config crate, passed to `SnapshotAssembler`.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub controller: ControllerConfig,
    /// Node feed (`{"nodes": [...]}`); `None` skips gateway enrichment.
    pub node_feed_url: Option<Url>,
    /// Matched case-insensitively against SSIDs.
    pub ssid_pattern: String,
    /// Offloader MAC per site name.
    pub offloader_macs: HashMap<String, MacAddress>,
    pub fallback_domain: String,
    pub schema: SchemaMode,
    pub traffic_source: TrafficSource,
    pub snmp_location: SnmpLocationPolicy,
    pub geocoder: GeocoderConfig,
}

impl PipelineConfig {
    /// A config with default filtering for the given controller.
    pub fn new(controller: ControllerConfig) -> Self {
        Self {
            controller,
            node_feed_url: None,
            ssid_pattern: ".*".into(),
            offloader_macs: HashMap::new(),
            fallback_domain: DEFAULT_FALLBACK_DOMAIN.into(),
            schema: SchemaMode::default(),
            traffic_source: TrafficSource::default(),
            snmp_location: SnmpLocationPolicy::default(),
            geocoder: GeocoderConfig::default(),
        }
    }
}
