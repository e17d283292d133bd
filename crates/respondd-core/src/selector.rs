// ── Device selection ──
//
// Which controller devices become published access points. Selection has
// two stages so the pipeline can skip per-device detail requests for
// devices that can never qualify: `qualifies` looks only at summary fields,
// `candidate` runs the SSID check on the merged device.

use tracing::debug;

use crate::config::SchemaMode;
use crate::model::RawDevice;
use crate::ssid::SsidMatcher;

/// How a device's clients are counted, decided per device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStrategy {
    /// Device carries a matching SSID override; clients are fetched per AP.
    SsidOverrides,
    /// Device has no override list; site clients are filtered by SSID.
    Legacy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateDevice {
    pub device: RawDevice,
    pub strategy: SelectionStrategy,
}

#[derive(Debug, Clone, Copy)]
pub struct DeviceSelector<'a> {
    matcher: &'a SsidMatcher,
    schema: SchemaMode,
}

impl<'a> DeviceSelector<'a> {
    pub fn new(matcher: &'a SsidMatcher, schema: SchemaMode) -> Self {
        Self { matcher, schema }
    }

    /// Named, online access point. Needs only the device summary.
    pub fn qualifies(device: &RawDevice) -> bool {
        device.is_publishable_ap()
    }

    pub fn strategy_for(&self, device: &RawDevice) -> SelectionStrategy {
        match self.schema {
            SchemaMode::SsidOverrides => SelectionStrategy::SsidOverrides,
            SchemaMode::Legacy => SelectionStrategy::Legacy,
            SchemaMode::Auto if device.ssid_overrides.is_some() => SelectionStrategy::SsidOverrides,
            SchemaMode::Auto => SelectionStrategy::Legacy,
        }
    }

    fn has_matching_ssid(&self, device: &RawDevice) -> bool {
        device
            .ssid_overrides
            .iter()
            .flatten()
            .any(|o| o.enabled && self.matcher.is_match(&o.ssid))
    }

    /// Full check on a device whose detail has been merged.
    pub fn candidate(&self, device: RawDevice) -> Option<CandidateDevice> {
        if !Self::qualifies(&device) {
            return None;
        }

        let strategy = self.strategy_for(&device);
        if strategy == SelectionStrategy::SsidOverrides && !self.has_matching_ssid(&device) {
            debug!(
                mac = %device.mac,
                pattern = self.matcher.as_str(),
                "no enabled SSID matches, skipping"
            );
            return None;
        }

        Some(CandidateDevice { device, strategy })
    }

    /// Candidates among `devices`, in input order.
    pub fn select(&self, devices: impl IntoIterator<Item = RawDevice>) -> Vec<CandidateDevice> {
        devices.into_iter().filter_map(|d| self.candidate(d)).collect()
    }
}
