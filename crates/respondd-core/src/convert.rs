// ── API-to-domain type conversions ──
//
// Bridges raw `omada_api` response types into the `respondd_core::model`
// domain types. Each conversion normalizes MACs, coerces loosely typed
// numbers, and fills zero defaults for missing sub-objects.

use omada_api::models::{
    ApDetail, ClientEntry, DeviceSummary, RadioTraffic, SiteRef, SsidOverride as ApiSsidOverride,
};

use crate::model::{
    ClientSession, Coordinates, DeviceStats, DeviceStatus, DeviceType, MacAddress, RadioCounters,
    RawDevice, Site, SsidOverride,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Drop empty and whitespace-only strings.
fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

/// Infer `DeviceType` from the `type` tag and, failing that, the model name.
///
/// Omada tags are `"ap"`, `"switch"` and `"gateway"`; EAP models are
/// access points even when the tag is missing.
fn infer_device_type(tag: &str, model: Option<&str>) -> DeviceType {
    match tag.trim().to_ascii_lowercase().as_str() {
        "ap" | "eap" | "access point" => DeviceType::AccessPoint,
        "switch" => DeviceType::Switch,
        "gateway" | "router" => DeviceType::Gateway,
        _ => match model.map(str::to_ascii_uppercase) {
            Some(m) if m.starts_with("EAP") => DeviceType::AccessPoint,
            Some(m) if m.starts_with("TL-SG") || m.starts_with("SG") => DeviceType::Switch,
            Some(m) if m.starts_with("ER") => DeviceType::Gateway,
            _ => DeviceType::Other,
        },
    }
}

fn convert_overrides(raw: Vec<ApiSsidOverride>) -> Vec<SsidOverride> {
    raw.into_iter()
        .filter_map(|o| {
            non_blank(o.ssid).map(|ssid| SsidOverride {
                ssid,
                enabled: o.enable,
            })
        })
        .collect()
}

fn convert_radio(raw: RadioTraffic) -> RadioCounters {
    RadioCounters {
        tx_bytes: raw.tx,
        rx_bytes: raw.rx,
    }
}

// ── Device ─────────────────────────────────────────────────────────

impl From<DeviceSummary> for RawDevice {
    fn from(d: DeviceSummary) -> Self {
        let stats = d.sys_stats.map_or_else(DeviceStats::default, |s| DeviceStats {
            load_avg: s.load_1.as_ref().and_then(|l| l.as_f64()).unwrap_or(0.0),
            mem_used: s.mem_used.unwrap_or(0),
            mem_buffer: s.mem_buffer.unwrap_or(0),
            mem_total: s.mem_total.unwrap_or(0),
        });

        RawDevice {
            mac: MacAddress::new(&d.mac),
            device_type: infer_device_type(&d.device_type, d.model.as_deref()),
            controller_mac: d.mac,
            name: non_blank(d.name),
            status: DeviceStatus(d.status),
            model: non_blank(d.model),
            firmware: non_blank(d.version),
            uplink: non_blank(d.uplink).map(MacAddress::new),
            stats,
            ssid_overrides: d.ssid_overrides.map(convert_overrides),
            location: None,
            snmp_location: None,
            contact: None,
            radio_2g: None,
            radio_5g: None,
            channel_2g: None,
            channel_5g: None,
            uptime: None,
        }
    }
}

impl RawDevice {
    /// Fold the access point detail response into this device.
    ///
    /// Detail values win over summary values where both exist.
    pub fn merge_detail(mut self, detail: ApDetail) -> Self {
        if let Some(overrides) = detail.ssid_overrides {
            self.ssid_overrides = Some(convert_overrides(overrides));
        }
        if let Some(loc) = detail.location {
            if let (Some(latitude), Some(longitude)) = (loc.latitude, loc.longitude) {
                self.location = Some(Coordinates::new(latitude, longitude));
            }
        }
        if let Some(snmp) = detail.snmp {
            self.snmp_location = non_blank(snmp.location);
            self.contact = non_blank(snmp.contact);
        }
        self.radio_2g = detail.radio_traffic_2g.map(convert_radio);
        self.radio_5g = detail.radio_traffic_5g.map(convert_radio);
        self.channel_2g = detail.wp2g.and_then(|r| r.actual_channel);
        self.channel_5g = detail.wp5g.and_then(|r| r.actual_channel);
        self.uptime = detail.uptime_long.or(self.uptime);
        self
    }
}

// ── Client ─────────────────────────────────────────────────────────

impl From<ClientEntry> for ClientSession {
    fn from(c: ClientEntry) -> Self {
        ClientSession {
            mac: MacAddress::new(&c.mac),
            ssid: non_blank(c.ssid),
            channel: c.channel,
            ap_mac: non_blank(c.ap_mac).map(MacAddress::new),
            tx_bytes: c.tx_bytes,
            rx_bytes: c.rx_bytes,
        }
    }
}

// ── Site ───────────────────────────────────────────────────────────

impl From<SiteRef> for Site {
    fn from(s: SiteRef) -> Self {
        Site {
            name: s.name,
            key: s.key,
            auto_upgrade: None,
        }
    }
}
