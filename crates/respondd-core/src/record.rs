// ── Record assembly ──

use crate::clients::{ClientAggregator, ClientScope};
use crate::config::TrafficSource;
use crate::frequency;
use crate::model::{AccessPointRecord, ClientSession, Coordinates, NodeFeed, Site};
use crate::neighbor::NeighborResolver;
use crate::selector::{CandidateDevice, SelectionStrategy};

/// Combines a selected device with its clients, coordinates and neighbor
/// data into the published record.
#[derive(Debug, Clone, Copy)]
pub struct RecordBuilder<'a> {
    aggregator: ClientAggregator<'a>,
    neighbors: NeighborResolver<'a>,
    traffic_source: TrafficSource,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(
        aggregator: ClientAggregator<'a>,
        neighbors: NeighborResolver<'a>,
        traffic_source: TrafficSource,
    ) -> Self {
        Self {
            aggregator,
            neighbors,
            traffic_source,
        }
    }

    /// `sessions` is the per-device list for SSID-aware candidates and the
    /// site-wide list for legacy ones.
    pub fn build(
        &self,
        site: &Site,
        candidate: &CandidateDevice,
        sessions: &[ClientSession],
        feed: &NodeFeed,
        coordinates: Coordinates,
    ) -> AccessPointRecord {
        let device = &candidate.device;
        let scope = match candidate.strategy {
            SelectionStrategy::SsidOverrides => ClientScope::Device { ap_mac: &device.mac },
            SelectionStrategy::Legacy => ClientScope::Site { ap_mac: &device.mac },
        };

        let counts = self.aggregator.count(sessions, scope);
        let traffic = self
            .aggregator
            .traffic(self.traffic_source, device, sessions, scope);
        let neighbors = self.neighbors.resolve(site, device, feed);

        AccessPointRecord {
            name: device.name.clone().unwrap_or_default(),
            mac: device.mac.clone(),
            snmp_location: device.snmp_location.clone(),
            client_count: counts.total,
            client_count24: counts.count24,
            client_count5: counts.count5,
            frequency24: frequency::decode(device.channel_2g.as_deref()),
            frequency5: frequency::decode(device.channel_5g.as_deref()),
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            model: device.model.clone(),
            firmware: device.firmware.clone(),
            uptime: device.uptime.unwrap_or(0),
            contact: device.contact.clone(),
            load_avg: device.stats.load_avg,
            mem_used: device.stats.mem_used,
            mem_total: device.stats.mem_total,
            mem_buffer: device.stats.mem_buffer,
            tx_bytes: traffic.tx_bytes,
            rx_bytes: traffic.rx_bytes,
            gateway: neighbors.gateway,
            gateway6: neighbors.gateway6,
            gateway_nexthop: neighbors.gateway_nexthop,
            neighbour_macs: neighbors.neighbour_macs,
            domain_code: neighbors.domain_code,
            autoupdater: site.auto_upgrade,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::device::fixtures::access_point;
    use crate::model::{DeviceStats, MacAddress, RadioCounters, SsidOverride};
    use crate::ssid::SsidMatcher;

    fn session(channel: u32, ap: &str) -> ClientSession {
        ClientSession {
            mac: MacAddress::new("01:00:00:00:00:01"),
            ssid: Some("Freifunk".into()),
            channel: Some(channel),
            ap_mac: Some(MacAddress::new(ap)),
            tx_bytes: Some(1),
            rx_bytes: Some(1),
        }
    }

    #[test]
    fn builds_the_published_record() {
        let matcher = SsidMatcher::new("freifunk").unwrap();
        let offloaders = HashMap::new();
        let builder = RecordBuilder::new(
            ClientAggregator::new(&matcher),
            NeighborResolver::new(&offloaders, "fallback"),
            TrafficSource::RadioCounters,
        );

        let mut device = access_point("AP1", "AA-BB-CC-DD-EE-FF");
        device.ssid_overrides = Some(vec![SsidOverride {
            ssid: "Freifunk".into(),
            enabled: true,
        }]);
        device.channel_2g = Some("6/20MHz".into());
        device.channel_5g = Some("N/A".into());
        device.radio_2g = Some(RadioCounters { tx_bytes: 100, rx_bytes: 50 });
        device.stats = DeviceStats {
            load_avg: 0.5,
            mem_used: 10,
            mem_buffer: 2,
            mem_total: 64,
        };
        device.snmp_location = Some("52.5,13.4".into());
        let candidate = CandidateDevice {
            device,
            strategy: SelectionStrategy::SsidOverrides,
        };
        let site = Site {
            name: "Muenchen".into(),
            key: "k1".into(),
            auto_upgrade: Some(true),
        };

        let record = builder.build(
            &site,
            &candidate,
            &[session(6, "AA-BB-CC-DD-EE-FF"), session(44, "AA-BB-CC-DD-EE-FF")],
            &NodeFeed::empty(),
            Coordinates::new(52.5, 13.4),
        );

        assert_eq!(record.mac.as_str(), "aa:bb:cc:dd:ee:ff");
        assert_eq!(record.name, "AP1");
        assert_eq!((record.client_count, record.client_count24, record.client_count5), (2, 1, 1));
        assert_eq!(record.frequency24, Some(20));
        assert_eq!(record.frequency5, None);
        assert_eq!((record.tx_bytes, record.rx_bytes), (100, 50));
        assert_eq!(record.mem_total, 64);
        assert_eq!(record.uptime, 0);
        assert_eq!(record.autoupdater, Some(true));
        assert_eq!(record.domain_code, "fallback");
        assert!((record.latitude - 52.5).abs() < f64::EPSILON);
    }

    #[test]
    fn absent_frequency_is_omitted_from_json() {
        let matcher = SsidMatcher::new(".*").unwrap();
        let offloaders = HashMap::new();
        let builder = RecordBuilder::new(
            ClientAggregator::new(&matcher),
            NeighborResolver::new(&offloaders, "fallback"),
            TrafficSource::ClientSessions,
        );
        let candidate = CandidateDevice {
            device: access_point("AP1", "aa:bb:cc:dd:ee:ff"),
            strategy: SelectionStrategy::Legacy,
        };
        let site = Site {
            name: "s".into(),
            key: "k".into(),
            auto_upgrade: None,
        };

        let record = builder.build(
            &site,
            &candidate,
            &[session(6, "aa:bb:cc:dd:ee:ff"), session(6, "00:00:00:00:00:01")],
            &NodeFeed::empty(),
            Coordinates::ZERO,
        );
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(record.client_count, 1);
        assert_eq!(record.tx_bytes, 1);
        assert!(json.get("frequency24").is_none());
        assert!(json.get("autoupdater").is_none());
        assert_eq!(json["mac"], "aa:bb:cc:dd:ee:ff");
    }
}
