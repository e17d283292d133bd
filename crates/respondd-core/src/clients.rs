// ── Client aggregation ──
//
// Counts matching client sessions per access point and, for the
// client-sessions traffic source, sums their byte counters. Which sessions
// count depends on how they were fetched: a per-AP list is already scoped,
// a site-wide list has to be filtered by AP MAC.

use crate::config::TrafficSource;
use crate::model::{Band, ClientSession, MacAddress, RawDevice};
use crate::ssid::SsidMatcher;

/// How a session list was fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientScope<'a> {
    /// Sessions fetched for one AP. A session without SSID or AP data
    /// still counts, since the controller already scoped it; one that names
    /// another AP does not.
    Device { ap_mac: &'a MacAddress },
    /// Sessions of the whole site; only those associated with this AP count.
    Site { ap_mac: &'a MacAddress },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientCounts {
    pub total: u32,
    pub count24: u32,
    pub count5: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrafficTotals {
    pub tx_bytes: u64,
    pub rx_bytes: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct ClientAggregator<'a> {
    matcher: &'a SsidMatcher,
}

impl<'a> ClientAggregator<'a> {
    pub fn new(matcher: &'a SsidMatcher) -> Self {
        Self { matcher }
    }

    fn counts_toward(&self, session: &ClientSession, scope: ClientScope<'_>) -> bool {
        match scope {
            ClientScope::Device { ap_mac } => {
                session.ap_mac.as_ref().is_none_or(|mac| mac == ap_mac)
                    && session
                        .ssid
                        .as_deref()
                        .is_none_or(|ssid| self.matcher.is_match(ssid))
            }
            ClientScope::Site { ap_mac } => {
                session.ap_mac.as_ref() == Some(ap_mac)
                    && session
                        .ssid
                        .as_deref()
                        .is_some_and(|ssid| self.matcher.is_match(ssid))
            }
        }
    }

    fn matching<'s>(
        &'s self,
        sessions: &'s [ClientSession],
        scope: ClientScope<'s>,
    ) -> impl Iterator<Item = &'s ClientSession> + 's {
        sessions.iter().filter(move |s| self.counts_toward(s, scope))
    }

    /// Total, 2.4 GHz and 5 GHz counts. `total == count24 + count5` always.
    pub fn count(&self, sessions: &[ClientSession], scope: ClientScope<'_>) -> ClientCounts {
        self.matching(sessions, scope)
            .fold(ClientCounts::default(), |mut acc, session| {
                match session.band() {
                    Band::TwoGhz => acc.count24 += 1,
                    Band::FiveGhz => acc.count5 += 1,
                }
                acc.total = acc.count24 + acc.count5;
                acc
            })
    }

    /// Sum of the matching sessions' byte counters; missing counters are zero.
    pub fn traffic_totals(&self, sessions: &[ClientSession], scope: ClientScope<'_>) -> TrafficTotals {
        self.matching(sessions, scope)
            .fold(TrafficTotals::default(), |acc, session| TrafficTotals {
                tx_bytes: acc.tx_bytes.saturating_add(session.tx_bytes.unwrap_or(0)),
                rx_bytes: acc.rx_bytes.saturating_add(session.rx_bytes.unwrap_or(0)),
            })
    }

    /// Byte counters for `device` from the configured source.
    pub fn traffic(
        &self,
        source: TrafficSource,
        device: &RawDevice,
        sessions: &[ClientSession],
        scope: ClientScope<'_>,
    ) -> TrafficTotals {
        match source {
            TrafficSource::RadioCounters => {
                let radio = device.radio_totals();
                TrafficTotals {
                    tx_bytes: radio.tx_bytes,
                    rx_bytes: radio.rx_bytes,
                }
            }
            TrafficSource::ClientSessions => self.traffic_totals(sessions, scope),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::RadioCounters;
    use crate::model::device::fixtures;

    fn session(ssid: Option<&str>, channel: u32, ap: &str) -> ClientSession {
        ClientSession {
            mac: MacAddress::new("01:00:00:00:00:01"),
            ssid: ssid.map(str::to_owned),
            channel: Some(channel),
            ap_mac: Some(MacAddress::new(ap)),
            tx_bytes: Some(10),
            rx_bytes: Some(4),
        }
    }

    const AP: &str = "AA-BB-CC-DD-EE-FF";
    const OTHER_AP: &str = "AA-BB-CC-DD-EE-00";

    #[test]
    fn counts_split_by_channel_and_add_up() {
        let matcher = SsidMatcher::new("freifunk").unwrap();
        let aggregator = ClientAggregator::new(&matcher);
        let sessions = vec![
            session(Some("Freifunk"), 6, AP),
            session(Some("Freifunk"), 44, AP),
            session(Some("FREIFUNK"), 14, AP),
            session(Some("Freifunk"), 15, AP),
        ];

        let ap_mac = MacAddress::new(AP);

        let counts = aggregator.count(&sessions, ClientScope::Device { ap_mac: &ap_mac });

        assert_eq!(counts, ClientCounts { total: 4, count24: 2, count5: 2 });
    }

    #[test]
    fn device_scope_counts_sessions_without_ssid() {
        let matcher = SsidMatcher::new("freifunk").unwrap();
        let aggregator = ClientAggregator::new(&matcher);
        let sessions = vec![
            session(None, 6, AP),
            session(Some("Guest"), 6, AP),
            session(Some("Freifunk"), 36, AP),
        ];

        let ap_mac = MacAddress::new(AP);

        let counts = aggregator.count(&sessions, ClientScope::Device { ap_mac: &ap_mac });

        assert_eq!(counts, ClientCounts { total: 2, count24: 1, count5: 1 });
    }

    #[test]
    fn device_scope_skips_sessions_of_other_aps() {
        let matcher = SsidMatcher::new("freifunk").unwrap();
        let aggregator = ClientAggregator::new(&matcher);
        let mut unattributed = session(Some("Freifunk"), 44, AP);
        unattributed.ap_mac = None;
        let sessions = vec![
            session(Some("Freifunk"), 6, "11:11:11:11:11:11"),
            session(Some("Freifunk"), 6, "11:11:11:11:11:11"),
            session(Some("Freifunk"), 6, AP),
            unattributed,
        ];
        let ap_mac = MacAddress::new(AP);

        let counts = aggregator.count(&sessions, ClientScope::Device { ap_mac: &ap_mac });

        assert_eq!(counts, ClientCounts { total: 2, count24: 1, count5: 1 });
    }

    #[test]
    fn site_scope_requires_matching_ap_and_ssid() {
        let matcher = SsidMatcher::new("freifunk").unwrap();
        let aggregator = ClientAggregator::new(&matcher);
        let sessions = vec![
            session(Some("Freifunk"), 6, AP),
            session(Some("Freifunk"), 6, OTHER_AP),
            session(None, 6, AP),
            session(Some("Guest"), 44, AP),
            session(Some("Freifunk"), 44, AP),
        ];
        let ap_mac = MacAddress::new(AP);

        let counts = aggregator.count(&sessions, ClientScope::Site { ap_mac: &ap_mac });

        assert_eq!(counts, ClientCounts { total: 2, count24: 1, count5: 1 });
    }

    #[test]
    fn traffic_from_client_sessions_uses_the_same_filter() {
        let matcher = SsidMatcher::new("freifunk").unwrap();
        let aggregator = ClientAggregator::new(&matcher);
        let sessions = vec![
            session(Some("Freifunk"), 6, AP),
            session(Some("Freifunk"), 44, AP),
            session(Some("Guest"), 44, AP),
        ];

        let ap_mac = MacAddress::new(AP);

        let totals = aggregator.traffic_totals(&sessions, ClientScope::Device { ap_mac: &ap_mac });

        assert_eq!(totals, TrafficTotals { tx_bytes: 20, rx_bytes: 8 });
    }

    #[test]
    fn radio_counters_ignore_sessions() {
        let matcher = SsidMatcher::new("freifunk").unwrap();
        let aggregator = ClientAggregator::new(&matcher);
        let mut device = fixtures::access_point("AP1", AP);
        device.radio_2g = Some(RadioCounters { tx_bytes: 100, rx_bytes: 50 });
        device.radio_5g = Some(RadioCounters { tx_bytes: 200, rx_bytes: 150 });
        let sessions = vec![session(Some("Freifunk"), 6, AP)];

        let totals = aggregator.traffic(
            TrafficSource::RadioCounters,
            &device,
            &sessions,
            ClientScope::Device { ap_mac: &device.mac },
        );

        assert_eq!(totals, TrafficTotals { tx_bytes: 300, rx_bytes: 200 });
    }
}
