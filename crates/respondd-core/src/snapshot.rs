// ── Snapshot assembly ──
//
// Drives one poll cycle end to end. The cycle is strictly sequential:
// node feed, authentication, site enumeration, then per site the settings,
// device and client fetches, then per device the detail fetch and record
// build. Failures never escape `run`: an authentication failure yields an
// empty snapshot, a failing site or device is skipped.

use std::borrow::Cow;
use std::fmt;

use tracing::{debug, error, info, warn};

use crate::clients::ClientAggregator;
use crate::config::{PipelineConfig, SnmpLocationPolicy};
use crate::error::CoreError;
use crate::location::LocationResolver;
use crate::model::{
    AccessPointRecord, ClientSession, Coordinates, NodeFeed, RawDevice, Site, Snapshot,
};
use crate::neighbor::{self, NeighborResolver};
use crate::record::RecordBuilder;
use crate::selector::{CandidateDevice, DeviceSelector, SelectionStrategy};
use crate::session::{ControllerSession, SiteSession};
use crate::ssid::SsidMatcher;

/// Where a cycle currently is. Linear; `Assembled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Authenticating,
    EnumeratingSites,
    PerSiteFetch,
    PerDeviceEnrich,
    Assembled,
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Authenticating => "authenticating",
            Self::EnumeratingSites => "enumerating-sites",
            Self::PerSiteFetch => "per-site-fetch",
            Self::PerDeviceEnrich => "per-device-enrich",
            Self::Assembled => "assembled",
        };
        f.write_str(s)
    }
}

fn enter(phase: CyclePhase) {
    debug!(%phase, "cycle phase");
}

/// Borrowed view of the per-cycle helpers.
struct CycleContext<'a> {
    selector: DeviceSelector<'a>,
    builder: RecordBuilder<'a>,
    feed: &'a NodeFeed,
}

/// Runs poll cycles against one controller.
///
/// Holds nothing between cycles except the geocoder's call throttle.
pub struct SnapshotAssembler {
    config: PipelineConfig,
    matcher: SsidMatcher,
    locations: LocationResolver,
}

impl SnapshotAssembler {
    pub fn new(config: PipelineConfig) -> Result<Self, CoreError> {
        let matcher = SsidMatcher::new(&config.ssid_pattern)?;
        let locations = LocationResolver::new(&config.geocoder)?;
        Ok(Self {
            config,
            matcher,
            locations,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one full cycle. Never fails; see the module docs.
    pub async fn run(&self) -> Snapshot {
        enter(CyclePhase::Idle);
        let feed_transport = neighbor::feed_transport(self.config.controller.timeout);
        let feed =
            neighbor::load_node_feed(self.config.node_feed_url.as_ref(), &feed_transport).await;

        enter(CyclePhase::Authenticating);
        let controller = match ControllerSession::authenticate(&self.config.controller).await {
            Ok(controller) => controller,
            Err(e) => {
                error!(
                    error = %e,
                    url = %self.config.controller.url,
                    "authentication failed, publishing empty snapshot"
                );
                return Snapshot::default();
            }
        };

        enter(CyclePhase::EnumeratingSites);
        let sites = match controller.list_sites().await {
            Ok(sites) => sites,
            Err(e) => {
                error!(error = %e, "could not enumerate sites, publishing empty snapshot");
                controller.close().await;
                return Snapshot::default();
            }
        };

        let ctx = CycleContext {
            selector: DeviceSelector::new(&self.matcher, self.config.schema),
            builder: RecordBuilder::new(
                ClientAggregator::new(&self.matcher),
                NeighborResolver::new(&self.config.offloader_macs, &self.config.fallback_domain),
                self.config.traffic_source,
            ),
            feed: &feed,
        };

        let mut records = Vec::new();
        for site in &sites {
            enter(CyclePhase::PerSiteFetch);
            match self.collect_site(&controller, site, &ctx).await {
                Ok(site_records) => {
                    info!(site = %site.name, records = site_records.len(), "site collected");
                    records.extend(site_records);
                }
                Err(e) if e.is_auth_failure() => {
                    error!(site = %site.name, error = %e, "site login rejected, skipping site");
                }
                Err(e) => warn!(site = %site.name, error = %e, "skipping site"),
            }
        }

        controller.close().await;
        enter(CyclePhase::Assembled);
        info!(accesspoints = records.len(), sites = sites.len(), "cycle complete");
        Snapshot::new(records)
    }

    async fn collect_site(
        &self,
        controller: &ControllerSession,
        site: &Site,
        ctx: &CycleContext<'_>,
    ) -> Result<Vec<AccessPointRecord>, CoreError> {
        let mut scope = controller.open_site_scope(site).await?;
        let result = self.collect_scoped(&mut scope, ctx).await;
        scope.close().await;
        result
    }

    async fn collect_scoped(
        &self,
        scope: &mut SiteSession,
        ctx: &CycleContext<'_>,
    ) -> Result<Vec<AccessPointRecord>, CoreError> {
        if let Err(e) = scope.load_settings().await {
            warn!(site = %scope.site().name, error = %e, "site settings unavailable");
        }

        let devices: Vec<RawDevice> = scope
            .devices()
            .await?
            .into_iter()
            .filter(DeviceSelector::qualifies)
            .collect();
        debug!(site = %scope.site().name, qualifying = devices.len(), "devices listed");

        let mut site_clients: Option<Vec<ClientSession>> = None;
        let mut records = Vec::new();

        for device in devices {
            enter(CyclePhase::PerDeviceEnrich);
            let mac = device.mac.clone();
            match self.enrich(scope, device, &mut site_clients, ctx).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) if e.is_auth_failure() => return Err(e),
                Err(e) => warn!(site = %scope.site().name, %mac, error = %e, "skipping device"),
            }
        }

        Ok(records)
    }

    async fn enrich(
        &self,
        scope: &SiteSession,
        device: RawDevice,
        site_clients: &mut Option<Vec<ClientSession>>,
        ctx: &CycleContext<'_>,
    ) -> Result<Option<AccessPointRecord>, CoreError> {
        let device = scope.device_detail(device).await?;
        let Some(candidate) = ctx.selector.candidate(device) else {
            return Ok(None);
        };

        if self.config.snmp_location == SnmpLocationPolicy::RequireSnmpLocation
            && candidate.device.snmp_location.is_none()
        {
            debug!(mac = %candidate.device.mac, "no SNMP location, skipping");
            return Ok(None);
        }

        let sessions: Cow<'_, [ClientSession]> = match candidate.strategy {
            SelectionStrategy::SsidOverrides => {
                Cow::Owned(scope.device_clients(&candidate.device).await?)
            }
            SelectionStrategy::Legacy => {
                if site_clients.is_none() {
                    *site_clients = Some(scope.clients().await?);
                }
                Cow::Borrowed(site_clients.as_deref().unwrap_or_default())
            }
        };

        let coordinates = self.locate(&candidate).await;
        let record = ctx
            .builder
            .build(scope.site(), &candidate, &sessions, ctx.feed, coordinates);
        debug!(
            mac = %record.mac,
            clients = record.client_count,
            "record built"
        );
        Ok(Some(record))
    }

    /// SNMP location first, then the device's own location block, then 0,0.
    async fn locate(&self, candidate: &CandidateDevice) -> Coordinates {
        let fallback = candidate.device.location.unwrap_or_default();
        match candidate.device.snmp_location.as_deref() {
            Some(text) => self.locations.resolve(text).await.resolved().unwrap_or(fallback),
            None => fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_display_in_kebab_case() {
        assert_eq!(CyclePhase::PerDeviceEnrich.to_string(), "per-device-enrich");
        assert_eq!(CyclePhase::Assembled.to_string(), "assembled");
    }
}
