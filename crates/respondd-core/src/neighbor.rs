// ── Neighbor and gateway enrichment ──
//
// Each site routes through an offloader node that also appears in the mesh
// node feed. The offloader and the AP's uplink become the AP's neighbours,
// and the offloader's feed entry supplies gateway and routing-domain data.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use omada_api::TransportConfig;

use crate::error::CoreError;
use crate::model::{MacAddress, NodeFeed, RawDevice, Site};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborInfo {
    pub gateway: Option<String>,
    pub gateway6: Option<String>,
    /// Offloader MAC without separators.
    pub gateway_nexthop: Option<String>,
    pub neighbour_macs: Vec<MacAddress>,
    pub domain_code: String,
}

#[derive(Debug, Clone, Copy)]
pub struct NeighborResolver<'a> {
    offloaders: &'a HashMap<String, MacAddress>,
    fallback_domain: &'a str,
}

impl<'a> NeighborResolver<'a> {
    pub fn new(offloaders: &'a HashMap<String, MacAddress>, fallback_domain: &'a str) -> Self {
        Self {
            offloaders,
            fallback_domain,
        }
    }

    pub fn resolve(&self, site: &Site, device: &RawDevice, feed: &NodeFeed) -> NeighborInfo {
        let mut info = NeighborInfo {
            gateway: None,
            gateway6: None,
            gateway_nexthop: None,
            neighbour_macs: Vec::new(),
            domain_code: self.fallback_domain.to_owned(),
        };

        if let Some(offloader) = self.offloaders.get(&site.name) {
            let offloader = MacAddress::new(offloader.as_str());
            info.gateway_nexthop = Some(offloader.to_node_id());

            match feed.find(&offloader) {
                Some(node) => {
                    info.gateway.clone_from(&node.gateway);
                    info.gateway6.clone_from(&node.gateway6);
                    if let Some(domain) = node.domain.as_deref().filter(|d| !d.is_empty()) {
                        domain.clone_into(&mut info.domain_code);
                    }
                }
                None => debug!(site = %site.name, mac = %offloader, "offloader not in node feed"),
            }

            info.neighbour_macs.push(offloader);
        }

        if let Some(uplink) = &device.uplink {
            info.neighbour_macs.push(MacAddress::new(uplink.as_str()));
        }

        info
    }
}

/// Transport for the public node feed: always verified against the system
/// roots, whatever TLS mode the controller needs.
pub fn feed_transport(timeout: Duration) -> TransportConfig {
    TransportConfig {
        timeout,
        ..TransportConfig::default()
    }
}

/// Fetch the node feed once for a cycle.
pub async fn fetch_node_feed(url: &Url, transport: &TransportConfig) -> Result<NodeFeed, CoreError> {
    let http = transport.build_client()?;
    debug!("fetching node feed from {}", url);

    let resp = http
        .get(url.clone())
        .send()
        .await
        .map_err(|e| omada_api::Error::from_transport(e, transport.timeout))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(CoreError::Api {
            message: format!("node feed answered HTTP {status}"),
            code: None,
            status: Some(status.as_u16()),
        });
    }

    let feed: NodeFeed = resp.json().await.map_err(|e| CoreError::Api {
        message: format!("node feed: {e}"),
        code: None,
        status: None,
    })?;
    debug!(nodes = feed.len(), "node feed loaded");
    Ok(feed)
}

/// [`fetch_node_feed`], degrading to an empty feed on any failure.
pub async fn load_node_feed(url: Option<&Url>, transport: &TransportConfig) -> NodeFeed {
    let Some(url) = url else {
        return NodeFeed::empty();
    };
    match fetch_node_feed(url, transport).await {
        Ok(feed) => feed,
        Err(e) => {
            warn!(error = %e, "node feed unavailable, continuing without it");
            NodeFeed::empty()
        }
    }
}
