// ── External node feed ──
//
// The mesh map's node list, fetched once per cycle and passed by value to
// the neighbor resolver. Only the fields the resolver reads are typed.

use serde::{Deserialize, Serialize};

use super::mac::MacAddress;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFeed {
    #[serde(default)]
    pub nodes: Vec<NodeFeedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFeedEntry {
    pub mac: MacAddress,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub gateway: Option<String>,
    #[serde(default)]
    pub gateway6: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
}

impl NodeFeed {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn find(&self, mac: &MacAddress) -> Option<&NodeFeedEntry> {
        self.nodes.iter().find(|n| &n.mac == mac)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_matches_normalized_mac() {
        let feed: NodeFeed = serde_json::from_value(json!({
            "nodes": [
                { "mac": "60:32:B1:00:00:01", "gateway": "gw-a", "domain": "ffmuc_muc_west",
                  "hostname": "offloader-1", "is_online": true },
                { "mac": "60:32:b1:00:00:02" }
            ]
        }))
        .unwrap();

        let hit = feed.find(&MacAddress::new("60-32-b1-00-00-01")).unwrap();
        assert_eq!(hit.gateway.as_deref(), Some("gw-a"));
        assert_eq!(hit.domain.as_deref(), Some("ffmuc_muc_west"));
        assert!(feed.find(&MacAddress::new("60:32:b1:00:00:03")).is_none());
    }

    #[test]
    fn missing_nodes_key_is_an_empty_feed() {
        let feed: NodeFeed = serde_json::from_value(json!({})).unwrap();
        assert!(feed.is_empty());
    }
}
