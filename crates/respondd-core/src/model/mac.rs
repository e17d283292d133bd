// ── MAC address identity ──
//
// Controllers report hyphenated upper-case MACs, the node feed and the
// respondd consumers expect lowercase colon form. Everything that crosses
// the ingestion boundary goes through `MacAddress::new`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// MAC address, normalized to lowercase colon-separated format (aa:bb:cc:dd:ee:ff).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address from any common format.
    /// Accepts colon-separated, dash-separated, or bare 12-digit hex.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let lowered = raw.as_ref().trim().to_lowercase();
        if lowered.len() == 12 && lowered.chars().all(|c| c.is_ascii_hexdigit()) {
            let pairs: Vec<&str> = (0..6).filter_map(|i| lowered.get(i * 2..i * 2 + 2)).collect();
            return Self(pairs.join(":"));
        }
        Self(lowered.replace('-', ":"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Six colon-separated hex octets.
    pub fn is_valid(&self) -> bool {
        let octets: Vec<&str> = self.0.split(':').collect();
        octets.len() == 6
            && octets
                .iter()
                .all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()))
    }

    /// Bare hex form (`aabbccddeeff`), used as the respondd node id.
    pub fn to_node_id(&self) -> String {
        self.0.replace(':', "")
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<String> for MacAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for MacAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hyphenated_upper_case_is_normalized() {
        assert_eq!(MacAddress::new("AA-BB-CC-DD-EE-FF").as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn mixed_case_colon_form_is_lowered() {
        assert_eq!(MacAddress::new("Aa:bB:cc:DD:ee:Ff").as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn bare_hex_gets_separators() {
        assert_eq!(MacAddress::new("AABBCCDDEEFF").as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in [
            "AA-BB-CC-DD-EE-FF",
            "00-1a-2B-3c-4D-5e",
            "f0:9f:c2:00:11:22",
            "001A2B3C4D5E",
            "60-32-B1-7A-00-01",
        ] {
            let once = MacAddress::new(raw);
            let twice = MacAddress::new(once.as_str());
            assert_eq!(once, twice, "not idempotent for {raw}");
            assert!(once.is_valid(), "{raw} normalized to invalid {once}");
            assert_eq!(once.as_str(), once.as_str().to_lowercase());
            assert!(!once.as_str().contains('-'));
        }
    }

    #[test]
    fn garbage_is_not_valid() {
        assert!(!MacAddress::new("not-a-mac").is_valid());
        assert!(!MacAddress::new("aa:bb:cc:dd:ee").is_valid());
    }

    #[test]
    fn node_id_strips_separators() {
        assert_eq!(MacAddress::new("AA-BB-CC-DD-EE-FF").to_node_id(), "aabbccddeeff");
    }

    #[test]
    fn deserialization_normalizes() {
        let mac: MacAddress = serde_json::from_str("\"AA-BB-CC-DD-EE-FF\"").unwrap();
        assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
        assert_eq!(serde_json::to_string(&mac).unwrap(), "\"aa:bb:cc:dd:ee:ff\"");
    }
}
