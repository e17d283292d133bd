// ── Client session domain type ──

use serde::{Deserialize, Serialize};

use super::mac::MacAddress;

/// Radio band a session is associated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Band {
    TwoGhz,
    FiveGhz,
}

impl Band {
    /// Channels above 14 are 5 GHz. A missing channel counts as 2.4 GHz.
    pub fn from_channel(channel: Option<u32>) -> Self {
        match channel {
            Some(ch) if ch > 14 => Self::FiveGhz,
            _ => Self::TwoGhz,
        }
    }
}

/// One wireless association as reported by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSession {
    pub mac: MacAddress,
    pub ssid: Option<String>,
    pub channel: Option<u32>,
    /// The AP this client is associated with.
    pub ap_mac: Option<MacAddress>,
    pub tx_bytes: Option<u64>,
    pub rx_bytes: Option<u64>,
}

impl ClientSession {
    pub fn band(&self) -> Band {
        Band::from_channel(self.channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_fourteen_is_the_last_two_ghz_channel() {
        assert_eq!(Band::from_channel(Some(1)), Band::TwoGhz);
        assert_eq!(Band::from_channel(Some(14)), Band::TwoGhz);
        assert_eq!(Band::from_channel(Some(15)), Band::FiveGhz);
        assert_eq!(Band::from_channel(Some(165)), Band::FiveGhz);
        assert_eq!(Band::from_channel(None), Band::TwoGhz);
    }
}
