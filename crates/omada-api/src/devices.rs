// Omada API device endpoints
//
// Read-only device access: the site device list and per-AP detail.

use tracing::debug;

use crate::client::OmadaClient;
use crate::error::Error;
use crate::models::{ApDetail, DeviceSummary};

impl OmadaClient {
    /// List all devices of the scoped site.
    ///
    /// `GET /api/v2/sites/{site}/devices`
    pub async fn list_devices(&self) -> Result<Vec<DeviceSummary>, Error> {
        let url = self.site_url("devices")?;
        debug!("listing devices");
        self.get(url).await
    }

    /// Full detail for one access point.
    ///
    /// `GET /api/v2/sites/{site}/eaps/{mac}` -- `mac` in the controller's own
    /// hyphenated form.
    pub async fn get_ap(&self, mac: &str) -> Result<ApDetail, Error> {
        let url = self.site_url(&format!("eaps/{mac}"))?;
        debug!(mac, "fetching access point detail");
        self.get(url).await
    }
}
