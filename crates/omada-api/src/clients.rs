// Omada API client (station) endpoints
//
// The client list is paged; these helpers walk every page so callers get
// the full association table in one call.

use tracing::debug;

use crate::client::OmadaClient;
use crate::error::Error;
use crate::models::{ClientEntry, Paged};

const PAGE_SIZE: u32 = 1000;

impl OmadaClient {
    /// List every client currently associated anywhere in the scoped site.
    ///
    /// `GET /api/v2/sites/{site}/clients?currentPage=N&currentPageSize=1000`
    pub async fn list_clients(&self) -> Result<Vec<ClientEntry>, Error> {
        debug!("listing site clients");
        self.collect_clients(None).await
    }

    /// List the clients associated with one access point.
    ///
    /// Same endpoint as [`list_clients`](Self::list_clients) with
    /// `filters.apMac={mac}`.
    pub async fn list_clients_for_ap(&self, ap_mac: &str) -> Result<Vec<ClientEntry>, Error> {
        debug!(ap_mac, "listing access point clients");
        self.collect_clients(Some(ap_mac)).await
    }

    async fn collect_clients(&self, ap_mac: Option<&str>) -> Result<Vec<ClientEntry>, Error> {
        let mut clients = Vec::new();
        let mut page: u32 = 1;

        loop {
            let mut url = self.site_url("clients")?;
            {
                let mut query = url.query_pairs_mut();
                query
                    .append_pair("currentPage", &page.to_string())
                    .append_pair("currentPageSize", &PAGE_SIZE.to_string());
                if let Some(mac) = ap_mac {
                    query.append_pair("filters.apMac", mac);
                }
            }

            let batch: Paged<ClientEntry> = self.get(url).await?;
            let received = batch.data.len();
            clients.extend(batch.data);

            let total = usize::try_from(batch.total_rows).unwrap_or(usize::MAX);
            if received == 0 || clients.len() >= total {
                break;
            }
            page += 1;
        }

        debug!(count = clients.len(), "collected clients");
        Ok(clients)
    }
}
