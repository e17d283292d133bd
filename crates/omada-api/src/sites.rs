// Omada API site endpoints
//
// Site listing is user-scoped (`users/current`) rather than site-scoped;
// settings live under the usual `sites/{key}/...` prefix.

use tracing::debug;

use crate::client::OmadaClient;
use crate::error::Error;
use crate::models::{CurrentUser, SiteRef, SiteSettings};

impl OmadaClient {
    /// The currently authenticated user, including site privileges.
    ///
    /// `GET /api/v2/users/current`
    pub async fn current_user(&self) -> Result<CurrentUser, Error> {
        let url = self.api_url("users/current")?;
        self.get(url).await
    }

    /// List all sites visible to the authenticated user.
    pub async fn list_sites(&self) -> Result<Vec<SiteRef>, Error> {
        debug!("listing sites");
        Ok(self.current_user().await?.privilege.sites)
    }

    /// Settings of the scoped site.
    ///
    /// `GET /api/v2/sites/{site}/setting`
    pub async fn site_settings(&self) -> Result<SiteSettings, Error> {
        let url = self.site_url("setting")?;
        debug!("fetching site settings");
        self.get(url).await
    }
}
