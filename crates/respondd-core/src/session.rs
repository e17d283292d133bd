// ── Controller sessions ──
//
// One poll cycle opens one controller-level session to enumerate sites,
// then a separate, freshly logged-in session per site. Sessions never
// outlive the cycle that created them.

use omada_api::{OmadaClient, TlsMode, TransportConfig};
use tracing::{debug, info, warn};

use crate::config::{ControllerConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{ClientSession, RawDevice, Site};

/// Translate core TLS settings into the transport's representation.
pub fn transport_for(config: &ControllerConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    TransportConfig {
        tls,
        timeout: config.timeout,
        ..TransportConfig::default()
    }
}

/// Controller-level login, used to enumerate sites and open site scopes.
pub struct ControllerSession {
    client: OmadaClient,
    config: ControllerConfig,
    transport: TransportConfig,
}

impl ControllerSession {
    /// Probe the controller id and log in.
    pub async fn authenticate(config: &ControllerConfig) -> Result<Self, CoreError> {
        let transport = transport_for(config);
        let controller = OmadaClient::controller_info(&config.url, &transport).await?;

        let client = OmadaClient::new(
            config.url.clone(),
            controller.omadac_id.clone(),
            None,
            &transport,
        )?;
        client.login(&config.username, &config.password).await?;
        info!(
            url = %config.url,
            version = controller.controller_ver.as_deref().unwrap_or("unknown"),
            "authenticated with controller"
        );

        Ok(Self {
            client,
            config: config.clone(),
            transport,
        })
    }

    /// Sites the configured user may access, in controller order.
    pub async fn list_sites(&self) -> Result<Vec<Site>, CoreError> {
        let sites: Vec<Site> = self
            .client
            .list_sites()
            .await?
            .into_iter()
            .map(Site::from)
            .collect();
        debug!(count = sites.len(), "enumerated sites");
        Ok(sites)
    }

    /// Open a freshly authenticated session scoped to `site`.
    pub async fn open_site_scope(&self, site: &Site) -> Result<SiteSession, CoreError> {
        let client = OmadaClient::new(
            self.config.url.clone(),
            self.client.omadac_id().map(str::to_owned),
            Some(site.key.clone()),
            &self.transport,
        )?;
        client.login(&self.config.username, &self.config.password).await?;
        debug!(site = %site.name, key = %site.key, "opened site scope");

        Ok(SiteSession {
            client,
            site: site.clone(),
        })
    }

    /// Same as [`open_site_scope`](Self::open_site_scope), by site name.
    pub async fn open_site_scope_by_name(
        &self,
        sites: &[Site],
        name: &str,
    ) -> Result<SiteSession, CoreError> {
        let site = sites
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| CoreError::SiteNotFound { name: name.into() })?;
        self.open_site_scope(site).await
    }

    /// Log out. Failures are logged; the session is gone either way.
    pub async fn close(self) {
        if let Err(e) = self.client.logout().await {
            warn!(error = %e, "controller logout failed");
        }
    }
}

/// A logged-in session scoped to one site.
pub struct SiteSession {
    client: OmadaClient,
    site: Site,
}

impl SiteSession {
    pub fn site(&self) -> &Site {
        &self.site
    }

    /// Read the site settings into [`Site::auto_upgrade`].
    pub async fn load_settings(&mut self) -> Result<(), CoreError> {
        let settings = self.client.site_settings().await?;
        self.site.auto_upgrade = settings.auto_upgrade.map(|a| a.enable);
        Ok(())
    }

    /// Device summaries; per-device detail is not yet merged.
    pub async fn devices(&self) -> Result<Vec<RawDevice>, CoreError> {
        let devices = self.client.list_devices().await?;
        Ok(devices.into_iter().map(RawDevice::from).collect())
    }

    /// Fetch the access point detail and merge it into `device`.
    pub async fn device_detail(&self, device: RawDevice) -> Result<RawDevice, CoreError> {
        let detail = self.client.get_ap(&device.controller_mac).await?;
        Ok(device.merge_detail(detail))
    }

    /// Every client associated anywhere in the site.
    pub async fn clients(&self) -> Result<Vec<ClientSession>, CoreError> {
        let clients = self.client.list_clients().await?;
        Ok(clients.into_iter().map(ClientSession::from).collect())
    }

    /// Clients associated with one access point.
    pub async fn device_clients(&self, device: &RawDevice) -> Result<Vec<ClientSession>, CoreError> {
        let clients = self.client.list_clients_for_ap(&device.controller_mac).await?;
        Ok(clients.into_iter().map(ClientSession::from).collect())
    }

    pub async fn close(self) {
        if let Err(e) = self.client.logout().await {
            warn!(site = %self.site.name, error = %e, "site logout failed");
        }
    }
}
