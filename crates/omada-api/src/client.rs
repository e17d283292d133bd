// Omada API HTTP client
//
// Wraps `reqwest::Client` with Omada-specific URL construction, envelope
// unwrapping, and controller-id path prefixing. Endpoint groups (sites,
// devices, clients) are implemented as inherent methods in separate files
// to keep this module focused on transport mechanics.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::OmadaResponse;
use crate::transport::TransportConfig;

const TOKEN_HEADER: &str = "Csrf-Token";

/// Raw HTTP client for the Omada controller's v2 web API.
///
/// Handles the `{ errorCode, msg, result }` envelope, the optional
/// `/{omadacId}` path prefix of v5+ controllers, and site-scoped URL
/// construction. All methods return the unwrapped `result` payload.
///
/// One client is one session: it owns its cookie jar and login token.
/// Site-scoped work happens on a separate client created with
/// [`OmadaClient::new`] and a site key.
pub struct OmadaClient {
    http: reqwest::Client,
    base_url: Url,
    omadac_id: Option<String>,
    site: Option<String>,
    token: RwLock<Option<String>>,
    timeout: Duration,
}

impl OmadaClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (the controller pins the token to a session cookie).
    /// `omadac_id` comes from [`OmadaClient::controller_info`]; `site` is the
    /// site key for site-scoped endpoints, `None` for controller-level calls.
    pub fn new(
        base_url: Url,
        omadac_id: Option<String>,
        site: Option<String>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self {
            timeout: config.timeout,
            ..Self::with_client(http, base_url, omadac_id, site)
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Timeout errors report the default transport timeout.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        omadac_id: Option<String>,
        site: Option<String>,
    ) -> Self {
        Self {
            http,
            base_url,
            omadac_id,
            site,
            token: RwLock::new(None),
            timeout: TransportConfig::default().timeout,
        }
    }

    /// The site key this client is scoped to, if any.
    pub fn site(&self) -> Option<&str> {
        self.site.as_deref()
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The controller id prefix (v5+ controllers only).
    pub fn omadac_id(&self) -> Option<&str> {
        self.omadac_id.as_deref()
    }

    // ── Token management ─────────────────────────────────────────────

    pub(crate) fn set_token(&self, token: String) {
        debug!("storing session token");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub(crate) fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether `login()` has produced a token for this client.
    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a controller-level URL: `{base}/{omadacId}/api/v2/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        match self.omadac_id.as_deref() {
            Some(id) => join_path(&self.base_url, &format!("{id}/api/v2/{path}")),
            None => join_path(&self.base_url, &format!("api/v2/{path}")),
        }
    }

    /// Build a site-scoped URL: `{base}/{omadacId}/api/v2/sites/{site}/{path}`.
    pub(crate) fn site_url(&self, path: &str) -> Result<Url, Error> {
        let site = self.site.as_deref().ok_or(Error::NoSiteScope)?;
        self.api_url(&format!("sites/{site}/{path}"))
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send an authenticated GET request and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let token = self.token().ok_or(Error::NotLoggedIn)?;

        let resp = self
            .http
            .get(url)
            .header(TOKEN_HEADER, token)
            .send()
            .await
            .map_err(|e| Error::from_transport(e, self.timeout))?;

        parse_envelope(resp, self.timeout).await
    }

    /// Send a POST request with JSON body and unwrap the envelope.
    ///
    /// The token header is attached when one is held; login itself is
    /// the only POST issued without one.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let mut req = self.http.post(url).json(body);
        if let Some(token) = self.token() {
            req = req.header(TOKEN_HEADER, token);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| Error::from_transport(e, self.timeout))?;

        parse_envelope(resp, self.timeout).await
    }
}

/// Append `path` to `base`, keeping any path prefix `base` already has
/// (controllers behind a reverse proxy at e.g. `/omada`).
pub(crate) fn join_path(base: &Url, path: &str) -> Result<Url, Error> {
    let root = base.as_str().trim_end_matches('/');
    Ok(Url::parse(&format!("{root}/{path}"))?)
}

/// Parse the `{ errorCode, msg, result }` envelope, returning `result` on
/// success or an `Error::Api` if `errorCode != 0`.
pub(crate) async fn parse_envelope<T: DeserializeOwned>(
    resp: reqwest::Response,
    timeout: Duration,
) -> Result<T, Error> {
    let status = resp.status();
    let url = resp.url().to_string();

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(Error::Authentication {
            message: format!("session rejected (HTTP {status})"),
        });
    }

    let body = resp
        .text()
        .await
        .map_err(|e| Error::from_transport(e, timeout))?;
    trace!(%status, body_len = body.len(), "received response");

    let envelope: OmadaResponse<T> = match serde_json::from_str(&body) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(Error::Http {
                status: status.as_u16(),
                url,
            });
        }
        Err(e) => {
            return Err(Error::Deserialization {
                message: e.to_string(),
                body,
            });
        }
    };

    if envelope.error_code != 0 {
        return Err(Error::Api {
            code: envelope.error_code,
            message: envelope
                .msg
                .unwrap_or_else(|| format!("errorCode={}", envelope.error_code)),
        });
    }

    envelope.result.ok_or_else(|| Error::Deserialization {
        message: "envelope carried no result".into(),
        body,
    })
}
