// Omada API authentication
//
// Token + cookie session login/logout and controller-id discovery.
// The login endpoint sets a session cookie in the client's jar and returns
// a token that must accompany every later request as `Csrf-Token`.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::client::{OmadaClient, join_path, parse_envelope};
use crate::error::Error;
use crate::models::{ControllerInfo, LoginResult};
use crate::transport::TransportConfig;

impl OmadaClient {
    /// Probe the controller's unauthenticated `/api/info` endpoint.
    ///
    /// v5+ controllers report an `omadacId` that prefixes every API path;
    /// older controllers omit it and serve the API at the root.
    pub async fn controller_info(
        base_url: &Url,
        transport: &TransportConfig,
    ) -> Result<ControllerInfo, Error> {
        let http = transport.build_client()?;
        let url = join_path(base_url, "api/info")?;
        debug!("probing controller at {}", url);

        let resp = http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::from_transport(e, transport.timeout))?;
        let info: ControllerInfo = parse_envelope(resp, transport.timeout).await?;
        debug!(omadac_id = ?info.omadac_id, version = ?info.controller_ver, "controller info");
        Ok(info)
    }

    /// Authenticate with the controller using username/password.
    ///
    /// On success the session cookie lands in the client's jar and the
    /// returned token is stored for subsequent requests. Any envelope
    /// error during login is reported as [`Error::Authentication`].
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.api_url("login")?;
        debug!("logging in at {}", url);

        // A stale token must never be sent with a fresh login.
        self.clear_token();

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let result: LoginResult = match self.post(url, &body).await {
            Ok(result) => result,
            Err(Error::Api { code, message }) => {
                return Err(Error::Authentication {
                    message: format!("login rejected ({code}): {message}"),
                });
            }
            Err(Error::Deserialization { message, .. }) => {
                return Err(Error::Authentication {
                    message: format!("unexpected login response: {message}"),
                });
            }
            Err(e) => return Err(e),
        };

        self.set_token(result.token);
        debug!(site = ?self.site(), "login successful");
        Ok(())
    }

    /// End the current session.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.api_url("logout")?;
        debug!("logging out at {}", url);

        let outcome: Result<serde_json::Value, Error> = self.post(url, &json!({})).await;
        self.clear_token();
        match outcome {
            // Logout answers with an empty envelope on some releases.
            Ok(_) | Err(Error::Deserialization { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
