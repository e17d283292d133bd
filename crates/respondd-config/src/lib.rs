//! Configuration for omada-respondd.
//!
//! A TOML file merged with `RESPONDD_`-prefixed environment variables,
//! credential resolution (env + plaintext), and translation to
//! `respondd_core::PipelineConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use respondd_core::{
    ControllerConfig, DEFAULT_FALLBACK_DOMAIN, GeocoderConfig, MacAddress, PipelineConfig,
    SchemaMode, SnmpLocationPolicy, TlsVerification, TrafficSource,
};

const ENV_PREFIX: &str = "RESPONDD_";
const PASSWORD_ENV: &str = "RESPONDD_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for user '{username}'")]
    NoCredentials { username: String },

    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Controller base URL (e.g., "https://omada.example.org:8043").
    pub controller_url: String,

    pub username: String,

    /// Password (plaintext; prefer `password_env` or `RESPONDD_PASSWORD`).
    pub password: Option<String>,

    /// Name of an environment variable holding the password.
    pub password_env: Option<String>,

    /// Verify the controller's TLS certificate.
    #[serde(default = "default_true")]
    pub ssl_verify: bool,

    /// Path to a custom CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Mesh node feed URL (`{"nodes": [...]}`).
    pub nodelist: Option<String>,

    /// SSID filter, matched case-insensitively.
    #[serde(default = "default_ssid_regex")]
    pub ssid_regex: String,

    /// Offloader MAC per site name.
    #[serde(default)]
    pub offloader_mac: HashMap<String, String>,

    #[serde(default = "default_fallback_domain")]
    pub fallback_domain: String,

    #[serde(default)]
    pub schema: SchemaMode,

    #[serde(default)]
    pub traffic_source: TrafficSource,

    #[serde(default)]
    pub snmp_location: SnmpLocationPolicy,

    #[serde(default)]
    pub geocoder: GeocoderSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeocoderSettings {
    #[serde(default = "default_geocoder_url")]
    pub url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            url: default_geocoder_url(),
            user_agent: default_user_agent(),
            min_interval_ms: default_min_interval_ms(),
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_timeout() -> u64 {
    30
}
fn default_ssid_regex() -> String {
    ".*".into()
}
fn default_fallback_domain() -> String {
    DEFAULT_FALLBACK_DOMAIN.into()
}
fn default_geocoder_url() -> String {
    GeocoderConfig::default().url
}
fn default_user_agent() -> String {
    GeocoderConfig::default().user_agent
}
fn default_min_interval_ms() -> u64 {
    1000
}
fn default_max_attempts() -> u32 {
    3
}
fn default_initial_backoff_ms() -> u64 {
    1000
}
fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Config {
    /// Render as TOML with the plaintext password masked.
    pub fn to_redacted_toml(&self) -> Result<String, ConfigError> {
        let mut redacted = self.clone();
        if redacted.password.is_some() {
            redacted.password = Some("********".into());
        }
        Ok(toml::to_string_pretty(&redacted)?)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("net", "ffmuc", "omada-respondd").map_or_else(
        || PathBuf::from("/etc/omada-respondd/config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the Config from file + environment.
///
/// An explicit `path` must exist; the default path may be absent, in which
/// case everything has to come from the environment.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(explicit) if !explicit.exists() => {
            return Err(ConfigError::NotFound {
                path: explicit.to_path_buf(),
            });
        }
        Some(explicit) => explicit.to_path_buf(),
        None => config_path(),
    };

    let figment = Figment::new().merge(Toml::file(&path)).merge(
        Env::prefixed(ENV_PREFIX)
            .ignore(&["password"])
            .split("__"),
    );

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Credential resolution ───────────────────────────────────────────

/// `password_env` variable, then `RESPONDD_PASSWORD`, then plaintext.
pub fn resolve_password(config: &Config) -> Result<SecretString, ConfigError> {
    // 1. Configured env var
    if let Some(ref env_name) = config.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Well-known env var
    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(val));
    }

    // 3. Plaintext in config
    if let Some(ref pw) = config.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        username: config.username.clone(),
    })
}

// ── Translation ─────────────────────────────────────────────────────

fn parse_url(field: &str, raw: &str) -> Result<url::Url, ConfigError> {
    raw.parse().map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })
}

/// Build the pipeline config, validating everything that can be checked
/// without touching the network.
pub fn to_pipeline_config(config: &Config) -> Result<PipelineConfig, ConfigError> {
    let url = parse_url("controller_url", &config.controller_url)?;

    if config.username.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "username".into(),
            reason: "must not be empty".into(),
        });
    }
    let password = resolve_password(config)?;

    let tls = if !config.ssl_verify {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = config.ca_cert {
        if !ca_path.exists() {
            return Err(ConfigError::Validation {
                field: "ca_cert".into(),
                reason: format!("{} does not exist", ca_path.display()),
            });
        }
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    regex::Regex::new(&config.ssid_regex).map_err(|e| ConfigError::Validation {
        field: "ssid_regex".into(),
        reason: e.to_string(),
    })?;

    let mut offloader_macs = HashMap::with_capacity(config.offloader_mac.len());
    for (site, raw) in &config.offloader_mac {
        let mac = MacAddress::new(raw);
        if !mac.is_valid() {
            return Err(ConfigError::Validation {
                field: format!("offloader_mac.{site}"),
                reason: format!("'{raw}' is not a MAC address"),
            });
        }
        offloader_macs.insert(site.clone(), mac);
    }

    let node_feed_url = config
        .nodelist
        .as_deref()
        .map(|raw| parse_url("nodelist", raw))
        .transpose()?;

    let geocoder = &config.geocoder;
    parse_url("geocoder.url", &geocoder.url)?;
    if geocoder.max_attempts == 0 {
        return Err(ConfigError::Validation {
            field: "geocoder.max_attempts".into(),
            reason: "must be at least 1".into(),
        });
    }
    let timeout = Duration::from_secs(config.timeout);

    Ok(PipelineConfig {
        controller: ControllerConfig {
            url,
            username: config.username.clone(),
            password,
            tls,
            timeout,
        },
        node_feed_url,
        ssid_pattern: config.ssid_regex.clone(),
        offloader_macs,
        fallback_domain: config.fallback_domain.clone(),
        schema: config.schema,
        traffic_source: config.traffic_source,
        snmp_location: config.snmp_location,
        geocoder: GeocoderConfig {
            url: geocoder.url.clone(),
            user_agent: geocoder.user_agent.clone(),
            min_interval: Duration::from_millis(geocoder.min_interval_ms),
            max_attempts: geocoder.max_attempts,
            initial_backoff: Duration::from_millis(geocoder.initial_backoff_ms),
            max_backoff: Duration::from_millis(geocoder.max_backoff_ms),
            timeout,
        },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const MINIMAL: &str = r#"
        controller_url = "https://omada.example.org:8043"
        username = "respondd"
        password = "from-file"
    "#;

    // Every test runs inside a Jail: it serializes access to the process
    // environment, which credential resolution reads.

    #[test]
    fn minimal_file_gets_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", MINIMAL)?;
            let config = load_config(Some(Path::new("config.toml"))).unwrap();

            assert!(config.ssl_verify);
            assert_eq!(config.timeout, 30);
            assert_eq!(config.ssid_regex, ".*");
            assert_eq!(config.fallback_domain, "ffmuc_omada_respondd_fallback");
            assert_eq!(config.schema, SchemaMode::Auto);
            assert_eq!(config.snmp_location, SnmpLocationPolicy::RequireSnmpLocation);
            assert_eq!(config.geocoder.max_attempts, 3);

            let pipeline = to_pipeline_config(&config).unwrap();
            assert_eq!(pipeline.controller.password.expose_secret(), "from-file");
            assert_eq!(pipeline.controller.tls, TlsVerification::SystemDefaults);
            assert_eq!(pipeline.geocoder.min_interval, Duration::from_secs(1));
            assert!(pipeline.node_feed_url.is_none());
            Ok(())
        });
    }

    #[test]
    fn full_file_translates() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                controller_url = "https://omada.example.org:8043"
                username = "respondd"
                password = "pw"
                ssl_verify = false
                timeout = 10
                nodelist = "https://map.ffmuc.net/data/nodes.json"
                ssid_regex = "(?i)freifunk"
                schema = "ssid-overrides"
                traffic_source = "clients"
                snmp_location = "optional"

                [offloader_mac]
                Muenchen = "60-32-B1-00-00-01"

                [geocoder]
                url = "https://geocode.example.org/"
                min_interval_ms = 1500
                "#,
            )?;
            let config = load_config(Some(Path::new("config.toml"))).unwrap();
            let pipeline = to_pipeline_config(&config).unwrap();

            assert_eq!(pipeline.controller.tls, TlsVerification::DangerAcceptInvalid);
            assert_eq!(pipeline.controller.timeout, Duration::from_secs(10));
            assert_eq!(pipeline.schema, SchemaMode::SsidOverrides);
            assert_eq!(pipeline.traffic_source, TrafficSource::ClientSessions);
            assert_eq!(pipeline.snmp_location, SnmpLocationPolicy::IncludeAll);
            assert_eq!(
                pipeline.offloader_macs["Muenchen"],
                MacAddress::new("60:32:b1:00:00:01")
            );
            assert_eq!(
                pipeline.node_feed_url.unwrap().as_str(),
                "https://map.ffmuc.net/data/nodes.json"
            );
            assert_eq!(pipeline.geocoder.min_interval, Duration::from_millis(1500));
            assert_eq!(pipeline.geocoder.timeout, Duration::from_secs(10));
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", MINIMAL)?;
            jail.set_env("RESPONDD_TIMEOUT", "5");
            jail.set_env("RESPONDD_GEOCODER__MAX_ATTEMPTS", "7");

            let config = load_config(Some(Path::new("config.toml"))).unwrap();

            assert_eq!(config.timeout, 5);
            assert_eq!(config.geocoder.max_attempts, 7);
            Ok(())
        });
    }

    #[test]
    fn password_resolution_order() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", MINIMAL)?;
            let mut config = load_config(Some(Path::new("config.toml"))).unwrap();
            assert_eq!(resolve_password(&config).unwrap().expose_secret(), "from-file");

            jail.set_env("RESPONDD_PASSWORD", "from-env");
            assert_eq!(resolve_password(&config).unwrap().expose_secret(), "from-env");

            jail.set_env("OMADA_SECRET", "from-named-env");
            config.password_env = Some("OMADA_SECRET".into());
            assert_eq!(
                resolve_password(&config).unwrap().expose_secret(),
                "from-named-env"
            );
            Ok(())
        });
    }

    #[test]
    fn password_env_var_is_not_a_config_key() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                controller_url = "https://omada.example.org"
                username = "respondd"
                "#,
            )?;
            jail.set_env("RESPONDD_PASSWORD", "from-env");

            let config = load_config(Some(Path::new("config.toml"))).unwrap();

            assert!(config.password.is_none());
            assert_eq!(resolve_password(&config).unwrap().expose_secret(), "from-env");
            Ok(())
        });
    }

    #[test]
    fn missing_password_is_reported() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                controller_url = "https://omada.example.org"
                username = "respondd"
                "#,
            )?;
            let config = load_config(Some(Path::new("config.toml"))).unwrap();

            assert!(matches!(
                to_pipeline_config(&config),
                Err(ConfigError::NoCredentials { .. })
            ));
            Ok(())
        });
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        Jail::expect_with(|_jail| {
            let result = load_config(Some(Path::new("does-not-exist.toml")));
            assert!(matches!(result, Err(ConfigError::NotFound { .. })));
            Ok(())
        });
    }

    #[test]
    fn invalid_values_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", MINIMAL)?;
            let base = load_config(Some(Path::new("config.toml"))).unwrap();

            let mut bad_url = base.clone();
            bad_url.controller_url = "not a url".into();
            assert!(matches!(
                to_pipeline_config(&bad_url),
                Err(ConfigError::Validation { ref field, .. }) if field == "controller_url"
            ));

            let mut bad_regex = base.clone();
            bad_regex.ssid_regex = "(unclosed".into();
            assert!(matches!(
                to_pipeline_config(&bad_regex),
                Err(ConfigError::Validation { ref field, .. }) if field == "ssid_regex"
            ));

            let mut bad_mac = base.clone();
            bad_mac
                .offloader_mac
                .insert("Muenchen".into(), "60-32-B1".into());
            assert!(matches!(
                to_pipeline_config(&bad_mac),
                Err(ConfigError::Validation { ref field, .. }) if field == "offloader_mac.Muenchen"
            ));

            let mut missing_ca = base;
            missing_ca.ca_cert = Some(PathBuf::from("/nonexistent/ca.pem"));
            assert!(matches!(
                to_pipeline_config(&missing_ca),
                Err(ConfigError::Validation { ref field, .. }) if field == "ca_cert"
            ));
            Ok(())
        });
    }

    #[test]
    fn custom_ca_from_tempfile() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", MINIMAL)?;
            let mut ca = tempfile::NamedTempFile::new().unwrap();
            writeln!(ca, "-----BEGIN CERTIFICATE-----").unwrap();

            let mut config = load_config(Some(Path::new("config.toml"))).unwrap();
            config.ca_cert = Some(ca.path().to_path_buf());
            let pipeline = to_pipeline_config(&config).unwrap();

            assert_eq!(
                pipeline.controller.tls,
                TlsVerification::CustomCa(ca.path().to_path_buf())
            );
            Ok(())
        });
    }

    #[test]
    fn config_outside_jail_dir_via_tempfile() {
        Jail::expect_with(|_jail| {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            file.write_all(MINIMAL.as_bytes()).unwrap();

            let config = load_config(Some(file.path())).unwrap();

            assert_eq!(config.username, "respondd");
            Ok(())
        });
    }

    #[test]
    fn redacted_dump_hides_password() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", MINIMAL)?;
            let config = load_config(Some(Path::new("config.toml"))).unwrap();

            let dump = config.to_redacted_toml().unwrap();

            assert!(dump.contains("********"));
            assert!(!dump.contains("from-file"));
            assert!(dump.contains("controller_url"));
            Ok(())
        });
    }
}
