// ── Location resolution ──
//
// Turns an AP's free-text SNMP location into coordinates. Operators either
// type coordinates directly ("48.137, 11.575", "48.137 N 11.575 E") or a
// postal address, which is looked up with a Nominatim-compatible geocoder.
// Geocoder calls are throttled process-wide; temporary failures are retried
// a bounded number of times. A location that cannot be resolved is reported
// as such.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};
use url::Url;

use omada_api::TransportConfig;

use crate::config::GeocoderConfig;
use crate::error::{CoreError, DecodeError};
use crate::model::Coordinates;

// ── Direct parsing ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Latitude,
    Longitude,
}

/// Split a leading or trailing hemisphere letter off one component.
fn parse_component(raw: &str) -> Option<(f64, Option<Axis>)> {
    let s = raw.trim();
    let hemisphere = |c: char| match c.to_ascii_uppercase() {
        'N' => Some((Axis::Latitude, 1.0)),
        'S' => Some((Axis::Latitude, -1.0)),
        'E' => Some((Axis::Longitude, 1.0)),
        'W' => Some((Axis::Longitude, -1.0)),
        _ => None,
    };

    let (number, marker) = match (s.chars().next(), s.chars().last()) {
        (_, Some(last)) if hemisphere(last).is_some() => {
            (s.get(..s.len() - last.len_utf8())?, hemisphere(last))
        }
        (Some(first), _) if hemisphere(first).is_some() => {
            (s.get(first.len_utf8()..)?, hemisphere(first))
        }
        _ => (s, None),
    };

    let value: f64 = number.trim().parse().ok()?;
    match marker {
        Some((axis, sign)) => Some((value.abs() * sign, Some(axis))),
        None => Some((value, None)),
    }
}

fn is_marker(token: &str) -> bool {
    token.len() == 1 && token.chars().all(|c| "NSEWnsew".contains(c))
}

fn has_marker(part: &str) -> bool {
    part.contains(|c: char| c.is_ascii_alphabetic())
}

/// Rejoin whitespace tokens so a lone hemisphere letter stays with its
/// number: as a suffix when the previous number has none yet, otherwise as
/// a prefix of the next one.
fn whitespace_components(s: &str) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut pending: Option<&str> = None;
    for token in s.split_whitespace() {
        if is_marker(token) {
            match parts.last_mut() {
                Some(prev) if pending.is_none() && !has_marker(prev) => {
                    prev.push(' ');
                    prev.push_str(token);
                }
                _ => pending = Some(token),
            }
            continue;
        }
        match pending.take() {
            Some(marker) => parts.push(format!("{marker} {token}")),
            None => parts.push(token.to_owned()),
        }
    }
    if let Some(marker) = pending {
        parts.push(marker.to_owned());
    }
    parts
}

/// Parse a structured coordinate pair.
///
/// Accepts `lat, lon`, `lat; lon`, `lat lon` and hemisphere-suffixed forms.
/// Hemisphere letters may put longitude first.
pub fn parse_coordinates(text: &str) -> Result<Coordinates, DecodeError> {
    let err = |reason: &str| DecodeError::Coordinates {
        input: text.to_owned(),
        reason: reason.to_owned(),
    };

    let cleaned = text.trim().replace('°', " ");
    let parts: Vec<String> = if cleaned.contains([',', ';']) {
        cleaned.split([',', ';']).map(|p| p.trim().to_owned()).collect()
    } else {
        whitespace_components(&cleaned)
    };

    let [first, second] = parts.as_slice() else {
        return Err(err("expected exactly two components"));
    };
    let (a, a_axis) = parse_component(first).ok_or_else(|| err("first component is not a number"))?;
    let (b, b_axis) =
        parse_component(second).ok_or_else(|| err("second component is not a number"))?;

    let coords = match (a_axis, b_axis) {
        (Some(x), Some(y)) if x == y => return Err(err("both components on the same axis")),
        (Some(Axis::Longitude), _) | (_, Some(Axis::Latitude)) => Coordinates::new(b, a),
        _ => Coordinates::new(a, b),
    };

    if coords.in_range() {
        Ok(coords)
    } else {
        Err(err("out of range"))
    }
}

// ── Throttle ─────────────────────────────────────────────────────────

/// Minimum spacing between calls, shared by every clone.
#[derive(Debug, Clone)]
pub struct Throttle {
    min_interval: Duration,
    last_call: Arc<Mutex<Option<Instant>>>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Arc::new(Mutex::new(None)),
        }
    }

    /// Wait until a call is allowed, then record it.
    pub async fn acquire(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

// ── Geocoder ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Nominatim search client.
#[derive(Debug, Clone)]
pub struct Geocoder {
    http: reqwest::Client,
    search_url: Url,
    throttle: Throttle,
    timeout: Duration,
}

impl Geocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, CoreError> {
        let mut base = config.url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let search_url = Url::parse(&base)
            .and_then(|u| u.join("search"))
            .map_err(|e| CoreError::Config {
                message: format!("invalid geocoder URL {:?}: {e}", config.url),
            })?;

        let transport = TransportConfig {
            timeout: config.timeout,
            ..TransportConfig::default()
        }
        .with_user_agent(config.user_agent.clone());

        Ok(Self {
            http: transport.build_client()?,
            search_url,
            throttle: Throttle::new(config.min_interval),
            timeout: config.timeout,
        })
    }

    /// One throttled lookup. `Ok(None)` means the service found nothing.
    pub async fn lookup(&self, query: &str) -> Result<Option<Coordinates>, CoreError> {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("limit", "1");

        self.throttle.acquire().await;
        debug!(query, "geocoding");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| omada_api::Error::from_transport(e, self.timeout))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(omada_api::Error::Http {
                status: status.as_u16(),
                url: self.search_url.to_string(),
            }
            .into());
        }

        let places: Vec<Place> = resp.json().await.map_err(|e| CoreError::Api {
            message: format!("geocoder response: {e}"),
            code: None,
            status: None,
        })?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };
        let coords = parse_coordinates(&format!("{}, {}", place.lat, place.lon))?;
        Ok(Some(coords))
    }
}

// ── Resolver ─────────────────────────────────────────────────────────

/// Where a record's coordinates came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationOutcome {
    /// The text itself was a coordinate pair; no lookup was made.
    Direct(Coordinates),
    Geocoded(Coordinates),
    /// Nothing found or retries exhausted.
    Unresolved,
}

impl LocationOutcome {
    pub fn resolved(self) -> Option<Coordinates> {
        match self {
            Self::Direct(c) | Self::Geocoded(c) => Some(c),
            Self::Unresolved => None,
        }
    }

    /// Resolved coordinates, or 0,0.
    pub fn coordinates(self) -> Coordinates {
        self.resolved().unwrap_or(Coordinates::ZERO)
    }
}

#[derive(Debug, Clone)]
pub struct LocationResolver {
    geocoder: Geocoder,
    max_attempts: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl LocationResolver {
    pub fn new(config: &GeocoderConfig) -> Result<Self, CoreError> {
        Ok(Self {
            geocoder: Geocoder::new(config)?,
            max_attempts: config.max_attempts.max(1),
            initial_backoff: config.initial_backoff,
            max_backoff: config.max_backoff,
        })
    }

    pub async fn resolve(&self, text: &str) -> LocationOutcome {
        match parse_coordinates(text) {
            Ok(coords) => return LocationOutcome::Direct(coords),
            Err(e) => debug!(error = %e, "location is not a coordinate pair, geocoding"),
        }

        for attempt in 0..self.max_attempts {
            match self.geocoder.lookup(text).await {
                Ok(Some(coords)) => return LocationOutcome::Geocoded(coords),
                Ok(None) => {
                    debug!(location = text, "geocoder found nothing");
                    return LocationOutcome::Unresolved;
                }
                Err(e) if !e.is_transient() => {
                    warn!(location = text, error = %e, "geocoding failed, not retrying");
                    return LocationOutcome::Unresolved;
                }
                Err(e) => {
                    warn!(location = text, attempt = attempt + 1, error = %e, "geocoding failed");
                    if attempt + 1 < self.max_attempts {
                        tokio::time::sleep(calculate_backoff(
                            attempt,
                            self.initial_backoff,
                            self.max_backoff,
                        ))
                        .await;
                    }
                }
            }
        }

        warn!(location = text, attempts = self.max_attempts, "giving up on geocoding");
        LocationOutcome::Unresolved
    }
}

/// `delay = min(initial * 2^attempt, max)`
fn calculate_backoff(attempt: u32, initial: Duration, max: Duration) -> Duration {
    let factor = 2_u32.saturating_pow(attempt);
    initial.saturating_mul(factor).min(max)
}
