// ── SSID pattern matching ──

use regex::{Regex, RegexBuilder};

use crate::error::CoreError;

/// Case-insensitive SSID filter, compiled once per cycle.
///
/// Matches anywhere in the SSID, so `freifunk` matches `FreiFunk-5G`.
#[derive(Debug, Clone)]
pub struct SsidMatcher {
    regex: Regex,
}

impl SsidMatcher {
    pub fn new(pattern: &str) -> Result<Self, CoreError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| CoreError::Config {
                message: format!("invalid SSID pattern {pattern:?}: {e}"),
            })?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, ssid: &str) -> bool {
        self.regex.is_match(ssid)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn matching_ignores_case() {
        let matcher = SsidMatcher::new("freifunk").unwrap();
        assert!(matcher.is_match("FreiFunk-5G"));
        assert!(matcher.is_match("muenchen.freifunk.net"));
        assert!(!matcher.is_match("Guest"));
    }

    #[test]
    fn anchors_are_honoured() {
        let matcher = SsidMatcher::new("^freifunk$").unwrap();
        assert!(matcher.is_match("FREIFUNK"));
        assert!(!matcher.is_match("freifunk-5g"));
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        assert!(matches!(
            SsidMatcher::new("(unclosed"),
            Err(CoreError::Config { .. })
        ));
    }
}
