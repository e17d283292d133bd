// ── Channel descriptor decoding ──
//
// Omada reports the active radio setting as `"<channel>/<width>MHz"`, e.g.
// `"6/20MHz"` or `"44 (5220MHz)/80MHz"`. A disabled radio reports `"N/A"`.

use tracing::warn;

use crate::error::DecodeError;

const SENTINELS: [&str; 2] = ["n/a", "not applicable"];

/// Parse a channel descriptor into its bandwidth segment in MHz.
///
/// `Ok(None)` for empty input and the not-applicable sentinels.
pub fn parse(descriptor: &str) -> Result<Option<u32>, DecodeError> {
    let trimmed = descriptor.trim();
    if trimmed.is_empty() || SENTINELS.contains(&trimmed.to_ascii_lowercase().as_str()) {
        return Ok(None);
    }

    let malformed = |reason: &str| DecodeError::ChannelDescriptor {
        input: descriptor.to_owned(),
        reason: reason.to_owned(),
    };

    let width = trimmed
        .split('/')
        .nth(1)
        .ok_or_else(|| malformed("missing '/' separator"))?
        .trim();
    let digits = strip_suffix_ignore_case(width, "mhz").trim();

    digits
        .parse::<u32>()
        .map(Some)
        .map_err(|e| malformed(&e.to_string()))
}

/// Lenient form of [`parse`]: malformed input is logged and yields `None`.
pub fn decode(descriptor: Option<&str>) -> Option<u32> {
    let descriptor = descriptor?;
    match parse(descriptor) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "ignoring channel descriptor");
            None
        }
    }
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> &'a str {
    let split = s.len().saturating_sub(suffix.len());
    match (s.get(..split), s.get(split..)) {
        (Some(head), Some(tail)) if tail.eq_ignore_ascii_case(suffix) => head,
        _ => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bandwidth_is_the_second_segment() {
        assert_eq!(parse("6/20MHz"), Ok(Some(20)));
        assert_eq!(parse("44/80MHz"), Ok(Some(80)));
        assert_eq!(parse("44 (5220MHz)/80MHz"), Ok(Some(80)));
        assert_eq!(parse(" 36/40 mhz "), Ok(Some(40)));
        assert_eq!(parse("6/20/40MHz"), Ok(Some(20)));
    }

    #[test]
    fn sentinels_are_absent_not_zero() {
        assert_eq!(parse("N/A"), Ok(None));
        assert_eq!(parse("n/a"), Ok(None));
        assert_eq!(parse("Not Applicable"), Ok(None));
        assert_eq!(parse(""), Ok(None));
        assert_eq!(parse("   "), Ok(None));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            parse("garbage"),
            Err(DecodeError::ChannelDescriptor { .. })
        ));
        assert!(parse("6/wideMHz").is_err());
        assert!(parse("6/").is_err());
    }

    #[test]
    fn lenient_decode_never_fails() {
        assert_eq!(decode(Some("6/20MHz")), Some(20));
        assert_eq!(decode(Some("garbage")), None);
        assert_eq!(decode(Some("N/A")), None);
        assert_eq!(decode(None), None);
    }
}
