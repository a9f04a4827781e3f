use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::model::RawCell;

// ---------------------------------------------------------------------------
// Cell sanitizer – the single choke point for untrusted content
// ---------------------------------------------------------------------------

static SCRIPT_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
static JS_PROTOCOL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)javascript:").unwrap());
static EVENT_HANDLER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bon\w+\s*=").unwrap());

/// Strip adversarial markup from a string cell.
///
/// Removes `<script …>…</script>` fragments (non-greedy, across newlines),
/// `javascript:` protocol prefixes, inline `on<word>=` handler patterns and
/// every remaining angle bracket, then trims surrounding whitespace.
/// Idempotent: sanitizing an already-clean string returns it unchanged.
pub fn sanitize_string(raw: &str) -> String {
    let stripped = SCRIPT_TAG.replace_all(raw, "");
    let stripped = JS_PROTOCOL.replace_all(&stripped, "");
    let stripped = EVENT_HANDLER.replace_all(&stripped, "");
    let stripped: String = stripped.chars().filter(|c| *c != '<' && *c != '>').collect();
    stripped.trim().to_string()
}

/// Round a number to at most 10 decimal digits of precision.
pub fn clamp_precision(v: f64) -> f64 {
    let scaled = v * 1e10;
    if scaled.is_finite() {
        scaled.round() / 1e10
    } else {
        v
    }
}

/// Coerce a raw cell to a number.  Finite numbers are precision-clamped;
/// strings are stripped to digits, dots and minus signs and parsed.
/// Unparseable or non-finite input collapses to 0: this function always
/// returns a number.  Absent or rejected cells become `Null` upstream in
/// the mapper; the two policies are deliberate and distinct.
pub fn sanitize_number(raw: &RawCell) -> f64 {
    match raw {
        RawCell::Num(n) if n.is_finite() => clamp_precision(*n),
        RawCell::Str(s) => sanitize_number_text(s),
        _ => 0.0,
    }
}

/// String half of [`sanitize_number`].
pub fn sanitize_number_text(s: &str) -> f64 {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => clamp_precision(v),
        _ => 0.0,
    }
}

// ---------------------------------------------------------------------------
// URL validator – allow-listed hosts only
// ---------------------------------------------------------------------------

/// Accept a sanitized string as a URL only if it is absolute http/https and
/// its hostname equals, or is a dot-suffixed subdomain of, a trusted host.
/// Everything else, malformed URLs included, yields `None`.
pub fn validate_url(candidate: &str, trusted_hosts: &[String]) -> Option<String> {
    let parsed = Url::parse(candidate).ok()?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return None;
    }
    let host = parsed.host_str()?.to_ascii_lowercase();
    let trusted = trusted_hosts.iter().any(|t| {
        let t = t.to_ascii_lowercase();
        host == t || host.ends_with(&format!(".{t}"))
    });
    if trusted {
        Some(candidate.to_string())
    } else {
        None
    }
}
