//! Account code resolution from a row's origin tag

use once_cell::sync::Lazy;
use regex::Regex;

/// Prefix returned when an origin tag carries no account code
pub const UNKNOWN_PREFIX: &str = "UNKNOWN";

static PREFIX_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9]+)_").expect("prefix pattern is valid"));

/// Derive the normalized account code from an origin tag
///
/// `CCAL_01.01.2025_31.01.2025.csv` resolves to `CCAL`; a tag without a
/// leading `<code>_` segment resolves to [`UNKNOWN_PREFIX`].
pub fn extract_prefix(source: &str) -> String {
    PREFIX_PATTERN
        .captures(source)
        .and_then(|captures| captures.get(1))
        .map(|code| code.as_str().trim().to_uppercase())
        .unwrap_or_else(|| UNKNOWN_PREFIX.to_string())
}
