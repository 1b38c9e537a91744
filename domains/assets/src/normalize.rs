//! Asset reference normalization
//!
//! Entity asset columns have accumulated three shapes over time: bare
//! opaque ids, share URLs with a `/d/<id>/` path, and download URLs with an
//! `id=<id>` query parameter. Everything here reduces to the bare id where
//! one can be extracted; anything else is an external URL this system does
//! not own and must pass through untouched.

use std::sync::LazyLock;

/// Bare opaque drive ids are 25-44 chars of [A-Za-z0-9_-] (compiled once)
static CANONICAL_ID_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[A-Za-z0-9_-]{25,44}$").expect("canonical id regex is valid")
});

/// `/d/<id>/` path segment in share URLs
static PATH_ID_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"/d/([A-Za-z0-9_-]+)/").expect("path id regex is valid")
});

/// `id=<id>` query parameter in download URLs
static QUERY_ID_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"[?&]id=([A-Za-z0-9_-]+)").expect("query id regex is valid")
});

/// Extract the canonical id from an asset reference.
///
/// Tries, in order: bare id, `/d/<id>/` path, `id=<id>` query. Values that
/// match none of the known shapes come back unchanged.
pub fn normalize_asset_ref(value: &str) -> String {
    let value = value.trim();

    if is_canonical_ref(value) {
        return value.to_string();
    }

    if let Some(captures) = PATH_ID_REGEX.captures(value) {
        return captures[1].to_string();
    }

    if let Some(captures) = QUERY_ID_REGEX.captures(value) {
        return captures[1].to_string();
    }

    value.to_string()
}

/// Whether a value is a bare canonical id, safe to hand to the drive
pub fn is_canonical_ref(value: &str) -> bool {
    CANONICAL_ID_REGEX.is_match(value)
}
