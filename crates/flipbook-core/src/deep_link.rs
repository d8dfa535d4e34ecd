//! Page numbers encoded in a URL hash.
//!
//! The canonical form is `#page=N`. Parsing also accepts a bare number (`#7`)
//! and a missing leading `#`.

const PAGE_KEY: &str = "page";

/// Parse a 1-based page number out of a hash. Returns `None` for empty,
/// malformed or zero values.
pub fn parse_hash(hash: &str) -> Option<usize> {
    let fragment = hash.trim().trim_start_matches('#');
    if fragment.is_empty() {
        return None;
    }

    let value = fragment
        .split('&')
        .find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            key.trim().eq_ignore_ascii_case(PAGE_KEY).then_some(value)
        })
        .unwrap_or(fragment);

    match value.trim().parse::<usize>() {
        Ok(0) | Err(_) => None,
        Ok(page) => Some(page),
    }
}

pub fn format_hash(page: usize) -> String {
    format!("#{PAGE_KEY}={page}")
}

/// Split `location#hash` into the location and its hash (with the `#`)
pub fn split_location(location: &str) -> (&str, Option<&str>) {
    match location.find('#') {
        Some(at) => (&location[..at], Some(&location[at..])),
        None => (location, None),
    }
}
