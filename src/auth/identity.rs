// src/auth/identity.rs
//
// Sign-in happens upstream; the proxy forwards the authenticated username
// in a request header.
use http::HeaderMap;

pub const MAX_USERNAME_LEN: usize = 150;

/// Reads the username from `header`. Blank, oversized or non-UTF-8 values
/// count as anonymous.
pub fn username_from_headers(headers: &HeaderMap, header: &str) -> Option<String> {
    let raw = headers.get(header)?.to_str().ok()?.trim();
    if raw.is_empty() || raw.len() > MAX_USERNAME_LEN {
        return None;
    }
    Some(raw.to_string())
}
