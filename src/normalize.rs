//! Canonical forms for user-supplied Jenkins locations.
//!
//! Every function here is pure and idempotent. None of them can fail; any
//! string, including the empty one, is accepted.

/// Strip every leading `https://` or `http://` and any trailing slashes.
///
/// Never adds a protocol back. Callers that build request URLs prepend
/// `https://` themselves (see [`format_host_url`]).
pub fn normalize_host(host: &str) -> String {
    let mut host = host;
    while let Some(rest) = host
        .strip_prefix("https://")
        .or_else(|| host.strip_prefix("http://"))
    {
        host = rest;
    }
    host.trim_end_matches('/').to_string()
}

/// Strip leading and trailing slashes, keeping internal structure.
pub fn normalize_path(path: &str) -> String {
    path.trim_matches('/').to_string()
}

/// Build an `https://` URL from a host and an optional context path.
///
/// Both parts are normalized first, so `("a.com/", "/jenkins/")` and
/// `("https://a.com", "jenkins")` produce the same result. No percent
/// encoding happens here.
pub fn format_host_url(host: &str, path: &str) -> String {
    let host = normalize_host(host);
    let path = normalize_path(path);

    let mut url = format!("https://{}", host);
    if !path.is_empty() {
        url.push('/');
        url.push_str(&path);
    }
    url
}

/// Normalize a full Jenkins URL into the stored form.
///
/// Trailing slashes are removed and `https://` is prepended when no scheme is
/// present. An explicit `http://` is kept as given.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim_end_matches('/');
    if url.is_empty() || has_scheme(url) {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

fn has_scheme(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
