/// Template for profile links built from a bare public identifier.
pub const PROFILE_URL_PREFIX: &str = "https://www.linkedin.com/in/";

/// Canonical form of a LinkedIn URL, used as the dedup key for profiles.
///
/// Returns `None` for empty input and anything not on `linkedin.com`.
/// Otherwise drops the query string, trailing slashes, and upgrades
/// `http://` to `https://`.
pub fn normalize_profile_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.contains("linkedin.com") {
        return None;
    }

    let without_query = match raw.find('?') {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    let trimmed = without_query.trim_end_matches('/');

    let canonical = match trimmed.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => trimmed.to_string(),
    };
    Some(canonical)
}

/// Build a profile URL from a public identifier (`publicId`, `vanityName`, ...).
pub fn profile_url_from_identifier(identifier: &str) -> Option<String> {
    let identifier = identifier.trim().trim_matches('/');
    if identifier.is_empty() {
        return None;
    }
    normalize_profile_url(&format!("{PROFILE_URL_PREFIX}{identifier}"))
}

/// True for a member profile link (`/in/<handle>`), as opposed to a post,
/// company page or feed item.
pub fn is_member_profile(url: &str) -> bool {
    url.contains("linkedin.com/in/")
}
