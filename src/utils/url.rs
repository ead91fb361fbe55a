//! Helpers for building Gemini endpoint URLs from a configured base URL.

/// Strips trailing slashes so endpoint paths can be appended safely.
///
/// # Examples
///
/// ```
/// use tutor::utils::url::normalize_base_url;
///
/// assert_eq!(
///     normalize_base_url("https://generativelanguage.googleapis.com/"),
///     "https://generativelanguage.googleapis.com"
/// );
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Joins a base URL and an endpoint path with exactly one slash.
///
/// # Examples
///
/// ```
/// use tutor::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:8080/", "/v1beta/models"),
///     "http://localhost:8080/v1beta/models"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// The `generateContent` endpoint for `model`.
///
/// # Examples
///
/// ```
/// use tutor::utils::url::generate_content_url;
///
/// assert_eq!(
///     generate_content_url("https://generativelanguage.googleapis.com", "gemini-3-pro-preview"),
///     "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-pro-preview:generateContent"
/// );
/// ```
pub fn generate_content_url(base_url: &str, model: &str) -> String {
    construct_api_url(base_url, &format!("v1beta/models/{model}:generateContent"))
}

/// `host:port` of a base URL, defaulting to port 443.
pub fn host_and_port(base_url: &str) -> String {
    let without_scheme = base_url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(base_url);
    let authority = without_scheme.split('/').next().unwrap_or(without_scheme);
    if authority.contains(':') {
        authority.to_string()
    } else {
        format!("{authority}:443")
    }
}
