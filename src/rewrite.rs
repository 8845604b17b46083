//! Result-location rewriting
//!
//! Upstream submission responses carry an absolute result URL on the
//! backend's own origin. The proxy re-houses the bearer token on a
//! same-origin path before the response reaches the browser, so the
//! backend's host, scheme, and port never appear in anything the caller
//! sees.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Same-origin path the proxy serves results from
pub const RESULTS_PATH: &str = "/api/results";

/// Fallback token scan for relative or otherwise unparseable locations
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"[?&]token=([^&#\s]+)").expect("hard-coded pattern compiles")
});

/// Rewrites an upstream result location onto the proxy's own origin
///
/// Strict URL parsing is attempted first; when it yields a `token` query
/// parameter, the decoded value is percent-re-encoded onto the proxy path.
/// Relative or malformed locations fall back to a regex scan, which uses
/// the token exactly as captured. A location with no recoverable token
/// degrades to the bare results path: the submission response still
/// succeeds, and the upstream rejects the eventual poll instead.
///
/// ```
/// use marketing_relay::rewrite::rewrite_result_url;
///
/// let rewritten = rewrite_result_url("https://backend:9000/results?token=abc");
/// assert_eq!(rewritten, "/api/results?token=abc");
/// ```
pub fn rewrite_result_url(location: &str) -> String {
    if let Ok(url) = Url::parse(location)
        && let Some(token) = url
            .query_pairs()
            .find(|(key, _)| key == "token")
            .map(|(_, value)| value.into_owned())
    {
        return format!("{RESULTS_PATH}?token={}", urlencoding::encode(&token));
    }

    if let Some(captures) = TOKEN_RE.captures(location) {
        return format!("{RESULTS_PATH}?token={}", urlencoding::encode(&captures[1]));
    }

    RESULTS_PATH.to_string()
}
