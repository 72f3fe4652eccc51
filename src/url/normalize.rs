use crate::{UrlError, UrlResult};
use url::Url;

/// Schemes that are never followed when collecting links
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// A normalized audit target
///
/// Holds both the normalized string (reported verbatim and used for the URL
/// structure check) and its parsed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRequest {
    raw: String,
    url: Url,
}

impl AuditRequest {
    /// Normalizes and parses a user-supplied URL
    pub fn new(input: &str) -> UrlResult<Self> {
        let raw = normalize_target(input)?;
        let url = Url::parse(&raw).map_err(|e| UrlError::Parse(e.to_string()))?;

        if url.host_str().map_or(true, str::is_empty) {
            return Err(UrlError::MissingHost);
        }

        Ok(Self { raw, url })
    }

    /// The normalized URL string, exactly as it will be fetched
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Builds `{origin}/{file}` for site-level files such as robots.txt
    pub fn origin_file(&self, file: &str) -> String {
        format!("{}/{}", self.url.origin().ascii_serialization(), file)
    }
}

/// Normalizes a raw URL string supplied by a caller
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject if empty
/// 2. Keep `http://` and `https://` URLs as they are (scheme matched
///    case-insensitively)
/// 3. Reject any other explicit `scheme://`, where the scheme is a valid
///    RFC 3986 scheme (`[A-Za-z][A-Za-z0-9+.-]*`)
/// 4. Otherwise treat the input as a bare host and prepend `https://`
///
/// # Examples
///
/// ```
/// use seo_audit::url::normalize_target;
///
/// assert_eq!(normalize_target("  example.com ").unwrap(), "https://example.com");
/// assert_eq!(normalize_target("http://example.com/a").unwrap(), "http://example.com/a");
/// ```
pub fn normalize_target(input: &str) -> UrlResult<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Ok(trimmed.to_string());
    }

    if let Some((scheme, _)) = trimmed.split_once("://") {
        if is_scheme(scheme) {
            return Err(UrlError::InvalidScheme(scheme.to_string()));
        }
    }

    Ok(format!("https://{}", trimmed))
}

/// True for `[A-Za-z][A-Za-z0-9+.-]*`
fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Resolves a link href to an absolute http(s) URL
///
/// Returns None if the link should be excluded:
/// - empty hrefs and same-page `#fragment` anchors
/// - javascript:, mailto:, tel: and data: links
/// - hrefs that fail to resolve against `base_url`
/// - non-HTTP(S) URLs after resolution
///
/// The fragment of the resolved URL is dropped so that `/a#x` and `/a#y`
/// collapse to the same link.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        return None;
    }

    let mut absolute = base_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    absolute.set_fragment(None);

    Some(absolute)
}
