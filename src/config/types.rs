use serde::Deserialize;

/// Browser-like identity sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0";

/// Language hint favoring Vietnamese content
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "vi-VN,vi;q=0.9,en-US;q=0.8";

/// PageSpeed Insights v5 endpoint
pub const DEFAULT_PAGESPEED_ENDPOINT: &str =
    "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

/// Main configuration structure for seo-audit
///
/// Every section is optional; a missing file section falls back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

/// HTTP identity and timeout configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// User-Agent header value
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Accept-Language header value
    #[serde(rename = "accept-language")]
    pub accept_language: String,

    /// Timeout for the audited page (seconds)
    #[serde(rename = "page-timeout-secs")]
    pub page_timeout_secs: u64,

    /// Timeout for robots.txt, sitemap.xml and link probes (seconds)
    #[serde(rename = "probe-timeout-secs")]
    pub probe_timeout_secs: u64,

    /// Maximum redirect hops followed per request
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            page_timeout_secs: 10,
            probe_timeout_secs: 3,
            max_redirects: 10,
        }
    }
}

/// Outbound link health configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Maximum number of unique links checked per audit
    #[serde(rename = "max-links")]
    pub max_links: usize,

    /// Maximum number of link probes in flight
    #[serde(rename = "max-concurrent")]
    pub max_concurrent: usize,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            max_links: 10,
            max_concurrent: 5,
        }
    }
}

/// External performance probe configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// PageSpeed Insights endpoint
    pub endpoint: String,

    /// API key; the probe is skipped when absent
    #[serde(rename = "api-key")]
    pub api_key: Option<String>,

    /// Timeout for the probe (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Lighthouse strategy, "mobile" or "desktop"
    pub strategy: String,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_PAGESPEED_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: 25,
            strategy: "mobile".to_string(),
        }
    }
}

impl PerformanceConfig {
    /// Returns the API key if one is configured and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Audit history configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Path to the SQLite history database
    #[serde(rename = "database-path")]
    pub database_path: Option<String>,
}
