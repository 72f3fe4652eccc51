//! robots.txt interpretation
//!
//! The audit only needs two answers from a site's robots.txt: whether the
//! audited page may be crawled, and which sitemaps it advertises. Matching is
//! delegated to the robotstxt crate.

use robotstxt::DefaultMatcher;

/// Agent token used when asking whether generic crawlers may visit a page
pub const GENERIC_AGENT: &str = "*";

/// Content of a fetched robots.txt
#[derive(Debug, Clone)]
pub struct RobotsTxt {
    content: String,
}

impl RobotsTxt {
    /// Wraps raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Checks whether `url` may be crawled by `user_agent`
    ///
    /// Empty content allows everything.
    pub fn allows(&self, url: &str, user_agent: &str) -> bool {
        if self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }

    /// Returns the `Sitemap:` URLs declared in the file, in order
    pub fn sitemaps(&self) -> Vec<String> {
        self.content
            .lines()
            .filter_map(|line| {
                let (key, value) = line.trim().split_once(':')?;
                if key.trim().eq_ignore_ascii_case("sitemap") {
                    let value = value.trim();
                    (!value.is_empty()).then(|| value.to_string())
                } else {
                    None
                }
            })
            .collect()
    }
}
