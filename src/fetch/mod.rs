//! HTTP fetching for audits
//!
//! This module contains the two kinds of request an audit issues:
//! - the primary page fetch, whose failure aborts the whole audit
//! - auxiliary probes (robots.txt, sitemap.xml, links), whose failures are
//!   classified and handed back as data

mod client;
mod probe;

pub use client::{build_http_client, fetch_page, FetchedPage};
pub use probe::{probe, probe_text, FailureKind, ProbeOutcome};
