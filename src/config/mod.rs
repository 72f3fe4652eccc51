//! Configuration module for seo-audit
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional, so an audit can also run on `Config::default()`.
//!
//! # Example
//!
//! ```no_run
//! use seo_audit::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("seo-audit.toml")).unwrap();
//! println!("Checking up to {} links", config.links.max_links);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FetchConfig, HistoryConfig, LinksConfig, PerformanceConfig, DEFAULT_ACCEPT_LANGUAGE,
    DEFAULT_PAGESPEED_ENDPOINT, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
