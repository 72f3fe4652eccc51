//! URL handling module
//!
//! Normalizes caller-supplied audit targets and resolves links found on the
//! audited page.

mod normalize;

pub use normalize::{normalize_target, resolve_link, AuditRequest};
