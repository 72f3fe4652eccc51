//! On-page signal checks
//!
//! Each check is a pure function of the parsed document and the audit
//! context, returning exactly one finding. `PAGE_CHECKS` fixes the order in
//! which they run and therefore the order of their findings in the report.
//!
//! | Check | Critical | Warning | Passed |
//! |-------|----------|---------|--------|
//! | Title tag | absent or empty | < 10 or > 60 chars | 10-60 chars |
//! | Meta description | absent | - | present |
//! | H1 heading | none | more than one | exactly one |
//! | Image alt text | - | any image without alt | all have alt |
//! | Response speed | - | > 2000 ms | <= 2000 ms |
//! | URL structure | - | `_` or > 100 chars | neither |
//! | Mobile viewport | absent or no `width=device-width` | - | present |
//! | Canonical tag (premium) | - | absent | present |
//! | Heading structure (premium) | - | no h2 and no h3 | any h2/h3 |

use crate::audit::finding::Finding;
use crate::document::Document;

pub const TITLE_MIN_CHARS: usize = 10;
pub const TITLE_MAX_CHARS: usize = 60;
pub const SLOW_RESPONSE_MS: u64 = 2000;
pub const URL_MAX_CHARS: usize = 100;

/// Facts about the audited request that are not part of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditContext {
    /// Normalized target URL
    pub url: String,
    /// Measured response latency in milliseconds
    pub latency_ms: u64,
}

/// Signature shared by every on-page check
pub type PageCheck = fn(&Document, &AuditContext) -> Finding;

/// On-page checks in report order
pub const PAGE_CHECKS: &[PageCheck] = &[
    check_title,
    check_meta_description,
    check_h1,
    check_image_alt,
    check_response_speed,
    check_url_structure,
    check_viewport,
    check_canonical,
    check_heading_structure,
];

/// Runs every on-page check in declaration order
pub fn run_page_checks(document: &Document, context: &AuditContext) -> Vec<Finding> {
    PAGE_CHECKS
        .iter()
        .map(|check| check(document, context))
        .collect()
}

pub fn check_title(document: &Document, _context: &AuditContext) -> Finding {
    const TITLE: &str = "Title tag";

    let Some(title) = document.title.as_deref() else {
        return Finding::critical(
            TITLE,
            "The page has no <title> tag.",
            "Add a <title> that describes the page content.",
        );
    };

    let length = title.chars().count();
    if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&length) {
        return Finding::warning(
            TITLE,
            format!("Title is {} characters long.", length),
            "Keep the title between 10 and 60 characters.",
        );
    }

    Finding::passed(
        TITLE,
        format!("Title is {} characters long: \"{}\"", length, title),
    )
}

pub fn check_meta_description(document: &Document, _context: &AuditContext) -> Finding {
    const TITLE: &str = "Meta description";

    match document.meta_description.as_deref() {
        Some(description) => Finding::passed(
            TITLE,
            format!(
                "Meta description is present ({} characters).",
                description.chars().count()
            ),
        ),
        None => Finding::critical(
            TITLE,
            "The page has no meta description.",
            "Add a <meta name=\"description\"> of about 140-160 characters.",
        ),
    }
}

pub fn check_h1(document: &Document, _context: &AuditContext) -> Finding {
    const TITLE: &str = "H1 heading";

    match document.h1_count {
        0 => Finding::critical(
            TITLE,
            "No <h1> tag found.",
            "Add exactly one <h1> that states the page topic.",
        ),
        1 => Finding::passed(TITLE, "Found exactly one <h1> tag."),
        n => Finding::warning(
            TITLE,
            format!("Found {} <h1> tags.", n),
            "Use only one <h1> per page.",
        ),
    }
}

pub fn check_image_alt(document: &Document, _context: &AuditContext) -> Finding {
    const TITLE: &str = "Image alt text";

    let total = document.images.len();
    let missing = document.missing_alt_count();

    if missing > 0 {
        let sources: Vec<&str> = document
            .images
            .iter()
            .filter(|image| image.is_missing_alt())
            .map(|image| image.src.as_deref().unwrap_or("(no src)"))
            .collect();

        Finding::warning(
            TITLE,
            format!("{} image(s) missing alt text.", missing),
            "Add descriptive alt text to every image for SEO and accessibility.",
        )
        .with_detail(sources.join(", "))
    } else if total == 0 {
        Finding::passed(TITLE, "No images found.")
    } else {
        Finding::passed(TITLE, format!("All {} image(s) have alt text.", total))
    }
}

pub fn check_response_speed(_document: &Document, context: &AuditContext) -> Finding {
    const TITLE: &str = "Response speed";

    let message = format!("Server responded in {} ms.", context.latency_ms);
    if context.latency_ms > SLOW_RESPONSE_MS {
        Finding::warning(
            TITLE,
            message,
            "Consider a CDN, server-side caching and compressed images.",
        )
    } else {
        Finding::passed(TITLE, message)
    }
}

pub fn check_url_structure(_document: &Document, context: &AuditContext) -> Finding {
    const TITLE: &str = "URL structure";

    let length = context.url.chars().count();
    let has_underscore = context.url.contains('_');
    let too_long = length > URL_MAX_CHARS;

    let mut problems = Vec::new();
    if has_underscore {
        problems.push("contains underscores".to_string());
    }
    if too_long {
        problems.push(format!("is {} characters long", length));
    }

    if problems.is_empty() {
        Finding::passed(
            TITLE,
            format!("URL is {} characters long with no underscores.", length),
        )
    } else {
        Finding::warning(
            TITLE,
            format!("URL {}.", problems.join(" and ")),
            "Use hyphens instead of underscores and keep URLs under 100 characters.",
        )
    }
}

pub fn check_viewport(document: &Document, _context: &AuditContext) -> Finding {
    const TITLE: &str = "Mobile viewport";
    const FIX: &str =
        "Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">.";

    match document.viewport.as_deref() {
        None => Finding::critical(TITLE, "No viewport meta tag found.", FIX),
        Some(content) if !sets_device_width(content) => Finding::critical(
            TITLE,
            format!(
                "Viewport \"{}\" does not set width=device-width.",
                content
            ),
            FIX,
        ),
        Some(content) => Finding::passed(TITLE, format!("Viewport is \"{}\".", content)),
    }
}

/// Tolerates whitespace and case, e.g. `Width = device-width`
fn sets_device_width(content: &str) -> bool {
    let compact: String = content
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    compact.contains("width=device-width")
}

pub fn check_canonical(document: &Document, _context: &AuditContext) -> Finding {
    const TITLE: &str = "Canonical tag";

    let finding = match document.canonical.as_deref() {
        Some(href) => Finding::passed(TITLE, format!("Canonical URL is {}.", href)),
        None => Finding::warning(
            TITLE,
            "No <link rel=\"canonical\"> found.",
            "Add a canonical link pointing at the preferred URL of this page.",
        ),
    };
    finding.premium()
}

pub fn check_heading_structure(document: &Document, _context: &AuditContext) -> Finding {
    const TITLE: &str = "Heading structure (H2/H3)";

    let finding = if document.h2_count == 0 && document.h3_count == 0 {
        Finding::warning(
            TITLE,
            "No <h2> or <h3> headings found.",
            "Break content into sections with <h2> and <h3> headings.",
        )
    } else {
        Finding::passed(
            TITLE,
            format!(
                "Found {} <h2> and {} <h3> heading(s).",
                document.h2_count, document.h3_count
            ),
        )
    };
    finding.premium()
}
