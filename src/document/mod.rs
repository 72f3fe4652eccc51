//! HTML document parsing
//!
//! This module parses fetched HTML with `scraper` and extracts the elements
//! the audit checks read:
//! - The first `<title>`
//! - `<meta name="description">` and `<meta name="viewport">`
//! - `<link rel="canonical">`
//! - `<h1>`, `<h2>` and `<h3>` counts
//! - Every `<img>` with its `alt`
//! - Every `<a href>`
//!
//! The result is an owned snapshot, so it can be held across `.await` points
//! while the auxiliary checks run.

use scraper::{ElementRef, Html, Selector};

/// An `<img>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// The `src` attribute, if any
    pub src: Option<String>,
    /// The `alt` attribute, if present and non-blank
    pub alt: Option<String>,
}

impl Image {
    /// True when the image has no usable alt text
    pub fn is_missing_alt(&self) -> bool {
        self.alt.is_none()
    }
}

/// Extracted SEO-relevant elements of an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Text of the first `<title>`, trimmed
    pub title: Option<String>,

    /// `content` of `<meta name="description">`
    pub meta_description: Option<String>,

    /// `content` of `<meta name="viewport">`
    pub viewport: Option<String>,

    /// `href` of `<link rel="canonical">`
    pub canonical: Option<String>,

    pub h1_count: usize,
    pub h2_count: usize,
    pub h3_count: usize,

    /// All images in document order
    pub images: Vec<Image>,

    /// Raw `href` values of every `<a href>` in document order
    pub links: Vec<String>,
}

impl Document {
    /// Parses HTML content
    ///
    /// Parsing never fails: malformed markup is repaired by the HTML5 parser
    /// and anything that cannot be found reads as absent.
    ///
    /// # Example
    ///
    /// ```
    /// use seo_audit::document::Document;
    ///
    /// let doc = Document::parse("<html><head><title> Home </title></head><body><h1>Hi</h1></body></html>");
    /// assert_eq!(doc.title.as_deref(), Some("Home"));
    /// assert_eq!(doc.h1_count, 1);
    /// ```
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);

        Self {
            title: select_first(&document, "title")
                .map(|element| element.text().collect::<String>())
                .and_then(non_blank),
            meta_description: select_attr(&document, "meta[name='description']", "content"),
            viewport: select_attr(&document, "meta[name='viewport']", "content"),
            canonical: select_attr(&document, "link[rel='canonical']", "href"),
            h1_count: count(&document, "h1"),
            h2_count: count(&document, "h2"),
            h3_count: count(&document, "h3"),
            images: extract_images(&document),
            links: extract_hrefs(&document),
        }
    }

    /// Number of images without alt text
    pub fn missing_alt_count(&self) -> usize {
        self.images.iter().filter(|image| image.is_missing_alt()).count()
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn select_first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = selector(css)?;
    document.select(&selector).next()
}

/// Reads an attribute of the first element matching `css`
fn select_attr(document: &Html, css: &str, attr: &str) -> Option<String> {
    select_first(document, css)
        .and_then(|element| element.value().attr(attr))
        .and_then(non_blank)
}

fn count(document: &Html, css: &str) -> usize {
    selector(css)
        .map(|selector| document.select(&selector).count())
        .unwrap_or(0)
}

fn extract_images(document: &Html) -> Vec<Image> {
    let Some(img_selector) = selector("img") else {
        return Vec::new();
    };

    document
        .select(&img_selector)
        .map(|element| Image {
            src: element.value().attr("src").map(str::to_string),
            alt: element.value().attr("alt").and_then(non_blank),
        })
        .collect()
}

fn extract_hrefs(document: &Html) -> Vec<String> {
    let Some(a_selector) = selector("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Trims a value, treating blank strings as absent
fn non_blank<S: AsRef<str>>(value: S) -> Option<String> {
    let trimmed = value.as_ref().trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
