//! HTML parser for extracting readable page text
//!
//! This module turns a fetched HTML document into a title and a single line of
//! plain text:
//! - Text inside `script`, `style`, `nav` and `footer` is dropped
//! - The main content element is chosen by a fixed priority list
//! - Text nodes are joined with single spaces and whitespace is collapsed
//! - The result is truncated to a character cap

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Elements whose text never counts as page content
const NOISE_TAGS: [&str; 4] = ["script", "style", "nav", "footer"];

/// Main content candidates, highest priority first
const MAIN_CONTENT_SELECTORS: [&str; 5] = ["main", "article", ".content", "#content", "body"];

/// Title and text extracted from an HTML page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    /// Trimmed `<title>` text, or the URL path when there is none
    pub title: String,

    /// Collapsed main-content text, at most `cap` characters
    pub content: String,
}

/// Extracts the title and main-content text from an HTML document
///
/// # Main Content Priority
///
/// 1. `<main>`
/// 2. `<article>`
/// 3. element with class `content`
/// 4. element with id `content`
/// 5. `<body>`
/// 6. the whole document
///
/// Candidates nested inside a noise element are skipped.
///
/// # Example
///
/// ```
/// use site_ingest::crawler::extract_page;
/// use url::Url;
///
/// let html = r#"<html><head><title> Docs </title></head>
///     <body><nav>Menu</nav><main><h1>Hello</h1><p>world</p></main></body></html>"#;
/// let url = Url::parse("https://example.com/docs").unwrap();
/// let page = extract_page(html, &url, 50_000);
/// assert_eq!(page.title, "Docs");
/// assert_eq!(page.content, "Hello world");
/// ```
pub fn extract_page(html: &str, url: &Url, cap: usize) -> ExtractedPage {
    let document = Html::parse_document(html);

    let title = extract_title(&document).unwrap_or_else(|| url.path().to_string());

    let root = select_main_content(&document);
    let mut fragments = Vec::new();
    collect_text(root, &mut fragments);

    let content = truncate_chars(collapse_whitespace(&fragments.join(" ")), cap);

    ExtractedPage { title, content }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Picks the element whose text becomes the page content
fn select_main_content(document: &Html) -> ElementRef<'_> {
    for selector_str in MAIN_CONTENT_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).find(|el| !inside_noise(*el)) {
                return element;
            }
        }
    }

    document.root_element()
}

fn is_noise(element: &ElementRef<'_>) -> bool {
    NOISE_TAGS.contains(&element.value().name())
}

fn inside_noise(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| is_noise(&ancestor))
}

/// Appends every non-blank, trimmed text node under `element` in document order
fn collect_text(element: ElementRef<'_>, fragments: &mut Vec<String>) {
    if is_noise(&element) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    fragments.push(trimmed.to_string());
                }
            }
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, fragments);
                }
            }
            _ => {}
        }
    }
}

/// Collapses runs of whitespace into a single space and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates to at most `cap` characters, never splitting a code point
pub fn truncate_chars(mut text: String, cap: usize) -> String {
    if let Some((byte_index, _)) = text.char_indices().nth(cap) {
        text.truncate(byte_index);
    }
    text
}
