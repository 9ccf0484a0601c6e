//! The document accessor the engine runs against.
//!
//! [`Document`] is the only thing the extraction engine knows about a page:
//! a materialized HTML tree plus the URL it was loaded from. Hosts either
//! parse a string ([`Document::parse`], [`Document::parse_with_url`]) or
//! hand over a tree they already hold ([`Document::from_html`]), so the
//! same engine runs unchanged behind a browser snapshot, a CLI, or a test.
//!
//! # Example
//!
//! ```rust
//! use clipmark_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1>Title</h1>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! let paragraphs = doc.select("p.content").unwrap();
//! assert_eq!(paragraphs.len(), 1);
//! ```

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::text;
use crate::{CaptureError, Result};

/// A parsed, read-only HTML document.
///
/// The engine never mutates a `Document`; all cleaning happens on private
/// copies of the relevant subtree.
///
/// # Example
///
/// ```rust
/// use clipmark_core::parse::Document;
///
/// let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
/// let doc = Document::parse(html);
/// assert_eq!(doc.title(), Some("Test".to_string()));
/// ```
pub struct Document {
    html: Html,
    url: Option<Url>,
}

impl Document {
    /// Parses an HTML document without a known URL.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html), url: None }
    }

    /// Parses an HTML document loaded from `url`.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::InvalidUrl`] if the URL cannot be parsed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use clipmark_core::parse::Document;
    ///
    /// let doc = Document::parse_with_url("<p>Hi</p>", "https://example.com/post").unwrap();
    /// assert_eq!(doc.url().map(|u| u.as_str()), Some("https://example.com/post"));
    /// ```
    pub fn parse_with_url(html: &str, url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| CaptureError::InvalidUrl(e.to_string()))?;
        Ok(Self { html: Html::parse_document(html), url: Some(url) })
    }

    /// Wraps a tree the host has already materialized.
    pub fn from_html(html: Html, url: Option<Url>) -> Self {
        Self { html, url }
    }

    /// The URL the document was loaded from, if known.
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Gets the raw HTML representation.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Gets the entire HTML as a string.
    pub fn as_string(&self) -> String {
        self.html.html()
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use clipmark_core::parse::Document;
    ///
    /// let html = r#"<p class="content">First</p><p class="content">Second</p>"#;
    /// let doc = Document::parse(html);
    /// let elements = doc.select("p.content").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).map(Element::new).collect())
    }

    /// First element matching `selector`; invalid selectors match nothing.
    pub fn select_first(&'_ self, selector: &str) -> Option<Element<'_>> {
        let sel = Selector::parse(selector).ok()?;
        self.html.select(&sel).next().map(Element::new)
    }

    /// Gets the text of the `<title>` element, trimmed.
    pub fn title(&self) -> Option<String> {
        self.select_first("title")
            .map(|el| text::collapse_whitespace(&el.text()))
            .filter(|t| !t.is_empty())
    }

    /// The `<body>` element, if the parser produced one.
    pub fn body(&'_ self) -> Option<Element<'_>> {
        self.select_first("body")
    }

    /// Block-aware plain text of the body.
    pub fn text_content(&self) -> String {
        self.body().map(|body| body.plain_text()).unwrap_or_default()
    }
}

/// A single element of a [`Document`] or of a cleaned fragment.
///
/// # Example
///
/// ```rust
/// use clipmark_core::parse::Document;
///
/// let html = r#"<a href="https://example.com">Link text</a>"#;
/// let doc = Document::parse(html);
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "Link text");
/// assert_eq!(link.attr("href"), Some("https://example.com"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    pub(crate) fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    pub(crate) fn element_ref(&self) -> ElementRef<'a> {
        self.element
    }

    /// Gets the inner HTML of this element.
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    /// Gets the outer HTML of this element.
    pub fn outer_html(&self) -> String {
        self.element.html()
    }

    /// Raw concatenation of all text nodes within this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Block-aware text, one block per line.
    pub fn plain_text(&self) -> String {
        text::plain_text(self.element)
    }

    /// Number of words in [`Element::plain_text`].
    pub fn word_count(&self) -> usize {
        text::count_words(&self.plain_text())
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name of this element.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Class and id attributes joined and lowercased, for pattern checks.
    pub fn class_and_id(&self) -> String {
        let class = self.attr("class").unwrap_or_default();
        let id = self.attr("id").unwrap_or_default();
        format!("{} {}", class, id).to_lowercase()
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = compile(selector)?;
        Ok(self.element.select(&sel).map(Element::new).collect())
    }

    /// Number of descendants matching a selector; invalid selectors count zero.
    pub fn count(&self, selector: &str) -> usize {
        Selector::parse(selector)
            .map(|sel| self.element.select(&sel).count())
            .unwrap_or(0)
    }
}

/// Compiles a CSS selector, mapping failures to [`CaptureError::HtmlParseError`].
pub(crate) fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| CaptureError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// Compiles every selector in `selectors`, skipping (and logging) invalid ones.
pub(crate) fn compile_lenient<S: AsRef<str>>(selectors: &[S]) -> Vec<Selector> {
    selectors
        .iter()
        .filter_map(|s| match Selector::parse(s.as_ref()) {
            Ok(sel) => Some(sel),
            Err(e) => {
                tracing::warn!(selector = s.as_ref(), error = %e, "skipping invalid selector");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title>Test Page</title>
        </head>
        <body>
            <h1>Heading</h1>
            <p class="content">Paragraph 1</p>
            <p class="content">Paragraph 2</p>
            <a href="https://example.com">Link</a>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_document() {
        let doc = Document::parse(SAMPLE_HTML);
        assert_eq!(doc.title(), Some("Test Page".to_string()));
        assert!(doc.url().is_none());
    }

    #[test]
    fn test_parse_with_invalid_url() {
        let result = Document::parse_with_url(SAMPLE_HTML, "not a url");
        assert!(matches!(result, Err(CaptureError::InvalidUrl(_))));
    }

    #[test]
    fn test_select_elements() {
        let doc = Document::parse(SAMPLE_HTML);
        let elements = doc.select("p.content").unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text(), "Paragraph 1");
        assert_eq!(elements[1].text(), "Paragraph 2");
    }

    #[test]
    fn test_element_attributes() {
        let doc = Document::parse(SAMPLE_HTML);
        let elements = doc.select("a").unwrap();

        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].attr("href"), Some("https://example.com"));
        assert_eq!(elements[0].text(), "Link");
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML);
        let result = doc.select("[[invalid");

        assert!(matches!(result, Err(CaptureError::HtmlParseError(_))));
        assert!(doc.select_first("[[invalid").is_none());
    }

    #[test]
    fn test_text_content_excludes_head() {
        let doc = Document::parse(SAMPLE_HTML);
        let text = doc.text_content();

        assert!(text.contains("Heading"));
        assert!(text.contains("Paragraph 1"));
        assert!(!text.contains("Test Page"));
    }

    #[test]
    fn test_class_and_id() {
        let doc = Document::parse(r#"<div class="Post Body" id="Main">x</div>"#);
        let div = doc.select_first("div").unwrap();
        assert_eq!(div.class_and_id(), "post body main");
    }

    #[test]
    fn test_compile_lenient_skips_invalid() {
        let compiled = compile_lenient(&["article", "[[bad", ".post"]);
        assert_eq!(compiled.len(), 2);
    }
}
