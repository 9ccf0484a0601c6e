//! One-call capture: extraction followed by conversion.
//!
//! [`Capture`] runs [`extract_content`] on a document, then converts the
//! cleaned content with the extraction metadata and the document body as the
//! converter's fallback.
//!
//! # Example
//!
//! ```rust
//! use clipmark_core::capture::{Capture, CaptureConfig};
//!
//! let html = "<html><body><article><h1>Hello</h1><p>World of markdown testing here.</p></article></body></html>";
//! let capture = Capture::with_config(CaptureConfig::builder().remove_ads(false).build());
//! let result = capture.capture_html(html, Some("https://example.com/notes/hello")).unwrap();
//!
//! assert!(result.conversion.markdown.starts_with("# Hello"));
//! assert_eq!(result.extraction.word_count, 6);
//! ```

use serde::Serialize;
use time::OffsetDateTime;

use crate::extract::{ExtractOptions, ExtractionResult, extract_content};
use crate::markdown::{
    BulletListMarker, CodeBlockStyle, ConversionResult, ConvertOptions, HeadingStyle, LinkStyle, MarkdownConverter,
};
use crate::parse::Document;
use crate::Result;

#[cfg(feature = "fetch")]
use crate::fetch::{FetchConfig, HttpImageProbe, fetch_url};
#[cfg(feature = "settle")]
use crate::settle::{ImageProbe, wait_for_images};

/// Longest slug kept in a suggested file name.
const MAX_SLUG_CHARS: usize = 60;

/// Extraction and conversion options for a [`Capture`].
#[derive(Debug, Clone, Default)]
pub struct CaptureConfig {
    pub extract: ExtractOptions,
    /// `metadata`, `fallback_html` and (when unset) `base_url` are filled in per capture
    pub convert: ConvertOptions,
}

impl CaptureConfig {
    /// Creates a new builder for CaptureConfig.
    ///
    /// # Example
    ///
    /// ```rust
    /// use clipmark_core::capture::CaptureConfig;
    ///
    /// let config = CaptureConfig::builder()
    ///     .custom_selector(".post-body")
    ///     .generate_frontmatter(false)
    ///     .build();
    /// assert!(!config.convert.generate_frontmatter);
    /// ```
    pub fn builder() -> CaptureConfigBuilder {
        CaptureConfigBuilder::new()
    }
}

/// Builder for [`CaptureConfig`].
pub struct CaptureConfigBuilder {
    config: CaptureConfig,
}

impl CaptureConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: CaptureConfig::default() }
    }

    /// Replaces all extraction options.
    pub fn extract_options(mut self, value: ExtractOptions) -> Self {
        self.config.extract = value;
        self
    }

    /// Replaces all conversion options.
    pub fn convert_options(mut self, value: ConvertOptions) -> Self {
        self.config.convert = value;
        self
    }

    pub fn custom_selector(mut self, selector: impl Into<String>) -> Self {
        self.config.extract.custom_selectors.push(selector.into());
        self
    }

    pub fn exclude_selector(mut self, selector: impl Into<String>) -> Self {
        self.config.extract.exclude_selectors.push(selector.into());
        self
    }

    pub fn clean_html(mut self, value: bool) -> Self {
        self.config.extract.clean_html = value;
        self
    }

    pub fn remove_ads(mut self, value: bool) -> Self {
        self.config.extract.remove_ads = value;
        self
    }

    pub fn remove_navigation(mut self, value: bool) -> Self {
        self.config.extract.remove_navigation = value;
        self
    }

    pub fn wait_for_dynamic_content(mut self, value: bool) -> Self {
        self.config.extract.wait_for_dynamic_content = value;
        self
    }

    /// Pins the capture timestamp.
    pub fn captured_at(mut self, value: OffsetDateTime) -> Self {
        self.config.extract.captured_at = Some(value);
        self
    }

    pub fn generate_frontmatter(mut self, value: bool) -> Self {
        self.config.convert.generate_frontmatter = value;
        self
    }

    pub fn include_metadata(mut self, value: bool) -> Self {
        self.config.convert.include_metadata = value;
        self
    }

    pub fn heading_style(mut self, value: HeadingStyle) -> Self {
        self.config.convert.heading_style = value;
        self
    }

    pub fn bullet_list_marker(mut self, value: BulletListMarker) -> Self {
        self.config.convert.bullet_list_marker = value;
        self
    }

    pub fn code_block_style(mut self, value: CodeBlockStyle) -> Self {
        self.config.convert.code_block_style = value;
        self
    }

    pub fn link_style(mut self, value: LinkStyle) -> Self {
        self.config.convert.link_style = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> CaptureConfig {
        self.config
    }
}

impl Default for CaptureConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Extraction and conversion output of one capture.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureResult {
    pub extraction: ExtractionResult,
    pub conversion: ConversionResult,
}

impl CaptureResult {
    /// Frontmatter, a blank line, then the markdown.
    pub fn document(&self) -> String {
        self.conversion.document()
    }

    /// `YYYY-MM-DD-<title slug>.md`, dated by the capture date.
    ///
    /// # Example
    ///
    /// ```rust
    /// use clipmark_core::capture::{Capture, CaptureConfig};
    /// use time::macros::datetime;
    ///
    /// let config = CaptureConfig::builder().captured_at(datetime!(2026-10-17 09:30 UTC)).build();
    /// let html = "<html><head><title>Rust &amp; You: A Primer!</title></head><body><p>Some text.</p></body></html>";
    /// let result = Capture::with_config(config).capture_html(html, None).unwrap();
    /// assert_eq!(result.suggested_filename(), "2026-10-17-rust-you-a-primer.md");
    /// ```
    pub fn suggested_filename(&self) -> String {
        let metadata = &self.conversion.metadata;
        let date = metadata.capture_date.date();
        format!(
            "{:04}-{:02}-{:02}-{}.md",
            date.year(),
            u8::from(date.month()),
            date.day(),
            slugify(&metadata.title)
        )
    }
}

/// Lower-case, hyphen-separated, alphanumeric slug; `"untitled"` when nothing is left.
fn slugify(title: &str) -> String {
    let mut slug = String::new();
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    let slug: String = slug.trim_end_matches('-').chars().take(MAX_SLUG_CHARS).collect();
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() { "untitled".to_string() } else { slug.to_string() }
}

/// Runs extraction then conversion with a fixed configuration.
///
/// # Example
///
/// ```rust
/// use clipmark_core::capture::Capture;
///
/// let capture = Capture::new();
/// let result = capture.capture_html("<html><body><p>Just a note.</p></body></html>", None).unwrap();
/// assert_eq!(result.conversion.markdown, "Just a note.\n");
/// ```
#[derive(Debug, Clone)]
pub struct Capture {
    config: CaptureConfig,
    converter: MarkdownConverter,
}

impl Capture {
    /// Creates a capture with default settings.
    pub fn new() -> Self {
        Self::with_config(CaptureConfig::default())
    }

    pub fn with_config(config: CaptureConfig) -> Self {
        Self { config, converter: MarkdownConverter::initialized() }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Capture an already-parsed document.
    ///
    /// # Errors
    ///
    /// [`CaptureError::Extraction`](crate::CaptureError::Extraction) when the
    /// document has no content at all.
    pub fn capture(&self, doc: &Document) -> Result<CaptureResult> {
        let extraction = extract_content(doc, &self.config.extract)?;

        let mut convert = self.config.convert.clone();
        convert.metadata = Some(extraction.metadata.clone());
        convert.fallback_html = doc.body().map(|body| body.inner_html());
        if convert.base_url.is_none() {
            convert.base_url = doc.url().cloned();
        }

        let conversion = self.converter.convert(&extraction.content, &convert)?;
        tracing::debug!(
            method = %extraction.method,
            words = conversion.word_count,
            images = conversion.images.len(),
            "captured page"
        );

        Ok(CaptureResult { extraction, conversion })
    }

    /// Parse `html` and capture it. `url`, when given, becomes the document URL.
    ///
    /// # Errors
    ///
    /// [`CaptureError::InvalidUrl`](crate::CaptureError::InvalidUrl) if `url` does not parse.
    pub fn capture_html(&self, html: &str, url: Option<&str>) -> Result<CaptureResult> {
        let doc = match url {
            Some(url) => Document::parse_with_url(html, url)?,
            None => Document::parse(html),
        };
        self.capture(&doc)
    }

    /// Wait for late-loading images (when enabled) and then capture.
    ///
    /// The wait is bounded by `settle_timeout` per image; failures and
    /// timeouts never fail the capture.
    #[cfg(feature = "settle")]
    pub async fn capture_settled(&self, doc: &Document, probe: &dyn ImageProbe) -> Result<CaptureResult> {
        if self.config.extract.wait_for_dynamic_content {
            let report = wait_for_images(doc, probe, self.config.extract.settle_timeout).await;
            if report.timed_out > 0 {
                tracing::warn!(timed_out = report.timed_out, "some images did not settle in time");
            }
        }
        self.capture(doc)
    }

    /// Fetch `url` over HTTP and capture it, settling images with HEAD requests.
    #[cfg(feature = "fetch")]
    pub async fn fetch_and_capture(&self, url: &str, fetch_config: &FetchConfig) -> Result<CaptureResult> {
        let html = fetch_url(url, fetch_config).await?;
        let doc = Document::parse_with_url(&html, url)?;
        let probe = HttpImageProbe::new(fetch_config)?;
        self.capture_settled(&doc, &probe).await
    }
}

impl Default for Capture {
    fn default() -> Self {
        Self::new()
    }
}

/// Capture `html` with default settings.
pub fn capture(html: &str) -> Result<CaptureResult> {
    Capture::new().capture_html(html, None)
}

/// Capture `html` served from `url` with default settings.
pub fn capture_with_url(html: &str, url: &str) -> Result<CaptureResult> {
    Capture::new().capture_html(html, Some(url))
}
