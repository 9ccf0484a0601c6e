//! HTML to markdown conversion.
//!
//! [`MarkdownConverter`] turns a cleaned HTML fragment into normalized
//! markdown plus an independent YAML frontmatter block. Conversion never
//! comes back empty for input that carries text: when the rendered markdown
//! is blank, the converter retries with [`ConvertOptions::fallback_html`] and
//! finally emits plain text, of the input or else of the fallback.
//!
//! # Example
//!
//! ```rust
//! use clipmark_core::{ConvertOptions, convert_to_markdown};
//!
//! let result = convert_to_markdown("<h1>Hello</h1><p>World</p>", &ConvertOptions::default()).unwrap();
//! assert_eq!(result.markdown, "# Hello\n\nWorld\n");
//! assert_eq!(result.word_count, 2);
//! assert!(result.document().starts_with("---\n"));
//! ```

pub mod frontmatter;
pub(crate) mod postprocess;
mod render;
mod table;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use scraper::{Html, Selector};
use serde::Serialize;
use time::OffsetDateTime;
use url::Url;

use crate::extract::fragment_text;
use crate::metadata::DocumentMetadata;
use crate::parse::Document;
use crate::preprocess::{PreprocessConfig, preprocess_html};
use crate::text;
use crate::{CaptureError, Result};

pub use frontmatter::generate_frontmatter;
use postprocess::postprocess_markdown;
use render::{RuleTable, render};

/// Heading syntax for `h1`/`h2`. Deeper headings are always ATX.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeadingStyle {
    /// `# Title`
    #[default]
    Atx,
    /// `Title` underlined with `=` or `-`
    Setext,
}

/// Marker for unordered list items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BulletListMarker {
    #[default]
    Dash,
    Asterisk,
    Plus,
}

impl BulletListMarker {
    pub fn as_str(&self) -> &'static str {
        match self {
            BulletListMarker::Dash => "-",
            BulletListMarker::Asterisk => "*",
            BulletListMarker::Plus => "+",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CodeBlockStyle {
    /// Backtick fences, with the language when the source names one
    #[default]
    Fenced,
    /// Four-space indentation
    Indented,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkStyle {
    /// `[text](url)`
    #[default]
    Inlined,
    /// `[text][n]` with `[n]: url` definitions at the end
    Referenced,
}

fn unknown_option(kind: &str, value: &str) -> CaptureError {
    CaptureError::IllegalState(format!("unknown {} '{}'", kind, value))
}

impl FromStr for HeadingStyle {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atx" => Ok(HeadingStyle::Atx),
            "setext" => Ok(HeadingStyle::Setext),
            other => Err(unknown_option("heading style", other)),
        }
    }
}

impl FromStr for BulletListMarker {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "-" => Ok(BulletListMarker::Dash),
            "*" => Ok(BulletListMarker::Asterisk),
            "+" => Ok(BulletListMarker::Plus),
            other => Err(unknown_option("bullet marker", other)),
        }
    }
}

impl FromStr for CodeBlockStyle {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fenced" => Ok(CodeBlockStyle::Fenced),
            "indented" => Ok(CodeBlockStyle::Indented),
            other => Err(unknown_option("code block style", other)),
        }
    }
}

impl FromStr for LinkStyle {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inlined" => Ok(LinkStyle::Inlined),
            "referenced" => Ok(LinkStyle::Referenced),
            other => Err(unknown_option("link style", other)),
        }
    }
}

impl fmt::Display for HeadingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HeadingStyle::Atx => "atx",
            HeadingStyle::Setext => "setext",
        })
    }
}

impl fmt::Display for BulletListMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CodeBlockStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CodeBlockStyle::Fenced => "fenced",
            CodeBlockStyle::Indented => "indented",
        })
    }
}

impl fmt::Display for LinkStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LinkStyle::Inlined => "inlined",
            LinkStyle::Referenced => "referenced",
        })
    }
}

/// Options for [`MarkdownConverter::convert`].
///
/// # Example
///
/// ```rust
/// use clipmark_core::{ConvertOptions, HeadingStyle};
///
/// let options = ConvertOptions::builder()
///     .heading_style(HeadingStyle::Setext)
///     .generate_frontmatter(false)
///     .build();
/// assert!(options.preserve_formatting);
/// ```
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Keep bold, italic, inline code and strikethrough markup (default: true)
    pub preserve_formatting: bool,
    /// Put author, dates, description, site, language and reading time in the frontmatter (default: true)
    pub include_metadata: bool,
    /// Produce a frontmatter block at all (default: true)
    pub generate_frontmatter: bool,
    pub heading_style: HeadingStyle,
    pub bullet_list_marker: BulletListMarker,
    pub code_block_style: CodeBlockStyle,
    pub link_style: LinkStyle,
    /// Base for absolutizing links and image sources
    pub base_url: Option<Url>,
    /// Metadata from extraction. Extracted from the input when `None`.
    pub metadata: Option<DocumentMetadata>,
    /// Broader HTML converted when the input renders to nothing
    pub fallback_html: Option<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            preserve_formatting: true,
            include_metadata: true,
            generate_frontmatter: true,
            heading_style: HeadingStyle::default(),
            bullet_list_marker: BulletListMarker::default(),
            code_block_style: CodeBlockStyle::default(),
            link_style: LinkStyle::default(),
            base_url: None,
            metadata: None,
            fallback_html: None,
        }
    }
}

impl ConvertOptions {
    /// Creates a new builder for ConvertOptions.
    pub fn builder() -> ConvertOptionsBuilder {
        ConvertOptionsBuilder::new()
    }
}

/// Builder for [`ConvertOptions`].
pub struct ConvertOptionsBuilder {
    options: ConvertOptions,
}

impl ConvertOptionsBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { options: ConvertOptions::default() }
    }

    pub fn preserve_formatting(mut self, value: bool) -> Self {
        self.options.preserve_formatting = value;
        self
    }

    pub fn include_metadata(mut self, value: bool) -> Self {
        self.options.include_metadata = value;
        self
    }

    pub fn generate_frontmatter(mut self, value: bool) -> Self {
        self.options.generate_frontmatter = value;
        self
    }

    pub fn heading_style(mut self, value: HeadingStyle) -> Self {
        self.options.heading_style = value;
        self
    }

    pub fn bullet_list_marker(mut self, value: BulletListMarker) -> Self {
        self.options.bullet_list_marker = value;
        self
    }

    pub fn code_block_style(mut self, value: CodeBlockStyle) -> Self {
        self.options.code_block_style = value;
        self
    }

    pub fn link_style(mut self, value: LinkStyle) -> Self {
        self.options.link_style = value;
        self
    }

    /// Sets the base URL used to absolutize `href` and `src` values.
    pub fn base_url(mut self, value: Url) -> Self {
        self.options.base_url = Some(value);
        self
    }

    /// Supplies metadata gathered during extraction.
    pub fn metadata(mut self, value: DocumentMetadata) -> Self {
        self.options.metadata = Some(value);
        self
    }

    pub fn fallback_html(mut self, value: impl Into<String>) -> Self {
        self.options.fallback_html = Some(value.into());
        self
    }

    /// Builds the options.
    pub fn build(self) -> ConvertOptions {
        self.options
    }
}

impl Default for ConvertOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// An image referenced by the converted content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageAsset {
    /// Absolute URL
    pub src: String,
    pub alt: String,
}

/// The output of a conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    pub markdown: String,
    /// YAML block delimited by `---` lines, or `""` when disabled
    pub frontmatter: String,
    pub metadata: DocumentMetadata,
    pub images: Vec<ImageAsset>,
    /// Words in the plain text of the input HTML
    pub word_count: usize,
}

impl ConversionResult {
    /// The storable document: frontmatter, a blank line, then the markdown.
    pub fn document(&self) -> String {
        if self.frontmatter.is_empty() {
            return self.markdown.clone();
        }
        format!("{}\n\n{}", self.frontmatter, self.markdown)
    }
}

/// HTML to markdown converter.
///
/// A converter must be initialized before use; initialization builds its
/// rule table (the boilerplate removal list and the custom rules).
///
/// # Example
///
/// ```rust
/// use clipmark_core::{CaptureError, ConvertOptions, MarkdownConverter};
///
/// let mut converter = MarkdownConverter::new();
/// let err = converter.convert("<p>Hi</p>", &ConvertOptions::default()).unwrap_err();
/// assert!(matches!(err, CaptureError::IllegalState(_)));
///
/// converter.initialize();
/// assert!(converter.convert("<p>Hi</p>", &ConvertOptions::default()).is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MarkdownConverter {
    rules: Option<RuleTable>,
}

impl MarkdownConverter {
    /// Creates an uninitialized converter.
    pub fn new() -> Self {
        Self { rules: None }
    }

    /// Creates a converter that is ready to use.
    pub fn initialized() -> Self {
        let mut converter = Self::new();
        converter.initialize();
        converter
    }

    /// Builds the rule table. Calling it again is a no-op.
    pub fn initialize(&mut self) {
        if self.rules.is_none() {
            self.rules = Some(RuleTable::new());
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.rules.is_some()
    }

    /// Convert an HTML fragment (normally the cleaned content from extraction).
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::IllegalState`] if the converter was never initialized.
    pub fn convert(&self, html: &str, options: &ConvertOptions) -> Result<ConversionResult> {
        let rules = self
            .rules
            .as_ref()
            .ok_or_else(|| CaptureError::IllegalState("markdown converter used before initialization".to_string()))?;

        let preprocess = PreprocessConfig { base_url: options.base_url.clone() };
        let processed = preprocess_html(html, &preprocess);
        let plain = fragment_text(&processed);
        let word_count = text::count_words(&plain);

        let mut markdown = postprocess_markdown(&render(&processed, options, rules));
        let fallback = options.fallback_html.as_deref().map(|html| preprocess_html(html, &preprocess));

        if markdown.is_empty()
            && let Some(fallback) = &fallback
        {
            tracing::debug!("content rendered empty, converting fallback html");
            markdown = postprocess_markdown(&render(fallback, options, rules));
        }

        if markdown.is_empty() {
            tracing::debug!("falling back to plain text");
            markdown = postprocess_markdown(&plain);
            if markdown.is_empty()
                && let Some(fallback) = &fallback
            {
                markdown = postprocess_markdown(&fragment_text(fallback));
            }
        }

        let mut metadata = match &options.metadata {
            Some(metadata) => metadata.clone(),
            None => {
                let doc = Document::from_html(Html::parse_document(html), options.base_url.clone());
                doc.extract_metadata(OffsetDateTime::now_utc())
            }
        };
        metadata.word_count = word_count;
        metadata.estimated_reading_time = text::reading_time(word_count);

        let frontmatter = if options.generate_frontmatter {
            generate_frontmatter(&metadata, options.include_metadata)
        } else {
            String::new()
        };

        let images = collect_images(&processed, options.base_url.as_ref());
        Ok(ConversionResult { markdown, frontmatter, metadata, images, word_count })
    }
}

/// Convert `html` with a freshly initialized converter.
pub fn convert_to_markdown(html: &str, options: &ConvertOptions) -> Result<ConversionResult> {
    MarkdownConverter::initialized().convert(html, options)
}

/// Distinct, resolvable image sources in document order.
fn collect_images(html: &str, base_url: Option<&Url>) -> Vec<ImageAsset> {
    let fragment = Html::parse_fragment(html);
    let selector = Selector::parse("img[src]").unwrap();
    let mut seen = HashSet::new();
    let mut images = Vec::new();

    for img in fragment.select(&selector) {
        let src = img.value().attr("src").map(str::trim).unwrap_or_default();
        if src.is_empty() || src.starts_with("data:") {
            continue;
        }
        let resolved = match base_url {
            Some(base) => base.join(src),
            None => Url::parse(src),
        };
        let Ok(url) = resolved else {
            tracing::debug!(src, "skipping unresolvable image");
            continue;
        };
        if !matches!(url.scheme(), "http" | "https") {
            continue;
        }
        let src = url.to_string();
        if seen.insert(src.clone()) {
            let alt = text::collapse_whitespace(img.value().attr("alt").unwrap_or_default());
            images.push(ImageAsset { src, alt });
        }
    }
    images
}
