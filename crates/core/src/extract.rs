//! Main-content localization and extraction.
//!
//! Localization runs in tiers and the first tier that yields an element wins:
//! caller-supplied selectors, a fixed list of semantic selectors, scoring of
//! every `div`/`section`/`article`, and finally `<body>`. The located subtree
//! is then cleaned on a private copy (see [`crate::clean`]).

use std::fmt;
use std::time::Duration;

use scraper::Html;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::clean::{CleanConfig, clean_html_fragment};
use crate::metadata::DocumentMetadata;
use crate::parse::{Document, Element, compile_lenient};
use crate::scoring::{ScoreConfig, calculate_score};
use crate::text;
use crate::{CaptureError, Result};

/// Selectors that usually wrap the main content, in priority order.
pub const SEMANTIC_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role=\"main\"]",
    ".content",
    ".post-content",
    ".entry-content",
    ".article-content",
    "#content",
    "#main",
    ".post",
    ".entry",
];

/// Tags scored when no selector matches
const CANDIDATE_TAGS: &[&str] = &["div", "section", "article"];

/// Options for [`extract_content`].
///
/// # Example
///
/// ```rust
/// use clipmark_core::ExtractOptions;
///
/// let options = ExtractOptions::builder()
///     .custom_selector(".story-body")
///     .exclude_selector(".newsletter")
///     .remove_ads(false)
///     .build();
/// assert_eq!(options.custom_selectors, vec![".story-body".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Selectors tried first, in order
    pub custom_selectors: Vec<String>,
    /// Run the cleaning pass on the located subtree (default: true)
    pub clean_html: bool,
    /// Extra selectors removed during cleaning
    pub exclude_selectors: Vec<String>,
    /// Remove short or known ad blocks (default: true)
    pub remove_ads: bool,
    /// Remove nav/header/footer chrome (default: true)
    pub remove_navigation: bool,
    /// Wait for late-loading images before extracting (default: true).
    ///
    /// Only honoured by the async capture entry points.
    pub wait_for_dynamic_content: bool,
    /// Upper bound on the image wait (default: 3s)
    pub settle_timeout: Duration,
    /// Candidate scoring weights
    pub scoring: ScoreConfig,
    /// Cleaning thresholds
    pub cleaning: CleanConfig,
    /// Fixed capture timestamp; `None` uses the current time
    pub captured_at: Option<OffsetDateTime>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            custom_selectors: Vec::new(),
            clean_html: true,
            exclude_selectors: Vec::new(),
            remove_ads: true,
            remove_navigation: true,
            wait_for_dynamic_content: true,
            settle_timeout: Duration::from_secs(3),
            scoring: ScoreConfig::default(),
            cleaning: CleanConfig::default(),
            captured_at: None,
        }
    }
}

impl ExtractOptions {
    /// Creates a new builder for ExtractOptions.
    pub fn builder() -> ExtractOptionsBuilder {
        ExtractOptionsBuilder::new()
    }
}

/// Builder for [`ExtractOptions`].
pub struct ExtractOptionsBuilder {
    options: ExtractOptions,
}

impl ExtractOptionsBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { options: ExtractOptions::default() }
    }

    /// Appends a custom content selector.
    pub fn custom_selector(mut self, selector: impl Into<String>) -> Self {
        self.options.custom_selectors.push(selector.into());
        self
    }

    /// Replaces the custom content selectors.
    pub fn custom_selectors(mut self, selectors: Vec<String>) -> Self {
        self.options.custom_selectors = selectors;
        self
    }

    /// Appends an exclude selector.
    pub fn exclude_selector(mut self, selector: impl Into<String>) -> Self {
        self.options.exclude_selectors.push(selector.into());
        self
    }

    /// Replaces the exclude selectors.
    pub fn exclude_selectors(mut self, selectors: Vec<String>) -> Self {
        self.options.exclude_selectors = selectors;
        self
    }

    pub fn clean_html(mut self, value: bool) -> Self {
        self.options.clean_html = value;
        self
    }

    pub fn remove_ads(mut self, value: bool) -> Self {
        self.options.remove_ads = value;
        self
    }

    pub fn remove_navigation(mut self, value: bool) -> Self {
        self.options.remove_navigation = value;
        self
    }

    pub fn wait_for_dynamic_content(mut self, value: bool) -> Self {
        self.options.wait_for_dynamic_content = value;
        self
    }

    pub fn settle_timeout(mut self, value: Duration) -> Self {
        self.options.settle_timeout = value;
        self
    }

    /// Sets the candidate scoring weights.
    pub fn scoring(mut self, value: ScoreConfig) -> Self {
        self.options.scoring = value;
        self
    }

    /// Sets the cleaning thresholds.
    pub fn cleaning(mut self, value: CleanConfig) -> Self {
        self.options.cleaning = value;
        self
    }

    /// Pins the capture timestamp.
    pub fn captured_at(mut self, value: OffsetDateTime) -> Self {
        self.options.captured_at = Some(value);
        self
    }

    /// Builds the options.
    pub fn build(self) -> ExtractOptions {
        self.options
    }
}

impl Default for ExtractOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Which localization tier produced the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionMethod {
    CustomSelector,
    SemanticSelector,
    Scored,
    BodyFallback,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::CustomSelector => "custom-selector",
            ExtractionMethod::SemanticSelector => "semantic-selector",
            ExtractionMethod::Scored => "scored",
            ExtractionMethod::BodyFallback => "body-fallback",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The output of [`extract_content`].
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Cleaned HTML fragment of the main content
    pub content: String,
    /// Page metadata, with word count and reading time taken from `content`
    pub metadata: DocumentMetadata,
    /// Block-aware plain text of `content`
    pub cleaned_content: String,
    pub word_count: usize,
    /// Minutes, `ceil(word_count / 200)`
    pub reading_time: usize,
    pub method: ExtractionMethod,
}

/// Locate, clean and describe the main content of `doc`.
///
/// The document is never mutated.
///
/// # Errors
///
/// Returns [`CaptureError::Extraction`] when no tier finds content and the
/// body is empty or missing.
///
/// # Example
///
/// ```rust
/// use clipmark_core::{Document, ExtractOptions, extract_content};
///
/// let html = "<html><body><article><h1>Hello</h1><p>World of markdown testing here.</p></article></body></html>";
/// let doc = Document::parse(html);
/// let result = extract_content(&doc, &ExtractOptions::default()).unwrap();
/// assert_eq!(result.word_count, 6);
/// ```
pub fn extract_content(doc: &Document, options: &ExtractOptions) -> Result<ExtractionResult> {
    let (content_html, method) = locate_content(doc, options)?;
    tracing::debug!(method = %method, "located main content");

    let cleaned = clean_html_fragment(&content_html, options);
    let cleaned_content = fragment_text(&cleaned.html);
    let word_count = text::count_words(&cleaned_content);
    let reading_time = text::reading_time(word_count);

    let captured_at = options.captured_at.unwrap_or_else(OffsetDateTime::now_utc);
    let mut metadata = doc.extract_metadata(captured_at);
    metadata.word_count = word_count;
    metadata.estimated_reading_time = reading_time;
    metadata.extraction_method = Some(method);

    Ok(ExtractionResult { content: cleaned.html, metadata, cleaned_content, word_count, reading_time, method })
}

/// Find the main content and return its HTML with the tier that found it.
pub(crate) fn locate_content(doc: &Document, options: &ExtractOptions) -> Result<(String, ExtractionMethod)> {
    let min_words = options.scoring.min_word_count;

    if let Some(element) = first_substantial(doc, &options.custom_selectors, min_words) {
        return Ok((element.outer_html(), ExtractionMethod::CustomSelector));
    }
    if !options.custom_selectors.is_empty() {
        tracing::debug!("no custom selector matched enough content");
    }

    if let Some(element) = first_substantial(doc, SEMANTIC_SELECTORS, min_words) {
        return Ok((element.outer_html(), ExtractionMethod::SemanticSelector));
    }

    if let Some(element) = best_scored(doc, &options.scoring) {
        return Ok((element.outer_html(), ExtractionMethod::Scored));
    }

    tracing::debug!("falling back to document body");
    let body = doc.body().ok_or_else(CaptureError::no_content)?;
    if body.plain_text().trim().is_empty() {
        return Err(CaptureError::no_content());
    }
    Ok((format!("<div>{}</div>", body.inner_html()), ExtractionMethod::BodyFallback))
}

/// First element, selector by selector, whose word count exceeds `min_words`.
fn first_substantial<'a, S: AsRef<str>>(doc: &'a Document, selectors: &[S], min_words: usize) -> Option<Element<'a>> {
    compile_lenient(selectors).iter().find_map(|selector| {
        doc.html()
            .select(selector)
            .map(Element::new)
            .find(|element| element.word_count() > min_words)
    })
}

/// Highest-scoring candidate above zero; ties keep the earliest in document order.
fn best_scored<'a>(doc: &'a Document, config: &ScoreConfig) -> Option<Element<'a>> {
    let selector = compile_lenient(&[CANDIDATE_TAGS.join(", ")]).pop()?;
    let mut best: Option<(Element<'a>, f64)> = None;

    for element in doc.html().select(&selector).map(Element::new) {
        let score = calculate_score(&element, config).final_score;
        if score <= 0.0 {
            continue;
        }
        if best.as_ref().is_none_or(|(_, top)| score > *top) {
            best = Some((element, score));
        }
    }

    if let Some((element, score)) = &best {
        tracing::debug!(tag = %element.tag_name(), score, "selected scored candidate");
    }
    best.map(|(element, _)| element)
}

/// Block-aware plain text of an HTML fragment.
pub(crate) fn fragment_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    text::plain_text(fragment.root_element())
}
