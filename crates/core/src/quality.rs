//! Page diagnostics that hosts can show next to a capture.
//!
//! Nothing in the capture pipeline depends on these.

use serde_json::Value;

use crate::parse::Document;
use crate::scoring::link_density;
use crate::text;

/// Selectors of paywall overlays and gated containers.
const PAYWALL_SELECTORS: &[&str] = &[
    ".paywall",
    "#paywall",
    "[class*=\"paywall\"]",
    ".subscription-required",
    ".premium-content",
    ".subscriber-only",
    "[data-paywall]",
];

/// Lower-case phrases that gated pages show in place of the article.
const PAYWALL_PHRASES: &[&str] = &[
    "subscribe to continue reading",
    "subscribe to read the full",
    "this content is for subscribers",
    "this article is for subscribers",
    "available to subscribers only",
    "become a member to read",
    "sign in to continue reading",
    "log in to continue reading",
    "you have reached your free article limit",
    "you've reached your limit of free articles",
];

/// Rough 0-100 estimate of how much readable content `doc` holds.
///
/// Word count, paragraph count, headings, images, link density and a
/// semantic `article`/`main` container each contribute a fixed tier.
///
/// # Example
///
/// ```rust
/// use clipmark_core::{Document, content_quality_score};
///
/// let doc = Document::parse("<nav><a href='/'>Home</a></nav>");
/// assert!(content_quality_score(&doc) < 30);
/// ```
pub fn content_quality_score(doc: &Document) -> u8 {
    let Some(body) = doc.body() else {
        return 0;
    };

    let word_count = body.word_count();
    let paragraphs = body
        .select("p")
        .map(|ps| ps.iter().filter(|p| !p.text().trim().is_empty()).count())
        .unwrap_or(0);
    let links = body.count("a");

    let mut score: u32 = match word_count {
        n if n >= 1000 => 40,
        n if n >= 300 => 30,
        n if n >= 100 => 20,
        n if n >= 30 => 10,
        _ => 0,
    };

    score += match paragraphs {
        n if n >= 5 => 20,
        n if n >= 2 => 10,
        _ => 0,
    };

    if body.count("h1, h2, h3, h4, h5, h6") > 0 {
        score += 10;
    }
    if body.count("img") > 0 {
        score += 5;
    }

    if word_count > 0 {
        let density = link_density(links, word_count);
        if density < 0.1 {
            score += 15;
        } else if density < 0.3 {
            score += 8;
        }
    }

    if body.count("article, main") > 0 {
        score += 10;
    }

    score.min(100) as u8
}

/// Whether `doc` looks gated behind a subscription.
///
/// # Example
///
/// ```rust
/// use clipmark_core::{Document, is_paywall_present};
///
/// let doc = Document::parse("<article><p>Subscribe to continue reading.</p></article>");
/// assert!(is_paywall_present(&doc));
/// ```
pub fn is_paywall_present(doc: &Document) -> bool {
    if PAYWALL_SELECTORS.iter().any(|selector| doc.select_first(selector).is_some()) {
        return true;
    }

    if doc.extract_json_ld().iter().any(is_gated) {
        return true;
    }

    let body_text = text::collapse_whitespace(&doc.text_content()).to_lowercase();
    PAYWALL_PHRASES.iter().any(|phrase| body_text.contains(phrase))
}

fn is_gated(value: &Value) -> bool {
    match value.get("isAccessibleForFree") {
        Some(Value::Bool(free)) => !free,
        Some(Value::String(free)) => free.trim().eq_ignore_ascii_case("false"),
        _ => false,
    }
}
