//! Boilerplate removal on a private copy of the located content.
//!
//! Cleaning never touches the caller's [`Document`](crate::Document). The
//! located subtree is serialized and re-parsed into a fresh fragment that
//! the cleaner owns outright; removals detach nodes from that fragment's
//! tree and the result is serialized back to HTML.
//!
//! Stages run in a fixed order (structural excludes, navigation, ads) and
//! the ad stage repeats until nothing more is removed, so cleaning its own
//! output is a no-op.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::extract::ExtractOptions;
use crate::parse::{Element, compile_lenient};

/// Thresholds used by the cleaning pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanConfig {
    /// Ad-like elements with fewer words than this are removed outright
    pub ad_word_threshold: usize,
    /// Upper bound on ad-stage passes
    pub max_ad_passes: usize,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self { ad_word_threshold: 10, max_ad_passes: 8 }
    }
}

/// Outcome of a cleaning pass.
#[derive(Debug, Clone)]
pub struct CleanReport {
    /// The cleaned HTML fragment
    pub html: String,
    /// Number of elements detached
    pub removed: usize,
}

/// Always removed: non-content tags, overlays, share/comment/related blocks.
const STRUCTURAL_EXCLUDES: &[&str] = &[
    "script",
    "style",
    "noscript",
    "iframe",
    "template",
    "object",
    "embed",
    ".ad",
    ".ads",
    ".advertisement",
    "[class*=\"popup\"]",
    "[class*=\"modal\"]",
    "[class*=\"overlay\"]",
    ".share",
    ".sharing",
    "[class*=\"share-\"]",
    "[class*=\"social-share\"]",
    ".comments",
    "#comments",
    "[class*=\"comment-\"]",
    "[id*=\"disqus\"]",
    ".related",
    ".related-posts",
    ".related-articles",
    "[class*=\"related-post\"]",
    "[hidden]",
    "[aria-hidden=\"true\"]",
];

/// Only removed under `remove_ads`, and only when short or clearly an ad.
const AD_SELECTORS: &[&str] = &[
    "[class*=\"ad-\"]",
    "[class*=\"-ad\"]",
    "[id*=\"ad-\"]",
    "[class*=\"ads\"]",
    "[class*=\"advert\"]",
    "[class*=\"banner\"]",
    "[id*=\"banner\"]",
    "[class*=\"promo\"]",
    "[class*=\"sponsor\"]",
    "[id*=\"sponsor\"]",
    "ins.adsbygoogle",
    "[data-ad]",
    "[data-ad-slot]",
];

/// Class/id substrings that mark an element as an ad regardless of length.
const AD_PATTERNS: &[&str] = &[
    "advertisement",
    "google-ad",
    "googlead",
    "adsense",
    "adsbygoogle",
    "sponsored",
    "doubleclick",
    "ad-slot",
    "ad-container",
    "ad-wrapper",
    "ad-unit",
    "taboola",
    "outbrain",
];

/// Removed unconditionally under `remove_navigation`.
const NAVIGATION_SELECTORS: &[&str] = &[
    "nav",
    "header",
    "footer",
    "[role=\"navigation\"]",
    "[role=\"banner\"]",
    "[role=\"contentinfo\"]",
    ".nav",
    ".navbar",
    ".navigation",
    ".nav-menu",
    ".menu",
    ".main-menu",
    ".site-menu",
    "[class*=\"breadcrumb\"]",
];

/// Clean an HTML fragment according to `options`.
///
/// Top-level elements of the fragment are never removed by their own
/// match, so a located node that happens to carry an excluded class still
/// yields its content.
pub fn clean_html_fragment(html: &str, options: &ExtractOptions) -> CleanReport {
    let mut fragment = Html::parse_fragment(html);
    let hidden = Regex::new(r"(?i)(display\s*:\s*none|visibility\s*:\s*hidden)").unwrap();
    let mut removed = 0;

    if !options.clean_html {
        removed += remove_all(&mut fragment, &compile_lenient(&["script", "style"]));
        return CleanReport { html: fragment.root_element().inner_html(), removed };
    }

    let mut structural = compile_lenient(STRUCTURAL_EXCLUDES);
    structural.extend(compile_lenient(&options.exclude_selectors));
    removed += remove_all(&mut fragment, &structural);

    if let Ok(styled) = Selector::parse("[style]") {
        removed += detach_where(&mut fragment, &styled, |el| {
            el.attr("style").is_some_and(|style| hidden.is_match(style))
        });
    }

    if options.remove_navigation {
        removed += remove_all(&mut fragment, &compile_lenient(NAVIGATION_SELECTORS));
    }

    if options.remove_ads {
        let ad_selectors = compile_lenient(AD_SELECTORS);
        let threshold = options.cleaning.ad_word_threshold;
        for _ in 0..options.cleaning.max_ad_passes.max(1) {
            let mut pass = 0;
            for selector in &ad_selectors {
                pass += detach_where(&mut fragment, selector, |el| is_ad(&el, threshold));
            }
            removed += pass;
            if pass == 0 {
                break;
            }
        }
    }

    tracing::debug!(removed, "cleaned content fragment");
    CleanReport { html: fragment.root_element().inner_html(), removed }
}

/// Short ad-like blocks, or anything whose class/id names a known ad network.
fn is_ad(element: &Element<'_>, word_threshold: usize) -> bool {
    if element.word_count() < word_threshold {
        return true;
    }
    let names = element.class_and_id();
    AD_PATTERNS.iter().any(|pattern| names.contains(pattern))
}

fn remove_all(fragment: &mut Html, selectors: &[Selector]) -> usize {
    selectors
        .iter()
        .map(|selector| detach_where(fragment, selector, |_| true))
        .sum()
}

/// Detach every non-top-level element matching `selector` that passes `should_remove`.
fn detach_where(fragment: &mut Html, selector: &Selector, should_remove: impl Fn(Element<'_>) -> bool) -> usize {
    let doomed: Vec<_> = fragment
        .select(selector)
        .filter(|el| !is_top_level(*el))
        .filter(|el| should_remove(Element::new(*el)))
        .map(|el| el.id())
        .collect();

    for id in &doomed {
        if let Some(mut node) = fragment.tree.get_mut(*id) {
            node.detach();
        }
    }
    doomed.len()
}

fn is_top_level(element: ElementRef<'_>) -> bool {
    element
        .parent()
        .and_then(ElementRef::wrap)
        .is_none_or(|parent| parent.value().name() == "html")
}
