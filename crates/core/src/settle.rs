//! Bounded wait for late-loading images.
//!
//! The engine itself never touches the network. Hosts that render pages
//! supply an [`ImageProbe`]; [`wait_for_images`] asks it about every distinct
//! image source concurrently and gives each one at most `timeout`.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use url::Url;

use crate::parse::Document;

/// Outcome of probing one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStatus {
    Loaded,
    Failed,
}

/// Host hook that resolves once an image has loaded or failed.
#[async_trait]
pub trait ImageProbe: Send + Sync {
    async fn settle(&self, src: &str) -> ImageStatus;
}

/// Counts per outcome of a [`wait_for_images`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SettleReport {
    pub loaded: usize,
    pub failed: usize,
    pub timed_out: usize,
}

impl SettleReport {
    pub fn total(&self) -> usize {
        self.loaded + self.failed + self.timed_out
    }
}

/// Distinct `img[src]` values of `doc`, resolved against its URL when known.
///
/// `data:` URIs are already loaded and are left out.
pub fn image_sources(doc: &Document) -> Vec<String> {
    let mut seen = HashSet::new();
    let Ok(images) = doc.select("img[src]") else {
        return Vec::new();
    };

    images
        .iter()
        .filter_map(|img| img.attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty() && !src.starts_with("data:"))
        .filter_map(|src| match doc.url() {
            Some(base) => base.join(src).ok().map(String::from),
            None => Url::parse(src).ok().map(String::from),
        })
        .filter(|src| seen.insert(src.clone()))
        .collect()
}

/// Wait until every image of `doc` has settled, each bounded by `timeout`.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use async_trait::async_trait;
/// use clipmark_core::Document;
/// use clipmark_core::settle::{ImageProbe, ImageStatus, wait_for_images};
///
/// struct AlwaysLoaded;
///
/// #[async_trait]
/// impl ImageProbe for AlwaysLoaded {
///     async fn settle(&self, _src: &str) -> ImageStatus {
///         ImageStatus::Loaded
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() {
/// let doc = Document::parse(r#"<img src="https://example.com/a.png">"#);
/// let report = wait_for_images(&doc, &AlwaysLoaded, Duration::from_secs(1)).await;
/// assert_eq!(report.loaded, 1);
/// # }
/// ```
pub async fn wait_for_images(doc: &Document, probe: &dyn ImageProbe, timeout: Duration) -> SettleReport {
    let sources = image_sources(doc);
    settle_all(&sources, probe, timeout).await
}

async fn settle_all(sources: &[String], probe: &dyn ImageProbe, timeout: Duration) -> SettleReport {
    let probes = sources.iter().map(|src| tokio::time::timeout(timeout, probe.settle(src)));
    let outcomes = join_all(probes).await;

    let mut report = SettleReport::default();
    for outcome in outcomes {
        match outcome {
            Ok(ImageStatus::Loaded) => report.loaded += 1,
            Ok(ImageStatus::Failed) => report.failed += 1,
            Err(_) => report.timed_out += 1,
        }
    }
    tracing::debug!(loaded = report.loaded, failed = report.failed, timed_out = report.timed_out, "images settled");
    report
}
