pub mod capture;
pub mod clean;
pub mod error;
pub mod extract;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod markdown;
pub mod metadata;
pub mod parse;
pub mod preprocess;
pub mod quality;
pub mod scoring;
#[cfg(feature = "settle")]
pub mod settle;
pub mod text;

pub use capture::{Capture, CaptureConfig, CaptureConfigBuilder, CaptureResult, capture, capture_with_url};
pub use clean::{CleanConfig, CleanReport, clean_html_fragment};
pub use error::{CaptureError, Result};
pub use extract::{ExtractOptions, ExtractOptionsBuilder, ExtractionMethod, ExtractionResult, extract_content};
#[cfg(feature = "fetch")]
pub use fetch::{FetchConfig, HttpImageProbe, fetch_file, fetch_stdin, fetch_url};
pub use markdown::{
    BulletListMarker, CodeBlockStyle, ConversionResult, ConvertOptions, ConvertOptionsBuilder, HeadingStyle,
    ImageAsset, LinkStyle, MarkdownConverter, convert_to_markdown, generate_frontmatter,
};
pub use metadata::DocumentMetadata;
pub use parse::{Document, Element};
#[doc(hidden)]
pub use preprocess::PreprocessConfig;
pub use preprocess::preprocess_html;
pub use quality::{content_quality_score, is_paywall_present};
#[doc(hidden)]
pub use scoring::{ScoreConfig, ScoreResult, calculate_score, class_id_weight, link_density, tag_bonus};
#[cfg(feature = "settle")]
pub use settle::{ImageProbe, ImageStatus, SettleReport, wait_for_images};
