//! Text-level cleanup applied to HTML before markdown conversion.

use regex::Regex;
use url::Url;

/// Configuration for HTML preprocessing
#[derive(Debug, Clone, Default)]
pub struct PreprocessConfig {
    /// Base URL for converting relative `href`/`src` values
    pub base_url: Option<Url>,
}

/// Strip scripts, styles and comments, absolutize URLs, and normalize whitespace.
///
/// Content inside `<pre>` keeps its whitespace.
pub fn preprocess_html(html: &str, config: &PreprocessConfig) -> String {
    let processed = remove_scripts_and_styles(html);
    let processed = remove_comments(&processed);
    let processed = normalize_code_language(&processed);

    let processed = match &config.base_url {
        Some(base_url) => convert_relative_urls(&processed, base_url),
        None => processed,
    };

    map_outside_pre(&processed, normalize_whitespace)
}

fn remove_scripts_and_styles(html: &str) -> String {
    let re = Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>").unwrap();
    re.replace_all(html, "").to_string()
}

/// Remove HTML comments from the document
fn remove_comments(html: &str) -> String {
    let re = Regex::new(r"(?s)<!--.*?-->").unwrap();
    re.replace_all(html, "").to_string()
}

/// `lang-rust` becomes `language-rust` on `pre` and `code` classes.
fn normalize_code_language(html: &str) -> String {
    let re = Regex::new(r#"(?i)(<(?:pre|code)\b[^>]*\bclass=["'](?:[^"']*\s)?)lang-"#).unwrap();
    re.replace_all(html, "${1}language-").to_string()
}

/// Convert relative `a[href]` and `img[src]` values to absolute URLs.
///
/// Empty and `javascript:` links are left alone so the renderer can drop them.
pub fn convert_relative_urls(html: &str, base_url: &Url) -> String {
    let mut output = String::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: vec![
                lol_html::element!("a[href]", |el| {
                    if let Some(href) = el.get_attribute("href")
                        && let Some(absolute) = absolutize(base_url, &href)
                    {
                        el.set_attribute("href", &absolute).ok();
                    }
                    Ok(())
                }),
                lol_html::element!("img[src]", |el| {
                    if let Some(src) = el.get_attribute("src")
                        && let Some(absolute) = absolutize(base_url, &src)
                    {
                        el.set_attribute("src", &absolute).ok();
                    }
                    Ok(())
                }),
            ],
            ..Default::default()
        },
        |c: &[u8]| {
            output.push_str(&String::from_utf8_lossy(c));
        },
    );

    if rewriter.write(html.as_bytes()).is_err() {
        return html.to_string();
    }

    if rewriter.end().is_err() {
        return html.to_string();
    }

    if output.is_empty() { html.to_string() } else { output }
}

fn absolutize(base_url: &Url, value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.to_ascii_lowercase().starts_with("javascript:") || value.starts_with("data:") {
        return None;
    }
    base_url.join(value).ok().map(String::from)
}

/// Apply `f` to every segment of `html` that is not inside a `<pre>` block.
fn map_outside_pre(html: &str, f: impl Fn(&str) -> String) -> String {
    let pre = Regex::new(r"(?is)<pre\b.*?</pre\s*>").unwrap();
    let mut output = String::with_capacity(html.len());
    let mut last = 0;
    for m in pre.find_iter(html) {
        output.push_str(&f(&html[last..m.start()]));
        output.push_str(m.as_str());
        last = m.end();
    }
    output.push_str(&f(&html[last..]));
    output
}

/// Collapse horizontal whitespace runs and limit blank lines to two.
fn normalize_whitespace(html: &str) -> String {
    let horizontal = Regex::new(r"[ \t\u{00A0}]{2,}").unwrap();
    let blank_lines = Regex::new(r"\n[ \t]*\n([ \t]*\n)+").unwrap();
    let collapsed = horizontal.replace_all(html, " ");
    blank_lines.replace_all(&collapsed, "\n\n").to_string()
}
