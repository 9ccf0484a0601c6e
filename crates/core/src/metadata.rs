use std::collections::{BTreeMap, HashSet};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::Document;
use crate::extract::ExtractionMethod;
use crate::text;

/// Hosts whose pages are treated as blog posts.
const BLOG_PLATFORMS: &[&str] = &[
    "medium.com",
    "substack.com",
    "wordpress.com",
    "blogspot.com",
    "ghost.io",
    "dev.to",
    "hashnode.dev",
    "tumblr.com",
];

const TAG_SELECTORS: &[&str] = &[
    "a[rel=\"tag\"]",
    ".tags a",
    ".tag",
    ".post-tags a",
    ".categories a",
    ".category a",
];

const MAX_TAGS: usize = 20;

/// Everything known about a captured page.
///
/// String fields are empty rather than absent so the record can be rendered
/// without further checks; `title` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub capture_date: OffsetDateTime,
    pub author: String,
    pub description: String,
    /// Raw published date as found on the page
    pub published_date: String,
    pub language: String,
    pub tags: Vec<String>,
    pub word_count: usize,
    /// Minutes, `ceil(word_count / 200)`
    pub estimated_reading_time: usize,
    pub site_name: String,
    /// Host of `url` without a leading `www.`
    pub domain: String,
    pub image: Option<String>,
    pub canonical_url: Option<String>,
    pub modified_date: String,
    /// `og:*` entries keyed without the prefix, plus `article:*` entries
    pub open_graph: BTreeMap<String, String>,
    /// `twitter:*` entries keyed without the prefix
    pub twitter: BTreeMap<String, String>,
    /// Every parseable JSON-LD object, with arrays and `@graph` flattened
    pub structured_data: Vec<Value>,
    pub is_blog: bool,
    pub extraction_method: Option<ExtractionMethod>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            title: "Untitled".to_string(),
            url: String::new(),
            capture_date: OffsetDateTime::UNIX_EPOCH,
            author: String::new(),
            description: String::new(),
            published_date: String::new(),
            language: "en".to_string(),
            tags: Vec::new(),
            word_count: 0,
            estimated_reading_time: 0,
            site_name: String::new(),
            domain: String::new(),
            image: None,
            canonical_url: None,
            modified_date: String::new(),
            open_graph: BTreeMap::new(),
            twitter: BTreeMap::new(),
            structured_data: Vec::new(),
            is_blog: false,
            extraction_method: None,
        }
    }
}

impl Document {
    /// Extract all metadata in one pass over the whole document.
    ///
    /// Independent of content localization. `word_count` is taken from the
    /// body text here; [`extract_content`](crate::extract_content) replaces
    /// it with the count of the cleaned content.
    ///
    /// # Example
    ///
    /// ```rust
    /// use clipmark_core::Document;
    /// use time::OffsetDateTime;
    ///
    /// let doc = Document::parse("<html><head><title>Notes</title></head><body><p>Hi</p></body></html>");
    /// let metadata = doc.extract_metadata(OffsetDateTime::now_utc());
    /// assert_eq!(metadata.title, "Notes");
    /// assert_eq!(metadata.language, "en");
    /// ```
    pub fn extract_metadata(&self, captured_at: OffsetDateTime) -> DocumentMetadata {
        let structured_data = self.extract_json_ld();
        let is_blog = self.is_blog();
        let word_count = text::count_words(&self.text_content());

        DocumentMetadata {
            title: self.extract_title(&structured_data),
            url: self.url().map(|u| u.to_string()).unwrap_or_default(),
            capture_date: captured_at,
            author: self.extract_author(&structured_data).unwrap_or_default(),
            description: self.extract_description(&structured_data).unwrap_or_default(),
            published_date: self.extract_published_date(&structured_data).unwrap_or_default(),
            language: self.extract_language(),
            tags: if is_blog { self.extract_tags(&structured_data) } else { Vec::new() },
            word_count,
            estimated_reading_time: text::reading_time(word_count),
            site_name: self.extract_site_name(&structured_data).unwrap_or_default(),
            domain: self.domain().unwrap_or_default(),
            image: self.extract_image(),
            canonical_url: self.extract_canonical_url(),
            modified_date: self.extract_modified_date(&structured_data).unwrap_or_default(),
            open_graph: self.open_graph(),
            twitter: self.twitter_card(),
            structured_data,
            is_blog,
            extraction_method: None,
        }
    }

    /// Title with priority fallback:
    /// 1. Open Graph `og:title`
    /// 2. Twitter `twitter:title`
    /// 3. JSON-LD `headline`, or `name` of an article-like object
    /// 4. First `<h1>` element
    /// 5. `<title>` element
    /// 6. `"Untitled"`
    pub fn extract_title(&self, structured_data: &[Value]) -> String {
        self.meta_content("og:title")
            .or_else(|| self.meta_content("twitter:title"))
            .or_else(|| json_ld_str(structured_data, "headline"))
            .or_else(|| {
                structured_data
                    .iter()
                    .filter(|item| is_article_like(item))
                    .find_map(|item| non_empty(item.get("name")?.as_str()?))
            })
            .or_else(|| self.first_text("h1"))
            .or_else(|| self.title())
            .unwrap_or_else(|| "Untitled".to_string())
    }

    /// Author with priority fallback:
    /// 1. Meta `article:author`, unless it is a profile URL
    /// 2. Meta `twitter:creator`
    /// 3. Meta `author`
    /// 4. JSON-LD `author` (string, object or array)
    /// 5. `[rel="author"]` / `[itemprop="author"]` text
    /// 6. `.author`, `.byline`, `[class*="author"]` text under 100 chars
    pub fn extract_author(&self, structured_data: &[Value]) -> Option<String> {
        if let Some(author) = self.meta_content("article:author")
            && !author.starts_with("http")
        {
            return Some(author);
        }

        if let Some(author) = self.meta_content("twitter:creator") {
            return Some(author);
        }
        if let Some(author) = self.meta_content("author") {
            return Some(author);
        }

        if let Some(author) = structured_data
            .iter()
            .filter_map(|item| item.get("author"))
            .find_map(author_from_json_ld)
        {
            return Some(author);
        }

        if let Some(author) = self.first_text("[rel=\"author\"]") {
            return Some(author);
        }

        if let Some(el) = self.select_first("[itemprop=\"author\"]") {
            let author = el
                .attr("content")
                .map(text::collapse_whitespace)
                .unwrap_or_else(|| text::collapse_whitespace(&el.text()));
            if !author.is_empty() {
                return Some(author);
            }
        }

        for selector in [".author", ".byline", "[class*=\"author\"]"] {
            if let Ok(elements) = self.select(selector) {
                for el in elements.iter().take(3) {
                    let text = text::collapse_whitespace(&el.text());
                    if !text.is_empty() && text.chars().count() < 100 {
                        return Some(text);
                    }
                }
            }
        }

        None
    }

    /// Published date with priority fallback:
    /// 1. Meta `article:published_time`
    /// 2. JSON-LD `datePublished`
    /// 3. `<time datetime="">` element
    /// 4. Meta `date` / `DC.date` / `pubdate`
    /// 5. `.date`, `.published`, `[class*="date"]` text
    pub fn extract_published_date(&self, structured_data: &[Value]) -> Option<String> {
        if let Some(date) = self.meta_content("article:published_time") {
            return Some(date);
        }
        if let Some(date) = json_ld_str(structured_data, "datePublished") {
            return Some(date);
        }

        if let Some(el) = self.select_first("time[datetime]")
            && let Some(datetime) = el.attr("datetime").and_then(non_empty)
        {
            return Some(datetime);
        }

        for key in ["date", "DC.date", "pubdate"] {
            if let Some(date) = self.meta_content(key) {
                return Some(date);
            }
        }

        [".date", ".published", "[class*=\"date\"]"]
            .iter()
            .filter_map(|selector| self.first_text(selector))
            .find(|text| text.chars().count() <= 100)
    }

    /// Description with priority fallback:
    /// 1. Open Graph `og:description`
    /// 2. Twitter `twitter:description`
    /// 3. Meta `description`
    /// 4. JSON-LD `description`
    /// 5. First paragraph over 50 characters, cut at 300
    pub fn extract_description(&self, structured_data: &[Value]) -> Option<String> {
        self.meta_content("og:description")
            .or_else(|| self.meta_content("twitter:description"))
            .or_else(|| self.meta_content("description"))
            .or_else(|| json_ld_str(structured_data, "description"))
            .or_else(|| {
                let paragraphs = self.select("p").ok()?;
                paragraphs.iter().find_map(|el| {
                    let text = text::collapse_whitespace(&el.text());
                    if text.chars().count() <= 50 {
                        return None;
                    }
                    if text.chars().count() > 300 {
                        Some(format!("{}...", text.chars().take(300).collect::<String>()))
                    } else {
                        Some(text)
                    }
                })
            })
    }

    /// Language from `<html lang>`, `content-language`, or `og:locale`; `"en"` otherwise.
    pub fn extract_language(&self) -> String {
        if let Some(lang) = self.select_first("html").and_then(|el| el.attr("lang")).and_then(non_empty) {
            return lang;
        }

        if let Ok(metas) = self.select("meta[http-equiv][content]")
            && let Some(lang) = metas
                .iter()
                .filter(|el| el.attr("http-equiv").is_some_and(|v| v.eq_ignore_ascii_case("content-language")))
                .find_map(|el| el.attr("content").and_then(non_empty))
        {
            return lang;
        }

        self.meta_content("og:locale")
            .map(|locale| locale.replace('_', "-"))
            .unwrap_or_else(|| "en".to_string())
    }

    /// Site name from `og:site_name`, JSON-LD `publisher.name`, or the host.
    pub fn extract_site_name(&self, structured_data: &[Value]) -> Option<String> {
        self.meta_content("og:site_name")
            .or_else(|| {
                structured_data
                    .iter()
                    .find_map(|item| non_empty(item.get("publisher")?.get("name")?.as_str()?))
            })
            .or_else(|| self.domain())
    }

    /// Host of the document URL without a leading `www.`.
    pub fn domain(&self) -> Option<String> {
        let host = self.url()?.host_str()?;
        Some(host.strip_prefix("www.").unwrap_or(host).to_string())
    }

    /// Lead image from `og:image` or `twitter:image`, absolutized.
    pub fn extract_image(&self) -> Option<String> {
        let src = self
            .meta_content("og:image")
            .or_else(|| self.meta_content("twitter:image"))?;
        Some(self.absolutize(&src))
    }

    /// `<link rel="canonical">` target, absolutized.
    pub fn extract_canonical_url(&self) -> Option<String> {
        let href = self
            .select_first("link[rel=\"canonical\"]")
            .and_then(|el| el.attr("href"))
            .and_then(non_empty)?;
        Some(self.absolutize(&href))
    }

    pub fn extract_modified_date(&self, structured_data: &[Value]) -> Option<String> {
        self.meta_content("article:modified_time")
            .or_else(|| self.meta_content("og:updated_time"))
            .or_else(|| json_ld_str(structured_data, "dateModified"))
    }

    /// Whether the page looks like a blog post.
    ///
    /// True when the URL path looks like a post (`/blog/`, `/posts/`,
    /// `/2024/05/`), the host is a known blogging platform, or the page has
    /// a substantial `.post`/`.entry`/`.article` block.
    pub fn is_blog(&self) -> bool {
        if let Some(url) = self.url() {
            let path_pattern = Regex::new(r"(?i)/(blog|posts?|articles?)/|/\d{4}/\d{2}/").unwrap();
            if path_pattern.is_match(url.path()) {
                return true;
            }
            if let Some(host) = url.host_str()
                && BLOG_PLATFORMS
                    .iter()
                    .any(|platform| host == *platform || host.ends_with(&format!(".{}", platform)))
            {
                return true;
            }
        }

        self.select(".post, .entry, .article")
            .map(|elements| elements.iter().any(|el| el.word_count() > 50))
            .unwrap_or(false)
    }

    /// Tags from keywords metadata and on-page tag links.
    ///
    /// Trimmed, 2 to 50 characters, deduplicated case-insensitively (first
    /// spelling wins), at most 20.
    pub fn extract_tags(&self, structured_data: &[Value]) -> Vec<String> {
        let mut candidates: Vec<String> = Vec::new();

        if let Some(keywords) = self.meta_content("keywords") {
            candidates.extend(keywords.split(',').map(str::to_string));
        }
        candidates.extend(self.meta_contents("article:tag"));

        for item in structured_data {
            match item.get("keywords") {
                Some(Value::String(keywords)) => candidates.extend(keywords.split(',').map(str::to_string)),
                Some(Value::Array(keywords)) => {
                    candidates.extend(keywords.iter().filter_map(|k| k.as_str()).map(str::to_string))
                }
                _ => {}
            }
        }

        for selector in TAG_SELECTORS {
            if let Ok(elements) = self.select(selector) {
                candidates.extend(elements.iter().map(|el| el.text()));
            }
        }

        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .map(|tag| text::collapse_whitespace(&tag))
            .filter(|tag| (2..=50).contains(&tag.chars().count()))
            .filter(|tag| seen.insert(tag.to_lowercase()))
            .take(MAX_TAGS)
            .collect()
    }

    /// Every `og:*` and `article:*` meta entry; first occurrence wins.
    pub fn open_graph(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        for (key, value) in self.meta_entries() {
            if let Some(name) = key.strip_prefix("og:") {
                map.entry(name.to_string()).or_insert(value);
            } else if key.starts_with("article:") {
                map.entry(key).or_insert(value);
            }
        }
        map
    }

    /// Every `twitter:*` meta entry; first occurrence wins.
    pub fn twitter_card(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        for (key, value) in self.meta_entries() {
            if let Some(name) = key.strip_prefix("twitter:") {
                map.entry(name.to_string()).or_insert(value);
            }
        }
        map
    }

    /// Parse every JSON-LD block, flattening arrays and `@graph`.
    ///
    /// Blocks that fail to parse are skipped.
    pub fn extract_json_ld(&self) -> Vec<Value> {
        let mut items = Vec::new();
        if let Ok(elements) = self.select("script[type=\"application/ld+json\"]") {
            for el in elements {
                match serde_json::from_str::<Value>(el.text().trim()) {
                    Ok(value) => flatten_json_ld(value, &mut items),
                    Err(e) => tracing::debug!(error = %e, "skipping malformed JSON-LD block"),
                }
            }
        }
        items
    }

    /// `(key, content)` for every `<meta>` with a `name` or `property` and non-empty content.
    fn meta_entries(&self) -> Vec<(String, String)> {
        let Ok(metas) = self.select("meta[content]") else {
            return Vec::new();
        };
        metas
            .iter()
            .filter_map(|el| {
                let key = el.attr("property").or_else(|| el.attr("name"))?;
                let content = el.attr("content").and_then(non_empty)?;
                Some((key.trim().to_lowercase(), content))
            })
            .collect()
    }

    /// First meta content for `key`, matched case-insensitively.
    fn meta_content(&self, key: &str) -> Option<String> {
        self.meta_contents(key).into_iter().next()
    }

    fn meta_contents(&self, key: &str) -> Vec<String> {
        let key = key.to_lowercase();
        self.meta_entries()
            .into_iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v)
            .collect()
    }

    fn first_text(&self, selector: &str) -> Option<String> {
        self.select_first(selector).and_then(|el| non_empty(&el.text()))
    }

    fn absolutize(&self, href: &str) -> String {
        match self.url().map(|base| base.join(href)) {
            Some(Ok(url)) => url.to_string(),
            _ => href.to_string(),
        }
    }
}

fn flatten_json_ld(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => items.into_iter().for_each(|item| flatten_json_ld(item, out)),
        Value::Object(mut obj) => {
            if let Some(Value::Array(graph)) = obj.remove("@graph") {
                graph.into_iter().for_each(|item| flatten_json_ld(item, out));
                if obj.keys().any(|k| !k.starts_with('@')) {
                    out.push(Value::Object(obj));
                }
            } else {
                out.push(Value::Object(obj));
            }
        }
        _ => {}
    }
}

fn is_article_like(item: &Value) -> bool {
    let matches = |t: &str| t.contains("Article") || t.contains("Posting") || t == "WebPage";
    match item.get("@type") {
        Some(Value::String(t)) => matches(t),
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).any(matches),
        _ => false,
    }
}

/// First non-empty string value of `key` across all items.
fn json_ld_str(items: &[Value], key: &str) -> Option<String> {
    items.iter().find_map(|item| non_empty(item.get(key)?.as_str()?))
}

/// Author name from a JSON-LD `author` value: string, `{name}`, or an array of either.
fn author_from_json_ld(author: &Value) -> Option<String> {
    match author {
        Value::String(name) => non_empty(name),
        Value::Object(obj) => non_empty(obj.get("name")?.as_str()?),
        Value::Array(authors) => authors.iter().find_map(author_from_json_ld),
        _ => None,
    }
}

/// Whitespace-collapsed `value`, or `None` when blank.
fn non_empty(value: &str) -> Option<String> {
    let value = text::collapse_whitespace(value);
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML_WITH_META: &str = r#"
        <!DOCTYPE html>
        <html lang="en-GB">
        <head>
            <meta charset="UTF-8">
            <title>Test Page Title</title>
            <meta name="author" content="John Doe">
            <meta name="description" content="This is a test description of the page.">
            <meta name="keywords" content="rust, Parsing, rust, x">
            <meta property="og:title" content="OG Title">
            <meta property="og:description" content="OG Description">
            <meta property="og:site_name" content="Example Site">
            <meta property="og:image" content="/images/lead.png">
            <meta property="article:published_time" content="2024-01-15T10:30:00Z">
            <meta property="article:tag" content="Web">
            <meta name="twitter:card" content="summary">
            <link rel="canonical" href="/blog/original-post">
            <script type="application/ld+json">
            {
                "@context": "https://schema.org",
                "@type": "Article",
                "headline": "JSON-LD Headline",
                "author": {
                    "@type": "Person",
                    "name": "Jane Smith"
                },
                "datePublished": "2023-12-01",
                "dateModified": "2024-02-01",
                "description": "JSON-LD Description",
                "publisher": {
                    "@type": "Organization",
                    "name": "JSON-LD Publisher"
                }
            }
            </script>
        </head>
        <body>
            <h1>Main Heading</h1>
            <p>This is the first paragraph of the content. It contains multiple words that should be counted for the word count calculation.</p>
            <p>This is a second paragraph with additional content.</p>
            <time datetime="2024-01-15T10:30:00Z">January 15, 2024</time>
        </body>
        </html>
    "#;

    const HTML_WITHOUT_META: &str = r#"
        <!DOCTYPE html>
        <html>
        <head>
            <meta charset="UTF-8">
            <title>Simple Page</title>
        </head>
        <body>
            <h1>Heading</h1>
            <p>This is a paragraph with some text content.</p>
        </body>
        </html>
    "#;

    fn metadata_for(html: &str, url: Option<&str>) -> DocumentMetadata {
        let doc = match url {
            Some(url) => Document::parse_with_url(html, url).unwrap(),
            None => Document::parse(html),
        };
        doc.extract_metadata(OffsetDateTime::UNIX_EPOCH)
    }

    #[test]
    fn test_title_prefers_open_graph() {
        let metadata = metadata_for(HTML_WITH_META, None);
        assert_eq!(metadata.title, "OG Title");
    }

    #[test]
    fn test_title_fallback_chain() {
        let doc = Document::parse(HTML_WITHOUT_META);
        assert_eq!(doc.extract_title(&[]), "Heading");

        let doc = Document::parse("<html><head><title>Only Title</title></head><body></body></html>");
        assert_eq!(doc.extract_title(&[]), "Only Title");

        let doc = Document::parse("<html><body><p>x</p></body></html>");
        assert_eq!(doc.extract_title(&[]), "Untitled");
    }

    #[test]
    fn test_title_from_json_ld_before_heading() {
        let html = r#"<html><head><script type="application/ld+json">{"@type":"BlogPosting","name":"Ld Name"}</script></head><body><h1>Heading</h1></body></html>"#;
        let doc = Document::parse(html);
        let data = doc.extract_json_ld();
        assert_eq!(doc.extract_title(&data), "Ld Name");
    }

    #[test]
    fn test_author_prefers_meta_over_json_ld() {
        let metadata = metadata_for(HTML_WITH_META, None);
        assert_eq!(metadata.author, "John Doe");
    }

    #[test]
    fn test_author_from_json_ld_array() {
        let html = r#"<html><head><script type="application/ld+json">
            {"@type":"Article","author":[{"@type":"Person","name":"First Author"},{"name":"Second"}]}
        </script></head><body></body></html>"#;
        let doc = Document::parse(html);
        let data = doc.extract_json_ld();
        assert_eq!(doc.extract_author(&data), Some("First Author".to_string()));
    }

    #[test]
    fn test_article_author_url_is_ignored() {
        let html = r#"<html><head>
            <meta property="article:author" content="https://facebook.com/someone">
        </head><body><span class="byline">By Ada Lovelace</span></body></html>"#;
        let doc = Document::parse(html);
        assert_eq!(doc.extract_author(&[]), Some("By Ada Lovelace".to_string()));
    }

    #[test]
    fn test_published_date_priority() {
        let metadata = metadata_for(HTML_WITH_META, None);
        assert_eq!(metadata.published_date, "2024-01-15T10:30:00Z");
        assert_eq!(metadata.modified_date, "2024-02-01");
    }

    #[test]
    fn test_published_date_from_time_element() {
        let html = r#"<html><body><time datetime="2024-03-01">March 1</time></body></html>"#;
        let doc = Document::parse(html);
        assert_eq!(doc.extract_published_date(&[]), Some("2024-03-01".to_string()));
    }

    #[test]
    fn test_description_fallback_to_paragraph() {
        let doc = Document::parse(HTML_WITHOUT_META);
        assert_eq!(doc.extract_description(&[]), None);

        let long = "word ".repeat(100);
        let doc = Document::parse(&format!("<html><body><p>short</p><p>{}</p></body></html>", long));
        let description = doc.extract_description(&[]).unwrap();
        assert!(description.ends_with("..."));
        assert_eq!(description.chars().count(), 303);
    }

    #[test]
    fn test_language_sources() {
        assert_eq!(metadata_for(HTML_WITH_META, None).language, "en-GB");
        assert_eq!(metadata_for(HTML_WITHOUT_META, None).language, "en");

        let html = r#"<html><head><meta property="og:locale" content="fr_FR"></head><body></body></html>"#;
        assert_eq!(Document::parse(html).extract_language(), "fr-FR");

        let html = r#"<html><head><meta http-equiv="Content-Language" content="de"></head><body></body></html>"#;
        assert_eq!(Document::parse(html).extract_language(), "de");
    }

    #[test]
    fn test_site_name_and_domain() {
        let metadata = metadata_for(HTML_WITHOUT_META, Some("https://www.example.com/page"));
        assert_eq!(metadata.site_name, "example.com");
        assert_eq!(metadata.domain, "example.com");
        assert_eq!(metadata.url, "https://www.example.com/page");

        let metadata = metadata_for(HTML_WITH_META, None);
        assert_eq!(metadata.site_name, "Example Site");
    }

    #[test]
    fn test_image_and_canonical_are_absolutized() {
        let metadata = metadata_for(HTML_WITH_META, Some("https://example.com/a/b"));
        assert_eq!(metadata.image.as_deref(), Some("https://example.com/images/lead.png"));
        assert_eq!(metadata.canonical_url.as_deref(), Some("https://example.com/blog/original-post"));
    }

    #[test]
    fn test_open_graph_and_twitter_maps() {
        let metadata = metadata_for(HTML_WITH_META, None);
        assert_eq!(metadata.open_graph.get("title").map(String::as_str), Some("OG Title"));
        assert_eq!(
            metadata.open_graph.get("article:published_time").map(String::as_str),
            Some("2024-01-15T10:30:00Z")
        );
        assert_eq!(metadata.twitter.get("card").map(String::as_str), Some("summary"));
    }

    #[test]
    fn test_json_ld_graph_is_flattened() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"@context":"https://schema.org","@graph":[{"@type":"WebSite","name":"Site"},{"@type":"Article","headline":"Graph Headline"}]}</script>
            <script type="application/ld+json">{ not json </script>
        </head><body></body></html>"#;
        let doc = Document::parse(html);
        let data = doc.extract_json_ld();
        assert_eq!(data.len(), 2);
        assert_eq!(doc.extract_title(&data), "Graph Headline");
    }

    #[test]
    fn test_blog_detection() {
        let html = "<html><body><p>x</p></body></html>";
        assert!(Document::parse_with_url(html, "https://example.com/blog/hello").unwrap().is_blog());
        assert!(Document::parse_with_url(html, "https://example.com/2024/05/hello").unwrap().is_blog());
        assert!(Document::parse_with_url(html, "https://someone.substack.com/p/hi").unwrap().is_blog());
        assert!(!Document::parse_with_url(html, "https://example.com/pricing").unwrap().is_blog());

        let long = "word ".repeat(60);
        let doc = Document::parse(&format!(r#"<html><body><div class="post">{}</div></body></html>"#, long));
        assert!(doc.is_blog());
    }

    #[test]
    fn test_tags_only_for_blogs() {
        let metadata = metadata_for(HTML_WITH_META, Some("https://example.com/pricing"));
        assert!(metadata.tags.is_empty());
        assert!(!metadata.is_blog);

        let metadata = metadata_for(HTML_WITH_META, Some("https://example.com/blog/post"));
        assert!(metadata.is_blog);
        assert_eq!(metadata.tags, vec!["rust", "Parsing", "Web"]);
    }

    #[test]
    fn test_tags_dedupe_and_cap() {
        let links: String = (0..30).map(|i| format!(r#"<a rel="tag" href="/t/{i}">tag{i}</a>"#)).collect();
        let html = format!(
            r#"<html><head><meta name="keywords" content="Rust, rust, RUST"></head><body>{}</body></html>"#,
            links
        );
        let doc = Document::parse(&html);
        let tags = doc.extract_tags(&[]);
        assert_eq!(tags.len(), 20);
        assert_eq!(tags[0], "Rust");
        assert_eq!(tags.iter().filter(|t| t.eq_ignore_ascii_case("rust")).count(), 1);
    }

    #[test]
    fn test_metadata_serializes_capture_date_as_rfc3339() {
        let metadata = metadata_for(HTML_WITHOUT_META, None);
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["capture_date"], "1970-01-01T00:00:00Z");
        let back: DocumentMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(back, metadata);
    }
}
