//! YAML frontmatter synthesis.

use time::format_description::well_known::Rfc3339;

use crate::metadata::DocumentMetadata;

/// Method recorded when the converter ran without extraction.
const DIRECT_METHOD: &str = "direct";

/// Render the frontmatter block for `metadata`.
///
/// Keys are emitted in a fixed order. Optional fields (author, published
/// date, description, site, language, reading time) appear only when
/// `include_metadata` is set, and the string-valued ones only when non-empty.
/// Every string is double-quoted and escaped, so the block is valid YAML.
///
/// # Example
///
/// ```rust
/// use clipmark_core::{DocumentMetadata, generate_frontmatter};
///
/// let metadata = DocumentMetadata { title: "Hello \"World\"".to_string(), ..Default::default() };
/// let frontmatter = generate_frontmatter(&metadata, false);
/// assert!(frontmatter.starts_with("---\ntitle: \"Hello \\\"World\\\"\"\n"));
/// assert!(frontmatter.ends_with("---"));
/// ```
pub fn generate_frontmatter(metadata: &DocumentMetadata, include_metadata: bool) -> String {
    let mut lines = vec!["---".to_string()];

    lines.push(format!("title: {}", yaml_quote(&metadata.title)));
    lines.push(format!("url: {}", yaml_quote(&metadata.url)));
    lines.push(format!("domain: {}", yaml_quote(&metadata.domain)));
    let captured = metadata.capture_date.format(&Rfc3339).unwrap_or_default();
    lines.push(format!("captured: {}", yaml_quote(&captured)));

    if include_metadata {
        let optional = [
            ("author", &metadata.author),
            ("published", &metadata.published_date),
            ("description", &metadata.description),
            ("site", &metadata.site_name),
            ("language", &metadata.language),
        ];
        for (key, value) in optional {
            if !value.trim().is_empty() {
                lines.push(format!("{}: {}", key, yaml_quote(value)));
            }
        }
    }

    let tags: Vec<String> = metadata.tags.iter().map(|tag| yaml_quote(tag)).collect();
    lines.push(format!("tags: [{}]", tags.join(", ")));
    lines.push(format!("word_count: {}", metadata.word_count));
    if include_metadata {
        lines.push(format!("reading_time: {}", metadata.estimated_reading_time));
    }

    let method = metadata.extraction_method.map(|m| m.as_str()).unwrap_or(DIRECT_METHOD);
    lines.push(format!("extraction_method: {}", yaml_quote(method)));

    lines.push("---".to_string());
    lines.join("\n")
}

/// Double-quote a string for YAML, escaping backslashes, quotes and control characters.
fn yaml_quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractionMethod;
    use time::macros::datetime;

    fn sample() -> DocumentMetadata {
        DocumentMetadata {
            title: "A \"quoted\" title: with colon".to_string(),
            url: "https://example.com/blog/post".to_string(),
            domain: "example.com".to_string(),
            capture_date: datetime!(2026-10-17 12:00 UTC),
            author: "Jane Doe".to_string(),
            description: "Line one\nLine two \\ backslash".to_string(),
            tags: vec!["rust".to_string(), "web".to_string()],
            word_count: 450,
            estimated_reading_time: 3,
            extraction_method: Some(ExtractionMethod::SemanticSelector),
            ..Default::default()
        }
    }

    #[test]
    fn test_yaml_quote_escapes() {
        assert_eq!(yaml_quote("plain"), "\"plain\"");
        assert_eq!(yaml_quote("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(yaml_quote("a\\b"), "\"a\\\\b\"");
        assert_eq!(yaml_quote("one\ntwo"), "\"one\\ntwo\"");
        assert_eq!(yaml_quote("bell\u{7}"), "\"bell\\u0007\"");
    }

    #[test]
    fn test_full_frontmatter_layout() {
        let frontmatter = generate_frontmatter(&sample(), true);
        let lines: Vec<&str> = frontmatter.lines().collect();

        assert_eq!(lines.first(), Some(&"---"));
        assert_eq!(lines.last(), Some(&"---"));
        assert_eq!(lines[1], r#"title: "A \"quoted\" title: with colon""#);
        assert_eq!(lines[2], r#"url: "https://example.com/blog/post""#);
        assert_eq!(lines[3], r#"domain: "example.com""#);
        assert_eq!(lines[4], r#"captured: "2026-10-17T12:00:00Z""#);
        assert!(lines.contains(&r#"author: "Jane Doe""#));
        assert!(lines.contains(&r#"language: "en""#));
        assert!(lines.contains(&r#"tags: ["rust", "web"]"#));
        assert!(lines.contains(&"word_count: 450"));
        assert!(lines.contains(&"reading_time: 3"));
        assert!(lines.contains(&r#"extraction_method: "semantic-selector""#));
        assert!(!frontmatter.contains("published:"));
        assert!(!frontmatter.contains("site:"));
    }

    #[test]
    fn test_minimal_frontmatter() {
        let frontmatter = generate_frontmatter(&sample(), false);
        assert!(!frontmatter.contains("author:"));
        assert!(!frontmatter.contains("description:"));
        assert!(!frontmatter.contains("reading_time:"));
        assert!(frontmatter.contains("word_count: 450"));
        assert!(frontmatter.contains("tags: ["));
    }

    #[test]
    fn test_direct_method_and_empty_tags() {
        let metadata = DocumentMetadata::default();
        let frontmatter = generate_frontmatter(&metadata, true);
        assert!(frontmatter.contains("tags: []"));
        assert!(frontmatter.contains(r#"extraction_method: "direct""#));
        assert!(frontmatter.contains(r#"title: "Untitled""#));
    }

    #[test]
    fn test_frontmatter_parses_as_yaml() {
        let frontmatter = generate_frontmatter(&sample(), true);
        let body = frontmatter.trim_start_matches("---\n").trim_end_matches("---");
        let parsed: serde_yaml::Value = serde_yaml::from_str(body).unwrap();

        assert_eq!(parsed["title"].as_str(), Some("A \"quoted\" title: with colon"));
        assert_eq!(parsed["description"].as_str(), Some("Line one\nLine two \\ backslash"));
        assert_eq!(parsed["word_count"].as_u64(), Some(450));
        assert_eq!(parsed["tags"][1].as_str(), Some("web"));
    }
}
