//! Plain-text rendering and word statistics.
//!
//! Text is rendered block-aware: block-level elements start on their own
//! line, so `<h1>Hello</h1><p>World</p>` yields `"Hello\nWorld"` rather than
//! the `"HelloWorld"` a raw text-node concatenation would produce. Word
//! counts are always taken from this rendering, never from markdown.

use scraper::{ElementRef, Node};

/// Words per minute used for reading-time estimates.
pub const WORDS_PER_MINUTE: usize = 200;

const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "dd",
    "details",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "summary",
    "table",
    "tr",
    "ul",
];

const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Whether a tag renders as its own block.
pub fn is_block(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

/// Render the text of an element, one block per line.
///
/// Whitespace inside each line is collapsed and empty lines are dropped.
pub fn plain_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_text(element, &mut raw);
    normalize_lines(&raw)
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_TAGS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                let Some(child_ref) = ElementRef::wrap(child) else {
                    continue;
                };
                let block = is_block(name);
                if block {
                    out.push('\n');
                } else if matches!(name, "td" | "th") {
                    out.push(' ');
                }
                push_text(child_ref, out);
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn normalize_lines(raw: &str) -> String {
    raw.lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Count whitespace-separated words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimated reading time in whole minutes, `ceil(words / 200)`.
pub fn reading_time(word_count: usize) -> usize {
    word_count.div_ceil(WORDS_PER_MINUTE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn render(html: &str) -> String {
        let fragment = Html::parse_fragment(html);
        plain_text(fragment.root_element())
    }

    #[test]
    fn test_blocks_are_separated() {
        let text = render("<article><h1>Hello</h1><p>World of markdown testing here.</p></article>");
        assert_eq!(text, "Hello\nWorld of markdown testing here.");
        assert_eq!(count_words(&text), 6);
    }

    #[test]
    fn test_inline_elements_do_not_split_words() {
        let text = render("<p>un<b>break</b>able <em>words</em></p>");
        assert_eq!(text, "unbreakable words");
    }

    #[test]
    fn test_scripts_and_styles_are_ignored() {
        let text = render("<div><script>var x = 1;</script><style>p{}</style><p>Visible</p></div>");
        assert_eq!(text, "Visible");
    }

    #[test]
    fn test_line_breaks_and_cells() {
        let text = render("<p>one<br>two</p><table><tr><td>a</td><td>b</td></tr></table>");
        assert_eq!(text, "one\ntwo\na b");
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("hello world"), 2);
        assert_eq!(count_words("  spaced \n\t out  "), 2);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time(0), 0);
        assert_eq!(reading_time(1), 1);
        assert_eq!(reading_time(200), 1);
        assert_eq!(reading_time(201), 2);
        assert_eq!(reading_time(450), 3);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n b\t\tc "), "a b c");
    }
}
