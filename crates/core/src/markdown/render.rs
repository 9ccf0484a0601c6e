//! HTML to markdown conversion through htmd.
//!
//! A fragment is prepared on a private scraper tree before htmd sees it:
//! removal-list selectors are detached and, without `preserve_formatting`,
//! inline formatting is unwrapped. Tables and pseudo-numbered paragraphs are
//! converted by their own rules and swapped for placeholder paragraphs; htmd
//! converts the rest and the placeholders are filled in afterwards.

use htmd::HtmlToMarkdown;
use htmd::options::{self as md, Options};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::postprocess::FenceState;
use super::table::render_table;
use super::{BulletListMarker, CodeBlockStyle, ConvertOptions, HeadingStyle, LinkStyle};
use crate::parse::compile_lenient;
use crate::text;

/// Tags htmd skips together with their content.
const REMOVED_TAGS: &[&str] = &[
    "nav", "footer", "aside", "script", "style", "noscript", "iframe", "form", "button", "head", "title", "meta",
    "link", "template", "svg", "canvas", "select", "input", "textarea",
];

/// Removal-list entries that need a full selector.
const REMOVED_SELECTORS: &[&str] = &[
    ".substack-nav",
    ".subscribe-widget",
    ".subscription-widget",
    ".subscribe-prompt",
    ".recommend",
    ".recommendations",
    ".related-posts",
    ".share-buttons",
    ".social-share",
    ".post-footer",
    ".comments-section",
    "[role=\"navigation\"]",
];

/// Unwrapped when formatting is not preserved. Code inside `pre` is left alone.
const FORMATTING: &str = "strong, b, em, i, del, s, strike, code, kbd, samp, tt";

/// Links that lead nowhere keep only their text.
const DEAD_LINKS: &str = "a:not([href]), a[href=\"\"], a[href^=\"javascript:\"]";

/// Paragraph text that looks like a numbered list item.
const PSEUDO_NUMBERED: &str = r"^\d+\.\s+\w";

/// Minimum length of a pseudo-numbered paragraph.
const PSEUDO_NUMBERED_MIN_CHARS: usize = 20;

const PLACEHOLDER: &str = "CLIPMARKRULEBLOCK";

/// Removal list and custom rules of an initialized converter.
#[derive(Debug, Clone)]
pub(crate) struct RuleTable {
    removed: Vec<Selector>,
    formatting: Selector,
    dead_links: Selector,
    pseudo_numbered: Regex,
    escaped_number: Regex,
    list_marker: Regex,
}

impl RuleTable {
    pub(crate) fn new() -> Self {
        Self {
            removed: compile_lenient(REMOVED_SELECTORS),
            formatting: Selector::parse(FORMATTING).unwrap(),
            dead_links: Selector::parse(DEAD_LINKS).unwrap(),
            pseudo_numbered: Regex::new(PSEUDO_NUMBERED).unwrap(),
            escaped_number: Regex::new(r"^(\d+)\\\.").unwrap(),
            list_marker: Regex::new(r"^(\s*)([-*+]|\d+\.)\s{2,}(\S)").unwrap(),
        }
    }

    /// `1. Something` paragraphs that should keep their number verbatim.
    pub(crate) fn is_pseudo_numbered(&self, text: &str) -> bool {
        text.chars().count() >= PSEUDO_NUMBERED_MIN_CHARS && self.pseudo_numbered.is_match(text)
    }

    fn converter(&self, options: &ConvertOptions) -> HtmlToMarkdown {
        HtmlToMarkdown::builder()
            .skip_tags(REMOVED_TAGS.to_vec())
            .options(htmd_options(options))
            .build()
    }
}

fn htmd_options(options: &ConvertOptions) -> Options {
    Options {
        heading_style: match options.heading_style {
            HeadingStyle::Atx => md::HeadingStyle::Atx,
            HeadingStyle::Setext => md::HeadingStyle::Setex,
        },
        // htmd has no `+`; `render` rewrites dashes afterwards.
        bullet_list_marker: match options.bullet_list_marker {
            BulletListMarker::Asterisk => md::BulletListMarker::Asterisk,
            BulletListMarker::Dash | BulletListMarker::Plus => md::BulletListMarker::Dash,
        },
        code_block_style: match options.code_block_style {
            CodeBlockStyle::Fenced => md::CodeBlockStyle::Fenced,
            CodeBlockStyle::Indented => md::CodeBlockStyle::Indented,
        },
        code_block_fence: md::CodeBlockFence::Backticks,
        link_style: match options.link_style {
            LinkStyle::Inlined => md::LinkStyle::Inlined,
            LinkStyle::Referenced => md::LinkStyle::Referenced,
        },
        ..Default::default()
    }
}

/// Render an HTML fragment to raw, unnormalized markdown.
pub(crate) fn render(html: &str, options: &ConvertOptions, rules: &RuleTable) -> String {
    let converter = rules.converter(options);
    let mut fragment = Html::parse_fragment(html);

    for selector in &rules.removed {
        let ids: Vec<_> = fragment.select(selector).map(|el| el.id()).collect();
        for id in ids {
            if let Some(mut node) = fragment.tree.get_mut(id) {
                node.detach();
            }
        }
    }
    unwrap_matching(&mut fragment, &rules.dead_links);
    if !options.preserve_formatting {
        unwrap_matching(&mut fragment, &rules.formatting);
    }

    let mut prepared = fragment.root_element().inner_html();
    let mut blocks = Vec::new();
    for (source, markdown) in rule_blocks(&fragment, &converter, rules) {
        let token = format!("{}{}X", PLACEHOLDER, blocks.len());
        prepared = prepared.replacen(&source, &format!("<p>{}</p>", token), 1);
        blocks.push((token, markdown));
    }

    let mut markdown = convert(&converter, &prepared);
    for (token, block) in &blocks {
        markdown = fill_placeholder(&markdown, token, block);
    }
    normalize_list_markers(&markdown, options.bullet_list_marker, rules)
}

fn convert(converter: &HtmlToMarkdown, html: &str) -> String {
    converter.convert(html).unwrap_or_else(|err| {
        tracing::warn!(%err, "htmd conversion failed");
        String::new()
    })
}

/// Tables and pseudo-numbered paragraphs in document order, with their markdown.
fn rule_blocks(fragment: &Html, converter: &HtmlToMarkdown, rules: &RuleTable) -> Vec<(String, String)> {
    let mut blocks = Vec::new();
    for el in fragment.root_element().descendants().filter_map(ElementRef::wrap) {
        match el.value().name() {
            "table" if !has_ancestor(el, &["table"]) => {
                let table = render_table(el);
                if !table.is_empty() {
                    blocks.push((el.html(), table));
                }
            }
            "p" if !has_ancestor(el, &["li", "table"]) => {
                let plain = text::collapse_whitespace(&el.text().collect::<String>());
                if !rules.is_pseudo_numbered(&plain) {
                    continue;
                }
                let inline = convert(converter, &el.inner_html());
                let inline = text::collapse_whitespace(&inline);
                let numbered = rules.escaped_number.replace(&inline, "$1.").into_owned();
                blocks.push((el.html(), numbered));
            }
            _ => {}
        }
    }
    blocks
}

fn has_ancestor(el: ElementRef<'_>, tags: &[&str]) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| tags.contains(&ancestor.value().name()))
}

/// Replace each match with its children, outside `pre`.
fn unwrap_matching(fragment: &mut Html, selector: &Selector) {
    let ids: Vec<_> = fragment
        .select(selector)
        .filter(|el| !has_ancestor(*el, &["pre"]))
        .map(|el| el.id())
        .collect();

    for id in ids {
        let children: Vec<_> = match fragment.tree.get(id) {
            Some(node) => node.children().map(|child| child.id()).collect(),
            None => continue,
        };
        if let Some(mut node) = fragment.tree.get_mut(id) {
            for child in children {
                node.insert_id_before(child);
            }
            node.detach();
        }
    }
}

/// Put `block` where `token` sits, repeating the line's quote or list prefix on continuation lines.
fn fill_placeholder(markdown: &str, token: &str, block: &str) -> String {
    let Some(line) = markdown.lines().find(|line| line.contains(token)) else {
        return markdown.to_string();
    };
    let Some(at) = line.find(token) else {
        return markdown.to_string();
    };

    let prefix = &line[..at];
    let continuation: String = prefix.chars().map(|c| if c == '>' { '>' } else { ' ' }).collect();
    let filled = block
        .lines()
        .enumerate()
        .map(|(i, text)| if i == 0 { format!("{}{}", prefix, text) } else { format!("{}{}", continuation, text) })
        .collect::<Vec<_>>()
        .join("\n");

    markdown.replacen(line, &format!("{}{}", filled, &line[at + token.len()..]), 1)
}

/// Single space after list markers, and `+` bullets when asked for. Fenced code is left alone.
fn normalize_list_markers(markdown: &str, bullet: BulletListMarker, rules: &RuleTable) -> String {
    let mut fences = FenceState::default();
    markdown
        .lines()
        .map(|line| {
            if fences.observe(line) || fences.is_open() || is_thematic_break(line) {
                return line.to_string();
            }
            let line = rules.list_marker.replace(line, "$1$2 $3").into_owned();
            if bullet == BulletListMarker::Plus
                && let Some(rest) = line.trim_start().strip_prefix("- ")
            {
                let indent = &line[..line.len() - line.trim_start().len()];
                return format!("{}+ {}", indent, rest);
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_thematic_break(line: &str) -> bool {
    let marks: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    marks.len() >= 3 && ['-', '*', '_'].iter().any(|&mark| marks.chars().all(|c| c == mark))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::postprocess::postprocess_markdown;

    fn render_with(html: &str, options: &ConvertOptions) -> String {
        postprocess_markdown(&render(html, options, &RuleTable::new()))
    }

    fn render_default(html: &str) -> String {
        render_with(html, &ConvertOptions::default())
    }

    #[test]
    fn test_headings_and_paragraphs() {
        assert_eq!(render_default("<h1>Title</h1><p>Body text here.</p>"), "# Title\n\nBody text here.\n");
    }

    #[test]
    fn test_setext_headings() {
        let options = ConvertOptions { heading_style: HeadingStyle::Setext, ..Default::default() };
        let md = render_with("<h1>Hi there</h1><h3>Deep</h3>", &options);
        assert!(md.starts_with("Hi there\n=="), "got {:?}", md);
        assert!(md.contains("### Deep"));
    }

    #[test]
    fn test_inline_formatting() {
        let md = render_default("<p>Some <strong>bold</strong> and <code>code</code>.</p>");
        assert!(md.contains("**bold**"));
        assert!(md.contains("`code`"));
    }

    #[test]
    fn test_formatting_dropped_when_not_preserved() {
        let options = ConvertOptions { preserve_formatting: false, ..Default::default() };
        let md = render_with("<p>Some <strong>bold</strong> and <code>code</code>.</p>", &options);
        assert_eq!(md, "Some bold and code.\n");
    }

    #[test]
    fn test_code_in_pre_kept_without_formatting() {
        let options = ConvertOptions { preserve_formatting: false, ..Default::default() };
        let md = render_with("<pre><code>let x = 1;</code></pre>", &options);
        assert!(md.contains("```"));
        assert!(md.contains("let x = 1;"));
    }

    #[test]
    fn test_literal_markdown_syntax_is_escaped() {
        let md = render_default("<p># Not a heading, just a hash</p><p>* not a bullet</p><p>my_var_name and *stars*</p>");
        assert!(!md.starts_with("# "), "got {:?}", md);
        assert!(!md.lines().any(|line| line.starts_with("* ")), "got {:?}", md);
        assert!(!md.contains(" *stars*"), "got {:?}", md);
        assert!(md.contains("Not a heading, just a hash"));
    }

    #[test]
    fn test_links_inlined() {
        let md = render_default(r#"<p>See <a href="https://example.com">the site</a> and <a href="">nothing</a>.</p>"#);
        assert!(md.contains("[the site](https://example.com"));
        assert!(md.contains("and nothing."));
    }

    #[test]
    fn test_javascript_links_render_text() {
        assert_eq!(render_default(r#"<p><a href="javascript:void(0)">Click</a></p>"#), "Click\n");
    }

    #[test]
    fn test_links_referenced() {
        let options = ConvertOptions { link_style: LinkStyle::Referenced, ..Default::default() };
        let md = render_with(r#"<p><a href="https://a.example">A</a> and <a href="https://b.example">B</a></p>"#, &options);
        assert!(!md.contains("(https://a.example)"), "got {:?}", md);
        assert!(md.contains("]: https://a.example"));
        assert!(md.contains("]: https://b.example"));
    }

    #[test]
    fn test_images() {
        assert!(render_default(r#"<p><img src="/a.png" alt="An image"></p>"#).contains("![An image](/a.png)"));
    }

    #[test]
    fn test_fenced_code_with_language() {
        let md = render_default(r#"<pre><code class="language-rust">fn main() {}</code></pre>"#);
        assert!(md.starts_with("```rust\n"), "got {:?}", md);
        assert!(md.contains("fn main() {}"));
    }

    #[test]
    fn test_indented_code() {
        let options = ConvertOptions { code_block_style: CodeBlockStyle::Indented, ..Default::default() };
        let md = render_with("<pre><code>let x = 1;\nlet y = 2;</code></pre>", &options);
        assert!(md.contains("    let x = 1;"));
        assert!(!md.contains("```"));
    }

    #[test]
    fn test_lists_and_nesting() {
        let md = render_default("<ul><li>One<ul><li>Nested</li></ul></li><li>Two</li></ul>");
        assert!(md.contains("- One"));
        assert!(md.contains("- Two"));
        assert!(md.lines().any(|line| line.starts_with(' ') && line.trim_start() == "- Nested"), "got {:?}", md);
    }

    #[test]
    fn test_bullet_markers() {
        let asterisk = ConvertOptions { bullet_list_marker: BulletListMarker::Asterisk, ..Default::default() };
        assert!(render_with("<ul><li>x</li></ul>", &asterisk).starts_with("* x"));

        let plus = ConvertOptions { bullet_list_marker: BulletListMarker::Plus, ..Default::default() };
        let md = render_with("<ul><li>x<ul><li>y</li></ul></li></ul>", &plus);
        assert!(md.starts_with("+ x"), "got {:?}", md);
        assert!(md.lines().any(|line| line.trim_start() == "+ y"));
        assert!(!md.contains("- "));
    }

    #[test]
    fn test_blockquote() {
        assert!(render_default("<blockquote><p>First</p></blockquote>").starts_with("> First"));
    }

    #[test]
    fn test_pseudo_numbered_paragraph() {
        let md = render_default("<p>Intro text.</p><p>1. This is a long numbered paragraph</p><p>After.</p>");
        assert_eq!(md, "Intro text.\n\n1. This is a long numbered paragraph\n\nAfter.\n");
    }

    #[test]
    fn test_pseudo_numbered_paragraph_keeps_inline_markup() {
        let md = render_default(
            r#"<p>1. See <a href="https://example.com/x">the guide</a> and <strong>read it</strong> carefully</p>"#,
        );
        assert!(md.starts_with("1. See [the guide](https://example.com/x)"), "got {:?}", md);
        assert!(md.contains("**read it**"));
    }

    #[test]
    fn test_pseudo_numbered_rule_needs_length() {
        let rules = RuleTable::new();
        assert!(rules.is_pseudo_numbered("1. This is long enough text"));
        assert!(!rules.is_pseudo_numbered("1. Short"));
        assert!(!rules.is_pseudo_numbered("Not numbered at all, really"));
    }

    #[test]
    fn test_removal_list() {
        let md = render_default(
            r#"<div><nav>Menu</nav><p>Keep</p><aside>Aside</aside><div class="subscribe-widget">Subscribe</div><button>Click</button></div>"#,
        );
        assert_eq!(md, "Keep\n");
    }

    #[test]
    fn test_table_block() {
        let md = render_default("<p>Before</p><table><tr><th>A</th></tr><tr><td>1</td></tr></table><p>After</p>");
        assert_eq!(md, "Before\n\n| A |\n| --- |\n| 1 |\n\nAfter\n");
    }

    #[test]
    fn test_placeholder_keeps_quote_prefix() {
        let filled = fill_placeholder("Intro\n\n> TOKEN1X\n\nOutro", "TOKEN1X", "| A |\n| --- |");
        assert_eq!(filled, "Intro\n\n> | A |\n> | --- |\n\nOutro");
    }

    #[test]
    fn test_list_marker_spacing_normalized() {
        let rules = RuleTable::new();
        let md = normalize_list_markers("-   one\n1.  two\n* * *\n```\n-   code\n```", BulletListMarker::Dash, &rules);
        assert_eq!(md, "- one\n1. two\n* * *\n```\n-   code\n```");
    }
}
