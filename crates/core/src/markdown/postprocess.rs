//! Whitespace normalization of rendered markdown.
//!
//! Fenced code blocks pass through untouched; everything else gets single
//! blank lines between blocks, blank lines around headings, and a blank line
//! before a list that directly follows prose.

use regex::Regex;

/// Normalize rendered markdown. The result ends with exactly one newline,
/// or is empty.
pub(crate) fn postprocess_markdown(markdown: &str) -> String {
    let markdown = markdown.replace("\r\n", "\n");
    let list_item = Regex::new(r"^([-*+]|\d+\.)\s").unwrap();
    let atx_heading = Regex::new(r"^#{1,6}\s").unwrap();
    let setext_underline = Regex::new(r"^(=+|-+)\s*$").unwrap();

    let mut lines: Vec<String> = Vec::new();
    let mut fences = FenceState::default();

    for raw in markdown.lines() {
        let was_open = fences.is_open();
        if fences.observe(raw) {
            if !was_open {
                push_blank(&mut lines);
            }
            lines.push(raw.to_string());
            if was_open && !fences.is_open() {
                push_blank(&mut lines);
            }
            continue;
        }

        if raw.trim().is_empty() {
            push_blank(&mut lines);
            continue;
        }

        if atx_heading.is_match(raw) {
            push_blank(&mut lines);
            lines.push(raw.to_string());
            push_blank(&mut lines);
            continue;
        }

        if setext_underline.is_match(raw)
            && let Some(previous) = lines.last()
            && !previous.is_empty()
        {
            let title = lines.pop().unwrap_or_default();
            push_blank(&mut lines);
            lines.push(title);
            lines.push(raw.to_string());
            push_blank(&mut lines);
            continue;
        }

        if list_item.is_match(raw)
            && let Some(previous) = lines.last()
            && is_prose(previous, &list_item)
        {
            push_blank(&mut lines);
        }

        lines.push(raw.to_string());
    }

    while lines.first().is_some_and(|line| line.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        return String::new();
    }
    let mut output = lines.join("\n");
    output.push('\n');
    output
}

/// Tracks whether a line sequence is inside a fenced code block.
#[derive(Debug, Default)]
pub(crate) struct FenceState {
    open: Option<(char, usize)>,
}

impl FenceState {
    pub(crate) fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Feed the next line; true when it belongs to a fenced block, fences included.
    pub(crate) fn observe(&mut self, line: &str) -> bool {
        match (self.open, fence_marker(line)) {
            (None, Some(fence)) => {
                self.open = Some(fence);
                true
            }
            (Some((c, n)), Some((close_c, close_n))) if c == close_c && close_n >= n && is_bare_fence(line) => {
                self.open = None;
                true
            }
            (Some(_), _) => true,
            (None, None) => false,
        }
    }
}

/// A run of three or more backticks or tildes opening the (trimmed) line.
fn fence_marker(line: &str) -> Option<(char, usize)> {
    let trimmed = line.trim_start();
    let c = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let n = trimmed.chars().take_while(|x| *x == c).count();
    (n >= 3).then_some((c, n))
}

fn is_bare_fence(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.chars().all(|x| x == '`' || x == '~')
}

/// A non-empty, unindented line that is not itself a list item or a quote.
fn is_prose(line: &str, list_item: &Regex) -> bool {
    !line.is_empty()
        && !line.starts_with(char::is_whitespace)
        && !line.starts_with('>')
        && !line.starts_with('|')
        && !list_item.is_match(line)
}

/// Append a blank line unless the output is empty or already ends with one.
fn push_blank(lines: &mut Vec<String>) {
    if lines.last().is_some_and(|line| !line.is_empty()) {
        lines.push(String::new());
    }
}
