//! Truncation, expansion and link tokenization shared by every detail block.
//!
//! Lengths are counted in `char`s, not bytes, so multi-byte text is never
//! split inside a code point.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Characters treated as one visual line when deciding whether text overflows.
pub const CHARS_PER_LINE: usize = 80;
/// Collapsed-body character budget.
pub const DEFAULT_MAX_LENGTH: usize = 240;
/// Collapsed-body line budget; `BODY_LINE_LIMIT * CHARS_PER_LINE == DEFAULT_MAX_LENGTH`.
pub const BODY_LINE_LIMIT: usize = 3;
/// Longest link text shown before it is shortened.
pub const URL_DISPLAY_MAX: usize = 50;
pub const ELLIPSIS: &str = "...";

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://\S+").expect("url pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Text { text: String },
    Link { display: String, target: String },
}

impl Segment {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// What a reader sees for this segment.
    pub fn display(&self) -> &str {
        match self {
            Self::Text { text } => text,
            Self::Link { display, .. } => display,
        }
    }
}

pub fn needs_expansion(text: &str, line_limit: usize) -> bool {
    !text.is_empty() && text.chars().count() > line_limit * CHARS_PER_LINE
}

pub fn truncate(text: &str, max_length: usize) -> String {
    match text.char_indices().nth(max_length) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
    }
}

/// Split `text` into plain and link segments, in order.
///
/// When collapsed, the text is first cut to `max_length`. Links whose URL is
/// longer than [`URL_DISPLAY_MAX`] are shown shortened but keep the full URL
/// as their target. A URL cut by the collapse keeps the cut form, ellipsis
/// included, as its target; expanding restores the full link.
pub fn linkify(text: &str, expanded: bool, max_length: usize) -> Vec<Segment> {
    let text = if expanded {
        text.to_string()
    } else {
        truncate(text, max_length)
    };

    let mut segments = Vec::new();
    let mut cursor = 0;
    for found in URL_RE.find_iter(&text) {
        if found.start() > cursor {
            segments.push(Segment::text(&text[cursor..found.start()]));
        }
        let url = found.as_str();
        segments.push(Segment::Link {
            display: shorten_url(url),
            target: url.to_string(),
        });
        cursor = found.end();
    }
    if cursor < text.len() {
        segments.push(Segment::text(&text[cursor..]));
    }
    segments
}

fn shorten_url(url: &str) -> String {
    if url.chars().count() > URL_DISPLAY_MAX {
        truncate(url, URL_DISPLAY_MAX - ELLIPSIS.len())
    } else {
        url.to_string()
    }
}

/// First line of `text`, with surrounding whitespace removed.
pub fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}

/// Upper-case the first character: `"opened"` becomes `"Opened"`.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
