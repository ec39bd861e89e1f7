//! Scanner for the structured review response.
//!
//! The model is instructed to answer in a small section grammar:
//!
//! ```text
//! SUMMARY: $$ ... $$
//! POEM: $$ ... $$            (optional)
//! PR_COMMENT:path:line: label: $$ ... $$   (zero or more)
//! ```
//!
//! Section bodies are bracketed by the `$$` token, so they may span lines and
//! contain markdown, code fences and colons. The scanner walks keyword and
//! bracket tokens with a cursor; it never splits on newlines or bare colons.
//!
//! Malformed comment blocks (header with fewer than three fields, non-numeric
//! line) are dropped individually with a warning — one bad block never aborts
//! parsing of the rest.

use tracing::warn;

use crate::review::{COMMENT_SIDE, ReviewComment};

const SUMMARY_KEYWORD: &str = "SUMMARY:";
const POEM_KEYWORD: &str = "POEM:";
const COMMENT_KEYWORD: &str = "PR_COMMENT:";
const BRACKET: &str = "$$";

/// Sections recovered from one model response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedResponse {
    pub summary: String,
    pub poem: Option<String>,
    pub comments: Vec<ReviewComment>,
}

/// Parses the raw model text into its sections.
pub fn parse_response(text: &str) -> ParsedResponse {
    ParsedResponse {
        summary: extract_section(text, SUMMARY_KEYWORD).unwrap_or_default(),
        poem: extract_section(text, POEM_KEYWORD),
        comments: extract_comments(text),
    }
}

/// Content of the first `$$ ... $$` pair after the first `keyword`.
fn extract_section(text: &str, keyword: &str) -> Option<String> {
    let mut cur = Cursor::new(text);
    if !cur.skip_past(keyword) || !cur.skip_past(BRACKET) {
        return None;
    }
    cur.take_until(BRACKET).map(|s| s.trim().to_string())
}

/// All well-formed `PR_COMMENT:` blocks, in response order.
fn extract_comments(text: &str) -> Vec<ReviewComment> {
    let mut out = Vec::new();
    let mut cur = Cursor::new(text);
    if !cur.skip_past(COMMENT_KEYWORD) {
        return out;
    }
    loop {
        let (block, more) = cur.take_block(COMMENT_KEYWORD);
        if let Some(comment) = parse_comment_block(block) {
            out.push(comment);
        }
        if !more {
            break;
        }
    }
    out
}

/// Parses one comment block: `path:line: label: $$ body $$`.
///
/// The header is everything before the first bracket; the body sits between
/// the first and the LAST bracket in the block, so bodies may themselves
/// contain stray `$$`-free markdown of any shape.
fn parse_comment_block(block: &str) -> Option<ReviewComment> {
    let first = block.find(BRACKET)?;
    let last = block.rfind(BRACKET)?;
    if last <= first {
        warn!("comment block without closing delimiter, dropping");
        return None;
    }

    let header = block[..first].trim();
    let body = block[first + BRACKET.len()..last].trim();

    let mut fields = header.splitn(3, ':');
    let (Some(path), Some(line), Some(label)) = (fields.next(), fields.next(), fields.next())
    else {
        warn!(header, "malformed comment header, dropping");
        return None;
    };

    let line: u32 = match line.trim().parse() {
        Ok(n) => n,
        Err(_) => {
            warn!(header, "non-numeric line in comment header, dropping");
            return None;
        }
    };

    // The label line (emoji + category) stays the first visible line of the
    // posted comment.
    Some(ReviewComment {
        path: path.trim().to_string(),
        line,
        side: COMMENT_SIDE,
        body: format!("{}\n\n{}", label.trim(), body),
    })
}

/// Minimal forward-only cursor over the response text.
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    /// Advances past the next occurrence of `token`. False when the token
    /// does not occur (cursor is exhausted either way).
    fn skip_past(&mut self, token: &str) -> bool {
        match self.rest.find(token) {
            Some(ix) => {
                self.rest = &self.rest[ix + token.len()..];
                true
            }
            None => {
                self.rest = "";
                false
            }
        }
    }

    /// Text before the next occurrence of `token`, advancing past it.
    fn take_until(&mut self, token: &str) -> Option<&'a str> {
        let ix = self.rest.find(token)?;
        let head = &self.rest[..ix];
        self.rest = &self.rest[ix + token.len()..];
        Some(head)
    }

    /// Text up to the next occurrence of `token` or all remaining input.
    /// The flag reports whether another block follows.
    fn take_block(&mut self, token: &str) -> (&'a str, bool) {
        match self.rest.find(token) {
            Some(ix) => {
                let head = &self.rest[..ix];
                self.rest = &self.rest[ix + token.len()..];
                (head, true)
            }
            None => {
                let head = self.rest;
                self.rest = "";
                (head, false)
            }
        }
    }
}
