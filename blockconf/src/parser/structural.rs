use std::ops::Range;

use crate::block::Block;
use crate::block::setting::Setting;
use crate::parser::error::{ParseError, ParseErrorKind};
use crate::parser::sanitize::Sanitized;

/// Brace nesting deeper than this inside one block is treated as malformed.
pub const MAX_NESTING: usize = 100;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the contents of `root` from sanitized text, then merge duplicate
/// blocks throughout the tree.
pub fn build_block(root: &mut Block, sanitized: &Sanitized, file_id: usize) -> Vec<ParseError> {
    let mut state = BuildState {
        text: &sanitized.text,
        sanitized,
        file_id,
        diagnostics: Vec::new(),
    };
    state.build_body(root, 0..sanitized.text.len());
    root.consolidate();
    state.diagnostics
}

// ---------------------------------------------------------------------------
// Build state
// ---------------------------------------------------------------------------

struct BuildState<'a> {
    text: &'a str,
    sanitized: &'a Sanitized,
    file_id: usize,
    diagnostics: Vec<ParseError>,
}

impl BuildState<'_> {
    /// Parse `body := (option | block)*` over `range` into `block`.
    fn build_body(&mut self, block: &mut Block, range: Range<usize>) {
        let text = self.text;
        let bytes = text.as_bytes();
        let mut start = range.start;

        while start < range.end {
            // The nearer of `;` (end of a setting) and `{` (start of a block)
            let Some(end) = find_any(bytes, start..range.end, b";{") else {
                self.trailing_text(start..range.end);
                break;
            };

            if bytes[end] == b';' {
                // A stray `;` with nothing before it is skipped.
                if end > start {
                    block.add_setting(Setting::from_assignment(&text[start..end]));
                }
                start = end + 1;
                continue;
            }

            // 'name' directly precedes "{"
            let name = &text[start..end];
            let close = self.matching_close(end, range.end);
            let mut child = Block::new(name);
            self.build_body(&mut child, end + 1..close);
            block.push_block(child);
            start = close + 1;
        }
    }

    /// Position of the `}` matching the `{` at `open`, searching below
    /// `limit`. When the braces do not balance this is the last delimiter
    /// seen (or `limit`), and a diagnostic is recorded.
    fn matching_close(&mut self, open: usize, limit: usize) -> usize {
        let text = self.text;
        let bytes = text.as_bytes();
        let mut depth = 1;
        let mut last = None;
        let mut pos = open + 1;

        loop {
            let Some(next) = find_any(bytes, pos..limit, b"{}") else {
                self.warn(
                    ParseErrorKind::UnclosedBrace,
                    "unclosed `{`",
                    open..open + 1,
                    "no matching `}` was found; the block runs to the last brace seen",
                );
                return last.unwrap_or(limit);
            };
            last = Some(next);

            if bytes[next] == b'{' {
                depth += 1;
            } else {
                depth -= 1;
            }

            if depth == 0 {
                return next;
            }
            if depth > MAX_NESTING {
                self.warn(
                    ParseErrorKind::NestingTooDeep,
                    format!("blocks nested more than {} deep", MAX_NESTING),
                    next..next + 1,
                    "check that every `{` has a matching `}`",
                );
                return next;
            }
            pos = next + 1;
        }
    }

    fn trailing_text(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let ignored = self.text[range.clone()].to_string();
        self.warn(
            ParseErrorKind::TrailingText,
            format!("ignoring `{}`", ignored),
            range,
            "settings end with `;` and blocks with `}`",
        );
    }

    fn warn(
        &mut self,
        kind: ParseErrorKind,
        message: impl Into<String>,
        range: Range<usize>,
        note: &str,
    ) {
        let span = self.source_span(range);
        self.diagnostics
            .push(ParseError::warning(kind, message, span, self.file_id).with_note(note));
    }

    /// Map a range of sanitized text back to the original source.
    fn source_span(&self, range: Range<usize>) -> Range<usize> {
        let start = self.sanitized.origin(range.start);
        let end = match range.end.checked_sub(1) {
            Some(last) if range.end > range.start => self.sanitized.origin(last) + 1,
            _ => start,
        };
        start..end.max(start)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// First position in `range` holding any of `needles`.
fn find_any(bytes: &[u8], range: Range<usize>, needles: &[u8]) -> Option<usize> {
    let offset = range.start;
    bytes
        .get(range)?
        .iter()
        .position(|b| needles.contains(b))
        .map(|i| offset + i)
}
