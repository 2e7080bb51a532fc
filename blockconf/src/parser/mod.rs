pub mod error;
pub mod sanitize;
mod structural;

pub use error::{ParseError, ParseErrorKind};
pub use sanitize::{Sanitized, sanitize, sanitize_mapped};
pub use structural::MAX_NESTING;

use crate::block::Block;

/// Parser entry point.
pub struct Parser {
    source: String,
    file_id: usize,
}

/// The result of parsing: the tree, plus whatever the parser had to work
/// around to build it.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub root: Block,
    pub diagnostics: Vec<ParseError>,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn sanitized(&self) -> Sanitized {
        sanitize_mapped(&self.source)
    }

    /// Parse the source into a root block called `root_name`. Never fails:
    /// malformed input yields a partial tree and diagnostics.
    pub fn parse(&self, root_name: impl Into<String>) -> Parsed {
        let sanitized = self.sanitized();
        let mut root = Block::new(root_name);
        let mut diagnostics = Vec::new();

        if let Some(offset) = sanitized.unterminated_comment {
            diagnostics.push(
                ParseError::warning(
                    ParseErrorKind::UnterminatedComment,
                    "unterminated block comment",
                    offset..offset + 2,
                    self.file_id,
                )
                .with_note("everything after `/*` was ignored"),
            );
        }

        diagnostics.extend(structural::build_block(&mut root, &sanitized, self.file_id));
        Parsed { root, diagnostics }
    }
}
