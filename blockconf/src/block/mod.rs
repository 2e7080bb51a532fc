mod lookup;
mod print;
pub mod setting;

use std::io::{self, Read};
use std::path::Path;

use crate::block::setting::Setting;
use crate::parser::{ParseError, Parser};

/// A named node of the configuration tree.
///
/// Settings and child blocks keep their insertion order. Settings may repeat
/// a key (lookups take the last one); child names are unique once the block
/// has been consolidated, which every parsing entry point does.
///
/// `Clone` is a deep copy: a block owns all of its settings and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    name: String,
    settings: Vec<Setting>,
    blocks: Vec<Block>,
}

impl Block {
    /// An empty block.
    pub fn new(name: impl Into<String>) -> Self {
        Block {
            name: name.into(),
            settings: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// A block holding the given settings, in order.
    pub fn with_settings<I, S>(name: impl Into<String>, settings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Setting>,
    {
        Block {
            name: name.into(),
            settings: settings.into_iter().map(Into::into).collect(),
            blocks: Vec::new(),
        }
    }

    /// Parse configuration text into a block called `name`.
    ///
    /// Malformed input never fails; the tree built up to the problem is
    /// returned. Use [`Parser`] directly to also receive the diagnostics.
    pub fn parse(name: impl Into<String>, text: &str) -> Self {
        Parser::new(text.to_string(), 0).parse(name).root
    }

    /// Read the whole of `reader` and parse it.
    pub fn read_from<R: Read>(name: impl Into<String>, mut reader: R) -> io::Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Block::parse(name, &text))
    }

    /// Read and parse a file.
    pub fn from_path(name: impl Into<String>, path: impl AsRef<Path>) -> io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Block::parse(name, &text))
    }

    /// Parse more text into this block. Blocks named like existing children
    /// are merged into them.
    pub fn merge_text(&mut self, text: &str) -> Vec<ParseError> {
        let parsed = Parser::new(text.to_string(), 0).parse(self.name.clone());
        let Block {
            settings, blocks, ..
        } = parsed.root;
        self.settings.extend(settings);
        for block in blocks {
            self.add_block(block);
        }
        parsed.diagnostics
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty() && self.blocks.is_empty()
    }

    /// Append a setting after all existing ones.
    pub fn add_setting(&mut self, setting: impl Into<Setting>) {
        self.settings.push(setting.into());
    }

    /// Add a child block. If a child with the same name exists, the incoming
    /// settings are appended to it and the incoming children are merged into
    /// it by the same rule; otherwise the block becomes the last child.
    pub fn add_block(&mut self, block: Block) {
        match self.find_block_mut(&block.name) {
            Some(existing) => existing.absorb(block),
            None => self.blocks.push(block),
        }
    }

    fn absorb(&mut self, other: Block) {
        self.settings.extend(other.settings);
        for child in other.blocks {
            self.add_block(child);
        }
    }

    fn find_block_mut(&mut self, name: &str) -> Option<&mut Block> {
        self.blocks.iter_mut().rev().find(|block| block.name == name)
    }

    /// Merge same-named children, depth first. The first occurrence keeps
    /// its position and receives the settings of later ones in the order
    /// they appeared.
    pub(crate) fn consolidate(&mut self) {
        let children = std::mem::take(&mut self.blocks);
        for mut child in children {
            child.consolidate();
            self.add_block(child);
        }
    }

    pub(crate) fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
    }
}

impl PartialEq<str> for Block {
    fn eq(&self, name: &str) -> bool {
        self.name == name
    }
}
