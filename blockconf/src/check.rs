use std::fmt;

use crate::block::Block;

/// A setting or block name the application understands, with a short
/// description shown to the user when something unexpected turns up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownEntry {
    pub name: String,
    pub description: String,
}

impl KnownEntry {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        KnownEntry {
            name: name.into(),
            description: description.into(),
        }
    }
}

impl<N: Into<String>, D: Into<String>> From<(N, D)> for KnownEntry {
    fn from((name, description): (N, D)) -> Self {
        KnownEntry::new(name, description)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Setting,
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEntry {
    pub kind: EntryKind,
    pub name: String,
}

/// Outcome of [`Block::check`].
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub block: String,
    pub unknown: Vec<UnknownEntry>,
    pub known: Vec<KnownEntry>,
    /// List every known entry even when nothing is unknown.
    pub show_all: bool,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.unknown.is_empty()
    }

    pub fn show_all(mut self, show_all: bool) -> Self {
        self.show_all = show_all;
        self
    }
}

impl Block {
    /// Compare this block's settings and direct child blocks against the
    /// names an application knows about. A misspelled key would otherwise go
    /// unnoticed, since lookups fall back to their defaults. Nested blocks are
    /// not checked.
    pub fn check<I, E>(&self, known: I) -> CheckReport
    where
        I: IntoIterator<Item = E>,
        E: Into<KnownEntry>,
    {
        let known: Vec<KnownEntry> = known.into_iter().map(Into::into).collect();
        let is_known = |name: &str| known.iter().any(|entry| entry.name == name);

        let mut unknown: Vec<UnknownEntry> = Vec::new();
        let mut note = |kind: EntryKind, name: &str| {
            if !is_known(name) && !unknown.iter().any(|u| u.kind == kind && u.name == name) {
                unknown.push(UnknownEntry {
                    kind,
                    name: name.to_string(),
                });
            }
        };
        for setting in self.settings() {
            note(EntryKind::Setting, setting.key());
        }
        for block in self.blocks() {
            note(EntryKind::Block, block.name());
        }

        CheckReport {
            block: self.name().to_string(),
            unknown,
            known,
            show_all: false,
        }
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.unknown {
            let kind = match entry.kind {
                EntryKind::Setting => "setting",
                EntryKind::Block => "block",
            };
            writeln!(
                f,
                "warning: unknown {} `{}` in `{}` (misspelled? it will be ignored)",
                kind, entry.name, self.block
            )?;
        }

        if self.is_clean() && !self.show_all {
            return Ok(());
        }

        writeln!(f, "known entries for `{}`:", self.block)?;
        let width = self.known.iter().map(|e| e.name.len()).max().unwrap_or(0);
        for entry in &self.known {
            writeln!(f, "  {:<width$}  {}", entry.name, entry.description, width = width)?;
        }
        Ok(())
    }
}
