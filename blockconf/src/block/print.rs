use std::fmt;

use crate::block::Block;

const INDENT: &str = "  ";

/// Renders the block's contents in the input grammar, without the block's own
/// name and braces. Parsing the output gives back the same tree.
impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for setting in &self.settings {
            writeln!(f, "{} = {};", setting.key(), setting.value())?;
        }
        for block in &self.blocks {
            block.fmt_nested(f, 0)?;
        }
        Ok(())
    }
}

impl Block {
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = INDENT.repeat(depth);
        write!(f, "{}{} {{", indent, self.name)?;

        // Small leaf blocks stay on one line: `name { key = value; }`
        if self.blocks.is_empty() && self.settings.len() <= 1 {
            for setting in &self.settings {
                write!(f, " {} = {};", setting.key(), setting.value())?;
            }
            return writeln!(f, " }}");
        }

        writeln!(f)?;
        for setting in &self.settings {
            writeln!(f, "{}{}{} = {};", indent, INDENT, setting.key(), setting.value())?;
        }
        for block in &self.blocks {
            block.fmt_nested(f, depth + 1)?;
        }
        writeln!(f, "{}}}", indent)
    }
}
