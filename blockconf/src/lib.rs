//! Parser for a small hierarchical configuration format:
//!
//! ```text
//! ! comments start with `!`, `#` or `//`, or are wrapped in /* ... */
//! Dog {
//!   mass = 12.5;
//!   Puppy { mass = 2; }
//! }
//! list = 1, 2, 3;
//! ```
//!
//! Text is sanitized, built into a [`Block`] tree, and same-named sibling
//! blocks are merged. Values stay as text until they are looked up with a
//! type.

pub mod block;
pub mod check;
pub mod parser;
pub mod value;

pub use block::Block;
pub use block::setting::Setting;
pub use check::{CheckReport, KnownEntry};
pub use parser::{ParseError, Parsed, Parser};
pub use value::{ConvertError, FromValue};
