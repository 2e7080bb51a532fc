use std::fmt;

/// Why a raw value could not be converted to the requested type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertErrorKind {
    /// The value was empty (or only whitespace).
    Empty,
    /// The leading token was not a valid literal of the target type.
    Invalid,
    /// Text remained after the first whitespace-delimited token.
    TrailingInput(String),
    /// One element of a comma-separated list failed to convert.
    Element { index: usize, source: Box<ConvertError> },
}

/// Strict conversion failure, reported by the `try_get*` accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertError {
    pub value: String,
    pub target: &'static str,
    pub kind: ConvertErrorKind,
}

impl ConvertError {
    pub fn new(value: &str, target: &'static str, kind: ConvertErrorKind) -> Self {
        ConvertError {
            value: value.to_string(),
            target,
            kind,
        }
    }

    pub fn invalid(value: &str, target: &'static str) -> Self {
        ConvertError::new(value, target, ConvertErrorKind::Invalid)
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ConvertErrorKind::Empty => write!(f, "empty value cannot be read as {}", self.target),
            ConvertErrorKind::Invalid => {
                write!(f, "\"{}\" is not a valid {}", self.value, self.target)
            }
            ConvertErrorKind::TrailingInput(rest) => write!(
                f,
                "unexpected \"{}\" after {} value in \"{}\"",
                rest, self.target, self.value
            ),
            ConvertErrorKind::Element { index, source } => {
                write!(f, "list element {}: {}", index, source)
            }
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ConvertErrorKind::Element { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
