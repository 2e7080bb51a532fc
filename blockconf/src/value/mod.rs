pub mod error;

pub use error::{ConvertError, ConvertErrorKind};

/// Conversion from the raw text of a setting into a typed value.
///
/// Every type has two paths:
/// - [`FromValue::from_value`] is strict: the value must be exactly one token
///   that parses completely, otherwise a [`ConvertError`] is returned.
/// - [`FromValue::from_value_lossy`] reads the leading whitespace-delimited
///   token, converts as much of it as forms a valid literal, and falls back
///   to `Self::default()` when nothing does. `"3.7"` read as an integer is
///   `3`; `"abc"` read as a float is `0.0`.
pub trait FromValue: Sized + Default {
    /// Name of the target type, used in error messages.
    const NAME: &'static str;

    /// Parse one complete token.
    fn parse_token(token: &str) -> Option<Self>;

    /// Parse the longest valid prefix of a token.
    fn parse_leading(token: &str) -> Option<Self> {
        Self::parse_token(token)
    }

    fn from_value(raw: &str) -> Result<Self, ConvertError> {
        let trimmed = raw.trim();
        let Some(token) = trimmed.split_whitespace().next() else {
            return Err(ConvertError::new(raw, Self::NAME, ConvertErrorKind::Empty));
        };
        let rest = trimmed[token.len()..].trim_start();
        if !rest.is_empty() {
            return Err(ConvertError::new(
                raw,
                Self::NAME,
                ConvertErrorKind::TrailingInput(rest.to_string()),
            ));
        }
        Self::parse_token(token).ok_or_else(|| ConvertError::invalid(raw, Self::NAME))
    }

    fn from_value_lossy(raw: &str) -> Self {
        raw.split_whitespace()
            .next()
            .and_then(Self::parse_leading)
            .unwrap_or_default()
    }
}

impl FromValue for String {
    const NAME: &'static str = "string";

    fn parse_token(token: &str) -> Option<Self> {
        Some(token.to_string())
    }

    fn from_value(raw: &str) -> Result<Self, ConvertError> {
        Ok(raw.to_string())
    }

    fn from_value_lossy(raw: &str) -> Self {
        raw.to_string()
    }
}

impl FromValue for bool {
    const NAME: &'static str = "bool";

    fn parse_token(token: &str) -> Option<Self> {
        if token == "1" || token.eq_ignore_ascii_case("true") {
            Some(true)
        } else if token == "0" || token.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

impl FromValue for char {
    const NAME: &'static str = "char";

    fn parse_token(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    fn parse_leading(token: &str) -> Option<Self> {
        token.chars().next()
    }
}

/// Comma-separated list. A trailing comma is allowed; an empty value is an
/// empty list.
impl<T: FromValue> FromValue for Vec<T> {
    const NAME: &'static str = "list";

    fn parse_token(token: &str) -> Option<Self> {
        Self::from_value(token).ok()
    }

    fn from_value(raw: &str) -> Result<Self, ConvertError> {
        list_elements(raw)
            .enumerate()
            .map(|(index, element)| {
                T::from_value(element).map_err(|source| {
                    ConvertError::new(
                        raw,
                        Self::NAME,
                        ConvertErrorKind::Element {
                            index,
                            source: Box::new(source),
                        },
                    )
                })
            })
            .collect()
    }

    fn from_value_lossy(raw: &str) -> Self {
        list_elements(raw).map(T::from_value_lossy).collect()
    }
}

fn list_elements(raw: &str) -> impl Iterator<Item = &str> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix(',').unwrap_or(trimmed);
    trimmed
        .split(',')
        .filter(move |_| !trimmed.is_empty())
        .map(str::trim)
}

macro_rules! impl_from_value_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                const NAME: &'static str = stringify!($ty);

                fn parse_token(token: &str) -> Option<Self> {
                    token.parse().ok()
                }

                fn parse_leading(token: &str) -> Option<Self> {
                    integer_prefix(token).parse().ok()
                }
            }
        )*
    };
}

macro_rules! impl_from_value_float {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                const NAME: &'static str = stringify!($ty);

                fn parse_token(token: &str) -> Option<Self> {
                    token.parse().ok()
                }

                fn parse_leading(token: &str) -> Option<Self> {
                    float_prefix(token).parse().ok()
                }
            }
        )*
    };
}

impl_from_value_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_from_value_float!(f32, f64);

/// `[+-]?[0-9]*`
fn integer_prefix(token: &str) -> &str {
    let bytes = token.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = count_digits(&bytes[sign..]);
    &token[..sign + digits]
}

/// `[+-]?[0-9]*(\.[0-9]*)?([eE][+-]?[0-9]+)?` with at least one mantissa digit.
fn float_prefix(token: &str) -> &str {
    let bytes = token.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return "";
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(&bytes[exp..]);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }
    &token[..end]
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
