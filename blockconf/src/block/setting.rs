/// A single `key = value;` entry of a block.
///
/// Both halves are kept as the raw text found in the source; conversion to a
/// typed value happens at lookup time. Comparison against a `&str` compares
/// the key only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    key: String,
    value: String,
}

impl Setting {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Setting {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Split `key=value` at the first `=`. Without an `=` the whole text is
    /// the key and the value is empty.
    pub fn from_assignment(text: &str) -> Self {
        match text.split_once('=') {
            Some((key, value)) => Setting::new(key, value),
            None => Setting::new(text, ""),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl PartialEq<str> for Setting {
    fn eq(&self, key: &str) -> bool {
        self.key == key
    }
}

impl PartialEq<Setting> for str {
    fn eq(&self, setting: &Setting) -> bool {
        setting.key == self
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for Setting {
    fn from((key, value): (K, V)) -> Self {
        Setting::new(key, value)
    }
}
