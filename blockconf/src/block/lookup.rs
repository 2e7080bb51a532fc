use crate::block::Block;
use crate::block::setting::Setting;
use crate::value::{ConvertError, FromValue};

// Lookups scan from the back so that later settings override earlier ones.
impl Block {
    /// The value of the last setting named `key`, converted leniently (see
    /// [`FromValue::from_value_lossy`]). `None` only if the key is absent.
    pub fn get<T: FromValue>(&self, key: &str) -> Option<T> {
        self.get_str(key).map(T::from_value_lossy)
    }

    /// As [`Block::get`], falling back to `default` when the key is absent.
    pub fn get_or<T: FromValue>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Strict lookup: `Ok(None)` if the key is absent, an error if its value
    /// does not convert cleanly to `T`.
    pub fn try_get<T: FromValue>(&self, key: &str) -> Result<Option<T>, ConvertError> {
        self.get_str(key).map(T::from_value).transpose()
    }

    /// The raw text of the last setting named `key`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.find_setting(key).map(Setting::value)
    }

    /// Look up `key` inside nested blocks, e.g. `get_in(["Dog", "Puppy"], "mass")`.
    /// A missing block anywhere along the path gives `None`.
    pub fn get_in<T, P>(&self, path: P, key: &str) -> Option<T>
    where
        T: FromValue,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        self.find_path(path)?.get(key)
    }

    pub fn get_in_or<T, P>(&self, path: P, key: &str, default: T) -> T
    where
        T: FromValue,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        self.get_in(path, key).unwrap_or(default)
    }

    pub fn try_get_in<T, P>(&self, path: P, key: &str) -> Result<Option<T>, ConvertError>
    where
        T: FromValue,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        match self.find_path(path) {
            Some(block) => block.try_get(key),
            None => Ok(None),
        }
    }

    /// A copy of the child block called `name`.
    pub fn get_block(&self, name: &str) -> Option<Block> {
        self.find_block(name).cloned()
    }

    /// A copy of the last setting named `key`.
    pub fn get_setting(&self, key: &str) -> Option<Setting> {
        self.find_setting(key).cloned()
    }

    pub fn find_block(&self, name: &str) -> Option<&Block> {
        self.blocks.iter().rev().find(|block| block.name == name)
    }

    pub fn find_setting(&self, key: &str) -> Option<&Setting> {
        self.settings.iter().rev().find(|setting| setting.key() == key)
    }

    /// Follow a path of child names from this block.
    pub fn find_path<P>(&self, path: P) -> Option<&Block>
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        path.into_iter()
            .try_fold(self, |block, name| block.find_block(name.as_ref()))
    }
}
