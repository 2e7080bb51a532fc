use std::path::Path;

use serde::Deserialize;

use blockconf::KnownEntry;

/// A list of known names, written as TOML:
///
/// ```toml
/// [[entry]]
/// name = "g"
/// description = "Gravitational acceleration"
/// ```
#[derive(Debug, Deserialize)]
struct Schema {
    #[serde(default, rename = "entry")]
    entries: Vec<SchemaEntry>,
}

#[derive(Debug, Deserialize)]
struct SchemaEntry {
    name: String,
    #[serde(default)]
    description: String,
}

pub fn load(path: &Path) -> Result<Vec<KnownEntry>, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
    let schema: Schema = toml::from_str(&text)
        .map_err(|e| format!("{}: TOML parse error: {}", path.display(), e))?;
    Ok(schema
        .entries
        .into_iter()
        .map(|entry| KnownEntry::new(entry.name, entry.description))
        .collect())
}
