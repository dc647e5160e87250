//! Config document loading and writing

use super::Document;
use crate::error::UnifyError;
use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Read a YAML document whose root must be a mapping.
pub fn load_document(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed reading config file: {}", path.display()))?;

    let raw: Value = serde_yaml::from_str(&content)
        .with_context(|| format!("Invalid YAML syntax: {}", path.display()))?;

    match raw {
        Value::Mapping(doc) => Ok(doc),
        _ => Err(UnifyError::NotAMapping(path.to_path_buf()).into()),
    }
}

/// Serialize `doc` with sorted keys and write it to `path`.
///
/// The full text is rendered before the file is touched, so a serialization
/// failure leaves no partial output behind.
pub fn write_document(path: &Path, doc: &Document) -> Result<()> {
    let mut value = Value::Mapping(doc.clone());
    sort_keys(&mut value);

    let rendered = serde_yaml::to_string(&value).context("Failed serializing unified config")?;
    fs::write(path, rendered)
        .with_context(|| format!("Failed writing unified config: {}", path.display()))?;

    tracing::info!("Wrote unified config to {}", path.display());
    Ok(())
}

/// Recursively order every mapping by key.
pub fn sort_keys(value: &mut Value) {
    match value {
        Value::Mapping(map) => {
            let mut entries: Vec<(Value, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by_cached_key(|(key, _)| super::key_label(key));

            let mut sorted = Mapping::with_capacity(entries.len());
            for (key, mut nested) in entries {
                sort_keys(&mut nested);
                sorted.insert(key, nested);
            }
            *map = sorted;
        }
        Value::Sequence(items) => items.iter_mut().for_each(sort_keys),
        Value::Tagged(tagged) => sort_keys(&mut tagged.value),
        _ => {}
    }
}
