//! Deep merge of configuration documents

use super::{key_label, Document, KeyPath};
use crate::error::UnifyError;
use serde_yaml::Value;

/// Merge `overlay` into `base` in place.
///
/// Nested mappings present on both sides are merged key by key; every other
/// overlay value (scalars, sequences, and mappings whose key is new to `base`)
/// replaces what `base` held. Merging a mapping onto an existing non-mapping
/// value is a `TypeConflict`.
pub fn deep_merge(base: &mut Document, overlay: &Document) -> Result<(), UnifyError> {
    merge_at(base, overlay, &mut KeyPath::default())
}

fn merge_at(base: &mut Document, overlay: &Document, path: &mut KeyPath) -> Result<(), UnifyError> {
    for (key, value) in overlay {
        if let Value::Mapping(nested) = value {
            if let Some(existing) = base.get_mut(key) {
                path.push(key_label(key));
                let Value::Mapping(existing) = existing else {
                    return Err(UnifyError::TypeConflict(path.clone()));
                };
                merge_at(existing, nested, path)?;
                path.pop();
                continue;
            }
        }
        base.insert(key.clone(), value.clone());
    }
    Ok(())
}
