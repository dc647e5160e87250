//! Manual key-path overrides
//!
//! Directives look like `k1/k2/.../kn:v` and assign `config[k1][k2]...[kn] = v`,
//! with `v` cast to an integer or float when it reads as one.

pub mod coerce;

use crate::config::{Document, KeyPath};
use crate::error::UnifyError;
use serde_yaml::{Mapping, Value};
use std::str::FromStr;

pub use coerce::coerce;

/// A parsed `k1/k2/.../kn:v` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideDirective {
    pub path: KeyPath,
    pub raw_value: String,
}

impl FromStr for OverrideDirective {
    type Err = UnifyError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split(':').collect();
        let [key, value] = parts.as_slice() else {
            return Err(UnifyError::MalformedOverride(line.to_string()));
        };

        Ok(Self {
            path: key.split('/').collect(),
            raw_value: (*value).to_string(),
        })
    }
}

impl OverrideDirective {
    pub fn apply(&self, doc: &mut Document) -> Result<(), UnifyError> {
        apply_override(doc, self.path.segments(), &self.raw_value)
    }
}

/// Assign `coerce(raw)` at `path`, creating missing intermediate mappings.
///
/// The final segment is overwritten whatever it held before. An intermediate
/// segment that exists but is not a mapping is a `TypeConflict`.
pub fn apply_override(doc: &mut Document, path: &[String], raw: &str) -> Result<(), UnifyError> {
    let Some((leaf, parents)) = path.split_last() else {
        return Err(UnifyError::EmptyKeyPath);
    };

    let mut cursor = doc;
    for (depth, segment) in parents.iter().enumerate() {
        let slot = cursor
            .entry(Value::String(segment.clone()))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        cursor = match slot {
            Value::Mapping(nested) => nested,
            _ => return Err(UnifyError::TypeConflict(KeyPath::new(&path[..=depth]))),
        };
    }

    cursor.insert(Value::String(leaf.clone()), coerce(raw));
    Ok(())
}
