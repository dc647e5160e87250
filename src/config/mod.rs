//! Configuration documents
//!
//! A document is an untyped YAML mapping. Nothing about its shape is assumed
//! here; the few fields the pipeline derives are looked up by `KeyPath`.

pub mod loader;
pub mod merge;

use serde_yaml::{Mapping, Value};
use std::fmt;

pub use loader::{load_document, sort_keys, write_document};
pub use merge::deep_merge;

/// A configuration document: a YAML mapping at the root.
pub type Document = Mapping;

/// Slash-separated location of a value inside a document, e.g. `tokens/micro_batch_size`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    pub fn new<S: AsRef<str>>(segments: &[S]) -> Self {
        Self(segments.iter().map(|s| s.as_ref().to_string()).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }

    pub fn pop(&mut self) {
        self.0.pop();
    }
}

impl<S: Into<String>> FromIterator<S> for KeyPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        f.write_str(&self.0.join("/"))
    }
}

/// Human-readable label for a mapping key. YAML allows non-string keys.
pub(crate) fn key_label(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "~".to_string(),
        other => render_value(other),
    }
}

/// YAML rendering of a value for messages, without the trailing newline.
pub(crate) fn render_value(value: &Value) -> String {
    serde_yaml::to_string(value)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|_| format!("{value:?}"))
}

/// Look up a nested value by path without creating anything.
pub fn lookup<'a>(doc: &'a Document, path: &KeyPath) -> Option<&'a Value> {
    let (last, parents) = path.segments().split_last()?;
    let mut cursor = doc;
    for segment in parents {
        cursor = cursor.get(segment.as_str())?.as_mapping()?;
    }
    cursor.get(last.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(yaml: &str) -> Document {
        serde_yaml::from_str(yaml).expect("yaml")
    }

    #[test]
    fn test_key_path_display() {
        assert_eq!(KeyPath::new(&["optimizer", "zero_stage"]).to_string(), "optimizer/zero_stage");
        assert_eq!(KeyPath::default().to_string(), "<root>");
    }

    #[test]
    fn test_key_path_from_split() {
        let path: KeyPath = "tokens/micro_batch_size".split('/').collect();
        assert_eq!(path, KeyPath::new(&["tokens", "micro_batch_size"]));
        assert_eq!(path.segments().len(), 2);
    }

    #[test]
    fn test_render_value_trims_trailing_newline() {
        let value: Value = serde_yaml::from_str("[1, 2]").expect("yaml");
        assert_eq!(render_value(&value), "- 1\n- 2");
        assert_eq!(render_value(&Value::String("x".into())), "x");
    }

    #[test]
    fn test_lookup_nested_value() {
        let d = doc("parallelism:\n  pp: 2\n  tp: 4\n");
        let found = lookup(&d, &KeyPath::new(&["parallelism", "tp"]));
        assert_eq!(found.and_then(Value::as_u64), Some(4));
    }

    #[test]
    fn test_lookup_missing_or_through_scalar() {
        let d = doc("parallelism: 3\n");
        assert!(lookup(&d, &KeyPath::new(&["parallelism", "tp"])).is_none());
        assert!(lookup(&d, &KeyPath::new(&["tokens"])).is_none());
        assert!(lookup(&d, &KeyPath::default()).is_none());
    }

    #[test]
    fn test_key_label_for_non_string_keys() {
        assert_eq!(key_label(&Value::Number(3_i64.into())), "3");
        assert_eq!(key_label(&Value::Bool(true)), "true");
        assert_eq!(key_label(&Value::String("lr".into())), "lr");
    }
}
