//! Type-checked deep merge of value trees.
//!
//! # Rules (per key of the extra tree)
//! - Key absent in base: inserted as-is
//! - Both lists: concatenated, base items first, duplicates kept
//! - Both mappings: merged recursively
//! - Same scalar kind: extra overwrites base
//! - Different kinds: `Error::TypeMismatch` with the dotted path from the root
//!
//! Inputs are only ever borrowed; the result is a freshly owned tree.

use crate::engine::value::{Map, Value, ValueKind};
use crate::error::{Error, Result};

/// Merge mappings left to right, later mappings winning on scalar conflicts.
pub fn merge<'a>(trees: impl IntoIterator<Item = &'a Map>) -> Result<Map> {
    let mut result = Map::new();
    for tree in trees {
        merge_into(&mut result, tree, &[])?;
    }
    Ok(result)
}

/// Merge `extra` into `base` in place. `path` locates `base` from the merge root.
pub fn merge_into(base: &mut Map, extra: &Map, path: &[String]) -> Result<()> {
    for (key, extra_value) in extra {
        let Some(base_value) = base.get_mut(key) else {
            base.insert(key.clone(), extra_value.clone());
            continue;
        };

        let base_kind = ValueKind::of(base_value);
        let extra_kind = ValueKind::of(extra_value);
        if base_kind != extra_kind {
            return Err(Error::TypeMismatch {
                key: key.clone(),
                path: child_path(path, key),
                base_kind,
                extra_kind,
            });
        }

        match (base_value, extra_value) {
            (Value::Array(items), Value::Array(extra_items)) => {
                items.extend(extra_items.iter().cloned());
            }
            (Value::Object(nested), Value::Object(extra_nested)) => {
                merge_into(nested, extra_nested, &child_path(path, key))?;
            }
            (slot, value) => *slot = value.clone(),
        }
    }
    Ok(())
}

fn child_path(path: &[String], key: &str) -> Vec<String> {
    let mut nested = Vec::with_capacity(path.len() + 1);
    nested.extend_from_slice(path);
    nested.push(key.to_string());
    nested
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_latest_mapping_overrides_previous() {
        let d1 = map(json!({"key": "value1"}));
        let d2 = map(json!({"key": "value2"}));
        let d3 = map(json!({"key": "value3"}));
        assert_eq!(merge([&d1, &d2]).unwrap(), map(json!({"key": "value2"})));
        assert_eq!(merge([&d1, &d2, &d3]).unwrap(), map(json!({"key": "value3"})));
    }

    #[test]
    fn test_single_mapping_is_an_owned_copy() {
        let d1 = map(json!({"key": {"nested": [1, 2]}}));
        let mut merged = merge([&d1]).unwrap();
        assert_eq!(merged, d1);

        merged.insert("other".into(), json!(true));
        merged["key"]["nested"].as_array_mut().unwrap().push(json!(3));
        assert_eq!(d1, map(json!({"key": {"nested": [1, 2]}})));
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let d1 = map(json!({"key": {"a": 1}, "items": [1]}));
        let d2 = map(json!({"key": {"b": 2}, "items": [2]}));
        let (before1, before2) = (d1.clone(), d2.clone());

        let merged = merge([&d1, &d2]).unwrap();

        assert_eq!(merged, map(json!({"key": {"a": 1, "b": 2}, "items": [1, 2]})));
        assert_eq!(d1, before1);
        assert_eq!(d2, before2);
    }

    #[test]
    fn test_lists_are_concatenated_with_duplicates() {
        let d1 = map(json!({"items": [1, 2]}));
        let d2 = map(json!({"items": [3, 4]}));
        let d3 = map(json!({"items": [1]}));
        assert_eq!(merge([&d1, &d2]).unwrap(), map(json!({"items": [1, 2, 3, 4]})));
        assert_eq!(merge([&d1, &d3]).unwrap(), map(json!({"items": [1, 2, 1]})));
    }

    #[test]
    fn test_nested_mappings_are_merged() {
        let d1 = map(json!({"k": {"a": 1}}));
        let d2 = map(json!({"k": {"b": 2}}));
        assert_eq!(merge([&d1, &d2]).unwrap(), map(json!({"k": {"a": 1, "b": 2}})));

        let d3 = map(json!({"k": {"a": 2}}));
        assert_eq!(merge([&d1, &d3]).unwrap(), map(json!({"k": {"a": 2}})));
    }

    #[test]
    fn test_key_order_is_preserved() {
        let d1 = map(json!({"z": 1, "a": 1}));
        let d2 = map(json!({"m": 1, "z": 2}));
        let merged = merge([&d1, &d2]).unwrap();
        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_null_overwrites_null_but_not_string() {
        let d1 = map(json!({"k": null}));
        let d2 = map(json!({"k": null}));
        assert_eq!(merge([&d1, &d2]).unwrap(), map(json!({"k": null})));

        let d3 = map(json!({"k": "v"}));
        assert!(matches!(
            merge([&d1, &d3]),
            Err(Error::TypeMismatch { base_kind: ValueKind::Null, extra_kind: ValueKind::String, .. })
        ));
    }

    #[test]
    fn test_different_kinds_raise_type_mismatch() {
        let d1 = map(json!({"k": "v"}));
        let d2 = map(json!({"k": 1}));
        match merge([&d1, &d2]) {
            Err(Error::TypeMismatch { key, path, base_kind, extra_kind }) => {
                assert_eq!(key, "k");
                assert_eq!(path, vec!["k"]);
                assert_eq!(base_kind, ValueKind::String);
                assert_eq!(extra_kind, ValueKind::Number);
            }
            other => panic!("expected type mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_mismatch_reports_full_path() {
        let d1 = map(json!({"key": {"nested_key": "value"}}));
        let d2 = map(json!({"key": {"nested_key": 1}}));
        match merge([&d1, &d2]) {
            Err(Error::TypeMismatch { key, path, .. }) => {
                assert_eq!(key, "nested_key");
                assert_eq!(path, vec!["key", "nested_key"]);
            }
            other => panic!("expected type mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_list_versus_mapping_mismatch() {
        let d1 = map(json!({"k": [1]}));
        let d2 = map(json!({"k": {"a": 1}}));
        assert!(matches!(
            merge([&d1, &d2]),
            Err(Error::TypeMismatch { base_kind: ValueKind::Array, extra_kind: ValueKind::Object, .. })
        ));
    }
}
