// SPDX-License-Identifier: MPL-2.0
//! Deep merge of partial contexts.
//!
//! The merge is schema independent: it works on any JSON object.
//!
//! - Objects merge field by field, recursively.
//! - Arrays and scalars from the later operand replace earlier values wholesale.
//! - `null` in the later operand means "unknown" and never erases a value.

use serde_json::{Map, Value};

/// Merges `overlay` over `base`, returning a new map.
///
/// Later values win on conflicts, with one exception: a `null` in `overlay`
/// is skipped, so `{"type": "wifi"}` merged with `{"type": null}` stays
/// `{"type": "wifi"}`. A collector cannot clear a field another collector set.
///
/// ```
/// use serde_json::json;
/// use shakenbake::context::merge::deep_merge;
///
/// let base = json!({"network": {"type": "wifi"}});
/// let overlay = json!({"network": {"type": null, "online": true}});
/// let merged = deep_merge(base.as_object().unwrap(), overlay.as_object().unwrap());
/// assert_eq!(merged["network"], json!({"type": "wifi", "online": true}));
/// ```
#[must_use]
pub fn deep_merge(base: &Map<String, Value>, overlay: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    merge_into(&mut merged, overlay);
    merged
}

/// Merges `source` into `target` in place.
pub fn merge_into(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        match value {
            Value::Null => {}
            Value::Object(incoming) => {
                let slot = target
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !slot.is_object() {
                    *slot = Value::Object(Map::new());
                }
                if let Value::Object(existing) = slot {
                    merge_into(existing, incoming);
                }
            }
            other => {
                target.insert(key.clone(), other.clone());
            }
        }
    }
}

/// Folds partials left to right; later partials win on conflicts.
#[must_use]
pub fn merge_all<'a, I>(partials: I) -> Map<String, Value>
where
    I: IntoIterator<Item = &'a Map<String, Value>>,
{
    let mut merged = Map::new();
    for partial in partials {
        merge_into(&mut merged, partial);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("test value must be an object")
    }

    #[test]
    fn sibling_fields_from_both_operands_survive() {
        let merged = deep_merge(
            &obj(json!({"battery": {"level": 50}})),
            &obj(json!({"battery": {"charging": true}})),
        );
        assert_eq!(
            Value::Object(merged),
            json!({"battery": {"level": 50, "charging": true}})
        );
    }

    #[test]
    fn later_operand_wins_on_conflict() {
        let merged = deep_merge(
            &obj(json!({"network": {"type": "wifi", "online": true}})),
            &obj(json!({"network": {"type": "cellular"}})),
        );
        assert_eq!(
            Value::Object(merged),
            json!({"network": {"type": "cellular", "online": true}})
        );
    }

    #[test]
    fn arrays_are_replaced_not_concatenated() {
        let merged = deep_merge(
            &obj(json!({"console": {"logs": ["a", "b"]}})),
            &obj(json!({"console": {"logs": ["c"]}})),
        );
        assert_eq!(merged["console"]["logs"], json!(["c"]));
    }

    #[test]
    fn nested_objects_merge_recursively() {
        let merged = deep_merge(
            &obj(json!({"screen": {"safeArea": {"top": 44, "bottom": 0}}})),
            &obj(json!({"screen": {"safeArea": {"bottom": 34}}})),
        );
        assert_eq!(merged["screen"]["safeArea"], json!({"top": 44, "bottom": 34}));
    }

    #[test]
    fn null_does_not_erase_known_values() {
        let merged = deep_merge(
            &obj(json!({"device": {"model": "Pixel"}})),
            &obj(json!({"device": {"model": null, "brand": null}})),
        );
        assert_eq!(merged["device"], json!({"model": "Pixel"}));
    }

    #[test]
    fn object_replaces_scalar() {
        let merged = deep_merge(
            &obj(json!({"locale": "en"})),
            &obj(json!({"locale": {"language": "fr"}})),
        );
        assert_eq!(merged["locale"], json!({"language": "fr"}));
    }

    #[test]
    fn merge_all_applies_in_order() {
        let first = obj(json!({"app": {"version": "1"}}));
        let second = obj(json!({"app": {"version": "2", "build": 7}}));
        let third = obj(json!({"app": {"version": "3"}}));
        let merged = merge_all([&first, &second, &third]);
        assert_eq!(merged["app"], json!({"version": "3", "build": 7}));
    }

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<bool>().prop_map(Value::from),
            any::<i32>().prop_map(Value::from),
            "[a-z]{0,6}".prop_map(Value::from),
            prop::collection::vec(any::<u8>(), 0..4).prop_map(Value::from),
        ]
    }

    fn section() -> impl Strategy<Value = Map<String, Value>> {
        prop::collection::btree_map("[a-d]", scalar(), 0..4)
            .prop_map(|fields| fields.into_iter().collect())
    }

    proptest! {
        #[test]
        fn second_operand_wins_field_by_field(left in section(), right in section()) {
            let base = Map::from_iter([("s".to_string(), Value::Object(left.clone()))]);
            let overlay = Map::from_iter([("s".to_string(), Value::Object(right.clone()))]);
            let merged = deep_merge(&base, &overlay);
            let merged = merged["s"].as_object().unwrap();

            for (key, value) in &right {
                prop_assert_eq!(merged.get(key), Some(value));
            }
            for (key, value) in &left {
                if !right.contains_key(key) {
                    prop_assert_eq!(merged.get(key), Some(value));
                }
            }
            prop_assert_eq!(merged.len(), left.keys().chain(right.keys()).collect::<std::collections::BTreeSet<_>>().len());
        }
    }
}
