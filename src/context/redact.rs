// SPDX-License-Identifier: MPL-2.0
//! Pattern-based redaction of context sections and fields.
//!
//! Three pattern shapes are understood:
//!
//! | Pattern          | Effect                                       |
//! |------------------|----------------------------------------------|
//! | `network`        | removes the whole section                    |
//! | `device.model`   | removes one field, siblings stay             |
//! | `network.*`      | empties the section to `{}`, key stays       |
//!
//! Dot paths may go deeper (`screen.safeArea.top`). Patterns that point at
//! nothing are ignored, so redaction never fails.

use serde_json::{Map, Value};

use super::DeviceContext;

/// A parsed redaction pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedactionPattern {
    /// Drop the key entirely.
    Remove(Vec<String>),
    /// Keep the key but clear the object it holds.
    Clear(Vec<String>),
}

impl RedactionPattern {
    /// Parses a pattern; blank patterns and empty segments yield `None`.
    #[must_use]
    pub fn parse(pattern: &str) -> Option<Self> {
        let segments: Vec<String> = pattern.trim().split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return None;
        }
        match segments.split_last() {
            Some((last, parent)) if last == "*" => {
                if parent.is_empty() || parent.iter().any(|s| s == "*") {
                    None
                } else {
                    Some(Self::Clear(parent.to_vec()))
                }
            }
            Some(_) if segments.iter().any(|s| s == "*") => None,
            Some(_) => Some(Self::Remove(segments)),
            None => None,
        }
    }

    fn apply(&self, map: &mut Map<String, Value>) {
        match self {
            Self::Remove(path) => {
                if let Some((last, parent)) = path.split_last() {
                    if let Some(container) = object_at(map, parent) {
                        container.remove(last);
                    }
                }
            }
            Self::Clear(path) => {
                if let Some(target) = object_at(map, path) {
                    target.clear();
                }
            }
        }
    }
}

/// Walks `path` through nested objects.
fn object_at<'a>(
    map: &'a mut Map<String, Value>,
    path: &[String],
) -> Option<&'a mut Map<String, Value>> {
    let mut current = map;
    for segment in path {
        current = current.get_mut(segment)?.as_object_mut()?;
    }
    Some(current)
}

/// Returns a redacted copy of `map`; the input is left untouched.
#[must_use]
pub fn redact_map<S: AsRef<str>>(map: &Map<String, Value>, patterns: &[S]) -> Map<String, Value> {
    let mut redacted = map.clone();
    for pattern in patterns {
        match RedactionPattern::parse(pattern.as_ref()) {
            Some(parsed) => parsed.apply(&mut redacted),
            None => tracing::debug!(pattern = pattern.as_ref(), "ignoring malformed redaction pattern"),
        }
    }
    redacted
}

/// Returns a redacted copy of `context`; the input is left untouched.
#[must_use]
pub fn redact<S: AsRef<str>>(context: &DeviceContext, patterns: &[S]) -> DeviceContext {
    DeviceContext::from_map_unchecked(redact_map(context.as_map(), patterns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{PartialContext, SectionKind};
    use proptest::prelude::*;
    use serde_json::json;

    fn context() -> DeviceContext {
        let partial: PartialContext = json!({
            "device": {"model": "Pixel 8", "manufacturer": "Google", "memory": 8},
            "network": {"type": "wifi", "ip": "10.0.0.2"},
            "screen": {"safeArea": {"top": 44, "bottom": 34}, "width": 1080},
            "app": {"name": "demo"}
        })
        .as_object()
        .cloned()
        .unwrap();
        DeviceContext::from_partial(&partial)
    }

    #[test]
    fn bare_section_removes_the_section() {
        let redacted = redact(&context(), &["network"]);
        assert!(!redacted.has_section(SectionKind::Network));
        assert!(redacted.section(SectionKind::Network).is_empty());
        assert_eq!(redacted.get("app.name"), Some(&json!("demo")));
    }

    #[test]
    fn field_path_removes_only_that_field() {
        let redacted = redact(&context(), &["device.model"]);
        assert_eq!(redacted.get("device.model"), None);
        assert_eq!(redacted.get("device.manufacturer"), Some(&json!("Google")));
        assert_eq!(redacted.get("device.memory"), Some(&json!(8)));
    }

    #[test]
    fn wildcard_empties_section_but_keeps_key() {
        let redacted = redact(&context(), &["network.*"]);
        assert!(redacted.has_section(SectionKind::Network));
        assert_eq!(redacted.get("network"), Some(&json!({})));
    }

    #[test]
    fn nested_paths_are_supported() {
        let redacted = redact(&context(), &["screen.safeArea.top"]);
        assert_eq!(redacted.get("screen.safeArea"), Some(&json!({"bottom": 34})));
    }

    #[test]
    fn unknown_targets_are_ignored() {
        let original = context();
        let redacted = redact(
            &original,
            &["weather", "device.serial", "app.name.first", "nothing.*", "", "a..b", "*", "x.*.y"],
        );
        assert_eq!(redacted, original);
    }

    #[test]
    fn input_is_not_mutated() {
        let original = context();
        let snapshot = original.clone();
        let _ = redact(&original, &["network", "device.*", "screen.width"]);
        assert_eq!(original, snapshot);
    }

    #[test]
    fn pattern_order_does_not_matter() {
        let forward = redact(&context(), &["device.*", "device.model", "network"]);
        let backward = redact(&context(), &["network", "device.model", "device.*"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn parse_classifies_patterns() {
        assert_eq!(
            RedactionPattern::parse("network"),
            Some(RedactionPattern::Remove(vec!["network".into()]))
        );
        assert_eq!(
            RedactionPattern::parse("network.*"),
            Some(RedactionPattern::Clear(vec!["network".into()]))
        );
        assert_eq!(RedactionPattern::parse("  "), None);
        assert_eq!(RedactionPattern::parse("*"), None);
    }

    fn pattern() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("device".to_string()),
            Just("network.*".to_string()),
            Just("screen.safeArea.top".to_string()),
            "[a-z]{1,8}(\\.[a-z*]{1,8}){0,2}",
        ]
    }

    proptest! {
        #[test]
        fn redaction_never_mutates_input(patterns in prop::collection::vec(pattern(), 0..6)) {
            let original = context();
            let snapshot = original.clone();
            let _ = redact(&original, &patterns);
            prop_assert_eq!(original, snapshot);
        }

        #[test]
        fn field_removal_keeps_siblings(field in "[a-z]{1,8}") {
            let redacted = redact(&context(), &[format!("device.{field}")]);
            for (key, value) in context().section(SectionKind::Device) {
                if key != &field {
                    prop_assert_eq!(redacted.section(SectionKind::Device).get(key), Some(value));
                }
            }
        }
    }
}
