// SPDX-License-Identifier: MPL-2.0
//! Device context: the environment snapshot attached to every report.
//!
//! Collectors return partial contexts (any section or field may be missing).
//! The aggregator merges them over [`DeviceContext::empty`] so a built context
//! always carries every [`SectionKind`], even if only as `{}`.
//!
//! # Architecture
//!
//! - [`merge`]: Schema-independent deep merge over JSON maps
//! - [`redact`]: Pattern-based removal of sections and fields
//! - [`aggregator`]: Concurrent, failure-isolated collector fan-out
//! - [`collectors`]: Collectors shipped with the SDK

pub mod aggregator;
pub mod collectors;
pub mod merge;
pub mod redact;

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use aggregator::aggregate;
pub use collectors::{ConsoleCollector, StaticCollector, SystemCollector};
pub use merge::{deep_merge, merge_all, merge_into};
pub use redact::{redact, redact_map, RedactionPattern};

/// A context-shaped mapping where any section or field may be absent.
pub type PartialContext = Map<String, Value>;

static EMPTY_SECTION: LazyLock<Map<String, Value>> = LazyLock::new(Map::new);

/// The named sections of a device context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Platform,
    Device,
    Screen,
    Network,
    Battery,
    Locale,
    App,
    Accessibility,
    Performance,
    Navigation,
    Console,
}

impl SectionKind {
    pub const ALL: [Self; 11] = [
        Self::Platform,
        Self::Device,
        Self::Screen,
        Self::Network,
        Self::Battery,
        Self::Locale,
        Self::App,
        Self::Accessibility,
        Self::Performance,
        Self::Navigation,
        Self::Console,
    ];

    /// Key of this section in the serialized context.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::Device => "device",
            Self::Screen => "screen",
            Self::Network => "network",
            Self::Battery => "battery",
            Self::Locale => "locale",
            Self::App => "app",
            Self::Accessibility => "accessibility",
            Self::Performance => "performance",
            Self::Navigation => "navigation",
            Self::Console => "console",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

/// Aggregated environment snapshot.
///
/// Built contexts contain every section. Redaction may drop a whole section on
/// request; [`DeviceContext::section`] still answers with an empty map for it.
/// Keys other than the known sections are preserved as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct DeviceContext(Map<String, Value>);

impl DeviceContext {
    /// A context with every section present and empty.
    #[must_use]
    pub fn empty() -> Self {
        Self(empty_sections())
    }

    /// Completes a partial context: merges it over [`DeviceContext::empty`].
    ///
    /// A section that is not an object is replaced by `{}`.
    #[must_use]
    pub fn from_partial(partial: &PartialContext) -> Self {
        let mut map = deep_merge(&empty_sections(), partial);
        for kind in SectionKind::ALL {
            let key = kind.as_str();
            if map.get(key).is_some_and(|section| !section.is_object()) {
                tracing::warn!(section = key, "discarding non-object context section");
                map.insert(key.to_string(), Value::Object(Map::new()));
            }
        }
        Self(map)
    }

    pub(crate) fn from_map_unchecked(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Fields of one section; empty when the section is absent.
    #[must_use]
    pub fn section(&self, kind: SectionKind) -> &Map<String, Value> {
        self.0
            .get(kind.as_str())
            .and_then(Value::as_object)
            .unwrap_or(&EMPTY_SECTION)
    }

    /// Whether the section key is present (it may still be empty).
    #[must_use]
    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.0.contains_key(kind.as_str())
    }

    /// Looks up a value by dot path, e.g. `"battery.level"`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl Default for DeviceContext {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Map<String, Value>> for DeviceContext {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_partial(&map)
    }
}

impl From<DeviceContext> for Map<String, Value> {
    fn from(context: DeviceContext) -> Self {
        context.0
    }
}

fn empty_sections() -> Map<String, Value> {
    SectionKind::ALL
        .into_iter()
        .map(|kind| (kind.as_str().to_string(), Value::Object(Map::new())))
        .collect()
}
