// SPDX-License-Identifier: MPL-2.0
//! Captured console entries and argument formatting.

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Console entry point an entry was captured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleLevel {
    Log,
    Warn,
    Error,
}

/// One captured console call or unhandled rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleEntry {
    pub level: ConsoleLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ConsoleEntry {
    #[must_use]
    pub fn new(level: ConsoleLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Snapshot of the three console buffers, oldest entries first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleEntries {
    pub logs: Vec<ConsoleEntry>,
    pub errors: Vec<ConsoleEntry>,
    pub unhandled_rejections: Vec<ConsoleEntry>,
}

/// Renders console arguments into one message.
///
/// Strings are kept verbatim, other values are serialized as JSON, and the
/// pieces are joined with a single space.
#[must_use]
pub fn render_args(args: &[Value]) -> String {
    args.iter()
        .map(|arg| match arg {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Converts any value into a console argument.
///
/// Values that cannot be serialized are captured through their `Debug` output.
pub fn console_arg<T: Serialize + Debug + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|_| Value::String(format!("{value:?}")))
}
