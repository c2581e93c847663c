// SPDX-License-Identifier: MPL-2.0
//! Report payload types shared by the builder and destination adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::DeviceContext;

/// Pixel dimensions of a screenshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// How badly the reported issue affects the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Coarse classification of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Bug,
    Ui,
    Crash,
    Performance,
    Other,
}

/// Image returned by a capture plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureResult {
    /// Base64-encoded image bytes.
    pub image_data: String,
    pub dimensions: Dimensions,
    /// MIME type of `image_data` (e.g. `image/png`).
    pub mime_type: String,
}

/// Annotated and original screenshots of one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screenshot {
    /// Base64 PNG with annotations composited in.
    pub annotated: String,
    /// Base64 image as captured.
    pub original: String,
    pub dimensions: Dimensions,
}

/// Optional voice note attached to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioPayload {
    /// Base64-encoded audio bytes.
    pub data: String,
    pub mime_type: String,
    pub duration_ms: u64,
}

/// Everything the user provides for a report.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportInput {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub category: Category,
    pub annotated_screenshot: String,
    pub original_screenshot: String,
    pub dimensions: Dimensions,
    pub audio: Option<AudioPayload>,
    pub custom_metadata: Option<Map<String, Value>>,
}

impl ReportInput {
    /// Input with `title` and every other field defaulted.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Copies the screenshot pair produced by an annotation session.
    #[must_use]
    pub fn with_screenshot(mut self, screenshot: Screenshot) -> Self {
        self.annotated_screenshot = screenshot.annotated;
        self.original_screenshot = screenshot.original;
        self.dimensions = screenshot.dimensions;
        self
    }
}

/// A validated, immutable bug report.
///
/// Only [`ReportBuilder::build`](crate::report::ReportBuilder::build) creates
/// reports; adapters read them through the accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BugReport {
    id: String,
    timestamp: String,
    title: String,
    description: String,
    severity: Severity,
    category: Category,
    screenshot: Screenshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    audio: Option<AudioPayload>,
    context: DeviceContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_metadata: Option<Map<String, Value>>,
}

impl BugReport {
    pub(crate) fn new(
        id: String,
        created_at: DateTime<Utc>,
        input: ReportInput,
        context: DeviceContext,
    ) -> Self {
        Self {
            id,
            timestamp: created_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            title: input.title,
            description: input.description,
            severity: input.severity,
            category: input.category,
            screenshot: Screenshot {
                annotated: input.annotated_screenshot,
                original: input.original_screenshot,
                dimensions: input.dimensions,
            },
            audio: input.audio,
            context,
            custom_metadata: input.custom_metadata,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Creation time, ISO 8601 in UTC with millisecond precision.
    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn screenshot(&self) -> &Screenshot {
        &self.screenshot
    }

    #[must_use]
    pub fn audio(&self) -> Option<&AudioPayload> {
        self.audio.as_ref()
    }

    #[must_use]
    pub fn context(&self) -> &DeviceContext {
        &self.context
    }

    #[must_use]
    pub fn custom_metadata(&self) -> Option<&Map<String, Value>> {
        self.custom_metadata.as_ref()
    }
}

/// Outcome of [`DestinationAdapter::create_issue`](crate::plugins::DestinationAdapter::create_issue).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResult {
    pub id: String,
    pub url: String,
    pub success: bool,
}
