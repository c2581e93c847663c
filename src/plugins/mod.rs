// SPDX-License-Identifier: MPL-2.0
//! Plugin capabilities and the registry that holds them.
//!
//! A plugin implements exactly one capability:
//!
//! - [`TriggerPlugin`]: starts the report flow (shake, keyboard shortcut, button)
//! - [`CapturePlugin`]: produces the screenshot
//! - [`ContextCollector`]: contributes part of the [`DeviceContext`](crate::context::DeviceContext)
//! - [`DestinationAdapter`]: receives the finished [`BugReport`]
//!
//! Plugins own their platform resources (listeners, native handles) and
//! release them themselves; the [`PluginRegistry`] only owns the lists.

mod file;
mod mock;
mod registry;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::context::PartialContext;
use crate::error::BoxError;
use crate::report::{BugReport, CaptureResult, SubmitResult};

pub use file::{write_atomic, ExportError, FileSystemAdapter};
pub use mock::{MockAdapter, MockFailure, RecordedUpload};
pub use registry::PluginRegistry;

/// Platform a plugin is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    Web,
    ReactNative,
    Native,
    /// Works everywhere.
    Universal,
}

/// Callback a trigger invokes when the user asks to file a report.
pub type TriggerCallback = Arc<dyn Fn() + Send + Sync>;

/// Starts a report flow on user request.
pub trait TriggerPlugin: Send {
    fn name(&self) -> &str;

    fn platform(&self) -> Platform;

    /// Installs the trigger's listener; `on_trigger` is called on every activation.
    fn activate(&mut self, on_trigger: TriggerCallback) -> Result<(), BoxError>;

    /// Releases whatever [`TriggerPlugin::activate`] installed.
    fn deactivate(&mut self) -> Result<(), BoxError>;
}

/// Produces the screenshot of a report.
#[async_trait]
pub trait CapturePlugin: Send + Sync {
    fn name(&self) -> &str;

    fn platform(&self) -> Platform;

    async fn capture(&self) -> Result<CaptureResult, BoxError>;
}

/// Contributes a partial device context.
///
/// Implementations should swallow their own failures; errors and panics that
/// escape are isolated by the aggregator and count as an empty partial.
#[async_trait]
pub trait ContextCollector: Send + Sync {
    fn name(&self) -> &str;

    fn platform(&self) -> Platform;

    async fn collect(&self) -> Result<PartialContext, BoxError>;
}

/// Sink for finished reports (issue tracker, proxy, ingestion endpoint).
#[async_trait]
pub trait DestinationAdapter: Send + Sync {
    fn name(&self) -> &str;

    /// Uploads the annotated screenshot; returns its URL, or an empty string when
    /// the adapter embeds images in the issue payload instead.
    async fn upload_image(&self, image: &[u8], filename: &str) -> Result<String, BoxError>;

    async fn create_issue(&self, report: &BugReport) -> Result<SubmitResult, BoxError>;

    /// Checks credentials and reachability. Never fails; problems yield `false`.
    async fn test_connection(&self) -> bool;
}
