// SPDX-License-Identifier: MPL-2.0
//! `shakenbake` is the core of an in-app bug reporting SDK.
//!
//! It orchestrates pluggable triggers, screenshot capture, device context
//! collectors and report destinations, lets users annotate the captured
//! screenshot, and records recent console output for the report.
//!
//! A typical flow:
//!
//! 1. Register plugins in a [`PluginRegistry`].
//! 2. Hand the registry and a [`DestinationAdapter`] to a [`ReportBuilder`].
//! 3. `start_capture`, annotate with an [`AnnotationSession`],
//!    `collect_context`, `build` and finally `submit`.

#![doc(html_root_url = "https://docs.rs/shakenbake/0.3.0")]

pub mod annotation;
pub mod config;
pub mod console;
pub mod context;
pub mod domain;
pub mod error;
pub mod plugins;
pub mod report;

#[cfg(test)]
mod test_utils;

pub use annotation::{AnnotationError, AnnotationSession, DrawingOperation};
pub use config::SdkConfig;
pub use context::DeviceContext;
pub use error::{ErrorCode, Result, ShakeNbakeError};
pub use plugins::{
    CapturePlugin, ContextCollector, DestinationAdapter, Platform, PluginRegistry, TriggerPlugin,
};
pub use report::{BugReport, ReportBuilder, ReportInput, SubmitResult};
