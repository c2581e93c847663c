// SPDX-License-Identifier: MPL-2.0
//! The report flow: capture, context collection, validation and submission.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Utc;

use super::id::generate_report_id;
use super::types::{BugReport, CaptureResult, ReportInput, SubmitResult};
use crate::config::SdkConfig;
use crate::context::{redact, DeviceContext};
use crate::error::{ErrorCode, Result, ShakeNbakeError};
use crate::plugins::{DestinationAdapter, PluginRegistry};

/// Where the current report flow stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFlowState {
    #[default]
    Idle,
    Capturing,
    /// Screenshot captured; the host is annotating it.
    Annotating,
    CollectingContext,
    Built,
    Submitting,
    Submitted,
    Failed,
}

/// Drives one report flow at a time.
///
/// The host calls [`start_capture`](Self::start_capture),
/// [`collect_context`](Self::collect_context), [`build`](Self::build) and
/// [`submit`](Self::submit) in sequence. The builder records the flow state but
/// does not enforce the order, so a host may build from a screenshot it
/// captured itself.
pub struct ReportBuilder {
    registry: PluginRegistry,
    destination: Arc<dyn DestinationAdapter>,
    redaction: Vec<String>,
    state: ReportFlowState,
}

impl ReportBuilder {
    pub fn new(registry: PluginRegistry, destination: Arc<dyn DestinationAdapter>) -> Self {
        Self {
            registry,
            destination,
            redaction: Vec::new(),
            state: ReportFlowState::Idle,
        }
    }

    /// Builder using the redaction patterns of `config`.
    pub fn from_config(
        registry: PluginRegistry,
        destination: Arc<dyn DestinationAdapter>,
        config: &SdkConfig,
    ) -> Self {
        Self::new(registry, destination).with_redaction(config.redaction.patterns.iter())
    }

    /// Patterns applied to every collected context (see [`redact`]).
    #[must_use]
    pub fn with_redaction<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.redaction = patterns.into_iter().map(|p| p.as_ref().to_string()).collect();
        self
    }

    #[must_use]
    pub fn state(&self) -> ReportFlowState {
        self.state
    }

    #[must_use]
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PluginRegistry {
        &mut self.registry
    }

    #[must_use]
    pub fn destination(&self) -> &Arc<dyn DestinationAdapter> {
        &self.destination
    }

    /// Forgets the current flow.
    pub fn reset(&mut self) {
        self.transition(ReportFlowState::Idle);
    }

    /// Takes the screenshot with the first registered capture plugin.
    ///
    /// # Errors
    ///
    /// [`ErrorCode::Unknown`] when no capture plugin is registered. Capture
    /// failures keep their code if the plugin returned a [`ShakeNbakeError`] and
    /// become [`ErrorCode::UploadFailed`] otherwise.
    pub async fn start_capture(&mut self) -> Result<CaptureResult> {
        self.transition(ReportFlowState::Capturing);
        let Some(capture) = self.registry.capture() else {
            return Err(self.fail(ShakeNbakeError::unknown("no capture plugin registered")));
        };

        match capture.capture().await {
            Ok(result) => {
                self.transition(ReportFlowState::Annotating);
                Ok(result)
            }
            Err(err) => {
                let err = ShakeNbakeError::from_plugin(
                    err,
                    ErrorCode::UploadFailed,
                    format!("capture plugin '{}' failed", capture.name()),
                );
                Err(self.fail(err))
            }
        }
    }

    /// Runs every registered collector and applies the redaction patterns.
    ///
    /// Never fails; broken collectors contribute nothing.
    pub async fn collect_context(&mut self) -> DeviceContext {
        self.transition(ReportFlowState::CollectingContext);
        let context = self.registry.collect_context().await;
        if self.redaction.is_empty() {
            context
        } else {
            redact(&context, &self.redaction)
        }
    }

    /// Validates `input` and freezes it into a report with a fresh id and timestamp.
    ///
    /// # Errors
    ///
    /// [`ErrorCode::Unknown`] when the title is blank or the annotated
    /// screenshot is missing.
    pub fn build(&mut self, input: ReportInput, context: DeviceContext) -> Result<BugReport> {
        if input.title.trim().is_empty() {
            return Err(self.fail(ShakeNbakeError::unknown("report title is required")));
        }
        if input.annotated_screenshot.is_empty() {
            return Err(self.fail(ShakeNbakeError::unknown("annotated screenshot is required")));
        }

        let report = BugReport::new(generate_report_id(), Utc::now(), input, context);
        tracing::debug!(id = report.id(), "report built");
        self.transition(ReportFlowState::Built);
        Ok(report)
    }

    /// Uploads the annotated screenshot and files the issue.
    ///
    /// Returns the destination's result unmodified.
    ///
    /// # Errors
    ///
    /// Typed errors from the destination pass through; anything else becomes
    /// [`ErrorCode::UploadFailed`] with the original error as source.
    pub async fn submit(&mut self, report: &BugReport) -> Result<SubmitResult> {
        self.transition(ReportFlowState::Submitting);
        match self.submit_inner(report).await {
            Ok(result) => {
                self.transition(ReportFlowState::Submitted);
                Ok(result)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    async fn submit_inner(&self, report: &BugReport) -> Result<SubmitResult> {
        let destination = self.destination.name();
        let image = STANDARD
            .decode(report.screenshot().annotated.trim())
            .map_err(|err| {
                ShakeNbakeError::upload_failed("annotated screenshot is not valid base64")
                    .with_source(err)
            })?;

        let filename = format!("{}.png", report.id());
        let url = self
            .destination
            .upload_image(&image, &filename)
            .await
            .map_err(|err| {
                ShakeNbakeError::from_plugin(
                    err,
                    ErrorCode::UploadFailed,
                    format!("'{destination}' failed to upload {filename}"),
                )
            })?;
        // The url is informational; adapters embed images in the issue as they see fit.
        tracing::debug!(destination, url = %url, "screenshot uploaded");

        self.destination.create_issue(report).await.map_err(|err| {
            ShakeNbakeError::from_plugin(
                err,
                ErrorCode::UploadFailed,
                format!("'{destination}' failed to create the issue"),
            )
        })
    }

    fn transition(&mut self, next: ReportFlowState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "report flow");
            self.state = next;
        }
    }

    fn fail(&mut self, err: ShakeNbakeError) -> ShakeNbakeError {
        tracing::warn!(%err, "report flow failed");
        self.transition(ReportFlowState::Failed);
        err
    }
}

impl fmt::Debug for ReportBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportBuilder")
            .field("registry", &self.registry)
            .field("destination", &self.destination.name())
            .field("redaction", &self.redaction)
            .field("state", &self.state)
            .finish()
    }
}
