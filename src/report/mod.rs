// SPDX-License-Identifier: MPL-2.0
//! Bug reports and the flow that builds and submits them.
//!
//! - [`types`]: Payloads exchanged with plugins and adapters
//! - [`builder`]: The capture, collect, build and submit state machine
//! - [`id`]: Report identifier generation

pub mod builder;
pub mod id;
pub mod types;

pub use builder::{ReportBuilder, ReportFlowState};
pub use id::generate_report_id;
pub use types::{
    AudioPayload, BugReport, CaptureResult, Category, Dimensions, ReportInput, Severity, Screenshot,
    SubmitResult,
};
