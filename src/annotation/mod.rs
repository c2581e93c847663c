// SPDX-License-Identifier: MPL-2.0
//! Screenshot annotation: an operation log replayed onto the captured image.
//!
//! Drawing never touches the screenshot itself. Every operation is painted onto
//! a transparent annotation layer (the eraser clears layer pixels with
//! destination-out blending) and the layer is composited over the decoded base
//! image only when the final PNG is produced.
//!
//! # Architecture
//!
//! - [`log`]: Drawing operations and the append-only operation log
//! - [`image`]: Asynchronous base image decoding
//! - [`render`]: Layer painting and two-layer compositing
//! - [`session`]: Base image plus log, producing the screenshot pair of a report

pub mod image;
pub mod log;
pub mod render;
pub mod session;

use thiserror::Error;

use crate::error::ShakeNbakeError;

pub use image::BaseImage;
pub use log::{AnnotationLog, DrawingOperation, FreehandTool, ShapeTool, StrokeStyle, Tool};
pub use render::{composite, render_layer};
pub use session::AnnotationSession;

/// Failures while loading, painting or encoding an annotated screenshot.
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("screenshot is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("failed to decode screenshot: {0}")]
    Decode(#[from] image_rs::ImageError),

    #[error("cannot allocate a {width}x{height} drawing surface")]
    SurfaceUnavailable { width: u32, height: u32 },

    #[error("failed to encode annotated screenshot: {0}")]
    Encode(String),

    #[error("screenshot decoding task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<AnnotationError> for ShakeNbakeError {
    fn from(err: AnnotationError) -> Self {
        ShakeNbakeError::unknown("annotation failed").with_source(err)
    }
}
