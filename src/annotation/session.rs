// SPDX-License-Identifier: MPL-2.0
//! An annotation session over one captured screenshot.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::image::BaseImage;
use super::log::{AnnotationLog, DrawingOperation};
use super::render::composite;
use super::AnnotationError;
use crate::report::{CaptureResult, Dimensions, Screenshot};

/// Pairs the decoded screenshot with the operations drawn over it.
#[derive(Debug, Clone)]
pub struct AnnotationSession {
    base: BaseImage,
    log: AnnotationLog,
}

impl AnnotationSession {
    #[must_use]
    pub fn new(base: BaseImage) -> Self {
        Self {
            base,
            log: AnnotationLog::new(),
        }
    }

    /// Decodes a capture and starts an empty session over it.
    ///
    /// Hosts without a Tokio runtime can decode with
    /// [`BaseImage::decode_blocking`] and pass the result to
    /// [`AnnotationSession::new`].
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Fails when the captured image cannot be decoded.
    pub async fn from_capture(capture: &CaptureResult) -> Result<Self, AnnotationError> {
        let base = BaseImage::decode(capture.image_data.clone()).await?;
        if base.dimensions() != capture.dimensions {
            tracing::debug!(
                reported = ?capture.dimensions,
                decoded = ?base.dimensions(),
                "capture dimensions differ from decoded image"
            );
        }
        Ok(Self::new(base))
    }

    pub fn push(&mut self, operation: DrawingOperation) {
        self.log.push(operation);
    }

    pub fn undo(&mut self) -> Option<DrawingOperation> {
        self.log.undo()
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }

    #[must_use]
    pub fn log(&self) -> &AnnotationLog {
        &self.log
    }

    #[must_use]
    pub fn base(&self) -> &BaseImage {
        &self.base
    }

    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.base.dimensions()
    }

    /// Composites the current log over the screenshot and encodes it as PNG.
    ///
    /// # Errors
    ///
    /// Fails when a drawing surface cannot be allocated or encoding fails.
    pub fn render(&self) -> Result<Vec<u8>, AnnotationError> {
        composite(&self.base, self.log.operations())
    }

    /// The annotated and original screenshots as attached to a report.
    ///
    /// # Errors
    ///
    /// See [`AnnotationSession::render`].
    pub fn finish(&self) -> Result<Screenshot, AnnotationError> {
        let annotated = STANDARD.encode(self.render()?);
        Ok(Screenshot {
            annotated,
            original: self.base.encoded().to_string(),
            dimensions: self.dimensions(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::StrokeStyle;
    use crate::domain::annotation::{Point, StrokeColor, StrokeWidth};
    use crate::test_utils::{decode_png, solid_png_base64};

    fn capture(width: u32, height: u32) -> CaptureResult {
        CaptureResult {
            image_data: solid_png_base64(width, height, [255, 255, 255, 255]),
            dimensions: Dimensions::new(width, height),
            mime_type: "image/png".to_string(),
        }
    }

    fn scribble() -> DrawingOperation {
        DrawingOperation::pen(
            vec![Point::new(2.0, 10.0), Point::new(38.0, 10.0)],
            StrokeStyle::new(StrokeColor::BLACK, StrokeWidth::new(4.0)),
        )
    }

    #[tokio::test]
    async fn finish_returns_annotated_and_original_pair() {
        let capture = capture(40, 20);
        let mut session = AnnotationSession::from_capture(&capture).await.unwrap();
        session.push(scribble());

        let screenshot = session.finish().unwrap();
        assert_eq!(screenshot.original, capture.image_data);
        assert_eq!(screenshot.dimensions, Dimensions::new(40, 20));

        let annotated = decode_png(&STANDARD.decode(&screenshot.annotated).unwrap());
        assert_eq!(annotated.get_pixel(20, 10).0, [0, 0, 0, 255]);
    }

    #[tokio::test]
    async fn undo_restores_previous_render() {
        let mut session = AnnotationSession::from_capture(&capture(40, 20)).await.unwrap();
        let clean = session.render().unwrap();

        session.push(scribble());
        assert_ne!(decode_png(&session.render().unwrap()), decode_png(&clean));

        assert_eq!(session.undo(), Some(scribble()));
        assert_eq!(decode_png(&session.render().unwrap()), decode_png(&clean));
    }

    #[tokio::test]
    async fn undecodable_capture_is_an_error() {
        let capture = CaptureResult {
            image_data: "abc".to_string(),
            dimensions: Dimensions::new(1, 1),
            mime_type: "image/png".to_string(),
        };
        assert!(AnnotationSession::from_capture(&capture).await.is_err());
    }
}
