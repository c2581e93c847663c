// SPDX-License-Identifier: MPL-2.0
//! Decoding the captured screenshot into a drawable surface.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tiny_skia::{ColorU8, Pixmap};

use super::AnnotationError;
use crate::report::Dimensions;

/// The decoded screenshot annotations are drawn over.
///
/// Keeps the base64 payload it was decoded from so the unannotated original can
/// be attached to the report unchanged.
#[derive(Debug, Clone)]
pub struct BaseImage {
    pixmap: Pixmap,
    encoded: String,
}

impl BaseImage {
    /// Decodes a base64 encoded PNG, JPEG, WebP or BMP screenshot.
    ///
    /// Decoding runs on the Tokio blocking thread pool. Hosts on another
    /// executor should call [`BaseImage::decode_blocking`] instead.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotationError::InvalidBase64`] or [`AnnotationError::Decode`]
    /// when the payload is not an image, and
    /// [`AnnotationError::SurfaceUnavailable`] for empty or oversized images.
    pub async fn decode(base64: impl Into<String>) -> Result<Self, AnnotationError> {
        let encoded = base64.into();
        tokio::task::spawn_blocking(move || Self::decode_blocking(encoded)).await?
    }

    /// Synchronous variant of [`BaseImage::decode`].
    pub fn decode_blocking(encoded: String) -> Result<Self, AnnotationError> {
        let bytes = STANDARD.decode(encoded.trim())?;
        let rgba = image_rs::load_from_memory(&bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut pixmap =
            Pixmap::new(width, height).ok_or(AnnotationError::SurfaceUnavailable { width, height })?;
        // tiny-skia stores premultiplied pixels.
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }

        Ok(Self { pixmap, encoded })
    }

    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.pixmap.width(), self.pixmap.height())
    }

    /// The base64 payload this image was decoded from.
    #[must_use]
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}
