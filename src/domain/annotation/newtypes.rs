// SPDX-License-Identifier: MPL-2.0
//! Annotation newtypes.

// =============================================================================
// Stroke Width Bounds
// =============================================================================

/// Stroke width bounds in pixels (0.5 to 200).
pub mod stroke_width_bounds {
    /// Thinnest stroke that still renders visibly.
    pub const MIN: f32 = 0.5;
    /// Widest allowed stroke.
    pub const MAX: f32 = 200.0;
    /// Default pen width.
    pub const DEFAULT: f32 = 4.0;
}

/// Stroke width in image pixels, guaranteed to be within valid range.
///
/// Non-finite inputs fall back to the default width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeWidth(f32);

impl StrokeWidth {
    /// Creates a new stroke width, clamping to the valid range.
    #[must_use]
    pub fn new(width: f32) -> Self {
        if !width.is_finite() {
            return Self::default();
        }
        Self(width.clamp(stroke_width_bounds::MIN, stroke_width_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for StrokeWidth {
    fn default() -> Self {
        Self(stroke_width_bounds::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_width_clamps() {
        assert_eq!(StrokeWidth::new(0.0).value(), stroke_width_bounds::MIN);
        assert_eq!(StrokeWidth::new(1000.0).value(), stroke_width_bounds::MAX);
        assert_eq!(StrokeWidth::new(3.0).value(), 3.0);
    }

    #[test]
    fn stroke_width_rejects_non_finite() {
        assert_eq!(StrokeWidth::new(f32::NAN), StrokeWidth::default());
        assert_eq!(StrokeWidth::new(f32::INFINITY), StrokeWidth::default());
    }
}
