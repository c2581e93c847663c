// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the SDK. Constants are organized by category.
//!
//! # Categories
//!
//! - **Console**: Ring buffer capacities for captured console output
//! - **Annotation**: Stroke geometry used when rendering drawing operations
//! - **Application**: Identification reported in the `app` context section

// ==========================================================================
// Console Defaults
// ==========================================================================

/// Default number of `log`/`warn` entries kept.
pub const DEFAULT_MAX_LOGS: usize = 50;

/// Default number of `error` entries kept.
pub const DEFAULT_MAX_ERRORS: usize = 20;

/// Default number of unhandled rejections kept.
pub const DEFAULT_MAX_REJECTIONS: usize = 20;

// ==========================================================================
// Annotation Defaults
// ==========================================================================

/// Eraser strokes are this many times wider than their nominal width.
pub const ERASER_WIDTH_FACTOR: f32 = 4.0;

/// Arrow head length as a multiple of the stroke width.
pub const ARROW_HEAD_LENGTH_FACTOR: f32 = 4.0;

/// Shortest arrow head, in pixels.
pub const MIN_ARROW_HEAD_LENGTH: f32 = 12.0;

/// Angle between the arrow shaft and each side of the head, in degrees.
pub const ARROW_HEAD_HALF_ANGLE_DEG: f32 = 30.0;

/// Offset applied to single-point strokes so they render as a dot.
pub const SINGLE_POINT_EPSILON: f32 = 0.01;

// ==========================================================================
// Application Defaults
// ==========================================================================

/// Application name reported when the host does not configure one.
pub const DEFAULT_APP_NAME: &str = "unknown";

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Console validation
    assert!(DEFAULT_MAX_LOGS > 0);
    assert!(DEFAULT_MAX_ERRORS > 0);
    assert!(DEFAULT_MAX_REJECTIONS > 0);

    // Annotation validation
    assert!(ERASER_WIDTH_FACTOR >= 1.0);
    assert!(ARROW_HEAD_LENGTH_FACTOR > 0.0);
    assert!(MIN_ARROW_HEAD_LENGTH > 0.0);
    assert!(ARROW_HEAD_HALF_ANGLE_DEG > 0.0);
    assert!(ARROW_HEAD_HALF_ANGLE_DEG < 90.0);
    assert!(SINGLE_POINT_EPSILON > 0.0);
    assert!(SINGLE_POINT_EPSILON < 1.0);
};
