// SPDX-License-Identifier: MPL-2.0
//! Annotation domain types.
//!
//! This module provides pure value types used by drawing operations:
//! - [`Point`]: A position in image pixel coordinates
//! - [`StrokeColor`]: An RGBA stroke color parsed from CSS hex notation
//! - [`StrokeWidth`]: A stroke width clamped to a sensible range

mod newtypes;
mod types;

pub use newtypes::{stroke_width_bounds, StrokeWidth};
pub use types::{ColorParseError, Point, StrokeColor};
