// SPDX-License-Identifier: MPL-2.0
//! Domain layer - pure value types with ZERO external dependencies.
//!
//! # Modules
//!
//! - [`annotation`]: Drawing value objects ([`Point`](annotation::Point),
//!   [`StrokeColor`](annotation::StrokeColor), [`StrokeWidth`](annotation::StrokeWidth))
//! - [`console`]: Console capture types ([`ConsoleCapacity`](console::ConsoleCapacity))

pub mod annotation;
pub mod console;
