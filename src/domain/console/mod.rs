// SPDX-License-Identifier: MPL-2.0
//! Console capture domain types.
//!
//! - [`ConsoleCapacity`]: Capacity of one console ring buffer

mod newtypes;

pub use newtypes::{console_capacity_bounds, ConsoleCapacity};
