// SPDX-License-Identifier: MPL-2.0
//! Console capture newtypes.
//!
//! This module provides type-safe wrappers for console buffer sizes,
//! ensuring they are always within valid ranges.

// =============================================================================
// Console Capacity Bounds
// =============================================================================

/// Console buffer capacity bounds (1 to 10000 entries).
pub mod console_capacity_bounds {
    /// Minimum capacity of a console buffer.
    pub const MIN: usize = 1;
    /// Maximum capacity of a console buffer.
    pub const MAX: usize = 10_000;
    /// Default capacity of the `log`/`warn` buffer.
    pub const DEFAULT_LOGS: usize = 50;
    /// Default capacity of the `error` buffer.
    pub const DEFAULT_ERRORS: usize = 20;
    /// Default capacity of the unhandled rejection buffer.
    pub const DEFAULT_REJECTIONS: usize = 20;
}

// =============================================================================
// ConsoleCapacity
// =============================================================================

/// Number of entries a console ring buffer keeps before evicting the oldest.
///
/// Values outside the valid range are clamped, so a buffer always holds at
/// least one entry.
///
/// # Example
///
/// ```ignore
/// let capacity = ConsoleCapacity::new(0);
/// assert_eq!(capacity.value(), 1); // Clamped to min
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleCapacity(usize);

impl ConsoleCapacity {
    /// Creates a new capacity, clamping to the valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(
            console_capacity_bounds::MIN,
            console_capacity_bounds::MAX,
        ))
    }

    /// Default capacity for captured `log`/`warn` calls.
    #[must_use]
    pub fn logs() -> Self {
        Self(console_capacity_bounds::DEFAULT_LOGS)
    }

    /// Default capacity for captured `error` calls.
    #[must_use]
    pub fn errors() -> Self {
        Self(console_capacity_bounds::DEFAULT_ERRORS)
    }

    /// Default capacity for unhandled rejections.
    #[must_use]
    pub fn rejections() -> Self {
        Self(console_capacity_bounds::DEFAULT_REJECTIONS)
    }

    /// Returns the value as usize.
    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_capacity_clamps() {
        assert_eq!(ConsoleCapacity::new(0).value(), console_capacity_bounds::MIN);
        assert_eq!(
            ConsoleCapacity::new(1_000_000).value(),
            console_capacity_bounds::MAX
        );
    }

    #[test]
    fn console_capacity_accepts_valid_values() {
        assert_eq!(ConsoleCapacity::new(2).value(), 2);
        assert_eq!(ConsoleCapacity::new(500).value(), 500);
    }

    #[test]
    fn console_capacity_defaults() {
        assert_eq!(ConsoleCapacity::logs().value(), 50);
        assert_eq!(ConsoleCapacity::errors().value(), 20);
        assert_eq!(ConsoleCapacity::rejections().value(), 20);
    }
}
