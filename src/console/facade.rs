// SPDX-License-Identifier: MPL-2.0
//! The host's console: three swappable logging entry points.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

use super::entry::{render_args, ConsoleLevel};

/// One console entry point.
pub type ConsoleFn = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// The functions behind `log`, `warn` and `error`.
#[derive(Clone)]
pub struct ConsoleMethods {
    pub log: ConsoleFn,
    pub warn: ConsoleFn,
    pub error: ConsoleFn,
}

/// Cheaply clonable handle to the host's logging entry points.
///
/// All clones share the same entry points, so an installed
/// [`ConsoleInterceptor`](super::ConsoleInterceptor) sees calls made through
/// any of them.
#[derive(Clone)]
pub struct Console {
    methods: Arc<RwLock<ConsoleMethods>>,
}

impl Console {
    #[must_use]
    pub fn new(methods: ConsoleMethods) -> Self {
        Self {
            methods: Arc::new(RwLock::new(methods)),
        }
    }

    /// Entry points that forward to `tracing` under the `console` target.
    #[must_use]
    pub fn tracing() -> Self {
        Self::new(ConsoleMethods {
            log: Arc::new(|args: &[Value]| tracing::info!(target: "console", "{}", render_args(args))),
            warn: Arc::new(|args: &[Value]| tracing::warn!(target: "console", "{}", render_args(args))),
            error: Arc::new(|args: &[Value]| tracing::error!(target: "console", "{}", render_args(args))),
        })
    }

    /// Entry points that discard everything.
    #[must_use]
    pub fn silent() -> Self {
        let noop: ConsoleFn = Arc::new(|_: &[Value]| {});
        Self::new(ConsoleMethods {
            log: Arc::clone(&noop),
            warn: Arc::clone(&noop),
            error: noop,
        })
    }

    pub fn log(&self, args: &[Value]) {
        self.call(ConsoleLevel::Log, args);
    }

    pub fn warn(&self, args: &[Value]) {
        self.call(ConsoleLevel::Warn, args);
    }

    pub fn error(&self, args: &[Value]) {
        self.call(ConsoleLevel::Error, args);
    }

    fn call(&self, level: ConsoleLevel, args: &[Value]) {
        // Released before the call so entry points may log re-entrantly.
        let method = self.method(level);
        method(args);
    }

    pub(crate) fn method(&self, level: ConsoleLevel) -> ConsoleFn {
        let methods = self.methods.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slot(&methods, level))
    }

    /// Swaps one entry point, returning the previous one.
    pub(crate) fn replace(&self, level: ConsoleLevel, method: ConsoleFn) -> ConsoleFn {
        let mut methods = self.methods.write().unwrap_or_else(PoisonError::into_inner);
        let target = match level {
            ConsoleLevel::Log => &mut methods.log,
            ConsoleLevel::Warn => &mut methods.warn,
            ConsoleLevel::Error => &mut methods.error,
        };
        std::mem::replace(target, method)
    }

    /// Puts `method` back only if the slot still holds `expected`.
    ///
    /// Returns whether the swap happened.
    pub(crate) fn restore(
        &self,
        level: ConsoleLevel,
        expected: &ConsoleFn,
        method: ConsoleFn,
    ) -> bool {
        let mut methods = self.methods.write().unwrap_or_else(PoisonError::into_inner);
        let target = match level {
            ConsoleLevel::Log => &mut methods.log,
            ConsoleLevel::Warn => &mut methods.warn,
            ConsoleLevel::Error => &mut methods.error,
        };
        if !Arc::ptr_eq(target, expected) {
            return false;
        }
        *target = method;
        true
    }
}

fn slot(methods: &ConsoleMethods, level: ConsoleLevel) -> &ConsoleFn {
    match level {
        ConsoleLevel::Log => &methods.log,
        ConsoleLevel::Warn => &methods.warn,
        ConsoleLevel::Error => &methods.error,
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::tracing()
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}
