// SPDX-License-Identifier: MPL-2.0
//! Console capture with an explicit install/uninstall lifecycle.

use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use super::buffer::RingBuffer;
use super::entry::{render_args, ConsoleEntries, ConsoleEntry, ConsoleLevel};
use super::facade::{Console, ConsoleFn};
use super::rejection::{describe_error, RejectionChannel, SubscriptionId};
use super::scrub::scrub_paths;
use crate::config::ConsoleConfig;

struct Buffers {
    logs: RingBuffer<ConsoleEntry>,
    errors: RingBuffer<ConsoleEntry>,
    rejections: RingBuffer<ConsoleEntry>,
    scrub_paths: bool,
}

impl Buffers {
    fn record(&mut self, level: ConsoleLevel, message: String, rejection: bool) {
        let message = if self.scrub_paths {
            scrub_paths(&message)
        } else {
            message
        };
        let entry = ConsoleEntry::new(level, message);
        match (rejection, level) {
            (true, _) => self.rejections.push(entry),
            (false, ConsoleLevel::Error) => self.errors.push(entry),
            (false, ConsoleLevel::Log | ConsoleLevel::Warn) => self.logs.push(entry),
        }
    }

    fn snapshot(&self) -> ConsoleEntries {
        ConsoleEntries {
            logs: self.logs.to_vec(),
            errors: self.errors.to_vec(),
            unhandled_rejections: self.rejections.to_vec(),
        }
    }

    fn clear(&mut self) {
        self.logs.clear();
        self.errors.clear();
        self.rejections.clear();
    }
}

/// Read access to captured entries, usable after the interceptor moved away.
#[derive(Clone)]
pub struct ConsoleHandle {
    buffers: Arc<Mutex<Buffers>>,
}

impl ConsoleHandle {
    /// Snapshot of every buffer, oldest entries first.
    #[must_use]
    pub fn entries(&self) -> ConsoleEntries {
        self.lock().snapshot()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Buffers> {
        self.buffers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ConsoleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleHandle").finish_non_exhaustive()
    }
}

/// One shadowed entry point: the function found at install time and the
/// wrapper put in its place.
struct Shadowed {
    level: ConsoleLevel,
    original: ConsoleFn,
    wrapper: ConsoleFn,
}

struct Installed {
    shadowed: [Shadowed; 3],
    /// Read by the wrappers; cleared on uninstall so a wrapper that another
    /// interceptor still forwards to stops recording.
    active: Arc<AtomicBool>,
    subscription: SubscriptionId,
}

/// Shadows the console entry points and records what passes through them.
///
/// While installed, `log` and `warn` calls land in the logs buffer, `error`
/// calls in the errors buffer and errors published on the
/// [`RejectionChannel`] in the rejections buffer; every call is then forwarded
/// to the original entry point. Dropping an installed interceptor uninstalls it.
///
/// Interceptors may be stacked on one [`Console`] and uninstalled in any order.
/// An entry point is only restored if it still holds this interceptor's
/// wrapper; otherwise the wrapper stays in the chain as a plain pass-through.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use shakenbake::config::ConsoleConfig;
/// use shakenbake::console::{Console, ConsoleInterceptor, RejectionChannel};
///
/// let console = Console::silent();
/// let mut interceptor = ConsoleInterceptor::new(
///     console.clone(),
///     RejectionChannel::new(),
///     &ConsoleConfig { max_logs: 2, ..ConsoleConfig::default() },
/// );
/// interceptor.install();
///
/// for message in ["one", "two", "three"] {
///     console.log(&[json!(message)]);
/// }
///
/// let logs = interceptor.entries().logs;
/// assert_eq!(logs.len(), 2);
/// assert_eq!(logs[0].message, "two");
/// ```
pub struct ConsoleInterceptor {
    console: Console,
    rejections: RejectionChannel,
    buffers: Arc<Mutex<Buffers>>,
    installed: Option<Installed>,
}

impl ConsoleInterceptor {
    #[must_use]
    pub fn new(console: Console, rejections: RejectionChannel, config: &ConsoleConfig) -> Self {
        let buffers = Buffers {
            logs: RingBuffer::new(config.logs_capacity()),
            errors: RingBuffer::new(config.errors_capacity()),
            rejections: RingBuffer::new(config.rejections_capacity()),
            scrub_paths: config.scrub_paths,
        };
        Self {
            console,
            rejections,
            buffers: Arc::new(Mutex::new(buffers)),
            installed: None,
        }
    }

    /// Starts capturing. Calling it while installed does nothing.
    pub fn install(&mut self) {
        if self.installed.is_some() {
            return;
        }

        let active = Arc::new(AtomicBool::new(true));
        let shadowed = [ConsoleLevel::Log, ConsoleLevel::Warn, ConsoleLevel::Error]
            .map(|level| self.shadow(level, &active));

        let buffers = Arc::clone(&self.buffers);
        let subscription = self.rejections.subscribe(Arc::new(move |err: &(dyn Error + 'static)| {
            buffers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .record(ConsoleLevel::Error, describe_error(err), true);
        }));

        self.installed = Some(Installed {
            shadowed,
            active,
            subscription,
        });
        tracing::debug!("console interceptor installed");
    }

    /// Restores the original entry points and stops listening for rejections.
    ///
    /// Captured entries are kept. Safe to call when not installed.
    pub fn uninstall(&mut self) {
        let Some(installed) = self.installed.take() else {
            return;
        };
        installed.active.store(false, Ordering::SeqCst);
        for Shadowed { level, original, wrapper } in installed.shadowed {
            if !self.console.restore(level, &wrapper, original) {
                tracing::debug!(?level, "entry point shadowed again, leaving pass-through");
            }
        }
        self.rejections.unsubscribe(installed.subscription);
        tracing::debug!("console interceptor uninstalled");
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.installed.is_some()
    }

    /// Snapshot of every buffer, oldest entries first.
    #[must_use]
    pub fn entries(&self) -> ConsoleEntries {
        self.handle().entries()
    }

    pub fn clear(&self) {
        self.handle().clear();
    }

    /// A handle that keeps reading the buffers of this interceptor.
    #[must_use]
    pub fn handle(&self) -> ConsoleHandle {
        ConsoleHandle {
            buffers: Arc::clone(&self.buffers),
        }
    }

    /// Replaces one entry point with a recording wrapper.
    fn shadow(&self, level: ConsoleLevel, active: &Arc<AtomicBool>) -> Shadowed {
        let forward = self.console.method(level);
        let buffers = Arc::clone(&self.buffers);
        let active = Arc::clone(active);
        let wrapper: ConsoleFn = Arc::new(move |args: &[Value]| {
            if active.load(Ordering::SeqCst) {
                buffers
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .record(level, render_args(args), false);
            }
            forward(args);
        });
        let original = self.console.replace(level, Arc::clone(&wrapper));
        Shadowed {
            level,
            original,
            wrapper,
        }
    }
}

impl Drop for ConsoleInterceptor {
    fn drop(&mut self) {
        self.uninstall();
    }
}

impl fmt::Debug for ConsoleInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleInterceptor")
            .field("installed", &self.is_installed())
            .finish_non_exhaustive()
    }
}
