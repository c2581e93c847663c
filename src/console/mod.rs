// SPDX-License-Identifier: MPL-2.0
//! Console capture for bug reports.
//!
//! The host routes its logging through a [`Console`] and publishes unhandled
//! errors on a [`RejectionChannel`]. A [`ConsoleInterceptor`] shadows both
//! while installed and keeps the most recent entries in three independently
//! bounded [`RingBuffer`]s (logs, errors, unhandled rejections).

mod buffer;
mod entry;
mod facade;
mod interceptor;
mod rejection;
mod scrub;

pub use buffer::RingBuffer;
pub use entry::{console_arg, render_args, ConsoleEntries, ConsoleEntry, ConsoleLevel};
pub use facade::{Console, ConsoleFn, ConsoleMethods};
pub use interceptor::{ConsoleHandle, ConsoleInterceptor};
pub use rejection::{describe_error, RejectionChannel, RejectionListener, SubscriptionId};
pub use scrub::scrub_paths;
