// SPDX-License-Identifier: MPL-2.0
//! Notification channel for errors nobody handled.
//!
//! Hosts publish failures of detached work (spawned tasks, fire-and-forget
//! futures) here; the console interceptor subscribes while installed.

use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Receives every unhandled error published on a [`RejectionChannel`].
pub type RejectionListener = Arc<dyn Fn(&(dyn Error + 'static)) + Send + Sync>;

/// Identifies one subscription for [`RejectionChannel::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, RejectionListener)>,
}

/// Cheaply clonable publish/subscribe channel for unhandled errors.
#[derive(Clone, Default)]
pub struct RejectionChannel {
    listeners: Arc<Mutex<Listeners>>,
}

impl RejectionChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: RejectionListener) -> SubscriptionId {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let id = SubscriptionId(listeners.next_id);
        listeners.next_id += 1;
        listeners.entries.push((id, listener));
        id
    }

    /// Removes a subscription; returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.entries.len();
        listeners.entries.retain(|(existing, _)| *existing != id);
        listeners.entries.len() != before
    }

    /// Publishes an unhandled error to every listener.
    ///
    /// Returns how many listeners were notified.
    pub fn notify(&self, error: &(dyn Error + 'static)) -> usize {
        let listeners: Vec<RejectionListener> = {
            let guard = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
            guard.entries.iter().map(|(_, listener)| Arc::clone(listener)).collect()
        };
        for listener in &listeners {
            listener(error);
        }
        listeners.len()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }
}

impl fmt::Debug for RejectionChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RejectionChannel")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Renders an error with its source chain: `outer: inner: root`.
#[must_use]
pub fn describe_error(error: &(dyn Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
