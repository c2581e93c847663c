// SPDX-License-Identifier: MPL-2.0
//! Ordered plugin lists with name-based registration.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, warn};

use super::{CapturePlugin, ContextCollector, DestinationAdapter, TriggerCallback, TriggerPlugin};
use crate::context::{aggregate, DeviceContext};

/// Holds the registered plugins of each capability, in registration order.
///
/// Registering a name that is already present replaces that plugin in place,
/// so ordering only depends on first registration. Unregistering an unknown
/// name is a no-op.
///
/// While triggers are active, a trigger registered under an existing name
/// deactivates the one it replaces and is activated with the same callback.
#[derive(Default)]
pub struct PluginRegistry {
    triggers: Vec<Box<dyn TriggerPlugin>>,
    on_trigger: Option<TriggerCallback>,
    captures: Vec<Arc<dyn CapturePlugin>>,
    collectors: Vec<Arc<dyn ContextCollector>>,
    destinations: Vec<Arc<dyn DestinationAdapter>>,
}

trait Named {
    fn plugin_name(&self) -> &str;
}

impl Named for Box<dyn TriggerPlugin> {
    fn plugin_name(&self) -> &str {
        self.name()
    }
}

impl Named for Arc<dyn CapturePlugin> {
    fn plugin_name(&self) -> &str {
        self.name()
    }
}

impl Named for Arc<dyn ContextCollector> {
    fn plugin_name(&self) -> &str {
        self.name()
    }
}

impl Named for Arc<dyn DestinationAdapter> {
    fn plugin_name(&self) -> &str {
        self.name()
    }
}

fn upsert<T: Named>(list: &mut Vec<T>, plugin: T) {
    match list
        .iter()
        .position(|existing| existing.plugin_name() == plugin.plugin_name())
    {
        Some(index) => list[index] = plugin,
        None => list.push(plugin),
    }
}

fn remove<T: Named>(list: &mut Vec<T>, name: &str) -> Option<T> {
    let index = list.iter().position(|plugin| plugin.plugin_name() == name)?;
    Some(list.remove(index))
}

impl PluginRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Triggers
    // =========================================================================

    pub fn register_trigger(&mut self, mut trigger: Box<dyn TriggerPlugin>) {
        debug!(name = trigger.name(), "registering trigger");
        let Some(on_trigger) = self.on_trigger.clone() else {
            upsert(&mut self.triggers, trigger);
            return;
        };

        let name = trigger.name().to_string();
        if let Some(replaced) = self
            .triggers
            .iter_mut()
            .find(|existing| existing.name() == name)
        {
            run_isolated(&name, "deactivate", || replaced.deactivate());
        }
        run_isolated(&name, "activate", || trigger.activate(on_trigger));
        upsert(&mut self.triggers, trigger);
    }

    /// Removes the trigger named `name` and hands it back.
    ///
    /// The trigger is returned as-is; deactivate it first if it was active.
    pub fn unregister_trigger(&mut self, name: &str) -> Option<Box<dyn TriggerPlugin>> {
        remove(&mut self.triggers, name)
    }

    pub fn triggers(&self) -> impl Iterator<Item = &dyn TriggerPlugin> {
        self.triggers.iter().map(|trigger| &**trigger)
    }

    /// Activates every trigger with the same callback.
    ///
    /// A trigger that fails or panics is logged and skipped; the others are
    /// still activated. Returns the number of triggers that activated.
    pub fn activate_triggers(&mut self, on_trigger: TriggerCallback) -> usize {
        self.on_trigger = Some(Arc::clone(&on_trigger));
        let mut activated = 0;
        for trigger in &mut self.triggers {
            let name = trigger.name().to_string();
            let callback = Arc::clone(&on_trigger);
            if run_isolated(&name, "activate", || trigger.activate(callback)) {
                activated += 1;
            }
        }
        activated
    }

    /// Deactivates every trigger, isolating failures like [`Self::activate_triggers`].
    pub fn deactivate_triggers(&mut self) -> usize {
        self.on_trigger = None;
        let mut deactivated = 0;
        for trigger in &mut self.triggers {
            let name = trigger.name().to_string();
            if run_isolated(&name, "deactivate", || trigger.deactivate()) {
                deactivated += 1;
            }
        }
        deactivated
    }

    // =========================================================================
    // Captures
    // =========================================================================

    pub fn register_capture(&mut self, capture: Arc<dyn CapturePlugin>) {
        debug!(name = capture.name(), "registering capture plugin");
        upsert(&mut self.captures, capture);
    }

    pub fn unregister_capture(&mut self, name: &str) -> Option<Arc<dyn CapturePlugin>> {
        remove(&mut self.captures, name)
    }

    /// The capture plugin consulted for reports: the first one registered.
    #[must_use]
    pub fn capture(&self) -> Option<Arc<dyn CapturePlugin>> {
        self.captures.first().cloned()
    }

    pub fn captures(&self) -> impl Iterator<Item = &Arc<dyn CapturePlugin>> {
        self.captures.iter()
    }

    // =========================================================================
    // Context collectors
    // =========================================================================

    pub fn register_collector(&mut self, collector: Arc<dyn ContextCollector>) {
        debug!(name = collector.name(), "registering context collector");
        upsert(&mut self.collectors, collector);
    }

    pub fn unregister_collector(&mut self, name: &str) -> Option<Arc<dyn ContextCollector>> {
        remove(&mut self.collectors, name)
    }

    #[must_use]
    pub fn collectors(&self) -> &[Arc<dyn ContextCollector>] {
        &self.collectors
    }

    /// Runs every collector concurrently and merges the results.
    ///
    /// See [`aggregate`] for the merge and isolation rules.
    pub async fn collect_context(&self) -> DeviceContext {
        aggregate(&self.collectors).await
    }

    // =========================================================================
    // Destinations
    // =========================================================================

    pub fn register_destination(&mut self, destination: Arc<dyn DestinationAdapter>) {
        debug!(name = destination.name(), "registering destination adapter");
        upsert(&mut self.destinations, destination);
    }

    pub fn unregister_destination(&mut self, name: &str) -> Option<Arc<dyn DestinationAdapter>> {
        remove(&mut self.destinations, name)
    }

    #[must_use]
    pub fn destination(&self, name: &str) -> Option<Arc<dyn DestinationAdapter>> {
        self.destinations
            .iter()
            .find(|destination| destination.name() == name)
            .cloned()
    }

    pub fn destinations(&self) -> impl Iterator<Item = &Arc<dyn DestinationAdapter>> {
        self.destinations.iter()
    }
}

fn names<T: Named>(list: &[T]) -> Vec<&str> {
    list.iter().map(Named::plugin_name).collect()
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("triggers", &names(&self.triggers))
            .field("captures", &names(&self.captures))
            .field("collectors", &names(&self.collectors))
            .field("destinations", &names(&self.destinations))
            .finish()
    }
}

/// Runs one trigger lifecycle call, logging errors and panics instead of propagating.
fn run_isolated<F>(name: &str, action: &str, call: F) -> bool
where
    F: FnOnce() -> Result<(), crate::error::BoxError>,
{
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(())) => true,
        Ok(Err(err)) => {
            warn!(trigger = name, action, %err, "trigger failed");
            false
        }
        Err(_) => {
            warn!(trigger = name, action, "trigger panicked");
            false
        }
    }
}
