// SPDX-License-Identifier: MPL-2.0
//! Concurrent collector fan-out with per-collector failure isolation.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::future::join_all;
use futures_util::FutureExt;
use serde_json::Map;
use tracing::{debug, warn};

use super::{merge_all, DeviceContext, PartialContext};
use crate::plugins::ContextCollector;

/// Runs every collector concurrently and merges their partials in order.
///
/// A collector that returns an error or panics contributes an empty partial;
/// the remaining results are merged left to right (later collectors win on
/// conflicting fields) over the empty context, so every section is present.
pub async fn aggregate(collectors: &[Arc<dyn ContextCollector>]) -> DeviceContext {
    let partials = join_all(
        collectors
            .iter()
            .map(|collector| collect_isolated(collector.as_ref())),
    )
    .await;
    DeviceContext::from_partial(&merge_all(&partials))
}

async fn collect_isolated(collector: &dyn ContextCollector) -> PartialContext {
    match AssertUnwindSafe(collector.collect()).catch_unwind().await {
        Ok(Ok(partial)) => {
            debug!(collector = collector.name(), fields = partial.len(), "context collected");
            partial
        }
        Ok(Err(err)) => {
            warn!(collector = collector.name(), %err, "context collector failed");
            Map::new()
        }
        Err(_) => {
            warn!(collector = collector.name(), "context collector panicked");
            Map::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{SectionKind, StaticCollector};
    use crate::error::BoxError;
    use crate::plugins::Platform;
    use crate::test_utils::{FailingCollector, PanickingCollector};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tokio::sync::Barrier;

    fn fixed(name: &str, value: Value) -> Arc<dyn ContextCollector> {
        Arc::new(StaticCollector::new(name, value.as_object().cloned().unwrap()))
    }

    #[tokio::test]
    async fn battery_partials_merge_field_by_field() {
        let collectors = vec![
            fixed("level", json!({"battery": {"level": 50}})),
            fixed("charging", json!({"battery": {"charging": true}})),
        ];
        let context = aggregate(&collectors).await;
        assert_eq!(
            Value::Object(context.section(SectionKind::Battery).clone()),
            json!({"level": 50, "charging": true})
        );
    }

    #[tokio::test]
    async fn no_collectors_yields_empty_sections() {
        let context = aggregate(&[]).await;
        assert_eq!(context, DeviceContext::empty());
    }

    #[tokio::test]
    async fn failing_collector_does_not_lose_other_data() {
        let collectors: Vec<Arc<dyn ContextCollector>> = vec![
            fixed("device", json!({"device": {"model": "Pixel"}})),
            Arc::new(FailingCollector),
            fixed("network", json!({"network": {"type": "wifi"}})),
        ];
        let context = aggregate(&collectors).await;
        assert_eq!(context.get("device.model"), Some(&json!("Pixel")));
        assert_eq!(context.get("network.type"), Some(&json!("wifi")));
    }

    #[tokio::test]
    async fn panicking_collector_is_isolated() {
        let collectors: Vec<Arc<dyn ContextCollector>> = vec![
            Arc::new(PanickingCollector),
            fixed("locale", json!({"locale": {"languageTag": "fr-FR"}})),
        ];
        let context = aggregate(&collectors).await;
        assert_eq!(context.get("locale.languageTag"), Some(&json!("fr-FR")));
        for kind in SectionKind::ALL {
            assert!(context.has_section(kind));
        }
    }

    #[tokio::test]
    async fn later_collectors_win_conflicts() {
        let collectors = vec![
            fixed("first", json!({"app": {"version": "1.0", "build": 1}})),
            fixed("second", json!({"app": {"version": "2.0"}})),
        ];
        let context = aggregate(&collectors).await;
        assert_eq!(context.get("app.version"), Some(&json!("2.0")));
        assert_eq!(context.get("app.build"), Some(&json!(1)));
    }

    struct RendezvousCollector {
        name: &'static str,
        barrier: Arc<Barrier>,
    }

    #[async_trait]
    impl ContextCollector for RendezvousCollector {
        fn name(&self) -> &str {
            self.name
        }

        fn platform(&self) -> Platform {
            Platform::Universal
        }

        async fn collect(&self) -> Result<PartialContext, BoxError> {
            // Only completes once every collector has started.
            self.barrier.wait().await;
            let mut section = Map::new();
            section.insert(self.name.to_string(), Value::Bool(true));
            Ok(Map::from_iter([("performance".to_string(), Value::Object(section))]))
        }
    }

    #[tokio::test]
    async fn collectors_run_concurrently() {
        let barrier = Arc::new(Barrier::new(2));
        let collectors: Vec<Arc<dyn ContextCollector>> = vec![
            Arc::new(RendezvousCollector {
                name: "a",
                barrier: Arc::clone(&barrier),
            }),
            Arc::new(RendezvousCollector {
                name: "b",
                barrier,
            }),
        ];
        let context = tokio::time::timeout(Duration::from_secs(5), aggregate(&collectors))
            .await
            .expect("collectors were run sequentially");
        assert_eq!(context.get("performance.a"), Some(&json!(true)));
        assert_eq!(context.get("performance.b"), Some(&json!(true)));
    }
}
