// SPDX-License-Identifier: MPL-2.0
//! Collectors shipped with the SDK.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use sysinfo::System;

use crate::config::AppConfig;
use crate::console::ConsoleHandle;
use crate::error::BoxError;
use crate::plugins::{ContextCollector, Platform};

use super::PartialContext;

const UNKNOWN: &str = "unknown";

/// Collector returning a fixed partial, e.g. values the host already knows.
#[derive(Debug, Clone)]
pub struct StaticCollector {
    name: String,
    partial: PartialContext,
}

impl StaticCollector {
    pub fn new(name: impl Into<String>, partial: PartialContext) -> Self {
        Self {
            name: name.into(),
            partial,
        }
    }
}

#[async_trait]
impl ContextCollector for StaticCollector {
    fn name(&self) -> &str {
        &self.name
    }

    fn platform(&self) -> Platform {
        Platform::Universal
    }

    async fn collect(&self) -> Result<PartialContext, BoxError> {
        Ok(self.partial.clone())
    }
}

/// Host system facts: `platform`, `device`, `locale` and `app` sections.
///
/// Collection runs on the Tokio blocking thread pool, so it panics outside a
/// Tokio runtime (the aggregator then logs and skips it).
/// [`SystemCollector::collect_blocking`] gathers the same facts synchronously.
#[derive(Debug, Clone, Default)]
pub struct SystemCollector {
    app: AppConfig,
}

impl SystemCollector {
    #[must_use]
    pub fn new(app: AppConfig) -> Self {
        Self { app }
    }

    /// Gathers the facts on the calling thread.
    #[must_use]
    pub fn collect_blocking(&self) -> PartialContext {
        Self::snapshot(&self.app)
    }

    fn snapshot(app: &AppConfig) -> PartialContext {
        let sys = System::new_all();

        let cpu_brand = sys
            .cpus()
            .first()
            .map_or_else(|| UNKNOWN.to_string(), |cpu| cpu.brand().trim().to_string());

        let mut partial = Map::new();
        partial.insert(
            "platform".into(),
            json!({
                "os": std::env::consts::OS,
                "osName": System::name().unwrap_or_else(|| UNKNOWN.to_string()),
                "osVersion": System::os_version().unwrap_or_else(|| UNKNOWN.to_string()),
                "kernelVersion": System::kernel_version().unwrap_or_else(|| UNKNOWN.to_string()),
                "arch": std::env::consts::ARCH,
            }),
        );
        partial.insert(
            "device".into(),
            json!({
                "cpuBrand": cpu_brand,
                "cpuCores": sys.cpus().len(),
                "totalMemoryMb": sys.total_memory() / (1024 * 1024),
            }),
        );
        partial.insert("locale".into(), locale_section());
        partial.insert("app".into(), app_section(app));
        partial
    }
}

fn locale_section() -> Value {
    let languages: Vec<String> = sys_locale::get_locales().collect();
    let mut section = Map::new();
    if let Some(tag) = sys_locale::get_locale() {
        section.insert("languageTag".into(), Value::String(tag));
    }
    section.insert("languages".into(), json!(languages));
    Value::Object(section)
}

fn app_section(app: &AppConfig) -> Value {
    let mut section = Map::new();
    section.insert("name".into(), Value::String(app.name.clone()));
    if let Some(version) = &app.version {
        section.insert("version".into(), Value::String(version.clone()));
    }
    Value::Object(section)
}

#[async_trait]
impl ContextCollector for SystemCollector {
    fn name(&self) -> &str {
        "system"
    }

    fn platform(&self) -> Platform {
        Platform::Native
    }

    async fn collect(&self) -> Result<PartialContext, BoxError> {
        // Refreshing every sysinfo category blocks for a while.
        let app = self.app.clone();
        let partial = tokio::task::spawn_blocking(move || Self::snapshot(&app)).await?;
        Ok(partial)
    }
}

/// Exposes the entries of a [`ConsoleInterceptor`](crate::console::ConsoleInterceptor)
/// as the `console` section.
#[derive(Debug, Clone)]
pub struct ConsoleCollector {
    handle: ConsoleHandle,
}

impl ConsoleCollector {
    #[must_use]
    pub fn new(handle: ConsoleHandle) -> Self {
        Self { handle }
    }
}

#[async_trait]
impl ContextCollector for ConsoleCollector {
    fn name(&self) -> &str {
        "console"
    }

    fn platform(&self) -> Platform {
        Platform::Universal
    }

    async fn collect(&self) -> Result<PartialContext, BoxError> {
        let entries = serde_json::to_value(self.handle.entries())?;
        let mut partial = Map::new();
        partial.insert("console".into(), entries);
        Ok(partial)
    }
}
