// SPDX-License-Identifier: MPL-2.0
//! Test plugins and image helpers shared by unit tests.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image_rs::{ImageFormat, Rgba, RgbaImage};

use crate::context::PartialContext;
use crate::error::BoxError;
use crate::plugins::{
    CapturePlugin, ContextCollector, DestinationAdapter, Platform, TriggerCallback, TriggerPlugin,
};
use crate::report::{BugReport, CaptureResult, Dimensions, SubmitResult};

// =============================================================================
// Triggers
// =============================================================================

#[derive(Clone, Copy)]
enum Behavior {
    Succeed,
    Fail,
    Panic,
}

#[derive(Default)]
struct TriggerState {
    active: AtomicBool,
    callback: Mutex<Option<TriggerCallback>>,
}

/// Trigger whose activation can be observed through a [`TriggerMonitor`].
pub struct CountingTrigger {
    name: String,
    behavior: Behavior,
    state: Arc<TriggerState>,
}

impl CountingTrigger {
    pub fn new(name: &str) -> Self {
        Self::with_behavior(name, Behavior::Succeed)
    }

    /// Returns an error from both lifecycle calls.
    pub fn failing(name: &str) -> Self {
        Self::with_behavior(name, Behavior::Fail)
    }

    /// Panics in both lifecycle calls.
    pub fn panicking(name: &str) -> Self {
        Self::with_behavior(name, Behavior::Panic)
    }

    fn with_behavior(name: &str, behavior: Behavior) -> Self {
        Self {
            name: name.to_string(),
            behavior,
            state: Arc::default(),
        }
    }

    pub fn monitor(&self) -> TriggerMonitor {
        TriggerMonitor(Arc::clone(&self.state))
    }

    fn check(&self) -> Result<(), BoxError> {
        match self.behavior {
            Behavior::Succeed => Ok(()),
            Behavior::Fail => Err(format!("{} is broken", self.name).into()),
            Behavior::Panic => panic!("{} exploded", self.name),
        }
    }
}

impl TriggerPlugin for CountingTrigger {
    fn name(&self) -> &str {
        &self.name
    }

    fn platform(&self) -> Platform {
        Platform::Universal
    }

    fn activate(&mut self, on_trigger: TriggerCallback) -> Result<(), BoxError> {
        self.check()?;
        *self.state.callback.lock().unwrap() = Some(on_trigger);
        self.state.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn deactivate(&mut self) -> Result<(), BoxError> {
        self.check()?;
        self.state.callback.lock().unwrap().take();
        self.state.active.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// Observes and drives a [`CountingTrigger`] after it moved into a registry.
pub struct TriggerMonitor(Arc<TriggerState>);

impl TriggerMonitor {
    /// Simulates the user gesture.
    pub fn fire(&self) {
        let callback = self.0.callback.lock().unwrap().clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    pub fn is_active(&self) -> bool {
        self.0.active.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Captures
// =============================================================================

/// Capture plugin returning a fixed payload and counting invocations.
pub struct FixedCapture {
    name: String,
    result: CaptureResult,
    calls: AtomicUsize,
}

impl FixedCapture {
    /// Captures the placeholder image `"abc"`.
    pub fn new(name: &str, dimensions: Dimensions) -> Self {
        Self {
            name: name.to_string(),
            result: CaptureResult {
                image_data: "abc".to_string(),
                dimensions,
                mime_type: "image/png".to_string(),
            },
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CapturePlugin for FixedCapture {
    fn name(&self) -> &str {
        &self.name
    }

    fn platform(&self) -> Platform {
        Platform::Universal
    }

    async fn capture(&self) -> Result<CaptureResult, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.clone())
    }
}

/// Capture plugin that always fails with the given error factory.
pub struct FailingCapture(pub fn() -> BoxError);

#[async_trait]
impl CapturePlugin for FailingCapture {
    fn name(&self) -> &str {
        "failing-capture"
    }

    fn platform(&self) -> Platform {
        Platform::Universal
    }

    async fn capture(&self) -> Result<CaptureResult, BoxError> {
        Err((self.0)())
    }
}

// =============================================================================
// Collectors
// =============================================================================

/// Collector that returns an error.
pub struct FailingCollector;

#[async_trait]
impl ContextCollector for FailingCollector {
    fn name(&self) -> &str {
        "failing"
    }

    fn platform(&self) -> Platform {
        Platform::Universal
    }

    async fn collect(&self) -> Result<PartialContext, BoxError> {
        Err("battery API unavailable".into())
    }
}

/// Collector that panics while collecting.
pub struct PanickingCollector;

#[async_trait]
impl ContextCollector for PanickingCollector {
    fn name(&self) -> &str {
        "panicking"
    }

    fn platform(&self) -> Platform {
        Platform::Universal
    }

    async fn collect(&self) -> Result<PartialContext, BoxError> {
        panic!("collector bug")
    }
}

// =============================================================================
// Destinations
// =============================================================================

/// Destination answering every issue with the same id.
pub struct StaticDestination {
    name: String,
    issue_id: String,
}

impl StaticDestination {
    pub fn new(name: &str, issue_id: &str) -> Self {
        Self {
            name: name.to_string(),
            issue_id: issue_id.to_string(),
        }
    }
}

#[async_trait]
impl DestinationAdapter for StaticDestination {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upload_image(&self, _image: &[u8], _filename: &str) -> Result<String, BoxError> {
        Ok(String::new())
    }

    async fn create_issue(&self, _report: &BugReport) -> Result<SubmitResult, BoxError> {
        Ok(SubmitResult {
            id: self.issue_id.clone(),
            url: format!("https://issues.example/{}", self.issue_id),
            success: true,
        })
    }

    async fn test_connection(&self) -> bool {
        true
    }
}

// =============================================================================
// Images
// =============================================================================

/// Encodes `image` as PNG.
pub fn encode_png(image: &RgbaImage) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("encode test png");
    bytes.into_inner()
}

/// Base64 PNG of a `width` x `height` image filled with `color`.
pub fn solid_png_base64(width: u32, height: u32, color: [u8; 4]) -> String {
    STANDARD.encode(encode_png(&RgbaImage::from_pixel(width, height, Rgba(color))))
}

/// Decodes PNG bytes back into RGBA pixels.
pub fn decode_png(bytes: &[u8]) -> RgbaImage {
    image_rs::load_from_memory_with_format(bytes, ImageFormat::Png)
        .expect("decode test png")
        .to_rgba8()
}
