use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use super::{Detection, VisionService};
use crate::camera::Image;
use crate::resource::Resource;
use crate::Extra;

/// Stub vision service for testing. Returns the same scripted detections for
/// every image it is given.
pub struct StubVision {
    name: String,
    detections: Vec<Detection>,
    calls: AtomicU64,
}

impl StubVision {
    pub fn new(name: &str, detections: Vec<Detection>) -> Self {
        Self {
            name: name.to_string(),
            detections,
            calls: AtomicU64::new(0),
        }
    }

    /// Number of detection requests served so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl VisionService for StubVision {
    async fn get_detections(
        &self,
        _image: &Image,
        _extra: Option<&Extra>,
        _timeout: Option<Duration>,
    ) -> Result<Vec<Detection>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.detections.clone())
    }
}

impl Resource for StubVision {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_vision(&self) -> Option<&dyn VisionService> {
        Some(self)
    }
}
