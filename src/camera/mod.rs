//! Camera capability.
//!
//! The sensor never talks to camera hardware. It asks an injected `Camera`
//! for one encoded image per reading and hands it on untouched.
//!
//! Built-in cameras exist so the module can run standalone:
//! - `StubCamera`: synthetic RGB frames (testing)
//! - `FileCamera`: a local image file re-read on every request

mod file;
mod stub;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::Extra;

pub use file::{FileCamera, FileCameraConfig};
pub use stub::{StubCamera, StubCameraConfig};

/// MIME type used for raw interleaved RGB frames.
pub const MIME_RAW_RGB: &str = "image/x-raw-rgb";

/// One encoded image returned by a camera.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub mime_type: String,
    pub data: Vec<u8>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Image {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
            width: None,
            height: None,
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// An image without any bytes counts as no image at all.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Camera capability trait.
///
/// `timeout` is advisory; implementations decide whether to honour it.
#[async_trait]
pub trait Camera: Send + Sync {
    /// Fetch one image. `Ok(None)` means the camera had nothing to return.
    async fn get_image(
        &self,
        extra: Option<&Extra>,
        timeout: Option<Duration>,
    ) -> Result<Option<Image>>;
}
