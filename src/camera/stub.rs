use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::{Camera, Image, MIME_RAW_RGB};
use crate::resource::Resource;
use crate::Extra;

/// Configuration for a synthetic camera.
#[derive(Clone, Debug)]
pub struct StubCameraConfig {
    pub width: u32,
    pub height: u32,
    /// When false the camera answers every request with no image.
    pub produce_frames: bool,
}

impl Default for StubCameraConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            produce_frames: true,
        }
    }
}

/// Largest synthetic frame the stub camera will allocate, in bytes.
pub const MAX_STUB_FRAME_BYTES: usize = 64 * 1024 * 1024;

impl StubCameraConfig {
    /// Size of one RGB frame. Fails on overflow or above `MAX_STUB_FRAME_BYTES`.
    pub fn frame_len(&self) -> Result<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|pixels| pixels.checked_mul(3))
            .filter(|len| *len <= MAX_STUB_FRAME_BYTES)
            .ok_or_else(|| {
                anyhow!(
                    "stub camera frame {}x{} exceeds {} bytes",
                    self.width,
                    self.height,
                    MAX_STUB_FRAME_BYTES
                )
            })
    }
}

/// Synthetic camera producing a shifting RGB pattern.
pub struct StubCamera {
    name: String,
    config: StubCameraConfig,
    frame_count: AtomicU64,
}

impl StubCamera {
    pub fn new(name: &str) -> Self {
        Self::with_config(name, StubCameraConfig::default())
    }

    pub fn with_config(name: &str, config: StubCameraConfig) -> Self {
        Self {
            name: name.to_string(),
            config,
            frame_count: AtomicU64::new(0),
        }
    }

    /// A camera that is reachable but never has an image.
    pub fn without_frames(name: &str) -> Self {
        Self::with_config(
            name,
            StubCameraConfig {
                produce_frames: false,
                ..StubCameraConfig::default()
            },
        )
    }

    pub fn frames_captured(&self) -> u64 {
        self.frame_count.load(Ordering::Relaxed)
    }

    fn generate_synthetic_pixels(&self, len: usize, frame: u64) -> Vec<u8> {
        let mut pixels = vec![0u8; len];
        for (i, pixel) in pixels.iter_mut().enumerate() {
            *pixel = ((i as u64 + frame) % 256) as u8;
        }
        pixels
    }
}

#[async_trait]
impl Camera for StubCamera {
    async fn get_image(
        &self,
        _extra: Option<&Extra>,
        _timeout: Option<Duration>,
    ) -> Result<Option<Image>> {
        if !self.config.produce_frames {
            return Ok(None);
        }
        let len = self.config.frame_len()?;
        let frame = self.frame_count.fetch_add(1, Ordering::Relaxed) + 1;
        let pixels = self.generate_synthetic_pixels(len, frame);
        Ok(Some(
            Image::new(MIME_RAW_RGB, pixels).with_dimensions(self.config.width, self.config.height),
        ))
    }
}

impl Resource for StubCamera {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_camera(&self) -> Option<&dyn Camera> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Capability;

    #[tokio::test]
    async fn stub_camera_produces_frames() -> Result<()> {
        let camera = StubCamera::with_config(
            "cam",
            StubCameraConfig {
                width: 4,
                height: 2,
                produce_frames: true,
            },
        );

        let image = camera.get_image(None, None).await?.expect("image");
        assert_eq!(image.mime_type, MIME_RAW_RGB);
        assert_eq!(image.data.len(), 4 * 2 * 3);
        assert_eq!(image.width, Some(4));
        assert_eq!(image.height, Some(2));

        let next = camera.get_image(None, None).await?.expect("image");
        assert_ne!(image.data, next.data);
        assert_eq!(camera.frames_captured(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn stub_camera_without_frames_returns_none() -> Result<()> {
        let camera = StubCamera::without_frames("cam");
        assert!(camera.get_image(None, None).await?.is_none());
        assert_eq!(camera.frames_captured(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn oversized_frames_are_an_error() {
        let camera = StubCamera::with_config(
            "cam",
            StubCameraConfig {
                width: u32::MAX,
                height: u32::MAX,
                produce_frames: true,
            },
        );
        assert!(camera.get_image(None, None).await.is_err());
        assert_eq!(camera.frames_captured(), 0);

        let too_big = StubCameraConfig {
            width: 8192,
            height: 8192,
            produce_frames: true,
        };
        assert!(too_big.frame_len().is_err());
        assert_eq!(StubCameraConfig::default().frame_len().unwrap(), 640 * 480 * 3);
    }

    #[test]
    fn stub_camera_is_only_a_camera() {
        let camera = StubCamera::new("cam");
        assert!(camera.supports(Capability::Camera));
        assert!(!camera.supports(Capability::Vision));
        assert_eq!(camera.name(), "cam");
    }
}
