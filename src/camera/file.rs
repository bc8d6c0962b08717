//! Local file camera.
//!
//! Serves a still image from the local filesystem. The file is re-read on
//! every request so it can be swapped while the module runs. Remote URLs are
//! rejected.

use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use image::ImageReader;

use super::{Camera, Image};
use crate::resource::Resource;
use crate::Extra;

/// Configuration for a local file camera.
#[derive(Clone, Debug, Default)]
pub struct FileCameraConfig {
    /// Local file path (e.g., "/var/lib/person-detector/frame.jpg").
    pub path: String,
}

/// Camera backed by an image file on disk.
pub struct FileCamera {
    name: String,
    path: PathBuf,
}

impl FileCamera {
    pub fn new(name: &str, config: FileCameraConfig) -> Result<Self> {
        if !is_local_file_path(&config.path) {
            return Err(anyhow!(
                "file camera only supports local paths (no URL schemes)"
            ));
        }
        Ok(Self {
            name: name.to_string(),
            path: PathBuf::from(config.path),
        })
    }
}

#[async_trait]
impl Camera for FileCamera {
    async fn get_image(
        &self,
        _extra: Option<&Extra>,
        _timeout: Option<Duration>,
    ) -> Result<Option<Image>> {
        let data = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("failed to read image file {}", self.path.display()))?;
        if data.is_empty() {
            return Ok(None);
        }

        let reader = ImageReader::new(Cursor::new(data.as_slice()))
            .with_guessed_format()
            .context("failed to probe image format")?;
        let format = reader
            .format()
            .ok_or_else(|| anyhow!("unrecognised image format in {}", self.path.display()))?;
        let (width, height) = reader
            .into_dimensions()
            .with_context(|| format!("invalid image file {}", self.path.display()))?;

        Ok(Some(
            Image::new(format.to_mime_type(), data).with_dimensions(width, height),
        ))
    }
}

impl Resource for FileCamera {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_camera(&self) -> Option<&dyn Camera> {
        Some(self)
    }
}

fn is_local_file_path(path: &str) -> bool {
    !path.trim().is_empty() && !path.contains("://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use image::{ImageFormat, RgbImage};
    use tempfile::NamedTempFile;

    fn config(path: &str) -> FileCameraConfig {
        FileCameraConfig {
            path: path.to_string(),
        }
    }

    #[test]
    fn file_camera_rejects_urls() {
        assert!(FileCamera::new("cam", config("http://camera/frame.jpg")).is_err());
        assert!(FileCamera::new("cam", config("  ")).is_err());
        assert!(FileCamera::new("cam", config("/tmp/frame.png")).is_ok());
    }

    #[tokio::test]
    async fn file_camera_reads_png_dimensions() -> Result<()> {
        let file = tempfile::Builder::new().suffix(".png").tempfile()?;
        RgbImage::new(3, 5).save_with_format(file.path(), ImageFormat::Png)?;

        let camera = FileCamera::new("cam", config(&file.path().display().to_string()))?;
        let image = camera.get_image(None, None).await?.expect("image");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.width, Some(3));
        assert_eq!(image.height, Some(5));
        assert!(!image.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn empty_file_is_no_image() -> Result<()> {
        let file = NamedTempFile::new()?;
        let camera = FileCamera::new("cam", config(&file.path().display().to_string()))?;
        assert!(camera.get_image(None, None).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn garbage_file_is_an_error() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b"definitely not an image")?;
        let camera = FileCamera::new("cam", config(&file.path().display().to_string()))?;
        assert!(camera.get_image(None, None).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_an_error() -> Result<()> {
        let camera = FileCamera::new("cam", config("/nonexistent/person-detector/frame.jpg"))?;
        assert!(camera.get_image(None, None).await.is_err());
        Ok(())
    }
}
