use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::camera::{FileCamera, FileCameraConfig, StubCamera, StubCameraConfig};
use crate::registry::ComponentConfig;
use crate::resource::{Dependencies, ResourceName};
use crate::sensor::PersonDetector;
use crate::vision::{Detection, StubVision};

const DEFAULT_SENSOR_NAME: &str = "person-detector";
const DEFAULT_CAMERA_NAME: &str = "camera";
const DEFAULT_VISION_NAME: &str = "vision";
const DEFAULT_POLL_MS: u64 = 1000;
const DEFAULT_STUB_WIDTH: u32 = 640;
const DEFAULT_STUB_HEIGHT: u32 = 480;

#[derive(Debug, Deserialize, Default)]
struct ModuleConfigFile {
    sensor_name: Option<String>,
    camera_name: Option<String>,
    vision_service: Option<String>,
    poll_interval_ms: Option<u64>,
    camera: Option<CameraConfigFile>,
    vision: Option<VisionConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct CameraConfigFile {
    source: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    path: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct VisionConfigFile {
    detections: Option<Vec<Detection>>,
}

/// Where the runner's camera gets its images.
#[derive(Debug, Clone)]
pub enum CameraSource {
    Stub(StubCameraConfig),
    File(FileCameraConfig),
    /// No camera is injected at all.
    Disabled,
}

/// Standalone runner configuration.
#[derive(Debug, Clone)]
pub struct ModuleConfig {
    pub sensor_name: String,
    pub camera_name: String,
    pub vision_service: String,
    pub poll_interval: Duration,
    pub camera: CameraSource,
    /// Detections the built-in vision service reports for every image.
    pub detections: Vec<Detection>,
}

impl ModuleConfig {
    /// Load from the file named by `PERSON_DETECTOR_CONFIG`, if any.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("PERSON_DETECTOR_CONFIG").ok();
        Self::load_from(config_path.as_deref().map(Path::new))
    }

    /// Load from an explicit file (JSON, or TOML by extension), then apply env
    /// overrides and validate.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file_cfg = match path {
            Some(path) => Some(read_config_file(path)?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default())?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: ModuleConfigFile) -> Result<Self> {
        let camera_file = file.camera.unwrap_or_default();
        let camera = match camera_file.source.as_deref().unwrap_or("stub") {
            "stub" => CameraSource::Stub(StubCameraConfig {
                width: camera_file.width.unwrap_or(DEFAULT_STUB_WIDTH),
                height: camera_file.height.unwrap_or(DEFAULT_STUB_HEIGHT),
                produce_frames: true,
            }),
            "file" => CameraSource::File(FileCameraConfig {
                path: camera_file
                    .path
                    .ok_or_else(|| anyhow!("camera.path is required for a file camera"))?,
            }),
            "none" => CameraSource::Disabled,
            other => {
                return Err(anyhow!(
                    "camera.source must be one of stub, file, none (got {})",
                    other
                ))
            }
        };

        Ok(Self {
            sensor_name: file
                .sensor_name
                .unwrap_or_else(|| DEFAULT_SENSOR_NAME.to_string()),
            camera_name: file
                .camera_name
                .unwrap_or_else(|| DEFAULT_CAMERA_NAME.to_string()),
            vision_service: file
                .vision_service
                .unwrap_or_else(|| DEFAULT_VISION_NAME.to_string()),
            poll_interval: Duration::from_millis(
                file.poll_interval_ms.unwrap_or(DEFAULT_POLL_MS),
            ),
            camera,
            detections: file
                .vision
                .and_then(|vision| vision.detections)
                .unwrap_or_default(),
        })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(name) = std::env::var("PERSON_DETECTOR_CAMERA") {
            if !name.trim().is_empty() {
                self.camera_name = name;
            }
        }
        if let Ok(name) = std::env::var("PERSON_DETECTOR_VISION") {
            if !name.trim().is_empty() {
                self.vision_service = name;
            }
        }
        if let Ok(poll) = std::env::var("PERSON_DETECTOR_POLL_MS") {
            let millis: u64 = poll.parse().map_err(|_| {
                anyhow!("PERSON_DETECTOR_POLL_MS must be an integer number of milliseconds")
            })?;
            self.poll_interval = Duration::from_millis(millis);
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(anyhow!("poll interval must be greater than zero"));
        }
        if self.camera_name.trim().is_empty() || self.vision_service.trim().is_empty() {
            return Err(anyhow!("camera_name and vision_service must not be empty"));
        }
        if let CameraSource::Stub(stub) = &self.camera {
            if stub.width == 0 || stub.height == 0 {
                return Err(anyhow!("stub camera dimensions must be non-zero"));
            }
            stub.frame_len()?;
        }
        PersonDetector::validate_config(&self.component_config())?;
        Ok(())
    }

    /// Component config the runner hands to the registry.
    pub fn component_config(&self) -> ComponentConfig {
        ComponentConfig::new(&self.sensor_name, PersonDetector::model())
            .with_attribute("vision_service", self.vision_service.as_str())
            .with_attribute("camera_name", self.camera_name.as_str())
    }

    /// Build the built-in collaborators into a dependency map.
    pub fn dependencies(&self) -> Result<Dependencies> {
        let mut deps = Dependencies::new();
        match &self.camera {
            CameraSource::Stub(stub) => deps.insert(
                ResourceName::camera(&self.camera_name),
                Arc::new(StubCamera::with_config(&self.camera_name, stub.clone())),
            ),
            CameraSource::File(file) => deps.insert(
                ResourceName::camera(&self.camera_name),
                Arc::new(FileCamera::new(&self.camera_name, file.clone())?),
            ),
            CameraSource::Disabled => {}
        }
        deps.insert(
            ResourceName::vision(&self.vision_service),
            Arc::new(StubVision::new(&self.vision_service, self.detections.clone())),
        );
        Ok(deps)
    }
}

fn read_config_file(path: &Path) -> Result<ModuleConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg = if is_toml {
        toml::from_str(&raw).map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}
