//! Person detector sensor.
//!
//! Each reading fetches one image from the configured camera, runs it through
//! the configured vision service and reports whether any detection is
//! labelled "person". Names are resolved against the dependency snapshot at
//! reading time, so a reconfigure can repoint the sensor without recreating it.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{Readings, Sensor};
use crate::error::{SensorError, SensorResult};
use crate::registry::{ComponentConfig, Model, ModelFamily, Registry, ResourceCreatorRegistration};
use crate::resource::{Capability, Dependencies};
use crate::vision::contains_person;
use crate::Extra;

pub const PERSON_DETECTED_KEY: &str = "person_detected";

const MODEL_NAMESPACE: &str = "huntervolkman";
const MODEL_FAMILY: &str = "person-detection-sensor";
const MODEL_NAME: &str = "person-detector";

const ATTR_VISION_SERVICE: &str = "vision_service";
const ATTR_CAMERA_NAME: &str = "camera_name";

/// Immutable configuration snapshot. Replaced wholesale on reconfigure.
#[derive(Debug)]
struct DetectorState {
    camera_name: String,
    vision_service_name: String,
    dependencies: Dependencies,
}

impl DetectorState {
    fn from_config(config: &ComponentConfig, dependencies: Dependencies) -> SensorResult<Self> {
        Ok(Self {
            vision_service_name: config.string_attribute(ATTR_VISION_SERVICE)?.to_string(),
            camera_name: config.string_attribute(ATTR_CAMERA_NAME)?.to_string(),
            dependencies,
        })
    }
}

pub struct PersonDetector {
    name: String,
    state: RwLock<Arc<DetectorState>>,
}

impl PersonDetector {
    pub fn model() -> Model {
        Model::new(ModelFamily::new(MODEL_NAMESPACE, MODEL_FAMILY), MODEL_NAME)
    }

    /// Register the person detector creator with a host registry.
    pub fn register(registry: &mut Registry) -> SensorResult<()> {
        registry.register(
            Self::model(),
            ResourceCreatorRegistration {
                validator: Self::validate_config,
                creator: create,
            },
        )
    }

    /// Check required attributes and return the dependency names to inject,
    /// vision service first.
    pub fn validate_config(config: &ComponentConfig) -> SensorResult<Vec<String>> {
        let vision_service = config.string_attribute(ATTR_VISION_SERVICE)?;
        let camera_name = config.string_attribute(ATTR_CAMERA_NAME)?;
        Ok(vec![vision_service.to_string(), camera_name.to_string()])
    }

    /// Build a sensor. Fails unless some injected dependency can run detections.
    pub fn new(config: &ComponentConfig, dependencies: Dependencies) -> SensorResult<Self> {
        if !dependencies.any_supports(Capability::Vision) {
            return Err(SensorError::MissingDependency(
                "vision service instance is required for PersonDetector".to_string(),
            ));
        }
        let state = DetectorState::from_config(config, dependencies)?;
        Ok(Self {
            name: config.name.clone(),
            state: RwLock::new(Arc::new(state)),
        })
    }

    /// Configured camera name.
    pub fn camera_name(&self) -> SensorResult<String> {
        Ok(self.snapshot()?.camera_name.clone())
    }

    /// Configured vision service name.
    pub fn vision_service_name(&self) -> SensorResult<String> {
        Ok(self.snapshot()?.vision_service_name.clone())
    }

    fn snapshot(&self) -> SensorResult<Arc<DetectorState>> {
        let guard = self.state.read().map_err(|_| SensorError::StatePoisoned)?;
        Ok(Arc::clone(&guard))
    }
}

fn create(config: &ComponentConfig, dependencies: Dependencies) -> SensorResult<Arc<dyn Sensor>> {
    Ok(Arc::new(PersonDetector::new(config, dependencies)?))
}

#[async_trait]
impl Sensor for PersonDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn reconfigure(
        &self,
        config: &ComponentConfig,
        dependencies: Dependencies,
    ) -> SensorResult<()> {
        let next = Arc::new(DetectorState::from_config(config, dependencies)?);
        let mut guard = self.state.write().map_err(|_| SensorError::StatePoisoned)?;
        *guard = next;
        Ok(())
    }

    async fn get_readings(
        &self,
        extra: Option<&Extra>,
        timeout: Option<Duration>,
    ) -> SensorResult<Readings> {
        let state = self.snapshot()?;

        let camera = state
            .dependencies
            .camera(&state.camera_name)
            .ok_or(SensorError::DependencyUnavailable("camera"))?;
        let vision = state
            .dependencies
            .vision(&state.vision_service_name)
            .ok_or(SensorError::DependencyUnavailable("vision_service"))?;
        let camera = camera
            .as_camera()
            .ok_or(SensorError::DependencyUnavailable("camera"))?;
        let vision = vision
            .as_vision()
            .ok_or(SensorError::DependencyUnavailable("vision_service"))?;

        let image = camera
            .get_image(extra, timeout)
            .await
            .map_err(SensorError::Camera)?
            .filter(|image| !image.is_empty())
            .ok_or(SensorError::ImageUnavailable)?;

        let detections = vision
            .get_detections(&image, extra, timeout)
            .await
            .map_err(SensorError::Vision)?;

        let person_detected = contains_person(&detections);
        log::info!("Person detected: {}", person_detected);

        let mut readings = Readings::new();
        readings.insert(
            PERSON_DETECTED_KEY.to_string(),
            Value::from(u8::from(person_detected)),
        );
        Ok(readings)
    }
}
