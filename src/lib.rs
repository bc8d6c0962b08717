//! Person detection sensor
//!
//! A sensor resource for a robot host. Each reading pulls one image from an
//! injected camera, asks an injected vision service for detections and reports
//! `{"person_detected": 0 | 1}`.
//!
//! # Architecture
//!
//! The sensor owns no hardware and runs no inference:
//!
//! 1. **Capability injection**: dependencies arrive as `Resource` handles and
//!    are matched by capability (`Camera`, `VisionService`), never by concrete type.
//! 2. **Lazy resolution**: camera and vision names are resolved against the
//!    current dependency snapshot on every reading.
//! 3. **Atomic reconfigure**: names and dependencies are swapped as one
//!    immutable snapshot, so concurrent readings never see a mixed state.
//!
//! # Module Structure
//!
//! - `sensor`: the `Sensor` trait and `PersonDetector`
//! - `camera`, `vision`: capability traits and built-in stub collaborators
//! - `resource`: resource names and the dependency map
//! - `registry`: model triples, component config, creator registry
//! - `module`: host-side lifecycle (validate, add, reconfigure, remove, read)
//! - `config`: standalone runner configuration

pub mod camera;
pub mod config;
pub mod error;
pub mod module;
pub mod registry;
pub mod resource;
pub mod sensor;
pub mod vision;

/// Free-form request metadata passed through to collaborators.
pub type Extra = serde_json::Map<String, serde_json::Value>;

pub use camera::{Camera, FileCamera, FileCameraConfig, Image, StubCamera, StubCameraConfig};
pub use config::{CameraSource, ModuleConfig};
pub use error::{SensorError, SensorResult};
pub use module::SensorModule;
pub use registry::{ComponentConfig, Model, ModelFamily, Registry, ResourceCreatorRegistration};
pub use resource::{Capability, Dependencies, Resource, ResourceName};
pub use sensor::{PersonDetector, Readings, Sensor, PERSON_DETECTED_KEY};
pub use vision::{contains_person, Detection, StubVision, VisionService};

/// Registry with every model this crate provides.
pub fn builtin_registry() -> SensorResult<Registry> {
    let mut registry = Registry::new();
    PersonDetector::register(&mut registry)?;
    Ok(registry)
}
