//! Sensor resources.

mod person_detector;

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SensorResult;
use crate::registry::ComponentConfig;
use crate::resource::Dependencies;
use crate::Extra;

pub use person_detector::{PersonDetector, PERSON_DETECTED_KEY};

/// A sensor reading: key to value.
pub type Readings = BTreeMap<String, Value>;

/// Sensor resource trait.
///
/// `reconfigure` and `get_readings` may be called concurrently; implementations
/// must never expose a half-applied configuration to a reading.
#[async_trait]
pub trait Sensor: Send + Sync {
    /// Name the resource was configured with.
    fn name(&self) -> &str;

    /// Replace configuration and dependencies in place.
    fn reconfigure(&self, config: &ComponentConfig, dependencies: Dependencies)
        -> SensorResult<()>;

    /// Take one reading. `timeout` is passed through to collaborators.
    async fn get_readings(
        &self,
        extra: Option<&Extra>,
        timeout: Option<Duration>,
    ) -> SensorResult<Readings>;
}
