use thiserror::Error;

/// Errors surfaced by the sensor, the registry and the module host.
#[derive(Error, Debug)]
pub enum SensorError {
    #[error("invalid config: {key} {reason}")]
    InvalidConfig { key: &'static str, reason: String },

    #[error("missing dependency: {0}")]
    MissingDependency(String),

    #[error("{0} is not available")]
    DependencyUnavailable(&'static str),

    #[error("failed to get image from camera")]
    ImageUnavailable,

    #[error("camera error: {0}")]
    Camera(#[source] anyhow::Error),

    #[error("vision service error: {0}")]
    Vision(#[source] anyhow::Error),

    #[error("no creator registered for model {0}")]
    UnknownModel(String),

    #[error("model {0} is already registered")]
    DuplicateModel(String),

    #[error("resource {0} not found")]
    UnknownResource(String),

    #[error("resource {0} already exists")]
    DuplicateResource(String),

    #[error("sensor state lock poisoned")]
    StatePoisoned,
}

impl SensorError {
    pub(crate) fn missing_attr(key: &'static str) -> Self {
        Self::InvalidConfig {
            key,
            reason: "attribute is required".to_string(),
        }
    }
}

pub type SensorResult<T> = Result<T, SensorError>;
