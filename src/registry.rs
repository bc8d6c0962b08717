//! Model registry.
//!
//! The host knows resources only by model triple. A registration pairs the
//! config validator (which also reports the dependencies to inject) with the
//! constructor.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{SensorError, SensorResult};
use crate::resource::Dependencies;
use crate::sensor::Sensor;

/// Model family: `namespace:family`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelFamily {
    pub namespace: String,
    pub family: String,
}

impl ModelFamily {
    pub fn new(namespace: &str, family: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            family: family.to_string(),
        }
    }
}

/// Model triple: `namespace:family:name`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Model {
    pub family: ModelFamily,
    pub name: String,
}

impl Model {
    pub fn new(family: ModelFamily, name: &str) -> Self {
        Self {
            family,
            name: name.to_string(),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.family.namespace, self.family.family, self.name
        )
    }
}

impl FromStr for Model {
    type Err = SensorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [namespace, family, name]
                if !namespace.is_empty() && !family.is_empty() && !name.is_empty() =>
            {
                Ok(Model::new(ModelFamily::new(namespace, family), name))
            }
            _ => Err(SensorError::InvalidConfig {
                key: "model",
                reason: format!("must be namespace:family:name, got {:?}", s),
            }),
        }
    }
}

impl TryFrom<String> for Model {
    type Error = SensorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Model> for String {
    fn from(model: Model) -> Self {
        model.to_string()
    }
}

/// Configuration the host hands to a resource.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfig {
    pub name: String,
    pub model: Model,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl ComponentConfig {
    pub fn new(name: &str, model: Model) -> Self {
        Self {
            name: name.to_string(),
            model,
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    /// Fetch a required string attribute.
    pub fn string_attribute(&self, key: &'static str) -> SensorResult<&str> {
        match self.attributes.get(key) {
            None => Err(SensorError::missing_attr(key)),
            Some(Value::String(value)) => Ok(value),
            Some(other) => Err(SensorError::InvalidConfig {
                key,
                reason: format!("must be a string, got {}", other),
            }),
        }
    }
}

/// Validates a config and returns the names of the dependencies to inject.
pub type Validator = fn(&ComponentConfig) -> SensorResult<Vec<String>>;

/// Builds a resource from a validated config and its injected dependencies.
pub type Creator = fn(&ComponentConfig, Dependencies) -> SensorResult<Arc<dyn Sensor>>;

#[derive(Clone, Copy)]
pub struct ResourceCreatorRegistration {
    pub validator: Validator,
    pub creator: Creator,
}

/// Registry of resource creators keyed by model.
#[derive(Default)]
pub struct Registry {
    creators: HashMap<Model, ResourceCreatorRegistration>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a creator. Each model may be registered once.
    pub fn register(
        &mut self,
        model: Model,
        registration: ResourceCreatorRegistration,
    ) -> SensorResult<()> {
        if self.creators.contains_key(&model) {
            return Err(SensorError::DuplicateModel(model.to_string()));
        }
        log::debug!("registered model {}", model);
        self.creators.insert(model, registration);
        Ok(())
    }

    pub fn lookup(&self, model: &Model) -> SensorResult<ResourceCreatorRegistration> {
        self.creators
            .get(model)
            .copied()
            .ok_or_else(|| SensorError::UnknownModel(model.to_string()))
    }

    /// List registered models.
    pub fn models(&self) -> Vec<Model> {
        self.creators.keys().cloned().collect()
    }
}
