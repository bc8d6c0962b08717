//! Resource naming and the dependency map.
//!
//! The host injects dependencies by capability, not by declared type. Every
//! injected handle implements `Resource` and exposes the capabilities it
//! actually has through `as_camera` / `as_vision`. Callers never downcast to
//! concrete types.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::camera::Camera;
use crate::vision::VisionService;

pub const RDK_NAMESPACE: &str = "rdk";
pub const COMPONENT_TYPE: &str = "component";
pub const SERVICE_TYPE: &str = "service";

/// Capabilities a dependency may expose.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    Camera,
    Vision,
}

/// Fully qualified resource identifier: `(namespace, type, subtype, name)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceName {
    pub namespace: String,
    pub resource_type: String,
    pub subtype: String,
    pub name: String,
}

impl ResourceName {
    pub fn new(namespace: &str, resource_type: &str, subtype: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            resource_type: resource_type.to_string(),
            subtype: subtype.to_string(),
            name: name.to_string(),
        }
    }

    pub fn camera(name: &str) -> Self {
        Self::new(RDK_NAMESPACE, COMPONENT_TYPE, "camera", name)
    }

    pub fn vision(name: &str) -> Self {
        Self::new(RDK_NAMESPACE, SERVICE_TYPE, "vision", name)
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}/{}",
            self.namespace, self.resource_type, self.subtype, self.name
        )
    }
}

/// A live handle the host can inject as a dependency.
pub trait Resource: Send + Sync {
    /// Short name the resource was configured with.
    fn name(&self) -> &str;

    /// Camera view of this resource, if it is one.
    fn as_camera(&self) -> Option<&dyn Camera> {
        None
    }

    /// Vision-detection view of this resource, if it is one.
    fn as_vision(&self) -> Option<&dyn VisionService> {
        None
    }

    /// Returns true when the resource exposes a capability.
    fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Camera => self.as_camera().is_some(),
            Capability::Vision => self.as_vision().is_some(),
        }
    }
}

/// Snapshot of the dependencies handed to a resource by the host.
///
/// Cloning is cheap: handles are reference counted.
#[derive(Clone, Default)]
pub struct Dependencies {
    resources: HashMap<ResourceName, Arc<dyn Resource>>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a dependency, replacing any handle with the same name.
    pub fn insert(&mut self, name: ResourceName, resource: Arc<dyn Resource>) {
        self.resources.insert(name, resource);
    }

    /// Builder form of `insert`.
    pub fn with(mut self, name: ResourceName, resource: Arc<dyn Resource>) -> Self {
        self.insert(name, resource);
        self
    }

    pub fn get(&self, name: &ResourceName) -> Option<Arc<dyn Resource>> {
        self.resources.get(name).cloned()
    }

    /// Resolve a camera by short name. Handles without the camera capability
    /// are treated as absent.
    pub fn camera(&self, name: &str) -> Option<Arc<dyn Resource>> {
        self.get(&ResourceName::camera(name))
            .filter(|res| res.supports(Capability::Camera))
    }

    /// Resolve a vision service by short name.
    pub fn vision(&self, name: &str) -> Option<Arc<dyn Resource>> {
        self.get(&ResourceName::vision(name))
            .filter(|res| res.supports(Capability::Vision))
    }

    /// Returns true when any dependency exposes the capability.
    pub fn any_supports(&self, capability: Capability) -> bool {
        self.resources.values().any(|res| res.supports(capability))
    }

    /// List dependency names, sorted.
    pub fn names(&self) -> Vec<ResourceName> {
        let mut names: Vec<_> = self.resources.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl fmt::Debug for Dependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.names().iter().map(|name| name.to_string()))
            .finish()
    }
}
