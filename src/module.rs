//! Host-side resource lifecycle.
//!
//! `SensorModule` drives registered models the way a robot host does:
//! validate, then construct, then any number of reconfigures, then removal.
//! Readings may run concurrently with any lifecycle call.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{SensorError, SensorResult};
use crate::registry::{ComponentConfig, Registry};
use crate::resource::Dependencies;
use crate::sensor::{Readings, Sensor};
use crate::Extra;

pub struct SensorModule {
    registry: Registry,
    resources: RwLock<HashMap<String, Arc<dyn Sensor>>>,
}

impl SensorModule {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            resources: RwLock::new(HashMap::new()),
        }
    }

    /// Validate a config against its model. Returns the dependency names the
    /// host must resolve before `add_resource` / `reconfigure_resource`.
    pub fn validate_config(&self, config: &ComponentConfig) -> SensorResult<Vec<String>> {
        let registration = self.registry.lookup(&config.model)?;
        (registration.validator)(config)
    }

    /// Validate and construct a new resource.
    pub fn add_resource(
        &self,
        config: &ComponentConfig,
        dependencies: Dependencies,
    ) -> SensorResult<()> {
        let registration = self.registry.lookup(&config.model)?;
        let names = (registration.validator)(config)?;
        if self.get(&config.name).is_ok() {
            return Err(SensorError::DuplicateResource(config.name.clone()));
        }

        let sensor = (registration.creator)(config, dependencies)?;
        let mut resources = self
            .resources
            .write()
            .map_err(|_| SensorError::StatePoisoned)?;
        if resources.contains_key(&config.name) {
            return Err(SensorError::DuplicateResource(config.name.clone()));
        }
        resources.insert(config.name.clone(), sensor);
        log::info!(
            "added {} ({}) depending on {:?}",
            config.name,
            config.model,
            names
        );
        Ok(())
    }

    /// Validate and apply a new config to an existing resource.
    pub fn reconfigure_resource(
        &self,
        config: &ComponentConfig,
        dependencies: Dependencies,
    ) -> SensorResult<()> {
        let registration = self.registry.lookup(&config.model)?;
        (registration.validator)(config)?;
        let sensor = self.get(&config.name)?;
        sensor.reconfigure(config, dependencies)?;
        log::info!("reconfigured {}", config.name);
        Ok(())
    }

    pub fn remove_resource(&self, name: &str) -> SensorResult<()> {
        let mut resources = self
            .resources
            .write()
            .map_err(|_| SensorError::StatePoisoned)?;
        resources
            .remove(name)
            .map(|_| log::info!("removed {}", name))
            .ok_or_else(|| SensorError::UnknownResource(name.to_string()))
    }

    pub async fn get_readings(
        &self,
        name: &str,
        extra: Option<&Extra>,
        timeout: Option<Duration>,
    ) -> SensorResult<Readings> {
        let sensor = self.get(name)?;
        sensor.get_readings(extra, timeout).await
    }

    /// Poll a resource every `interval` until `shutdown` resolves. Failed
    /// readings are logged and polling continues. Returns the number of
    /// successful readings.
    ///
    /// `shutdown` is polled first on every pass, so a signal that lands while a
    /// reading is in flight ends the loop as soon as that reading returns.
    pub async fn poll_readings<F>(&self, name: &str, interval: Duration, shutdown: F) -> u64
    where
        F: Future,
    {
        let mut ticker = tokio::time::interval(interval);
        let mut reading_count = 0u64;
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    log::info!("{}: shutting down after {} readings", name, reading_count);
                    return reading_count;
                }
                _ = ticker.tick() => {
                    match self.get_readings(name, None, None).await {
                        Ok(readings) => {
                            reading_count += 1;
                            log::debug!("{}: reading #{}: {:?}", name, reading_count, readings);
                        }
                        Err(e) => log::warn!("{}: reading failed: {}", name, e),
                    }
                }
            }
        }
    }

    /// Names of live resources, sorted.
    pub fn resource_names(&self) -> SensorResult<Vec<String>> {
        let resources = self
            .resources
            .read()
            .map_err(|_| SensorError::StatePoisoned)?;
        let mut names: Vec<_> = resources.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn get(&self, name: &str) -> SensorResult<Arc<dyn Sensor>> {
        let resources = self
            .resources
            .read()
            .map_err(|_| SensorError::StatePoisoned)?;
        resources
            .get(name)
            .cloned()
            .ok_or_else(|| SensorError::UnknownResource(name.to_string()))
    }
}
