//! person_detector - standalone person detection sensor runner
//!
//! This binary:
//! 1. Loads the module config (file + env overrides)
//! 2. Builds the configured camera and vision service into a dependency map
//! 3. Validates and constructs the sensor through the model registry
//! 4. Polls readings on a fixed interval until interrupted

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;

use person_detection_sensor::{builtin_registry, ModuleConfig, SensorModule};

#[derive(Parser, Debug)]
#[command(name = "person_detector", about = "Poll a camera and report whether a person is in view")]
struct Args {
    /// Config file (JSON, or TOML with a .toml extension).
    #[arg(long, env = "PERSON_DETECTOR_CONFIG")]
    config: Option<PathBuf>,
    /// Take a single reading and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = ModuleConfig::load_from(args.config.as_deref())?;

    let module = SensorModule::new(builtin_registry()?);
    let component = cfg.component_config();
    let names = module.validate_config(&component)?;
    log::info!("resolving dependencies {:?}", names);
    module.add_resource(&component, cfg.dependencies()?)?;

    if args.once {
        let readings = module
            .get_readings(&cfg.sensor_name, None, None)
            .await
            .map_err(|e| anyhow!("reading failed: {}", e))?;
        println!("{}", serde_json::to_string(&readings)?);
        return Ok(());
    }

    log::info!(
        "{} polling every {:?} (camera={}, vision={})",
        cfg.sensor_name,
        cfg.poll_interval,
        cfg.camera_name,
        cfg.vision_service
    );

    module
        .poll_readings(&cfg.sensor_name, cfg.poll_interval, tokio::signal::ctrl_c())
        .await;

    module.remove_resource(&cfg.sensor_name)?;
    Ok(())
}
