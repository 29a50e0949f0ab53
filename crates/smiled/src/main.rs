use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use smile_hw::{PermissionGate, SimShutter};
use smile_media::MemoryStore;

mod config;
mod dbus_interface;
mod engine;

use config::Config;
use dbus_interface::CameraService;
use engine::spawn_engine;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("smiled starting");

    let config = Config::from_env();

    // Permissions are resolved once at startup; either grant missing
    // means no capture can ever complete, so refuse to run.
    let gate = PermissionGate::new(config.camera_granted, config.storage_granted);
    if let Err(denied) = gate.require() {
        tracing::error!(%denied, "refusing to start");
        anyhow::bail!("{denied}");
    }

    // The platform capture pipeline and media library are external;
    // the daemon runs against the simulated shutter and the in-memory
    // store.
    let shutter = Arc::new(SimShutter::new());
    let store = Arc::new(MemoryStore::new());
    let handle = spawn_engine(config, shutter, store);

    let service = CameraService::new(handle);
    let _conn = zbus::connection::Builder::session()
        .context("connecting to session bus")?
        .name("org.bigsmile.Camera1")?
        .serve_at("/org/bigsmile/Camera1", service)?
        .build()
        .await
        .context("registering org.bigsmile.Camera1")?;

    tracing::info!("smiled ready");

    tokio::signal::ctrl_c().await?;
    tracing::info!("smiled shutting down");

    Ok(())
}
