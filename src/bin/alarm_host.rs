//! Headless alarm host binary for stdin/stdout JSON communication.
//!
//! Reads `{"tool": ..., "arguments": {...}}` calls as newline-delimited JSON
//! from stdin, dispatches them to the `self.alarm.*` tools, and writes one
//! response per call plus `{"event": ...}` lines for fired alarms to stdout.
//!
//! All tracing/diagnostic output goes to stderr so that stdout remains a
//! clean JSON protocol channel.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use fae_alarm::alarm::{ChannelNotifier, FileStore, persist::NAMESPACE};
use fae_alarm::host::run_stdio_bridge;
use fae_alarm::{AlarmConfig, AlarmManager, ToolMode, ToolRegistry, register_alarm_tools};

fn config_path_from_args() -> anyhow::Result<Option<PathBuf>> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config requires a path")?;
                return Ok(Some(PathBuf::from(path)));
            }
            other => anyhow::bail!("unrecognised argument: {other}"),
        }
    }
    Ok(None)
}

fn load_config(explicit: Option<PathBuf>) -> anyhow::Result<AlarmConfig> {
    match explicit {
        Some(path) => AlarmConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => {
            let path = AlarmConfig::default_config_path();
            if path.exists() {
                AlarmConfig::from_file(&path)
                    .with_context(|| format!("failed to load config from {}", path.display()))
            } else {
                Ok(AlarmConfig::default())
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise tracing to stderr only (stdout is reserved for the JSON
    // protocol).
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fae_alarm=info")),
        )
        .init();

    let config = load_config(config_path_from_args()?)?;
    let storage_dir = config.storage.resolved_dir();
    tracing::info!(dir = %storage_dir.display(), "fae-alarmd starting");

    let (notifier, events) = ChannelNotifier::channel();
    let manager = AlarmManager::builder(config)
        .with_storage(Box::new(FileStore::new(storage_dir, NAMESPACE)))
        .with_notifier(Arc::new(notifier))
        .build()
        .context("failed to create alarm manager")?;
    manager
        .initialize()
        .context("failed to initialize alarms")?;

    let mut registry = ToolRegistry::new(ToolMode::Full);
    register_alarm_tools(&mut registry, manager);

    run_stdio_bridge(registry, events).await.map_err(|e| {
        tracing::error!(error = %e, "fae-alarmd exited with error");
        anyhow::anyhow!("fae-alarmd failed: {e}")
    })?;

    tracing::info!("fae-alarmd shut down cleanly");
    Ok(())
}
