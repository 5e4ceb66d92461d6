mod app;
mod theme;

use std::{
    fs::{self, OpenOptions},
    io,
    sync::Mutex,
};

use anyhow::{Context, Result};
use fleet_rental_core::{
    config::{self, AppConfig},
    RentalSystem,
};
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::{app::Console, theme::Theme};

fn main() -> Result<()> {
    init_logging()?;

    let config_path = config::ensure_default_config()?;
    let config = AppConfig::load()?;
    tracing::debug!("configuration loaded from {}", config_path.display());

    let system = RentalSystem::open(&config).with_context(|| {
        format!(
            "failed to load fleet from {}",
            config.fleet_path().display()
        )
    })?;

    let stdin = io::stdin();
    let mut console = Console::new(
        system,
        config.admin.clone(),
        stdin.lock(),
        io::stdout(),
        Theme::detect(),
    );
    console.run()
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("fleet-rental.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::from_default_env();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
