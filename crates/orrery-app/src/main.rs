//! Orrery: an animated solar system.
//!
//! Run with: `cargo run -p orrery-app`, or `-- --headless 600` to animate
//! ten simulated seconds without a window.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

use orrery_app::headless;
use orrery_app::platform::PlatformDirs;
use orrery_app::window;
use orrery_config::{CliArgs, Config};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Logging needs the config, so load failures are reported after init.
    let dirs = PlatformDirs::resolve_with_override(args.config.as_deref());
    let (mut config, load_error) = match &dirs {
        Ok(dirs) => match Config::load_or_create(&dirs.config_dir) {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e.to_string())),
        },
        Err(e) => (Config::default(), Some(e.to_string())),
    };
    config.apply_cli_overrides(&args);

    let log_dir = dirs.as_ref().ok().map(|d| d.log_dir.as_path());
    orrery_log::init_logging(log_dir, cfg!(debug_assertions), Some(&config));

    if let Some(e) = load_error {
        warn!("Using default config: {e}");
    }
    info!("Orrery {}", env!("CARGO_PKG_VERSION"));
    info!(
        "Window: {}x{} | Stars: {} | Seed: {}",
        config.window.width,
        config.window.height,
        config.solar_system.stars_count,
        config
            .solar_system
            .seed
            .map_or_else(|| "random".to_string(), |s| s.to_string()),
    );

    let result = match args.headless {
        Some(frames) => headless::run(&config, frames).map(|_| ()),
        None => window::run(config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
