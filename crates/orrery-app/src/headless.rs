//! Windowless runs: a fixed number of frames against the in-memory host.

use tracing::{info, instrument};

use orrery_config::Config;
use orrery_render::{HeadlessHost, RenderContext};
use orrery_space::SolarSystem;

use crate::error::AppError;
use crate::settings::{context_options, solar_system_options};
use crate::trace::log_bodies;

/// Simulated seconds per headless frame.
pub const FRAME_STEP: f64 = 1.0 / 60.0;

/// What a headless run did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadlessSummary {
    pub frames: u64,
    pub seed: u64,
    /// Draw calls in the last rendered frame.
    pub draw_calls: usize,
    pub simulated_seconds: f64,
    /// Geometries and materials still alive after cleanup.
    pub leaked_resources: usize,
}

/// Set up the system, animate `frames` frames at [`FRAME_STEP`], then clean
/// up and tear down.
#[instrument(skip(config))]
pub fn run(config: &Config, frames: u64) -> Result<HeadlessSummary, AppError> {
    let mut ctx = RenderContext::new(context_options(config));
    ctx.initialize(HeadlessHost::new(config.window.width, config.window.height))?;

    let mut system = SolarSystem::new(solar_system_options(config));
    system.setup_solar_system(&mut ctx)?;
    ctx.request_animation_frame()?;

    let mut rendered = 0;
    while rendered < frames && ctx.host_mut()?.take_redraw() {
        if !ctx.begin_frame() {
            continue;
        }
        ctx.clock_mut()?.advance(FRAME_STEP);
        system.animate(&mut ctx)?;
        rendered += 1;
        log_bodies(&system, ctx.frame_count(), config.debug.trace_bodies_every);
    }

    let draw_calls = ctx.renderer()?.last_draw_calls();
    system.cleanup_solar_system(&mut ctx);
    let leaked_resources = {
        let renderer = ctx.renderer()?;
        renderer.live_geometries() + renderer.live_materials()
    };
    ctx.teardown();

    let summary = HeadlessSummary {
        frames: rendered,
        seed: system.seed(),
        draw_calls,
        simulated_seconds: rendered as f64 * FRAME_STEP,
        leaked_resources,
    };
    info!(
        "Headless run: {} frames ({:.2}s simulated), {} draw calls, seed {}",
        summary.frames, summary.simulated_seconds, summary.draw_calls, summary.seed
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(seed: u64) -> Config {
        let mut config = Config::default();
        config.solar_system.stars_count = 64;
        config.solar_system.seed = Some(seed);
        config
    }

    #[test]
    fn test_runs_requested_frames() {
        let summary = run(&small_config(1), 30).unwrap();
        assert_eq!(summary.frames, 30);
        assert_eq!(summary.seed, 1);
        // Starfield, sun, and a mesh plus ring per planet.
        assert_eq!(summary.draw_calls, 2 + 8 * 2);
        assert!((summary.simulated_seconds - 0.5).abs() < 1e-9);
        assert_eq!(summary.leaked_resources, 0);
    }

    #[test]
    fn test_zero_frames_still_cleans_up() {
        let summary = run(&small_config(2), 0).unwrap();
        assert_eq!(summary.frames, 0);
        assert_eq!(summary.draw_calls, 0);
        assert_eq!(summary.leaked_resources, 0);
    }

    #[test]
    fn test_zero_sized_window_fails() {
        let mut config = small_config(3);
        config.window.width = 0;
        assert!(matches!(run(&config, 1), Err(AppError::Context(_))));
    }
}
