//! Translate the loaded [`Config`] into context and scene options.

use glam::Vec3;
use tracing::warn;

use orrery_config::Config;
use orrery_render::{ContextOptions, RendererOptions};
use orrery_space::{SolarSystemOptions, sun_color_from_hex};

pub fn context_options(config: &Config) -> ContextOptions {
    let render = &config.render;
    ContextOptions {
        fov_degrees: render.fov_degrees,
        near: render.near,
        far: render.far,
        camera_position: Vec3::from_array(render.camera_position),
        renderer: RendererOptions {
            antialias: render.antialias,
            vsync: config.window.vsync,
        },
        ..ContextOptions::default()
    }
}

/// Scene options; the planet list always comes from the built-in catalog.
pub fn solar_system_options(config: &Config) -> SolarSystemOptions {
    let system = &config.solar_system;
    SolarSystemOptions {
        stars_count: system.stars_count,
        star_spread: star_spread(system.star_spread),
        sun_size: system.sun_size,
        sun_color: sun_color_from_hex(system.sun_color),
        seed: system.seed,
        ..SolarSystemOptions::default()
    }
}

/// Configured star spread, or the default when it is not a finite number.
fn star_spread(configured: f32) -> f32 {
    if configured.is_finite() {
        return configured;
    }
    let fallback = SolarSystemOptions::default().star_spread;
    warn!("Star spread {configured} is not finite, using {fallback}");
    fallback
}
