//! The solar system scene: starfield, sun, planets on circular orbits, and the
//! composer that builds, animates and tears them down.

pub mod body;
pub mod catalog;
pub mod planet;
pub mod solar_system;
pub mod starfield;
pub mod sun;

pub use body::{CelestialBody, orbital_position};
pub use catalog::{CatalogEntry, PLANETS, default_planets};
pub use planet::{ORBIT_SEGMENTS, PlanetOptions, build_planet, orbit_ring_points};
pub use solar_system::{
    SceneError, SceneState, SolarSystem, SolarSystemOptions, sun_color_from_hex,
};
pub use starfield::{Starfield, StarfieldOptions, build_starfield, scatter_stars};
pub use sun::{Sun, SunOptions, build_sun};
