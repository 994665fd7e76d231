//! Planets and their orbit rings.

use std::f32::consts::TAU;

use glam::Vec3;

use orrery_render::{Color, Geometry, Material, Node, Renderer, Stage, palette};

use crate::body::{CelestialBody, orbital_position};

pub const PLANET_SEGMENTS: u32 = 24;
pub const ORBIT_SEGMENTS: u32 = 64;
pub const ORBIT_OPACITY: f32 = 0.3;

#[derive(Clone, Debug, PartialEq)]
pub struct PlanetOptions {
    pub name: String,
    /// Sphere radius.
    pub size: f32,
    /// Distance from the sun.
    pub orbit: f32,
    pub color: Color,
    /// Radians per second.
    pub speed: f64,
}

/// Closed circle of `segments` segments: `segments + 1` points, last equal to first.
pub fn orbit_ring_points(radius: f32, segments: u32) -> Vec<Vec3> {
    (0..=segments)
        .map(|i| {
            let theta = i as f32 / segments as f32 * TAU;
            Vec3::new(radius * theta.cos(), 0.0, radius * theta.sin())
        })
        .collect()
}

pub fn orbit_material() -> Material {
    Material::Line {
        color: palette::STAR_WHITE,
        opacity: ORBIT_OPACITY,
        transparent: true,
    }
}

/// Add a planet at `angle` radians along its orbit, plus its orbit ring.
///
/// The ring is a separate top-level object so the planet's spin does not
/// turn it.
pub fn build_planet<R: Renderer + ?Sized>(
    stage: &mut Stage<'_, R>,
    options: &PlanetOptions,
    angle: f64,
) -> CelestialBody {
    let orbit = options.orbit.max(0.0);

    let ring_geometry = Geometry::line_strip(&orbit_ring_points(orbit, ORBIT_SEGMENTS));
    let ring = stage.line(&ring_geometry, &orbit_material());
    let ring = stage.add(Node::new(ring).with_name(format!("{} orbit", options.name)));

    let geometry = Geometry::sphere(options.size, PLANET_SEGMENTS, PLANET_SEGMENTS);
    let mesh = stage.mesh(&geometry, &Material::lambert(options.color));
    let mesh = stage.add(
        Node::new(mesh)
            .with_name(options.name.clone())
            .with_position(orbital_position(angle, orbit)),
    );

    log::debug!(
        "Planet {} (size {}, orbit {}, speed {} rad/s) at angle {:.3}",
        options.name,
        options.size,
        orbit,
        options.speed,
        angle
    );
    CelestialBody::new(
        options.name.clone(),
        mesh,
        orbit,
        options.speed,
        angle,
        Some(ring),
    )
}
