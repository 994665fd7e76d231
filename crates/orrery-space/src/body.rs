//! Bodies on circular orbits in the XZ plane.

use glam::Vec3;

use orrery_render::NodeId;

/// Position on a circle of radius `orbit` around the origin at `angle` radians.
pub fn orbital_position(angle: f64, orbit: f32) -> Vec3 {
    let orbit = f64::from(orbit);
    Vec3::new(
        (angle.cos() * orbit) as f32,
        0.0,
        (angle.sin() * orbit) as f32,
    )
}

/// A sun or planet in the scene.
///
/// The position is always derived from `angle` and `orbit`; nothing sets it
/// independently.
#[derive(Clone, Debug, PartialEq)]
pub struct CelestialBody {
    pub name: String,
    pub mesh: NodeId,
    orbit: f32,
    /// Radians per second.
    pub speed: f64,
    angle: f64,
    pub ring: Option<NodeId>,
}

impl CelestialBody {
    /// Negative orbits are clamped to zero.
    pub fn new(
        name: impl Into<String>,
        mesh: NodeId,
        orbit: f32,
        speed: f64,
        angle: f64,
        ring: Option<NodeId>,
    ) -> Self {
        Self {
            name: name.into(),
            mesh,
            orbit: orbit.max(0.0),
            speed,
            angle,
            ring,
        }
    }

    pub fn orbit(&self) -> f32 {
        self.orbit
    }

    /// Current angle in radians. Not wrapped to `[0, 2π)` as time passes.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn position(&self) -> Vec3 {
        orbital_position(self.angle, self.orbit)
    }

    /// Move along the orbit by `delta` seconds and return the new position.
    pub fn advance(&mut self, delta: f64) -> Vec3 {
        self.angle += self.speed * delta;
        self.position()
    }
}
