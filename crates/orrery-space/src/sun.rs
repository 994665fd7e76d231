//! The sun: an unlit sphere carrying the scene's point light, plus ambient fill.

use orrery_render::{
    AmbientLight, Color, Geometry, Material, Node, NodeId, Object3D, PointLight, Renderer, Stage,
    palette,
};

use crate::body::CelestialBody;

pub const SUN_SEGMENTS: u32 = 32;

/// Radians per second the sun turns about its own axis.
pub const SUN_SPIN_RATE: f32 = 0.5;

pub const SUN_LIGHT: PointLight = PointLight {
    color: palette::STAR_WHITE,
    intensity: 2.0,
    distance: 300.0,
};

pub const AMBIENT_LIGHT: AmbientLight = AmbientLight {
    color: palette::GRAPHITE_GREY,
    intensity: 0.7,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunOptions {
    /// Sphere radius.
    pub size: f32,
    pub color: Color,
}

impl Default for SunOptions {
    fn default() -> Self {
        Self {
            size: 5.0,
            color: palette::SUN_ORANGE,
        }
    }
}

/// The central body with its lights.
#[derive(Clone, Debug, PartialEq)]
pub struct Sun {
    /// Fixed at the origin: zero orbit, zero speed.
    pub body: CelestialBody,
    /// Point light attached to the sun mesh.
    pub light: NodeId,
    /// Top-level ambient light.
    pub ambient: NodeId,
}

/// Add the sun mesh, its point light and the ambient light.
pub fn build_sun<R: Renderer + ?Sized>(stage: &mut Stage<'_, R>, options: SunOptions) -> Sun {
    let geometry = Geometry::sphere(options.size, SUN_SEGMENTS, SUN_SEGMENTS);
    let object = stage.mesh(
        &geometry,
        &Material::Basic {
            color: options.color,
        },
    );
    let (mesh, light) = stage.add_with_child(
        Node::new(object).with_name("Sun"),
        Node::new(Object3D::PointLight(SUN_LIGHT)),
    );
    let ambient = stage.add(Node::new(Object3D::AmbientLight(AMBIENT_LIGHT)).with_name("Ambient"));

    log::debug!(
        "Sun of radius {} and color #{:06X}",
        options.size,
        options.color.to_hex()
    );
    Sun {
        body: CelestialBody::new("Sun", mesh, 0.0, 0.0, 0.0, None),
        light,
        ambient,
    }
}
