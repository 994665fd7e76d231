//! Background starfield: a point cloud scattered uniformly through a cube.

use rand::Rng;

use orrery_render::{Geometry, Material, Node, NodeId, Renderer, Stage, palette};

/// Point size of each star, in world units.
pub const STAR_SIZE: f32 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarfieldOptions {
    pub count: u32,
    /// Edge length of the cube the stars fill, centered on the origin.
    pub spread: f32,
}

impl Default for StarfieldOptions {
    fn default() -> Self {
        Self {
            count: 5000,
            spread: 1000.0,
        }
    }
}

/// A starfield living in the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Starfield {
    pub node: NodeId,
    pub count: u32,
    pub spread: f32,
}

/// `count` positions, each coordinate uniform in `[-spread/2, spread/2]`.
///
/// A non-finite `spread` has no cube to fill and yields no stars.
pub fn scatter_stars(rng: &mut impl Rng, count: u32, spread: f32) -> Vec<[f32; 3]> {
    let half = spread.abs() / 2.0;
    if !half.is_finite() {
        log::warn!("Star spread {spread} is not finite, no stars scattered");
        return Vec::new();
    }
    (0..count)
        .map(|_| {
            [
                rng.random_range(-half..=half),
                rng.random_range(-half..=half),
                rng.random_range(-half..=half),
            ]
        })
        .collect()
}

pub fn star_material() -> Material {
    Material::Points {
        color: palette::STAR_WHITE,
        size: STAR_SIZE,
        size_attenuation: true,
    }
}

/// Scatter stars and add them to the scene as one point cloud.
pub fn build_starfield<R: Renderer + ?Sized>(
    stage: &mut Stage<'_, R>,
    rng: &mut impl Rng,
    options: StarfieldOptions,
) -> Starfield {
    let geometry = Geometry::points(scatter_stars(rng, options.count, options.spread));
    let object = stage.points(&geometry, &star_material());
    let node = stage.add(Node::new(object).with_name("Starfield"));
    log::debug!(
        "Starfield of {} stars within a {}-unit cube",
        options.count,
        options.spread
    );
    Starfield {
        node,
        count: options.count,
        spread: options.spread,
    }
}
