//! Building and tearing down scene objects together with their GPU resources.

use crate::geometry::Geometry;
use crate::material::Material;
use crate::renderer::Renderer;
use crate::scene::{Node, NodeId, Object3D, Scene};

/// Mutable view over a scene and the renderer that owns its GPU resources.
///
/// Obtained from [`RenderContext::stage`](crate::RenderContext::stage). Every
/// visual created through a stage must eventually leave through
/// [`dispose_object`](Self::dispose_object).
pub struct Stage<'a, R: Renderer + ?Sized> {
    scene: &'a mut Scene,
    renderer: &'a mut R,
}

impl<'a, R: Renderer + ?Sized> Stage<'a, R> {
    pub fn new(scene: &'a mut Scene, renderer: &'a mut R) -> Self {
        Self { scene, renderer }
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        self.scene
    }

    pub fn renderer(&self) -> &R {
        self.renderer
    }

    /// Upload `geometry` and `material` as a triangle mesh.
    pub fn mesh(&mut self, geometry: &Geometry, material: &Material) -> Object3D {
        let (geometry, material) = self.upload(geometry, material);
        Object3D::Mesh { geometry, material }
    }

    /// Upload `geometry` and `material` as a polyline.
    pub fn line(&mut self, geometry: &Geometry, material: &Material) -> Object3D {
        let (geometry, material) = self.upload(geometry, material);
        Object3D::Line { geometry, material }
    }

    /// Upload `geometry` and `material` as a point cloud.
    pub fn points(&mut self, geometry: &Geometry, material: &Material) -> Object3D {
        let (geometry, material) = self.upload(geometry, material);
        Object3D::Points { geometry, material }
    }

    fn upload(
        &mut self,
        geometry: &Geometry,
        material: &Material,
    ) -> (crate::GeometryId, crate::MaterialId) {
        (
            self.renderer.create_geometry(geometry),
            self.renderer.create_material(material),
        )
    }

    /// Add a top-level node.
    pub fn add(&mut self, node: Node) -> NodeId {
        self.scene.add(node)
    }

    /// Attach a node under `parent`.
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> Option<NodeId> {
        self.scene.add_child(parent, node)
    }

    /// Add a top-level node with one child attached.
    pub fn add_with_child(&mut self, parent: Node, child: Node) -> (NodeId, NodeId) {
        self.scene.add_with_child(parent, child)
    }

    /// Remove `id` with its subtree and release every GPU resource it held.
    ///
    /// Returns how many nodes were removed; `0` when `id` was already gone.
    pub fn dispose_object(&mut self, id: NodeId) -> usize {
        let removed = self.scene.remove(id);
        for node in &removed {
            dispose_node(self.renderer, node);
        }
        removed.len()
    }
}

/// Release the GPU resources of a single node.
///
/// Meshes, lines and point clouds each free their geometry and material;
/// lights own nothing on the GPU.
pub fn dispose_node<R: Renderer + ?Sized>(renderer: &mut R, node: &Node) {
    match node.object {
        Object3D::Mesh { geometry, material }
        | Object3D::Line { geometry, material }
        | Object3D::Points { geometry, material } => {
            renderer.dispose_geometry(geometry);
            renderer.dispose_material(material);
        }
        Object3D::PointLight(_) | Object3D::AmbientLight(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::palette;
    use crate::headless::HeadlessRenderer;
    use crate::scene::{AmbientLight, PointLight};
    use glam::Vec3;

    #[test]
    fn test_each_visual_kind_releases_its_resources() {
        let mut scene = Scene::default();
        let mut renderer = HeadlessRenderer::new(64, 64);
        let mut stage = Stage::new(&mut scene, &mut renderer);

        let sphere = Geometry::sphere(1.0, 8, 8);
        let ring = Geometry::line_strip(&[Vec3::ZERO, Vec3::X]);
        let cloud = Geometry::points(vec![[0.0; 3]; 4]);
        let line_mat = Material::Line {
            color: palette::STAR_WHITE,
            opacity: 0.3,
            transparent: true,
        };
        let point_mat = Material::Points {
            color: palette::STAR_WHITE,
            size: 0.7,
            size_attenuation: true,
        };

        let mesh = stage.mesh(&sphere, &Material::lambert(palette::MARS_RED));
        let mesh = stage.add(Node::new(mesh));
        let line = stage.line(&ring, &line_mat);
        let line = stage.add(Node::new(line));
        let points = stage.points(&cloud, &point_mat);
        let points = stage.add(Node::new(points));
        assert_eq!(stage.renderer().live_geometries(), 3);
        assert_eq!(stage.renderer().live_materials(), 3);

        for id in [mesh, line, points] {
            assert_eq!(stage.dispose_object(id), 1);
        }
        assert_eq!(stage.renderer().live_geometries(), 0);
        assert_eq!(stage.renderer().live_materials(), 0);
        assert!(stage.scene().is_empty());
    }

    #[test]
    fn test_dispose_recurses_into_children() {
        let mut scene = Scene::default();
        let mut renderer = HeadlessRenderer::new(64, 64);
        let mut stage = Stage::new(&mut scene, &mut renderer);

        let sun = stage.mesh(
            &Geometry::sphere(5.0, 32, 32),
            &Material::Basic {
                color: palette::SUN_ORANGE,
            },
        );
        let sun = stage.add(Node::new(sun));
        stage.add_child(
            sun,
            Node::new(Object3D::PointLight(PointLight {
                color: palette::STAR_WHITE,
                intensity: 2.0,
                distance: 300.0,
            })),
        );
        let moonlet = stage.mesh(&Geometry::sphere(0.5, 8, 8), &Material::lambert(palette::PURE_WHITE));
        stage.add_child(sun, Node::new(moonlet));

        assert_eq!(stage.dispose_object(sun), 3);
        assert_eq!(stage.renderer().live_geometries(), 0);
        assert_eq!(stage.scene().node_count(), 0);
    }

    #[test]
    fn test_dispose_twice_is_noop() {
        let mut scene = Scene::default();
        let mut renderer = HeadlessRenderer::new(64, 64);
        let mut stage = Stage::new(&mut scene, &mut renderer);
        let ambient = stage.add(Node::new(Object3D::AmbientLight(AmbientLight {
            color: palette::GRAPHITE_GREY,
            intensity: 0.7,
        })));
        assert_eq!(stage.dispose_object(ambient), 1);
        assert_eq!(stage.dispose_object(ambient), 0);
    }
}
