//! In-memory host and renderer.
//!
//! Nothing is drawn. The renderer keeps an exact ledger of live geometry and
//! materials so resource lifecycles can be checked without a GPU, and the host
//! exposes its resize subscriptions and redraw requests for inspection.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::camera::Camera;
use crate::clock::ManualClock;
use crate::geometry::Geometry;
use crate::host::{Host, ListenerId};
use crate::material::Material;
use crate::renderer::{
    GeometryId, MaterialId, RenderError, Renderer, RendererOptions, drawing_buffer_size,
};
use crate::scene::{Object3D, Scene};

/// Renderer that records what it would have drawn.
#[derive(Debug)]
pub struct HeadlessRenderer {
    geometries: FxHashMap<GeometryId, usize>,
    materials: FxHashMap<MaterialId, Material>,
    next_id: u64,
    size: (u32, u32),
    pixel_ratio: f64,
    options: RendererOptions,
    render_count: u64,
    last_draw_calls: usize,
    disposed: bool,
}

impl HeadlessRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_options(width, height, RendererOptions::default())
    }

    pub fn with_options(width: u32, height: u32, options: RendererOptions) -> Self {
        Self {
            geometries: FxHashMap::default(),
            materials: FxHashMap::default(),
            next_id: 0,
            size: (width, height),
            pixel_ratio: 1.0,
            options,
            render_count: 0,
            last_draw_calls: 0,
            disposed: false,
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn live_geometries(&self) -> usize {
        self.geometries.len()
    }

    pub fn live_materials(&self) -> usize {
        self.materials.len()
    }

    /// Vertex count of a live geometry.
    pub fn geometry_vertices(&self, id: GeometryId) -> Option<usize> {
        self.geometries.get(&id).copied()
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(&id)
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn options(&self) -> RendererOptions {
        self.options
    }

    /// Physical size of the (virtual) drawing buffer.
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        drawing_buffer_size(self.size.0, self.size.1, self.pixel_ratio)
    }

    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Visuals submitted by the most recent [`Renderer::render`].
    pub fn last_draw_calls(&self) -> usize {
        self.last_draw_calls
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Renderer for HeadlessRenderer {
    fn create_geometry(&mut self, geometry: &Geometry) -> GeometryId {
        let id = GeometryId(self.next_id());
        self.geometries.insert(id, geometry.vertex_count());
        id
    }

    fn create_material(&mut self, material: &Material) -> MaterialId {
        let id = MaterialId(self.next_id());
        self.materials.insert(id, material.clone());
        id
    }

    fn dispose_geometry(&mut self, id: GeometryId) {
        self.geometries.remove(&id);
    }

    fn dispose_material(&mut self, id: MaterialId) {
        self.materials.remove(&id);
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = ratio;
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn render(&mut self, scene: &Scene, _camera: &Camera) -> Result<(), RenderError> {
        if self.disposed {
            return Err(RenderError::Disposed);
        }
        let mut draws = 0;
        scene.visit(|_, node, _| {
            if let Some((geometry, material)) = node.object.resources() {
                if self.geometries.contains_key(&geometry) && self.materials.contains_key(&material)
                {
                    draws += 1;
                } else {
                    log::warn!("Skipping visual with released resources");
                }
            }
        });
        self.last_draw_calls = draws;
        self.render_count += 1;
        Ok(())
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        if !self.geometries.is_empty() || !self.materials.is_empty() {
            log::debug!(
                "Renderer disposed with {} geometries and {} materials still live",
                self.geometries.len(),
                self.materials.len()
            );
        }
        self.geometries.clear();
        self.materials.clear();
        self.disposed = true;
    }
}

/// Host backed by plain fields.
#[derive(Debug)]
pub struct HeadlessHost {
    size: (u32, u32),
    pixel_ratio: f64,
    attached: bool,
    listeners: FxHashSet<ListenerId>,
    next_listener: u64,
    redraw_requests: u64,
}

impl HeadlessHost {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            pixel_ratio: 1.0,
            attached: false,
            listeners: FxHashSet::default(),
            next_listener: 0,
            redraw_requests: 0,
        }
    }

    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = ratio;
        self
    }

    /// Change the client area. Returns whether anyone is listening, in which
    /// case the caller should deliver the resize to the context.
    pub fn set_client_size(&mut self, width: u32, height: u32) -> bool {
        self.size = (width, height);
        !self.listeners.is_empty()
    }

    /// Change the device pixel ratio, as moving to another monitor would.
    /// Returns whether anyone is listening.
    pub fn set_pixel_ratio(&mut self, ratio: f64) -> bool {
        self.pixel_ratio = ratio;
        !self.listeners.is_empty()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Redraws requested and not yet delivered.
    pub fn redraw_requests(&self) -> u64 {
        self.redraw_requests
    }

    /// Deliver one requested redraw, as a display refresh would.
    pub fn take_redraw(&mut self) -> bool {
        if self.redraw_requests == 0 {
            return false;
        }
        self.redraw_requests -= 1;
        true
    }
}

impl Host for HeadlessHost {
    type Renderer = HeadlessRenderer;
    type Clock = ManualClock;

    fn client_size(&self) -> (u32, u32) {
        self.size
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn create_renderer(&mut self, options: &RendererOptions) -> Result<HeadlessRenderer, RenderError> {
        Ok(HeadlessRenderer::with_options(self.size.0, self.size.1, *options))
    }

    fn create_clock(&mut self) -> ManualClock {
        ManualClock::new()
    }

    fn attach_surface(&mut self, _renderer: &mut HeadlessRenderer) {
        self.attached = true;
    }

    fn detach_surface(&mut self, _renderer: &mut HeadlessRenderer) {
        self.attached = false;
    }

    fn add_resize_listener(&mut self) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.insert(id);
        id
    }

    fn remove_resize_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }

    fn request_redraw(&mut self) {
        self.redraw_requests += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::palette;
    use crate::scene::Node;

    #[test]
    fn test_resource_ledger() {
        let mut renderer = HeadlessRenderer::new(10, 10);
        let g = renderer.create_geometry(&Geometry::sphere(1.0, 4, 4));
        let m = renderer.create_material(&Material::lambert(palette::EARTH_GREEN));
        assert_eq!(renderer.geometry_vertices(g), Some(25));
        assert!(renderer.material(m).is_some());

        renderer.dispose_geometry(g);
        renderer.dispose_geometry(g);
        renderer.dispose_material(m);
        assert_eq!(renderer.live_geometries(), 0);
        assert_eq!(renderer.live_materials(), 0);
    }

    #[test]
    fn test_render_counts_live_visuals() {
        let mut renderer = HeadlessRenderer::new(10, 10);
        let mut scene = Scene::default();
        let geometry = renderer.create_geometry(&Geometry::sphere(1.0, 4, 4));
        let material = renderer.create_material(&Material::lambert(palette::MARS_RED));
        scene.add(Node::new(Object3D::Mesh { geometry, material }));

        renderer.render(&scene, &Camera::default()).unwrap();
        assert_eq!(renderer.last_draw_calls(), 1);
        assert_eq!(renderer.render_count(), 1);
    }

    #[test]
    fn test_render_after_dispose_fails() {
        let mut renderer = HeadlessRenderer::new(10, 10);
        renderer.dispose();
        renderer.dispose();
        assert!(matches!(
            renderer.render(&Scene::default(), &Camera::default()),
            Err(RenderError::Disposed)
        ));
    }

    #[test]
    fn test_host_listeners_and_redraws() {
        let mut host = HeadlessHost::new(800, 600);
        assert!(!host.set_client_size(640, 480));
        let id = host.add_resize_listener();
        assert!(host.set_client_size(800, 600));
        host.remove_resize_listener(id);
        assert_eq!(host.listener_count(), 0);

        host.request_redraw();
        assert!(host.take_redraw());
        assert!(!host.take_redraw());
    }
}
