//! The renderer capability consumed by the render context.

use crate::camera::Camera;
use crate::geometry::Geometry;
use crate::material::Material;
use crate::scene::Scene;

/// Handle to uploaded geometry owned by a [`Renderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeometryId(pub u64);

/// Handle to a material owned by a [`Renderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u64);

/// Options fixed at renderer creation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RendererOptions {
    /// Multisample the color target.
    pub antialias: bool,
    /// Present with vsync.
    pub vsync: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            antialias: true,
            vsync: true,
        }
    }
}

/// Errors raised while creating a renderer or drawing a frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found")]
    NoAdapter,

    /// Failed to request GPU device.
    #[error("failed to request GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    /// Failed to create surface.
    #[error("failed to create surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    /// Surface was lost and could not be recovered.
    #[error("surface lost")]
    SurfaceLost,

    /// GPU ran out of memory.
    #[error("out of memory")]
    OutOfMemory,

    /// Acquiring the next surface texture timed out (skip the frame).
    #[error("timeout")]
    Timeout,

    /// The renderer was used after [`Renderer::dispose`].
    #[error("renderer already disposed")]
    Disposed,
}

/// GPU-facing half of the rendering host.
///
/// Geometry and materials are created through the renderer and released
/// explicitly; dropping a [`GeometryId`] does not free anything.
pub trait Renderer {
    fn create_geometry(&mut self, geometry: &Geometry) -> GeometryId;

    fn create_material(&mut self, material: &Material) -> MaterialId;

    /// Release uploaded geometry. Unknown ids are ignored.
    fn dispose_geometry(&mut self, id: GeometryId);

    /// Release a material. Unknown ids are ignored.
    fn dispose_material(&mut self, id: MaterialId);

    /// Resize the output surface, in logical pixels.
    fn set_size(&mut self, width: u32, height: u32);

    /// Physical pixels per logical pixel.
    fn set_pixel_ratio(&mut self, ratio: f64);

    /// Apply a logical size and pixel ratio together.
    fn resize_surface(&mut self, width: u32, height: u32, pixel_ratio: f64) {
        self.set_pixel_ratio(pixel_ratio);
        self.set_size(width, height);
    }

    /// Current output size in logical pixels.
    fn size(&self) -> (u32, u32);

    /// Draw `scene` as seen through `camera`.
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError>;

    /// Release every GPU resource this renderer still holds. Idempotent.
    fn dispose(&mut self);
}

/// Physical drawing-buffer size for a logical size and pixel ratio.
pub fn drawing_buffer_size(width: u32, height: u32, pixel_ratio: f64) -> (u32, u32) {
    let scale = |v: u32| ((v as f64 * pixel_ratio).floor() as u32).max(1);
    (scale(width), scale(height))
}

/// Logical size and pixel ratio of a surface, plus the drawing-buffer extent
/// last applied to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSizing {
    logical: (u32, u32),
    pixel_ratio: f64,
    extent: (u32, u32),
}

impl SurfaceSizing {
    /// Sizing for a surface already configured at `physical` pixels.
    pub fn from_physical(physical: (u32, u32), pixel_ratio: f64) -> Self {
        let ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        let logical = |v: u32| (v as f64 / ratio).round() as u32;
        Self {
            logical: (logical(physical.0), logical(physical.1)),
            pixel_ratio: ratio,
            extent: physical,
        }
    }

    pub fn logical_size(&self) -> (u32, u32) {
        self.logical
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Drawing-buffer size currently applied.
    pub fn extent(&self) -> (u32, u32) {
        self.extent
    }

    /// Returns the new extent when it differs from the applied one.
    pub fn set_size(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        self.logical = (width, height);
        self.update()
    }

    /// Returns the new extent when it differs from the applied one.
    pub fn set_pixel_ratio(&mut self, ratio: f64) -> Option<(u32, u32)> {
        self.pixel_ratio = ratio;
        self.update()
    }

    /// Returns the new extent when it differs from the applied one.
    pub fn resize(&mut self, width: u32, height: u32, ratio: f64) -> Option<(u32, u32)> {
        self.logical = (width, height);
        self.pixel_ratio = ratio;
        self.update()
    }

    fn update(&mut self) -> Option<(u32, u32)> {
        let extent = drawing_buffer_size(self.logical.0, self.logical.1, self.pixel_ratio);
        if extent == self.extent {
            return None;
        }
        self.extent = extent;
        Some(extent)
    }
}
