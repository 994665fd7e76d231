//! [`Renderer`] implementation on wgpu.

use std::sync::Arc;

use glam::Mat4;
use rustc_hash::FxHashMap;
use winit::window::Window;

use crate::buffer::GpuGeometry;
use crate::camera::Camera;
use crate::depth::{DepthBuffer, MsaaTarget, sample_count};
use crate::geometry::Geometry;
use crate::gpu::GpuContext;
use crate::material::Material;
use crate::pipeline::{FrameUniform, ObjectUniform, ScenePipelines};
use crate::renderer::{
    GeometryId, MaterialId, RenderError, Renderer, RendererOptions, SurfaceSizing,
};
use crate::scene::{Object3D, Scene};

/// Uniform buffer and bind group for one draw within a frame.
struct ObjectSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct Draw {
    geometry: GeometryId,
    uniform: ObjectUniform,
}

/// Renders a [`Scene`] into a window surface.
pub struct GpuRenderer {
    gpu: GpuContext,
    pipelines: ScenePipelines,
    depth: DepthBuffer,
    msaa: Option<MsaaTarget>,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    slots: Vec<ObjectSlot>,
    geometries: FxHashMap<GeometryId, GpuGeometry>,
    materials: FxHashMap<MaterialId, Material>,
    next_id: u64,
    sizing: SurfaceSizing,
    disposed: bool,
}

impl GpuRenderer {
    /// Create a renderer presenting to `window`.
    pub fn new(window: Arc<Window>, options: &RendererOptions) -> Result<Self, RenderError> {
        let physical = window.inner_size();
        let scale_factor = window.scale_factor();
        let gpu = GpuContext::new_blocking(
            window,
            physical.width,
            physical.height,
            options.vsync,
        )?;
        let (width, height) = gpu.size();
        let samples = sample_count(options.antialias);

        let pipelines = ScenePipelines::new(&gpu.device, gpu.surface_format, samples);
        let depth = DepthBuffer::new(&gpu.device, width, height, samples);
        let msaa = options
            .antialias
            .then(|| MsaaTarget::new(&gpu.device, gpu.surface_format, width, height));

        let frame_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame-uniform"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame-bind-group"),
            layout: &pipelines.frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        log::info!(
            "GPU renderer ready ({}x{}, {}x MSAA)",
            width,
            height,
            samples
        );

        Ok(Self {
            gpu,
            pipelines,
            depth,
            msaa,
            frame_buffer,
            frame_bind_group,
            slots: Vec::new(),
            geometries: FxHashMap::default(),
            materials: FxHashMap::default(),
            next_id: 0,
            sizing: SurfaceSizing::from_physical((width, height), scale_factor),
            disposed: false,
        })
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn reconfigure(&mut self, extent: Option<(u32, u32)>) {
        let Some((width, height)) = extent else {
            return;
        };
        self.gpu.resize(width, height);
        let device = &self.gpu.device;
        self.depth.resize(device, width, height);
        if let Some(msaa) = &mut self.msaa {
            msaa.resize(device, self.gpu.surface_format, width, height);
        }
    }

    fn ensure_slots(&mut self, count: usize) {
        while self.slots.len() < count {
            let buffer = self.gpu.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("object-uniform"),
                size: std::mem::size_of::<ObjectUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = self.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("object-bind-group"),
                layout: &self.pipelines.object_bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            self.slots.push(ObjectSlot { buffer, bind_group });
        }
    }

    /// Collect lights and visuals from the scene graph.
    fn gather(&self, scene: &Scene, camera: &Camera) -> (FrameUniform, Vec<Draw>) {
        let mut frame = FrameUniform {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            light_position_range: [0.0; 4],
            light_color_intensity: [0.0; 4],
            ambient: [0.0; 4],
        };
        let mut has_point_light = false;
        let mut draws = Vec::new();

        scene.visit(|_, node, world: Mat4| match node.object {
            Object3D::PointLight(light) => {
                if has_point_light {
                    return;
                }
                has_point_light = true;
                let p = world.col(3);
                frame.light_position_range = [p.x, p.y, p.z, light.distance];
                frame.light_color_intensity = light.color.to_rgba(light.intensity);
            }
            Object3D::AmbientLight(light) => {
                let c = light.color.scaled(light.intensity);
                frame.ambient[0] += c.r;
                frame.ambient[1] += c.g;
                frame.ambient[2] += c.b;
                frame.ambient[3] = 1.0;
            }
            Object3D::Mesh { geometry, material }
            | Object3D::Line { geometry, material }
            | Object3D::Points { geometry, material } => {
                let Some(material) = self.materials.get(&material) else {
                    return;
                };
                if !self.geometries.contains_key(&geometry) {
                    return;
                }
                let (emissive, mode) = match material {
                    Material::Lambert { emissive, .. } => (*emissive, 1.0),
                    _ => (crate::color::palette::PURE_BLACK, 0.0),
                };
                draws.push(Draw {
                    geometry,
                    uniform: ObjectUniform {
                        model: world.to_cols_array_2d(),
                        color: material.color().to_rgba(material.opacity()),
                        emissive_mode: [emissive.r, emissive.g, emissive.b, mode],
                    },
                });
            }
        });
        (frame, draws)
    }
}

impl Renderer for GpuRenderer {
    fn create_geometry(&mut self, geometry: &Geometry) -> GeometryId {
        let id = GeometryId(self.next_id());
        let label = format!("geometry-{}", id.0);
        let uploaded = GpuGeometry::upload(&self.gpu.device, &label, geometry);
        self.geometries.insert(id, uploaded);
        id
    }

    fn create_material(&mut self, material: &Material) -> MaterialId {
        let id = MaterialId(self.next_id());
        self.materials.insert(id, material.clone());
        id
    }

    fn dispose_geometry(&mut self, id: GeometryId) {
        if let Some(geometry) = self.geometries.remove(&id) {
            geometry.destroy();
        }
    }

    fn dispose_material(&mut self, id: MaterialId) {
        self.materials.remove(&id);
    }

    fn set_size(&mut self, width: u32, height: u32) {
        let extent = self.sizing.set_size(width, height);
        self.reconfigure(extent);
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        let extent = self.sizing.set_pixel_ratio(ratio);
        self.reconfigure(extent);
    }

    fn resize_surface(&mut self, width: u32, height: u32, pixel_ratio: f64) {
        let extent = self.sizing.resize(width, height, pixel_ratio);
        self.reconfigure(extent);
    }

    fn size(&self) -> (u32, u32) {
        self.sizing.logical_size()
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError> {
        if self.disposed {
            return Err(RenderError::Disposed);
        }

        let (frame, draws) = self.gather(scene, camera);
        self.ensure_slots(draws.len());

        let queue = &self.gpu.queue;
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));
        for (slot, draw) in self.slots.iter().zip(&draws) {
            queue.write_buffer(&slot.buffer, 0, bytemuck::bytes_of(&draw.uniform));
        }

        let surface_texture = self.gpu.acquire()?;
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let (color_view, resolve_target) = match &self.msaa {
            Some(msaa) => (&msaa.view, Some(&surface_view)),
            None => (&surface_view, None),
        };

        let bg = scene.background;
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(bg.r),
                            g: f64::from(bg.g),
                            b: f64::from(bg.b),
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(DepthBuffer::CLEAR_VALUE),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for (slot, draw) in self.slots.iter().zip(&draws) {
                let Some(geometry) = self.geometries.get(&draw.geometry) else {
                    continue;
                };
                pass.set_pipeline(self.pipelines.for_topology(geometry.topology));
                pass.set_bind_group(1, &slot.bind_group, &[]);
                geometry.draw(&mut pass);
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for (_, geometry) in self.geometries.drain() {
            geometry.destroy();
        }
        self.materials.clear();
        for slot in self.slots.drain(..) {
            slot.buffer.destroy();
        }
        self.frame_buffer.destroy();
        self.disposed = true;
        log::debug!("GPU renderer disposed");
    }
}
