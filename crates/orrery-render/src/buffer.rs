//! Vertex formats and uploaded geometry buffers.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::geometry::{Geometry, Topology};

/// Interleaved vertex with position and normal.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, PartialEq)]
pub struct VertexPositionNormal {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl VertexPositionNormal {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        use wgpu::{VertexAttribute, VertexFormat};

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<VertexPositionNormal>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: VertexFormat::Float32x3,
                },
                VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Interleave positions and normals. Missing normals are zero.
pub fn interleave(geometry: &Geometry) -> Vec<VertexPositionNormal> {
    geometry
        .positions
        .iter()
        .enumerate()
        .map(|(i, position)| VertexPositionNormal {
            position: *position,
            normal: geometry.normals.get(i).copied().unwrap_or([0.0; 3]),
        })
        .collect()
}

/// Geometry resident on the GPU.
pub struct GpuGeometry {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: Option<wgpu::Buffer>,
    pub index_count: u32,
    pub vertex_count: u32,
    pub topology: Topology,
}

impl GpuGeometry {
    pub fn upload(device: &wgpu::Device, label: &str, geometry: &Geometry) -> Self {
        let vertices = interleave(geometry);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = (!geometry.indices.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}-indices")),
                contents: bytemuck::cast_slice(&geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
            vertex_count: vertices.len() as u32,
            topology: geometry.topology,
        }
    }

    /// Bind buffers and issue the draw.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        match &self.index_buffer {
            Some(indices) => {
                pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..self.index_count, 0, 0..1);
            }
            None => pass.draw(0..self.vertex_count, 0..1),
        }
    }

    pub fn destroy(&self) {
        self.vertex_buffer.destroy();
        if let Some(indices) = &self.index_buffer {
            indices.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_vertex_stride() {
        assert_eq!(std::mem::size_of::<VertexPositionNormal>(), 24);
        assert_eq!(VertexPositionNormal::layout().array_stride, 24);
    }

    #[test]
    fn test_interleave_keeps_order() {
        let sphere = Geometry::sphere(2.0, 6, 4);
        let vertices = interleave(&sphere);
        assert_eq!(vertices.len(), sphere.vertex_count());
        assert_eq!(vertices[3].position, sphere.positions[3]);
        assert_eq!(vertices[3].normal, sphere.normals[3]);
    }

    #[test]
    fn test_interleave_line_has_zero_normals() {
        let line = Geometry::line_strip(&[Vec3::ZERO, Vec3::ONE]);
        assert!(interleave(&line).iter().all(|v| v.normal == [0.0; 3]));
    }
}
