//! Scene shader and the three pipelines that draw meshes, lines and points.
//!
//! Bind groups:
//! - `@group(0)` frame uniform: view-projection, one point light, ambient light.
//! - `@group(1)` object uniform: model matrix, color, emissive and shading mode.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};

use crate::buffer::VertexPositionNormal;
use crate::depth::DepthBuffer;
use crate::geometry::Topology;

/// Per-frame uniform. 112 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    /// xyz = world position, w = range (0 = unlimited).
    pub light_position_range: [f32; 4],
    /// rgb = color, w = intensity. Zero intensity when the scene has no point light.
    pub light_color_intensity: [f32; 4],
    /// rgb = color, w = intensity.
    pub ambient: [f32; 4],
}

/// Per-draw uniform. 96 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// rgb = emissive, w = 1.0 for lit shading, 0.0 for flat color.
    pub emissive_mode: [f32; 4],
}

pub const SHADER_SOURCE: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    light_position_range: vec4<f32>,
    light_color_intensity: vec4<f32>,
    ambient: vec4<f32>,
};

struct Object {
    model: mat4x4<f32>,
    color: vec4<f32>,
    emissive_mode: vec4<f32>,
};

@group(0) @binding(0) var<uniform> frame: Frame;
@group(1) @binding(0) var<uniform> object: Object;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let world = object.model * vec4<f32>(in.position, 1.0);
    var out: VertexOutput;
    out.clip_position = frame.view_proj * world;
    out.world_position = world.xyz;
    out.normal = (object.model * vec4<f32>(in.normal, 0.0)).xyz;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    if object.emissive_mode.w < 0.5 {
        return object.color;
    }

    let n = normalize(in.normal);
    let to_light = frame.light_position_range.xyz - in.world_position;
    let dist = length(to_light);
    let l = to_light / max(dist, 0.0001);

    var falloff = 1.0;
    let range = frame.light_position_range.w;
    if range > 0.0 {
        let t = clamp(1.0 - dist / range, 0.0, 1.0);
        falloff = t * t;
    }

    let diffuse = max(dot(n, l), 0.0) * frame.light_color_intensity.rgb
        * frame.light_color_intensity.w * falloff;
    let ambient = frame.ambient.rgb * frame.ambient.w;
    let rgb = object.color.rgb * (diffuse + ambient) + object.emissive_mode.rgb;
    return vec4<f32>(rgb, object.color.a);
}
"#;

/// Layouts and pipelines shared by every draw.
pub struct ScenePipelines {
    pub frame_bind_group_layout: wgpu::BindGroupLayout,
    pub object_bind_group_layout: wgpu::BindGroupLayout,
    pub triangles: wgpu::RenderPipeline,
    pub lines: wgpu::RenderPipeline,
    pub points: wgpu::RenderPipeline,
}

impl ScenePipelines {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, sample_count: u32) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene-shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let frame_bind_group_layout = uniform_layout(
            device,
            "frame-bgl",
            std::mem::size_of::<FrameUniform>() as u64,
        );
        let object_bind_group_layout = uniform_layout(
            device,
            "object-bgl",
            std::mem::size_of::<ObjectUniform>() as u64,
        );

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene-pipeline-layout"),
            bind_group_layouts: &[&frame_bind_group_layout, &object_bind_group_layout],
            immediate_size: 0,
        });

        let build = |label: &str, topology: wgpu::PrimitiveTopology, blend, depth_write| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[VertexPositionNormal::layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DepthBuffer::FORMAT,
                    depth_write_enabled: depth_write,
                    depth_compare: DepthBuffer::COMPARE_FUNCTION,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: sample_count,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                multiview_mask: None,
                cache: None,
            })
        };

        let triangles = build(
            "scene-triangles",
            wgpu::PrimitiveTopology::TriangleList,
            None,
            true,
        );
        // Translucent orbit rings must not occlude what lies behind them.
        let lines = build(
            "scene-lines",
            wgpu::PrimitiveTopology::LineStrip,
            Some(wgpu::BlendState::ALPHA_BLENDING),
            false,
        );
        let points = build(
            "scene-points",
            wgpu::PrimitiveTopology::PointList,
            None,
            true,
        );

        Self {
            frame_bind_group_layout,
            object_bind_group_layout,
            triangles,
            lines,
            points,
        }
    }

    pub fn for_topology(&self, topology: Topology) -> &wgpu::RenderPipeline {
        match topology {
            Topology::Triangles => &self.triangles,
            Topology::LineStrip => &self.lines,
            Topology::Points => &self.points,
        }
    }
}

fn uniform_layout(device: &wgpu::Device, label: &str, size: u64) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(size),
            },
            count: None,
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sizes_match_wgsl() {
        assert_eq!(std::mem::size_of::<FrameUniform>(), 112);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 96);
    }

    #[test]
    fn test_shader_entry_points_present() {
        assert!(SHADER_SOURCE.contains("fn vs_main"));
        assert!(SHADER_SOURCE.contains("fn fs_main"));
        assert!(SHADER_SOURCE.contains("@group(1) @binding(0)"));
    }
}
