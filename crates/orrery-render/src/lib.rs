//! Rendering core: scene graph, camera, host and renderer capabilities, the
//! render context that binds them to a container, plus headless and wgpu
//! backends.

pub mod buffer;
pub mod camera;
pub mod clock;
pub mod color;
pub mod context;
pub mod depth;
pub mod frame;
pub mod geometry;
pub mod gpu;
pub mod gpu_renderer;
pub mod headless;
pub mod host;
pub mod material;
pub mod pipeline;
pub mod renderer;
pub mod scene;
pub mod stage;

pub use camera::Camera;
pub use clock::{Clock, FrameClock, MAX_DELTA, ManualClock};
pub use color::{Color, palette};
pub use context::{ContextError, ContextOptions, RenderContext};
pub use frame::{FrameHandle, FrameScheduler};
pub use geometry::{Geometry, Topology};
pub use gpu::GpuContext;
pub use gpu_renderer::GpuRenderer;
pub use headless::{HeadlessHost, HeadlessRenderer};
pub use host::{Host, ListenerId};
pub use material::Material;
pub use renderer::{
    GeometryId, MaterialId, RenderError, Renderer, RendererOptions, SurfaceSizing,
    drawing_buffer_size,
};
pub use scene::{AmbientLight, Node, NodeId, Object3D, PointLight, Scene, Transform};
pub use stage::{Stage, dispose_node};
