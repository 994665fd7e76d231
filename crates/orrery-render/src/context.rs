//! The render context: one live rendering session bound to a host container.
//!
//! A context is either idle or holds a full session: host, scene, camera,
//! renderer, clock, frame scheduler and resize subscription all exist
//! together or not at all.

use glam::Vec3;

use crate::camera::Camera;
use crate::clock::Clock;
use crate::color::{Color, palette};
use crate::frame::{FrameHandle, FrameScheduler};
use crate::host::{Host, ListenerId};
use crate::renderer::{RenderError, Renderer, RendererOptions};
use crate::scene::Scene;
use crate::stage::Stage;

/// Errors raised by [`RenderContext`].
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    /// The container has no area to render into.
    #[error("container has zero size ({width}x{height})")]
    ZeroSizedContainer { width: u32, height: u32 },

    /// `initialize` was called on a live context.
    #[error("render context is already initialized")]
    AlreadyInitialized,

    /// The context has not been initialized, or was torn down.
    #[error("render context is not initialized")]
    NotInitialized,

    /// The host failed to create a renderer.
    #[error("failed to create renderer: {0}")]
    Renderer(#[from] RenderError),
}

/// Camera and renderer settings applied at initialization.
#[derive(Clone, Debug, PartialEq)]
pub struct ContextOptions {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub background: Color,
    pub renderer: RendererOptions,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            camera_position: Vec3::new(0.0, 30.0, 80.0),
            camera_target: Vec3::ZERO,
            background: palette::PURE_BLACK,
            renderer: RendererOptions::default(),
        }
    }
}

struct Session<H: Host> {
    host: H,
    scene: Scene,
    camera: Camera,
    renderer: H::Renderer,
    clock: H::Clock,
    frames: FrameScheduler,
    resize_listener: ListenerId,
}

/// Owns the scene, camera, renderer and clock for one container.
pub struct RenderContext<H: Host> {
    options: ContextOptions,
    session: Option<Session<H>>,
}

impl<H: Host> RenderContext<H> {
    pub fn new(options: ContextOptions) -> Self {
        Self {
            options,
            session: None,
        }
    }

    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    /// Bind to `host` and create every rendering handle.
    ///
    /// On error the context stays uninitialized and `host` is dropped.
    pub fn initialize(&mut self, mut host: H) -> Result<(), ContextError> {
        if self.session.is_some() {
            return Err(ContextError::AlreadyInitialized);
        }

        let (width, height) = host.client_size();
        if width == 0 || height == 0 {
            return Err(ContextError::ZeroSizedContainer { width, height });
        }

        let opts = &self.options;
        let mut camera = Camera::perspective(
            opts.fov_degrees,
            width as f32 / height as f32,
            opts.near,
            opts.far,
        );
        camera.position = opts.camera_position;
        camera.look_at(opts.camera_target);

        let mut renderer = host.create_renderer(&opts.renderer)?;
        renderer.resize_surface(width, height, host.device_pixel_ratio());
        host.attach_surface(&mut renderer);

        let mut clock = host.create_clock();
        clock.reset();

        let resize_listener = host.add_resize_listener();

        log::info!(
            "Render context initialized at {}x{} (pixel ratio {:.2})",
            width,
            height,
            host.device_pixel_ratio()
        );

        self.session = Some(Session {
            host,
            scene: Scene::new(opts.background),
            camera,
            renderer,
            clock,
            frames: FrameScheduler::new(),
            resize_listener,
        });
        Ok(())
    }

    /// Match camera aspect and renderer size to the container's current size.
    pub fn resize(&mut self) {
        let Some(session) = self.session.as_mut() else {
            log::warn!("resize called before the render context was initialized");
            return;
        };

        let (width, height) = session.host.client_size();
        if width == 0 || height == 0 {
            log::debug!("Skipping resize to {}x{}", width, height);
            return;
        }

        session.camera.set_aspect_ratio(width as f32, height as f32);
        let ratio = session.host.device_pixel_ratio();
        session.renderer.resize_surface(width, height, ratio);
        log::debug!("Render context resized to {}x{}", width, height);
    }

    /// Release every handle and hand the container back.
    ///
    /// Safe to call any number of times; only the first call on a live
    /// context does anything.
    pub fn teardown(&mut self) -> Option<H> {
        let Session {
            mut host,
            mut scene,
            mut renderer,
            mut frames,
            resize_listener,
            ..
        } = self.session.take()?;

        frames.cancel_all();
        host.remove_resize_listener(resize_listener);
        host.detach_surface(&mut renderer);
        renderer.dispose();
        let leftover = scene.clear().len();
        if leftover > 0 {
            log::debug!("Dropped {} scene nodes at teardown", leftover);
        }

        log::info!("Render context torn down");
        Some(host)
    }

    fn session(&self) -> Result<&Session<H>, ContextError> {
        self.session.as_ref().ok_or(ContextError::NotInitialized)
    }

    fn session_mut(&mut self) -> Result<&mut Session<H>, ContextError> {
        self.session.as_mut().ok_or(ContextError::NotInitialized)
    }

    pub fn scene(&self) -> Result<&Scene, ContextError> {
        Ok(&self.session()?.scene)
    }

    pub fn scene_mut(&mut self) -> Result<&mut Scene, ContextError> {
        Ok(&mut self.session_mut()?.scene)
    }

    pub fn camera(&self) -> Result<&Camera, ContextError> {
        Ok(&self.session()?.camera)
    }

    pub fn camera_mut(&mut self) -> Result<&mut Camera, ContextError> {
        Ok(&mut self.session_mut()?.camera)
    }

    pub fn renderer(&self) -> Result<&H::Renderer, ContextError> {
        Ok(&self.session()?.renderer)
    }

    pub fn renderer_mut(&mut self) -> Result<&mut H::Renderer, ContextError> {
        Ok(&mut self.session_mut()?.renderer)
    }

    pub fn clock_mut(&mut self) -> Result<&mut H::Clock, ContextError> {
        Ok(&mut self.session_mut()?.clock)
    }

    pub fn host(&self) -> Result<&H, ContextError> {
        Ok(&self.session()?.host)
    }

    pub fn host_mut(&mut self) -> Result<&mut H, ContextError> {
        Ok(&mut self.session_mut()?.host)
    }

    /// Scene and renderer together, for creating and disposing visuals.
    pub fn stage(&mut self) -> Result<Stage<'_, H::Renderer>, ContextError> {
        let session = self.session_mut()?;
        Ok(Stage::new(&mut session.scene, &mut session.renderer))
    }

    /// Seconds since the previous tick.
    pub fn tick_delta(&mut self) -> Result<f64, ContextError> {
        Ok(self.session_mut()?.clock.delta())
    }

    /// Draw the scene through the camera.
    pub fn render(&mut self) -> Result<(), ContextError> {
        let session = self.session_mut()?;
        session.renderer.render(&session.scene, &session.camera)?;
        Ok(())
    }

    /// Schedule the next animation frame and wake the host.
    pub fn request_animation_frame(&mut self) -> Result<FrameHandle, ContextError> {
        let session = self.session_mut()?;
        let was_pending = session.frames.is_pending();
        let handle = session.frames.request();
        if !was_pending {
            session.host.request_redraw();
        }
        Ok(handle)
    }

    /// Consume the pending frame on a display refresh.
    ///
    /// Returns `false` when no frame is due: nothing was requested, the
    /// request was cancelled, or the context has been torn down.
    pub fn begin_frame(&mut self) -> bool {
        self.session
            .as_mut()
            .and_then(|s| s.frames.take_due())
            .is_some()
    }

    /// Drop the pending frame, if any.
    pub fn cancel_animation_frame(&mut self) -> Option<FrameHandle> {
        self.session.as_mut()?.frames.cancel_all()
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.session.as_ref()?.frames.pending()
    }

    /// Frames run since initialization. Zero when idle.
    pub fn frame_count(&self) -> u64 {
        self.session.as_ref().map_or(0, |s| s.frames.frame_count())
    }
}

impl<H: Host> Default for RenderContext<H> {
    fn default() -> Self {
        Self::new(ContextOptions::default())
    }
}

impl<H: Host> Drop for RenderContext<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}
