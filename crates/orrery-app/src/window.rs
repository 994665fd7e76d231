//! The windowed front end: a winit window hosting the render context.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use orrery_config::Config;
use orrery_render::{
    FrameClock, GpuRenderer, Host, ListenerId, RenderContext, RenderError, RendererOptions,
};
use orrery_space::SolarSystem;

use crate::error::AppError;
use crate::settings::{context_options, solar_system_options};
use crate::trace::log_bodies;

/// A winit window as a render host.
///
/// winit delivers resize events to the event loop rather than to callbacks,
/// so the resize listener is a flag the loop consults before forwarding
/// `Resized` to [`RenderContext::resize`].
pub struct WindowHost {
    window: Arc<Window>,
    listener: Option<ListenerId>,
    next_listener: u64,
}

impl WindowHost {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            listener: None,
            next_listener: 0,
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Whether a resize listener is registered.
    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }
}

impl Host for WindowHost {
    type Renderer = GpuRenderer;
    type Clock = FrameClock;

    fn client_size(&self) -> (u32, u32) {
        let logical: LogicalSize<u32> = self
            .window
            .inner_size()
            .to_logical(self.window.scale_factor());
        (logical.width, logical.height)
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.scale_factor()
    }

    fn create_renderer(&mut self, options: &RendererOptions) -> Result<GpuRenderer, RenderError> {
        GpuRenderer::new(Arc::clone(&self.window), options)
    }

    fn create_clock(&mut self) -> FrameClock {
        FrameClock::new()
    }

    fn attach_surface(&mut self, _renderer: &mut GpuRenderer) {
        self.window.set_visible(true);
    }

    fn detach_surface(&mut self, _renderer: &mut GpuRenderer) {
        self.window.set_visible(false);
    }

    fn add_resize_listener(&mut self) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listener = Some(id);
        id
    }

    fn remove_resize_listener(&mut self, id: ListenerId) {
        if self.listener == Some(id) {
            self.listener = None;
        }
    }

    fn request_redraw(&mut self) {
        self.window.request_redraw();
    }
}

/// Application state driven by the winit event loop.
pub struct OrreryApp {
    config: Config,
    ctx: RenderContext<WindowHost>,
    system: SolarSystem,
    failure: Option<AppError>,
}

impl OrreryApp {
    pub fn new(config: Config) -> Self {
        let ctx = RenderContext::new(context_options(&config));
        let system = SolarSystem::new(solar_system_options(&config));
        Self {
            config,
            ctx,
            system,
            failure: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ))
            .with_visible(false);
        let window = Arc::new(event_loop.create_window(attributes)?);

        self.ctx.initialize(WindowHost::new(window))?;
        self.system.setup_solar_system(&mut self.ctx)?;
        self.ctx.request_animation_frame()?;
        info!(
            "Solar system running with {} bodies (seed {})",
            self.system.body_count(),
            self.system.seed()
        );
        Ok(())
    }

    fn redraw(&mut self) {
        if !self.ctx.begin_frame() {
            return;
        }
        if let Err(e) = self.system.animate(&mut self.ctx) {
            warn!("Frame failed: {e}");
            return;
        }
        log_bodies(
            &self.system,
            self.ctx.frame_count(),
            self.config.debug.trace_bodies_every,
        );
    }

    fn shutdown(&mut self) {
        self.system.cleanup_solar_system(&mut self.ctx);
        let frames = self.ctx.frame_count();
        if self.ctx.teardown().is_some() {
            info!("Render context torn down after {frames} frames");
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!("{err}");
        self.shutdown();
        self.failure = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for OrreryApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.ctx.is_initialized() || self.failure.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                self.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if self.ctx.host().is_ok_and(WindowHost::is_listening) {
                    self.ctx.resize();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}

/// Open a window and animate the solar system until it is closed.
#[instrument(skip_all)]
pub fn run(config: Config) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = OrreryApp::new(config);
    event_loop.run_app(&mut app)?;
    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
