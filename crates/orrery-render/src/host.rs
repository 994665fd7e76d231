//! The host container a [`RenderContext`](crate::RenderContext) binds to.

use crate::clock::Clock;
use crate::renderer::{RenderError, Renderer, RendererOptions};

/// Subscription id returned by [`Host::add_resize_listener`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// A surface that can be rendered into: a window, or an in-memory stand-in.
pub trait Host {
    type Renderer: Renderer;
    type Clock: Clock;

    /// Current client area in logical pixels.
    fn client_size(&self) -> (u32, u32);

    /// Physical pixels per logical pixel.
    fn device_pixel_ratio(&self) -> f64;

    fn create_renderer(&mut self, options: &RendererOptions) -> Result<Self::Renderer, RenderError>;

    fn create_clock(&mut self) -> Self::Clock;

    /// Make the renderer's output visible in this host.
    fn attach_surface(&mut self, renderer: &mut Self::Renderer);

    /// Undo [`attach_surface`](Self::attach_surface).
    fn detach_surface(&mut self, renderer: &mut Self::Renderer);

    /// Start delivering resize notifications. The context calls
    /// [`RenderContext::resize`](crate::RenderContext::resize) in response.
    fn add_resize_listener(&mut self) -> ListenerId;

    /// Stop delivering resize notifications for `id`. Unknown ids are ignored.
    fn remove_resize_listener(&mut self, id: ListenerId);

    /// Ask the host to deliver a refresh so a pending frame can run.
    fn request_redraw(&mut self);
}
