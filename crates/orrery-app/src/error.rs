use orrery_render::ContextError;
use orrery_space::SceneError;

use crate::platform::PlatformError;

/// Fatal errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("could not create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("render context: {0}")]
    Context(#[from] ContextError),

    #[error("solar system: {0}")]
    Scene(#[from] SceneError),
}
