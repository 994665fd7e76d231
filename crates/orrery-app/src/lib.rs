//! Orrery application shell.
//!
//! Wires config, logging and the solar system to a winit window, or to the
//! headless host for scripted runs.

pub mod error;
pub mod headless;
pub mod platform;
pub mod settings;
pub mod trace;
pub mod window;

pub use error::AppError;
