//! Window, GL context and the update/render frame loop.
//!
//! [`Stage`] holds everything the loop needs that is not tied to the OS
//! window, so it can be driven headless against a `RecordingGpu`.
//! [`Runtime`] wraps it in a winit window with a glutin OpenGL context.
//!
//! # Invariants
//! - Construction is fail-fast: if the window, the context or the baseline
//!   GL state cannot be set up, `Runtime::run` returns an error and no frame
//!   is ever run.
//! - Each frame is one update phase followed by one render phase.
//! - A resize reaches the viewport and the bound camera before the next
//!   render phase.
//! - The app and every GPU resource are dropped before the GL context.

mod app;
mod clock;
mod config;
mod error;
mod platform;
mod runtime;
mod stage;

pub use app::App;
pub use clock::{FrameClock, FrameTime};
pub use config::WindowConfig;
pub use error::WindowError;
pub use runtime::Runtime;
pub use stage::{Stage, WindowRequest};

pub fn crate_info() -> &'static str {
    "kedarium-window v0.1.0"
}
