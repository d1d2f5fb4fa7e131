use std::path::PathBuf;

use kedarium_render::GpuError;

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Create(String),
    #[error("OpenGL context error: {0}")]
    Context(#[from] glutin::error::Error),
    #[error("window handle unavailable: {0}")]
    Handle(#[from] raw_window_handle::HandleError),
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
