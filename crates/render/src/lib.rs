//! Rendering: the GPU backend seam, owned resource handles, and the
//! drawables built from them.
//!
//! # Invariants
//! - Every GPU handle has exactly one owner and is deleted exactly once, on
//!   drop. Handles keep the context (`Rc<dyn Gpu>`) alive.
//! - Drawables are created after the context exists and must be dropped
//!   before it is torn down.
//! - A missing uniform is a silent no-op.
//!
//! [`RecordingGpu`] implements [`Gpu`] in memory for tests and headless
//! tools; the OpenGL implementation lives in `kedarium-render-gl`.

mod buffer;
mod drawable;
mod element;
mod gpu;
mod light;
mod polygon;
mod recording;
mod shader;
mod shapes;
mod texture;

pub use buffer::{GpuMesh, IndexBuffer, VertexArray, VertexBuffer, VertexLayout};
pub use drawable::{Drawable, Solid};
pub use element::Element;
pub use gpu::{
    BufferId, BufferTarget, Capability, Gpu, GpuError, PolygonMode, ProgramId, ShaderId,
    ShaderStage, TextureId, UniformLocation, UniformValue, VertexArrayId, set_named_uniform,
};
pub use light::Light;
pub use polygon::{use_fill_mode, use_line_mode, use_point_mode};
pub use recording::{AttribCall, DrawCall, RecordingGpu, UniformWrite};
pub use shader::Shader;
pub use shapes::{Shape, SolidVertex};
pub use texture::Texture;

pub fn crate_info() -> &'static str {
    "kedarium-render v0.1.0"
}
