use std::fmt;
use std::num::NonZeroU32;

use kedarium_common::Color;

macro_rules! gpu_handle {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $name(pub NonZeroU32);

            impl $name {
                pub fn get(self) -> u32 {
                    self.0.get()
                }
            }
        )+
    };
}

gpu_handle!(
    /// Vertex array object name.
    VertexArrayId,
    /// Buffer object name (vertex or index data).
    BufferId,
    /// Linked shader program name.
    ProgramId,
    /// Single shader stage object name.
    ShaderId,
    /// 2D texture name.
    TextureId,
);

/// Resolved uniform slot within one program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Vertex,
    Index,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Fixed-function state toggled at context setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    DepthTest,
    /// Back-face culling.
    CullFace,
    /// Source-alpha blending.
    Blend,
    Multisample,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolygonMode {
    Point,
    Line,
    #[default]
    Fill,
}

/// Value written to a uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    /// Column-major 4x4 matrix.
    Mat4([f32; 16]),
}

/// Errors from GPU operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GpuError {
    #[error("failed to allocate {0}")]
    Allocation(&'static str),
    #[error("failed to compile the {stage} shader: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("failed to link the shader program: {log}")]
    Link { log: String },
}

/// The graphics calls the engine makes, behind one object-safe seam.
///
/// Implementations are single-threaded and shared as `Rc<dyn Gpu>`; every
/// method takes `&self`. Resource wrappers in this crate own their handles
/// and call the matching `delete_*` exactly once on drop.
pub trait Gpu {
    /// Human-readable driver/version string.
    fn version(&self) -> String;

    fn create_vertex_array(&self) -> Result<VertexArrayId, GpuError>;
    fn bind_vertex_array(&self, vao: Option<VertexArrayId>);
    fn delete_vertex_array(&self, vao: VertexArrayId);

    fn create_buffer(&self) -> Result<BufferId, GpuError>;
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferId>);
    /// Upload `data` to the buffer bound at `target` (static draw).
    fn buffer_data(&self, target: BufferTarget, data: &[u8]);
    fn delete_buffer(&self, buffer: BufferId);

    /// Describe a float attribute of the bound vertex buffer and enable it.
    /// `stride` and `offset` are in bytes.
    fn vertex_attrib(&self, index: u32, components: i32, stride: i32, offset: i32);

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, GpuError>;
    /// Set the source and compile; failure carries the info log.
    fn compile_shader(&self, shader: ShaderId, source: &str) -> Result<(), GpuError>;
    fn delete_shader(&self, shader: ShaderId);

    fn create_program(&self) -> Result<ProgramId, GpuError>;
    fn attach_shader(&self, program: ProgramId, shader: ShaderId);
    fn link_program(&self, program: ProgramId) -> Result<(), GpuError>;
    fn use_program(&self, program: Option<ProgramId>);
    fn delete_program(&self, program: ProgramId);

    /// `None` when the program has no active uniform called `name`.
    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;
    /// Write to the currently used program.
    fn set_uniform(&self, location: UniformLocation, value: UniformValue);

    fn create_texture(&self) -> Result<TextureId, GpuError>;
    /// Make `unit` active and bind `texture` to it.
    fn bind_texture(&self, unit: u32, texture: Option<TextureId>);
    /// Upload RGBA8 pixels to the bound texture and build mipmaps.
    /// Implementations skip the upload unless `pixels` holds exactly
    /// `width * height * 4` bytes.
    fn texture_image_rgba8(&self, width: u32, height: u32, pixels: &[u8]);
    fn delete_texture(&self, texture: TextureId);

    fn enable(&self, capability: Capability);
    fn clear_color(&self, color: Color);
    /// Clear color and depth.
    fn clear(&self);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn polygon_mode(&self, mode: PolygonMode);
    /// Draw `count` `u32` indices from the bound index buffer as triangles.
    fn draw_elements(&self, count: i32);
}

/// Resolve `name` in `program` and write `value`; a missing uniform is a
/// silent no-op.
pub fn set_named_uniform(gpu: &dyn Gpu, program: ProgramId, name: &str, value: UniformValue) {
    if let Some(location) = gpu.uniform_location(program, name) {
        gpu.set_uniform(location, value);
    }
}
