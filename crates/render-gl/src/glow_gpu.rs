use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::{CStr, c_void};

use glow::HasContext as _;
use kedarium_common::Color;
use kedarium_render::{
    BufferId, BufferTarget, Capability, Gpu, GpuError, PolygonMode, ProgramId, ShaderId,
    ShaderStage, TextureId, UniformLocation, UniformValue, VertexArrayId,
};

/// [`Gpu`] backed by a live OpenGL 3.3 core context.
pub struct GlowGpu {
    gl: glow::Context,
    shader_stages: RefCell<HashMap<ShaderId, ShaderStage>>,
}

impl GlowGpu {
    /// Load GL entry points through `loader`.
    ///
    /// # Safety
    /// The context the loader resolves against must be current on this
    /// thread, and stay current for as long as the returned value is used.
    pub unsafe fn from_loader<F>(loader: F) -> Self
    where
        F: FnMut(&CStr) -> *const c_void,
    {
        let gl = unsafe { glow::Context::from_loader_function_cstr(loader) };
        Self {
            gl,
            shader_stages: RefCell::default(),
        }
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }
}

fn buffer_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Vertex => glow::ARRAY_BUFFER,
        BufferTarget::Index => glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn native_program(program: ProgramId) -> glow::NativeProgram {
    glow::NativeProgram(program.0)
}

impl Gpu for GlowGpu {
    fn version(&self) -> String {
        unsafe { self.gl.get_parameter_string(glow::VERSION) }
    }

    fn create_vertex_array(&self) -> Result<VertexArrayId, GpuError> {
        let vao = unsafe { self.gl.create_vertex_array() }.map_err(|err| {
            tracing::error!(%err, "glGenVertexArrays failed");
            GpuError::Allocation("vertex array")
        })?;
        Ok(VertexArrayId(vao.0))
    }

    fn bind_vertex_array(&self, vao: Option<VertexArrayId>) {
        unsafe {
            self.gl
                .bind_vertex_array(vao.map(|v| glow::NativeVertexArray(v.0)))
        };
    }

    fn delete_vertex_array(&self, vao: VertexArrayId) {
        unsafe { self.gl.delete_vertex_array(glow::NativeVertexArray(vao.0)) };
    }

    fn create_buffer(&self) -> Result<BufferId, GpuError> {
        let buffer = unsafe { self.gl.create_buffer() }.map_err(|err| {
            tracing::error!(%err, "glGenBuffers failed");
            GpuError::Allocation("buffer")
        })?;
        Ok(BufferId(buffer.0))
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferId>) {
        unsafe {
            self.gl.bind_buffer(
                buffer_target(target),
                buffer.map(|b| glow::NativeBuffer(b.0)),
            )
        };
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(buffer_target(target), data, glow::STATIC_DRAW)
        };
    }

    fn delete_buffer(&self, buffer: BufferId) {
        unsafe { self.gl.delete_buffer(glow::NativeBuffer(buffer.0)) };
    }

    fn vertex_attrib(&self, index: u32, components: i32, stride: i32, offset: i32) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, components, glow::FLOAT, false, stride, offset);
            self.gl.enable_vertex_attrib_array(index);
        }
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, GpuError> {
        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        let shader = unsafe { self.gl.create_shader(kind) }.map_err(|err| {
            tracing::error!(%err, %stage, "glCreateShader failed");
            GpuError::Allocation("shader")
        })?;
        let id = ShaderId(shader.0);
        self.shader_stages.borrow_mut().insert(id, stage);
        Ok(id)
    }

    fn compile_shader(&self, shader: ShaderId, source: &str) -> Result<(), GpuError> {
        let native = glow::NativeShader(shader.0);
        unsafe {
            self.gl.shader_source(native, source);
            self.gl.compile_shader(native);
            if self.gl.get_shader_compile_status(native) {
                return Ok(());
            }
            let stage = self
                .shader_stages
                .borrow()
                .get(&shader)
                .copied()
                .unwrap_or(ShaderStage::Vertex);
            Err(GpuError::Compile {
                stage,
                log: self.gl.get_shader_info_log(native),
            })
        }
    }

    fn delete_shader(&self, shader: ShaderId) {
        self.shader_stages.borrow_mut().remove(&shader);
        unsafe { self.gl.delete_shader(glow::NativeShader(shader.0)) };
    }

    fn create_program(&self) -> Result<ProgramId, GpuError> {
        let program = unsafe { self.gl.create_program() }.map_err(|err| {
            tracing::error!(%err, "glCreateProgram failed");
            GpuError::Allocation("program")
        })?;
        Ok(ProgramId(program.0))
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        unsafe {
            self.gl
                .attach_shader(native_program(program), glow::NativeShader(shader.0))
        };
    }

    fn link_program(&self, program: ProgramId) -> Result<(), GpuError> {
        let native = native_program(program);
        unsafe {
            self.gl.link_program(native);
            if self.gl.get_program_link_status(native) {
                Ok(())
            } else {
                Err(GpuError::Link {
                    log: self.gl.get_program_info_log(native),
                })
            }
        }
    }

    fn use_program(&self, program: Option<ProgramId>) {
        unsafe { self.gl.use_program(program.map(native_program)) };
    }

    fn delete_program(&self, program: ProgramId) {
        unsafe { self.gl.delete_program(native_program(program)) };
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        unsafe { self.gl.get_uniform_location(native_program(program), name) }
            .map(|loc| UniformLocation(loc.0))
    }

    fn set_uniform(&self, location: UniformLocation, value: UniformValue) {
        let loc = glow::NativeUniformLocation(location.0);
        let loc = Some(&loc);
        unsafe {
            match value {
                UniformValue::Int(v) => self.gl.uniform_1_i32(loc, v),
                UniformValue::Float(v) => self.gl.uniform_1_f32(loc, v),
                UniformValue::Vec2([x, y]) => self.gl.uniform_2_f32(loc, x, y),
                UniformValue::Vec3([x, y, z]) => self.gl.uniform_3_f32(loc, x, y, z),
                UniformValue::Vec4([x, y, z, w]) => self.gl.uniform_4_f32(loc, x, y, z, w),
                UniformValue::Mat4(m) => self.gl.uniform_matrix_4_f32_slice(loc, false, &m),
            }
        }
    }

    fn create_texture(&self) -> Result<TextureId, GpuError> {
        let texture = unsafe { self.gl.create_texture() }.map_err(|err| {
            tracing::error!(%err, "glGenTextures failed");
            GpuError::Allocation("texture")
        })?;
        Ok(TextureId(texture.0))
    }

    fn bind_texture(&self, unit: u32, texture: Option<TextureId>) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl
                .bind_texture(glow::TEXTURE_2D, texture.map(|t| glow::NativeTexture(t.0)));
        }
    }

    fn texture_image_rgba8(&self, width: u32, height: u32, pixels: &[u8]) {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4));
        if expected != Some(pixels.len()) {
            tracing::error!(
                width,
                height,
                bytes = pixels.len(),
                "pixel buffer does not match texture size"
            );
            return;
        }
        let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
            tracing::error!(width, height, "texture size exceeds GL limits");
            return;
        };
        unsafe {
            let gl = &self.gl;
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::NEAREST_MIPMAP_LINEAR as i32,
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                w,
                h,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            );
            gl.generate_mipmap(glow::TEXTURE_2D);
        }
    }

    fn delete_texture(&self, texture: TextureId) {
        unsafe { self.gl.delete_texture(glow::NativeTexture(texture.0)) };
    }

    fn enable(&self, capability: Capability) {
        unsafe {
            match capability {
                Capability::DepthTest => self.gl.enable(glow::DEPTH_TEST),
                Capability::CullFace => {
                    self.gl.enable(glow::CULL_FACE);
                    self.gl.cull_face(glow::BACK);
                    self.gl.front_face(glow::CCW);
                }
                Capability::Blend => {
                    self.gl.enable(glow::BLEND);
                    self.gl
                        .blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
                }
                Capability::Multisample => self.gl.enable(glow::MULTISAMPLE),
            }
        }
    }

    fn clear_color(&self, color: Color) {
        unsafe {
            self.gl
                .clear_color(color.red, color.green, color.blue, color.alpha)
        };
    }

    fn clear(&self) {
        unsafe { self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT) };
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) };
    }

    fn polygon_mode(&self, mode: PolygonMode) {
        let mode = match mode {
            PolygonMode::Point => glow::POINT,
            PolygonMode::Line => glow::LINE,
            PolygonMode::Fill => glow::FILL,
        };
        unsafe { self.gl.polygon_mode(glow::FRONT_AND_BACK, mode) };
    }

    fn draw_elements(&self, count: i32) {
        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLES, count, glow::UNSIGNED_INT, 0)
        };
    }
}
