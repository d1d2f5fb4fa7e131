use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroU32;

use kedarium_common::Color;

use crate::gpu::{
    BufferId, BufferTarget, Capability, Gpu, GpuError, PolygonMode, ProgramId, ShaderId,
    ShaderStage, TextureId, UniformLocation, UniformValue, VertexArrayId,
};

/// One recorded `draw_elements` call and the state it ran under.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub vertex_array: Option<VertexArrayId>,
    pub program: Option<ProgramId>,
    /// Texture bound on unit 0.
    pub texture: Option<TextureId>,
    pub count: i32,
    pub mode: PolygonMode,
}

/// One uniform write, resolved back to its name.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformWrite {
    pub program: Option<ProgramId>,
    pub name: String,
    pub value: UniformValue,
}

/// A `vertex_attrib` call: index, components, stride and offset in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttribCall {
    pub vertex_array: Option<VertexArrayId>,
    pub index: u32,
    pub components: i32,
    pub stride: i32,
    pub offset: i32,
}

#[derive(Debug, Default)]
struct Recording {
    next_name: u32,

    vertex_arrays: HashSet<u32>,
    buffers: HashSet<u32>,
    shaders: HashMap<u32, ShaderStage>,
    programs: HashMap<u32, Vec<u32>>,
    textures: HashMap<u32, (u32, u32)>,
    double_deletes: usize,

    bound_vertex_array: Option<VertexArrayId>,
    bound_buffers: HashMap<BufferTarget, BufferId>,
    buffer_sizes: HashMap<u32, usize>,
    current_program: Option<ProgramId>,
    active_unit: u32,
    texture_units: HashMap<u32, TextureId>,

    failing_marker: Option<String>,
    failed_shaders: HashSet<u32>,
    hidden_uniforms: HashSet<String>,
    locations: HashMap<(u32, String), u32>,
    location_names: HashMap<u32, String>,

    attributes: Vec<AttribCall>,
    uniform_writes: Vec<UniformWrite>,
    draws: Vec<DrawCall>,
    enabled: Vec<Capability>,
    clear_color: Option<Color>,
    clears: usize,
    viewport: Option<[i32; 4]>,
    polygon_mode: PolygonMode,
}

impl Recording {
    fn allocate(&mut self) -> NonZeroU32 {
        self.next_name = self.next_name.saturating_add(1);
        NonZeroU32::new(self.next_name).unwrap_or(NonZeroU32::MAX)
    }

    fn double_delete(&mut self, kind: &str, name: u32) {
        self.double_deletes += 1;
        tracing::warn!(kind, name, "deleted a handle that is not live");
    }
}

/// In-memory [`Gpu`] that hands out names and records every call.
///
/// Backs the tests and headless tools. Shader compiles fail for sources
/// containing the marker set by [`RecordingGpu::fail_compiles_containing`];
/// uniforms named in [`RecordingGpu::hide_uniform`] resolve to `None`, as an
/// unused uniform does on a real driver.
#[derive(Debug, Default)]
pub struct RecordingGpu {
    state: RefCell<Recording>,
}

impl RecordingGpu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_compiles_containing(&self, marker: impl Into<String>) {
        self.state.borrow_mut().failing_marker = Some(marker.into());
    }

    pub fn hide_uniform(&self, name: impl Into<String>) {
        self.state.borrow_mut().hidden_uniforms.insert(name.into());
    }

    pub fn draw_calls(&self) -> Vec<DrawCall> {
        self.state.borrow().draws.clone()
    }

    pub fn draw_count(&self) -> usize {
        self.state.borrow().draws.len()
    }

    /// Drain the recorded draws, e.g. once per frame.
    pub fn take_draws(&self) -> Vec<DrawCall> {
        std::mem::take(&mut self.state.borrow_mut().draws)
    }

    pub fn uniform_writes(&self) -> Vec<UniformWrite> {
        self.state.borrow().uniform_writes.clone()
    }

    /// Most recent value written to `name`.
    pub fn last_uniform(&self, name: &str) -> Option<UniformValue> {
        self.state
            .borrow()
            .uniform_writes
            .iter()
            .rev()
            .find(|w| w.name == name)
            .map(|w| w.value)
    }

    pub fn uniform_write_count(&self, name: &str) -> usize {
        self.state
            .borrow()
            .uniform_writes
            .iter()
            .filter(|w| w.name == name)
            .count()
    }

    pub fn attributes(&self) -> Vec<AttribCall> {
        self.state.borrow().attributes.clone()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.state.borrow().vertex_arrays.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_textures(&self) -> usize {
        self.state.borrow().textures.len()
    }

    /// Every handle not yet deleted, across all kinds.
    pub fn live_handles(&self) -> usize {
        self.live_vertex_arrays()
            + self.live_buffers()
            + self.live_shaders()
            + self.live_programs()
            + self.live_textures()
    }

    pub fn double_deletes(&self) -> usize {
        self.state.borrow().double_deletes
    }

    pub fn buffer_len(&self, buffer: BufferId) -> Option<usize> {
        self.state.borrow().buffer_sizes.get(&buffer.get()).copied()
    }

    pub fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)> {
        self.state.borrow().textures.get(&texture.get()).copied()
    }

    pub fn current_program(&self) -> Option<ProgramId> {
        self.state.borrow().current_program
    }

    pub fn enabled(&self) -> Vec<Capability> {
        self.state.borrow().enabled.clone()
    }

    pub fn clear_color_value(&self) -> Option<Color> {
        self.state.borrow().clear_color
    }

    pub fn clear_count(&self) -> usize {
        self.state.borrow().clears
    }

    pub fn viewport_rect(&self) -> Option<[i32; 4]> {
        self.state.borrow().viewport
    }

    pub fn current_polygon_mode(&self) -> PolygonMode {
        self.state.borrow().polygon_mode
    }
}

impl Gpu for RecordingGpu {
    fn version(&self) -> String {
        "recording".to_string()
    }

    fn create_vertex_array(&self) -> Result<VertexArrayId, GpuError> {
        let mut s = self.state.borrow_mut();
        let name = s.allocate();
        s.vertex_arrays.insert(name.get());
        Ok(VertexArrayId(name))
    }

    fn bind_vertex_array(&self, vao: Option<VertexArrayId>) {
        self.state.borrow_mut().bound_vertex_array = vao;
    }

    fn delete_vertex_array(&self, vao: VertexArrayId) {
        let mut s = self.state.borrow_mut();
        if !s.vertex_arrays.remove(&vao.get()) {
            s.double_delete("vertex array", vao.get());
        }
        if s.bound_vertex_array == Some(vao) {
            s.bound_vertex_array = None;
        }
    }

    fn create_buffer(&self) -> Result<BufferId, GpuError> {
        let mut s = self.state.borrow_mut();
        let name = s.allocate();
        s.buffers.insert(name.get());
        Ok(BufferId(name))
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferId>) {
        let mut s = self.state.borrow_mut();
        match buffer {
            Some(buffer) => s.bound_buffers.insert(target, buffer),
            None => s.bound_buffers.remove(&target),
        };
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        let mut s = self.state.borrow_mut();
        if let Some(buffer) = s.bound_buffers.get(&target).copied() {
            s.buffer_sizes.insert(buffer.get(), data.len());
        }
    }

    fn delete_buffer(&self, buffer: BufferId) {
        let mut s = self.state.borrow_mut();
        if !s.buffers.remove(&buffer.get()) {
            s.double_delete("buffer", buffer.get());
        }
        s.bound_buffers.retain(|_, bound| *bound != buffer);
    }

    fn vertex_attrib(&self, index: u32, components: i32, stride: i32, offset: i32) {
        let mut s = self.state.borrow_mut();
        let vertex_array = s.bound_vertex_array;
        s.attributes.push(AttribCall {
            vertex_array,
            index,
            components,
            stride,
            offset,
        });
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, GpuError> {
        let mut s = self.state.borrow_mut();
        let name = s.allocate();
        s.shaders.insert(name.get(), stage);
        Ok(ShaderId(name))
    }

    fn compile_shader(&self, shader: ShaderId, source: &str) -> Result<(), GpuError> {
        let mut s = self.state.borrow_mut();
        let stage = s
            .shaders
            .get(&shader.get())
            .copied()
            .unwrap_or(ShaderStage::Vertex);
        let failing = s
            .failing_marker
            .as_deref()
            .is_some_and(|marker| source.contains(marker));
        if failing || source.trim().is_empty() {
            s.failed_shaders.insert(shader.get());
            return Err(GpuError::Compile {
                stage,
                log: "0:1(1): error: syntax error".to_string(),
            });
        }
        s.failed_shaders.remove(&shader.get());
        Ok(())
    }

    fn delete_shader(&self, shader: ShaderId) {
        let mut s = self.state.borrow_mut();
        if s.shaders.remove(&shader.get()).is_none() {
            s.double_delete("shader", shader.get());
        }
    }

    fn create_program(&self) -> Result<ProgramId, GpuError> {
        let mut s = self.state.borrow_mut();
        let name = s.allocate();
        s.programs.insert(name.get(), Vec::new());
        Ok(ProgramId(name))
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        if let Some(attached) = self.state.borrow_mut().programs.get_mut(&program.get()) {
            attached.push(shader.get());
        }
    }

    fn link_program(&self, program: ProgramId) -> Result<(), GpuError> {
        let s = self.state.borrow();
        let broken = s
            .programs
            .get(&program.get())
            .is_some_and(|attached| attached.iter().any(|sh| s.failed_shaders.contains(sh)));
        if broken {
            return Err(GpuError::Link {
                log: "error: linking with uncompiled shader".to_string(),
            });
        }
        Ok(())
    }

    fn use_program(&self, program: Option<ProgramId>) {
        self.state.borrow_mut().current_program = program;
    }

    fn delete_program(&self, program: ProgramId) {
        let mut s = self.state.borrow_mut();
        if s.programs.remove(&program.get()).is_none() {
            s.double_delete("program", program.get());
        }
        if s.current_program == Some(program) {
            s.current_program = None;
        }
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let mut s = self.state.borrow_mut();
        if s.hidden_uniforms.contains(name) || !s.programs.contains_key(&program.get()) {
            return None;
        }
        let key = (program.get(), name.to_string());
        if let Some(&location) = s.locations.get(&key) {
            return Some(UniformLocation(location));
        }
        let location = s.locations.len() as u32;
        s.locations.insert(key, location);
        s.location_names.insert(location, name.to_string());
        Some(UniformLocation(location))
    }

    fn set_uniform(&self, location: UniformLocation, value: UniformValue) {
        let mut s = self.state.borrow_mut();
        let Some(name) = s.location_names.get(&location.0).cloned() else {
            return;
        };
        let program = s.current_program;
        s.uniform_writes.push(UniformWrite {
            program,
            name,
            value,
        });
    }

    fn create_texture(&self) -> Result<TextureId, GpuError> {
        let mut s = self.state.borrow_mut();
        let name = s.allocate();
        s.textures.insert(name.get(), (0, 0));
        Ok(TextureId(name))
    }

    fn bind_texture(&self, unit: u32, texture: Option<TextureId>) {
        let mut s = self.state.borrow_mut();
        s.active_unit = unit;
        match texture {
            Some(texture) => s.texture_units.insert(unit, texture),
            None => s.texture_units.remove(&unit),
        };
    }

    fn texture_image_rgba8(&self, width: u32, height: u32, pixels: &[u8]) {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4));
        if expected != Some(pixels.len()) {
            return;
        }
        let mut s = self.state.borrow_mut();
        let unit = s.active_unit;
        if let Some(texture) = s.texture_units.get(&unit).copied() {
            s.textures.insert(texture.get(), (width, height));
        }
    }

    fn delete_texture(&self, texture: TextureId) {
        let mut s = self.state.borrow_mut();
        if s.textures.remove(&texture.get()).is_none() {
            s.double_delete("texture", texture.get());
        }
        s.texture_units.retain(|_, bound| *bound != texture);
    }

    fn enable(&self, capability: Capability) {
        let mut s = self.state.borrow_mut();
        if !s.enabled.contains(&capability) {
            s.enabled.push(capability);
        }
    }

    fn clear_color(&self, color: Color) {
        self.state.borrow_mut().clear_color = Some(color);
    }

    fn clear(&self) {
        self.state.borrow_mut().clears += 1;
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.state.borrow_mut().viewport = Some([x, y, width, height]);
    }

    fn polygon_mode(&self, mode: PolygonMode) {
        self.state.borrow_mut().polygon_mode = mode;
    }

    fn draw_elements(&self, count: i32) {
        let mut s = self.state.borrow_mut();
        let call = DrawCall {
            vertex_array: s.bound_vertex_array,
            program: s.current_program,
            texture: s.texture_units.get(&0).copied(),
            count,
            mode: s.polygon_mode,
        };
        s.draws.push(call);
    }
}
