use std::rc::Rc;

use bytemuck::Pod;

use crate::gpu::{BufferId, BufferTarget, Gpu, GpuError, VertexArrayId};

/// Float attribute widths of an interleaved vertex, in attribute order.
///
/// The same description drives the attribute pointers and the stride used
/// for upload, so the two cannot disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    components: &'static [i32],
}

impl VertexLayout {
    /// Position 3, color 3.
    pub const POS_COLOR: Self = Self::new(&[3, 3]);
    /// Position 3, color 3, uv 2.
    pub const POS_COLOR_UV: Self = Self::new(&[3, 3, 2]);
    /// Position 3, color 3, uv 2, normal 3.
    pub const SOLID: Self = Self::new(&[3, 3, 2, 3]);
    /// Screen position 2, uv 2.
    pub const GUI: Self = Self::new(&[2, 2]);

    pub const fn new(components: &'static [i32]) -> Self {
        Self { components }
    }

    pub fn floats_per_vertex(&self) -> usize {
        self.components.iter().sum::<i32>() as usize
    }

    pub fn stride_bytes(&self) -> i32 {
        (self.floats_per_vertex() * size_of::<f32>()) as i32
    }

    /// `(index, components, byte offset)` for each attribute.
    pub fn attributes(&self) -> impl Iterator<Item = (u32, i32, i32)> + '_ {
        let mut offset = 0;
        self.components
            .iter()
            .enumerate()
            .map(move |(index, &components)| {
                let attr = (index as u32, components, offset * size_of::<f32>() as i32);
                offset += components;
                attr
            })
    }
}

/// Owned vertex array object.
pub struct VertexArray {
    gpu: Rc<dyn Gpu>,
    id: VertexArrayId,
}

impl VertexArray {
    pub fn new(gpu: &Rc<dyn Gpu>) -> Result<Self, GpuError> {
        let id = gpu.create_vertex_array()?;
        Ok(Self {
            gpu: Rc::clone(gpu),
            id,
        })
    }

    pub fn id(&self) -> VertexArrayId {
        self.id
    }

    pub fn bind(&self) {
        self.gpu.bind_vertex_array(Some(self.id));
    }

    pub fn unbind(&self) {
        self.gpu.bind_vertex_array(None);
    }

    /// Point every attribute of `layout` at `buffer`. This array must be
    /// bound.
    pub fn link_layout(&self, buffer: &VertexBuffer, layout: VertexLayout) {
        buffer.bind();
        let stride = layout.stride_bytes();
        for (index, components, offset) in layout.attributes() {
            self.gpu.vertex_attrib(index, components, stride, offset);
        }
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        self.gpu.delete_vertex_array(self.id);
    }
}

/// Owned buffer of interleaved vertex data.
pub struct VertexBuffer {
    gpu: Rc<dyn Gpu>,
    id: BufferId,
    len_bytes: usize,
}

impl VertexBuffer {
    pub fn new<V: Pod>(gpu: &Rc<dyn Gpu>, vertices: &[V]) -> Result<Self, GpuError> {
        let id = gpu.create_buffer()?;
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        gpu.bind_buffer(BufferTarget::Vertex, Some(id));
        gpu.buffer_data(BufferTarget::Vertex, bytes);
        Ok(Self {
            gpu: Rc::clone(gpu),
            id,
            len_bytes: bytes.len(),
        })
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn len_bytes(&self) -> usize {
        self.len_bytes
    }

    pub fn bind(&self) {
        self.gpu.bind_buffer(BufferTarget::Vertex, Some(self.id));
    }

    pub fn unbind(&self) {
        self.gpu.bind_buffer(BufferTarget::Vertex, None);
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        self.gpu.delete_buffer(self.id);
    }
}

/// Owned buffer of `u32` triangle indices.
pub struct IndexBuffer {
    gpu: Rc<dyn Gpu>,
    id: BufferId,
    count: usize,
}

impl IndexBuffer {
    pub fn new(gpu: &Rc<dyn Gpu>, indices: &[u32]) -> Result<Self, GpuError> {
        let id = gpu.create_buffer()?;
        gpu.bind_buffer(BufferTarget::Index, Some(id));
        gpu.buffer_data(BufferTarget::Index, bytemuck::cast_slice(indices));
        Ok(Self {
            gpu: Rc::clone(gpu),
            id,
            count: indices.len(),
        })
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn bind(&self) {
        self.gpu.bind_buffer(BufferTarget::Index, Some(self.id));
    }

    pub fn unbind(&self) {
        self.gpu.bind_buffer(BufferTarget::Index, None);
    }
}

impl Drop for IndexBuffer {
    fn drop(&mut self) {
        self.gpu.delete_buffer(self.id);
    }
}

/// Indexed geometry: one vertex array, one vertex buffer, one index buffer.
pub struct GpuMesh {
    vao: VertexArray,
    vbo: VertexBuffer,
    ebo: IndexBuffer,
}

impl GpuMesh {
    /// Upload `vertices` and `indices` and record `layout` in a new vertex
    /// array. Leaves nothing bound.
    pub fn new<V: Pod>(
        gpu: &Rc<dyn Gpu>,
        vertices: &[V],
        indices: &[u32],
        layout: VertexLayout,
    ) -> Result<Self, GpuError> {
        let vao = VertexArray::new(gpu)?;
        vao.bind();
        let vbo = VertexBuffer::new(gpu, vertices)?;
        let ebo = IndexBuffer::new(gpu, indices)?;
        vao.link_layout(&vbo, layout);
        ebo.bind();

        vao.unbind();
        vbo.unbind();
        ebo.unbind();
        Ok(Self { vao, vbo, ebo })
    }

    pub fn vertex_array(&self) -> &VertexArray {
        &self.vao
    }

    pub fn vertex_buffer(&self) -> &VertexBuffer {
        &self.vbo
    }

    pub fn index_buffer(&self) -> &IndexBuffer {
        &self.ebo
    }

    pub fn index_count(&self) -> usize {
        self.ebo.count()
    }

    /// Bind, draw every index as triangles, unbind.
    pub fn draw(&self) {
        self.vao.bind();
        self.vao.gpu.draw_elements(self.ebo.count() as i32);
        self.vao.unbind();
    }
}
