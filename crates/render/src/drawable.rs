use std::rc::Rc;

use kedarium_math::{Mat4, Vec3, rotate, translate};

use crate::buffer::{GpuMesh, VertexLayout};
use crate::gpu::{Gpu, GpuError};
use crate::shader::Shader;
use crate::shapes::Shape;

/// Something that can issue its own draw call.
///
/// Callers upload the transform uniforms first; `render` only binds the
/// geometry and draws it.
pub trait Drawable {
    fn render(&self);

    /// Number of indices drawn per `render`.
    fn index_count(&self) -> usize;
}

/// 3D geometry with a model matrix.
pub struct Solid {
    mesh: GpuMesh,
    model: Mat4,
    shape: &'static str,
}

impl Solid {
    /// Upload `shape` and place it at `position`.
    pub fn new(gpu: &Rc<dyn Gpu>, position: Vec3, shape: &Shape) -> Result<Self, GpuError> {
        let (vertices, indices) = shape.geometry();
        let mesh = GpuMesh::new(gpu, &vertices, &indices, VertexLayout::SOLID)?;
        tracing::debug!(
            shape = shape.name(),
            vertices = vertices.len(),
            indices = indices.len(),
            "created solid"
        );
        Ok(Self {
            mesh,
            model: translate(Mat4::IDENTITY, position),
            shape: shape.name(),
        })
    }

    pub fn shape_name(&self) -> &'static str {
        self.shape
    }

    pub fn model(&self) -> Mat4 {
        self.model
    }

    pub fn set_model(&mut self, model: Mat4) {
        self.model = model;
    }

    pub fn position(&self) -> Vec3 {
        self.model.translation()
    }

    /// Move by `offset`; accumulates.
    pub fn translate(&mut self, offset: Vec3) {
        self.model = translate(self.model, offset);
    }

    /// Rotate the model matrix by `angle` degrees about `axis` through the
    /// world origin.
    pub fn rotate(&mut self, angle: f32, axis: Vec3) {
        self.model = rotate(self.model, angle, axis);
    }

    pub fn apply_model_matrix(&self, shader: &Shader, uniform: &str) {
        shader.set_mat4(uniform, &self.model);
    }

    pub fn mesh(&self) -> &GpuMesh {
        &self.mesh
    }
}

impl Drawable for Solid {
    fn render(&self) {
        self.mesh.draw();
    }

    fn index_count(&self) -> usize {
        self.mesh.index_count()
    }
}
