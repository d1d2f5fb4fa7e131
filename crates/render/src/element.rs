use std::rc::Rc;

use bytemuck::{Pod, Zeroable};
use kedarium_math::Vec2;

use crate::buffer::{GpuMesh, VertexLayout};
use crate::drawable::Drawable;
use crate::gpu::{Gpu, GpuError};
use crate::shader::Shader;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
struct GuiVertex {
    position: [f32; 2],
    uv: [f32; 2],
}

const QUAD_INDICES: [u32; 6] = [0, 1, 3, 0, 3, 2];

/// Screen-space rectangle in pixels, top-left origin.
///
/// The quad spans `(0, 0)..(width, height)`; the shader offsets it by the
/// `position` uniform.
pub struct Element {
    mesh: GpuMesh,
    position: Vec2,
    size: Vec2,
}

impl Element {
    pub fn new(gpu: &Rc<dyn Gpu>, position: Vec2, width: f32, height: f32) -> Result<Self, GpuError> {
        #[rustfmt::skip]
        let vertices = [
            GuiVertex { position: [0.0, height], uv: [0.0, 0.0] },
            GuiVertex { position: [width, height], uv: [1.0, 0.0] },
            GuiVertex { position: [0.0, 0.0], uv: [0.0, 1.0] },
            GuiVertex { position: [width, 0.0], uv: [1.0, 1.0] },
        ];
        let mesh = GpuMesh::new(gpu, &vertices, &QUAD_INDICES, VertexLayout::GUI)?;
        Ok(Self {
            mesh,
            position,
            size: Vec2::new(width, height),
        })
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn apply_position(&self, shader: &Shader, uniform: &str) {
        shader.set_vec2(uniform, self.position);
    }
}

impl Drawable for Element {
    fn render(&self) {
        self.mesh.draw();
    }

    fn index_count(&self) -> usize {
        self.mesh.index_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::UniformValue;
    use crate::recording::RecordingGpu;

    #[test]
    fn quad_is_two_triangles() {
        let rec = Rc::new(RecordingGpu::new());
        let gpu: Rc<dyn Gpu> = rec.clone();
        let element = Element::new(&gpu, Vec2::new(10.0, 20.0), 100.0, 50.0).unwrap();
        assert_eq!(element.index_count(), 6);
        assert_eq!(element.size(), Vec2::new(100.0, 50.0));
        assert_eq!(rec.buffer_len(element.mesh.vertex_buffer().id()), Some(64));

        element.render();
        assert_eq!(rec.draw_calls()[0].count, 6);
    }

    #[test]
    fn position_uniform() {
        let rec = Rc::new(RecordingGpu::new());
        let gpu: Rc<dyn Gpu> = rec.clone();
        let shader = Shader::from_sources(&gpu, "void main() {}", "void main() {}").unwrap();
        let mut element = Element::new(&gpu, Vec2::ZERO, 1.0, 1.0).unwrap();
        element.set_position(Vec2::new(5.0, 6.0));
        shader.use_program();
        element.apply_position(&shader, "position");
        assert_eq!(
            rec.last_uniform("position"),
            Some(UniformValue::Vec2([5.0, 6.0]))
        );
    }

    #[test]
    fn drop_releases_handles() {
        let rec = Rc::new(RecordingGpu::new());
        let gpu: Rc<dyn Gpu> = rec.clone();
        drop(Element::new(&gpu, Vec2::ZERO, 1.0, 1.0).unwrap());
        assert_eq!(rec.live_handles(), 0);
        assert_eq!(rec.double_deletes(), 0);
    }
}
