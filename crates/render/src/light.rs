use kedarium_common::Color;
use kedarium_math::Vec3;

use crate::shader::Shader;

/// Point light written into the `lightPos`, `lightCol` and `lightIntensity`
/// uniform arrays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl Light {
    pub fn new(position: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            position,
            color,
            intensity,
        }
    }

    /// Write this light into slot `index` of the light arrays.
    pub fn apply(&self, shader: &Shader, index: usize) {
        shader.set_vec3(&format!("lightPos[{index}]"), self.position);
        shader.set_vec3(&format!("lightCol[{index}]"), Vec3::from(self.color.rgb()));
        shader.set_float(&format!("lightIntensity[{index}]"), self.intensity);
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Color::WHITE, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::{Gpu, UniformValue};
    use crate::recording::RecordingGpu;
    use std::rc::Rc;

    #[test]
    fn apply_writes_indexed_uniforms() {
        let rec = Rc::new(RecordingGpu::new());
        let gpu: Rc<dyn Gpu> = rec.clone();
        let shader = Shader::from_sources(&gpu, "void main() {}", "void main() {}").unwrap();
        shader.use_program();

        let light = Light::new(Vec3::new(0.0, 5.0, 0.0), Color::YELLOW, 0.75);
        light.apply(&shader, 2);

        assert_eq!(
            rec.last_uniform("lightPos[2]"),
            Some(UniformValue::Vec3([0.0, 5.0, 0.0]))
        );
        assert_eq!(
            rec.last_uniform("lightCol[2]"),
            Some(UniformValue::Vec3([1.0, 1.0, 0.0]))
        );
        assert_eq!(
            rec.last_uniform("lightIntensity[2]"),
            Some(UniformValue::Float(0.75))
        );
        assert_eq!(rec.last_uniform("lightPos[0]"), None);
    }
}
