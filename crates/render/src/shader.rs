use std::path::Path;
use std::rc::Rc;

use kedarium_math::{Mat4, Vec2, Vec3};

use crate::gpu::{Gpu, GpuError, ProgramId, ShaderStage, UniformValue, set_named_uniform};

/// Linked shader program.
///
/// Compile and link failures are logged, not returned: the program still
/// exists and can be bound, it just draws nothing useful. Check
/// [`Shader::is_valid`] when that matters.
pub struct Shader {
    gpu: Rc<dyn Gpu>,
    program: ProgramId,
    valid: bool,
}

impl Shader {
    /// Compile both stages and link them. Only allocation failures are
    /// errors.
    pub fn from_sources(
        gpu: &Rc<dyn Gpu>,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, GpuError> {
        let vertex = gpu.create_shader(ShaderStage::Vertex)?;
        let fragment = match gpu.create_shader(ShaderStage::Fragment) {
            Ok(fragment) => fragment,
            Err(err) => {
                gpu.delete_shader(vertex);
                return Err(err);
            }
        };

        let mut valid = true;
        for (shader, source) in [(vertex, vertex_source), (fragment, fragment_source)] {
            if let Err(err) = gpu.compile_shader(shader, source) {
                tracing::error!(%err, "shader compilation failed");
                valid = false;
            }
        }

        let program = gpu.create_program();
        if let Ok(program) = &program {
            gpu.attach_shader(*program, vertex);
            gpu.attach_shader(*program, fragment);
            if let Err(err) = gpu.link_program(*program) {
                tracing::error!(%err, "shader program link failed");
                valid = false;
            }
        }
        // The program keeps the compiled stages alive.
        gpu.delete_shader(vertex);
        gpu.delete_shader(fragment);

        Ok(Self {
            gpu: Rc::clone(gpu),
            program: program?,
            valid,
        })
    }

    /// Read both stages from disk. A missing file is logged and compiled as
    /// empty source, which then fails compilation.
    pub fn from_files(
        gpu: &Rc<dyn Gpu>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, GpuError> {
        let vertex_source = kedarium_assets::read_text(vertex_path.as_ref()).unwrap_or_default();
        let fragment_source =
            kedarium_assets::read_text(fragment_path.as_ref()).unwrap_or_default();
        let shader = Self::from_sources(gpu, &vertex_source, &fragment_source)?;
        if !shader.valid {
            tracing::warn!(
                vertex = %vertex_path.as_ref().display(),
                fragment = %fragment_path.as_ref().display(),
                "shader loaded with errors"
            );
        }
        Ok(shader)
    }

    pub fn id(&self) -> ProgramId {
        self.program
    }

    /// Whether both stages compiled and the program linked.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn use_program(&self) {
        self.gpu.use_program(Some(self.program));
    }

    /// Write `value` to the uniform `name`; a missing uniform is ignored.
    pub fn set_uniform(&self, name: &str, value: UniformValue) {
        set_named_uniform(self.gpu.as_ref(), self.program, name, value);
    }

    pub fn set_mat4(&self, name: &str, matrix: &Mat4) {
        let mut cols = [0.0; 16];
        cols.copy_from_slice(matrix.as_slice());
        self.set_uniform(name, UniformValue::Mat4(cols));
    }

    pub fn set_vec3(&self, name: &str, v: Vec3) {
        self.set_uniform(name, UniformValue::Vec3(v.to_array()));
    }

    pub fn set_vec2(&self, name: &str, v: Vec2) {
        self.set_uniform(name, UniformValue::Vec2(v.to_array()));
    }

    pub fn set_int(&self, name: &str, value: i32) {
        self.set_uniform(name, UniformValue::Int(value));
    }

    pub fn set_float(&self, name: &str, value: f32) {
        self.set_uniform(name, UniformValue::Float(value));
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        self.gpu.delete_program(self.program);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingGpu;

    const VERT: &str = "#version 330 core\nvoid main() { gl_Position = vec4(0.0); }";
    const FRAG: &str = "#version 330 core\nout vec4 c;\nvoid main() { c = vec4(1.0); }";

    fn recording() -> (Rc<RecordingGpu>, Rc<dyn Gpu>) {
        let rec = Rc::new(RecordingGpu::new());
        let gpu: Rc<dyn Gpu> = rec.clone();
        (rec, gpu)
    }

    #[test]
    fn valid_program_keeps_only_the_program_alive() {
        let (rec, gpu) = recording();
        let shader = Shader::from_sources(&gpu, VERT, FRAG).unwrap();
        assert!(shader.is_valid());
        assert_eq!(rec.live_programs(), 1);
        assert_eq!(rec.live_shaders(), 0);
        drop(shader);
        assert_eq!(rec.live_programs(), 0);
        assert_eq!(rec.double_deletes(), 0);
    }

    #[test]
    fn compile_failure_yields_invalid_program() {
        let (rec, gpu) = recording();
        rec.fail_compiles_containing("syntax error here");
        let shader = Shader::from_sources(&gpu, VERT, "syntax error here").unwrap();
        assert!(!shader.is_valid());
        // Still usable as a handle.
        shader.use_program();
        assert_eq!(rec.current_program(), Some(shader.id()));
    }

    #[test]
    fn missing_files_compile_as_empty() {
        let (_rec, gpu) = recording();
        let dir = tempfile::tempdir().unwrap();
        let shader = Shader::from_files(
            &gpu,
            dir.path().join("default.vert"),
            dir.path().join("default.frag"),
        )
        .unwrap();
        assert!(!shader.is_valid());
    }

    #[test]
    fn files_on_disk_compile() {
        let (_rec, gpu) = recording();
        let dir = tempfile::tempdir().unwrap();
        let vert = dir.path().join("default.vert");
        let frag = dir.path().join("default.frag");
        std::fs::write(&vert, VERT).unwrap();
        std::fs::write(&frag, FRAG).unwrap();
        assert!(Shader::from_files(&gpu, &vert, &frag).unwrap().is_valid());
    }

    #[test]
    fn uniform_helpers_write_by_name() {
        let (rec, gpu) = recording();
        let shader = Shader::from_sources(&gpu, VERT, FRAG).unwrap();
        shader.use_program();
        shader.set_mat4("model", &Mat4::IDENTITY);
        shader.set_vec3("camPos", Vec3::new(1.0, 2.0, 3.0));
        shader.set_int("tex0", 0);

        match rec.last_uniform("model") {
            Some(UniformValue::Mat4(m)) => assert_eq!(m[0], 1.0),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            rec.last_uniform("camPos"),
            Some(UniformValue::Vec3([1.0, 2.0, 3.0]))
        );
        assert_eq!(rec.last_uniform("tex0"), Some(UniformValue::Int(0)));
    }

    #[test]
    fn missing_uniform_is_silent() {
        let (rec, gpu) = recording();
        rec.hide_uniform("unused");
        let shader = Shader::from_sources(&gpu, VERT, FRAG).unwrap();
        shader.set_float("unused", 1.0);
        assert!(rec.uniform_writes().is_empty());
    }
}
