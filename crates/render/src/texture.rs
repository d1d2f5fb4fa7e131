use std::path::Path;
use std::rc::Rc;

use kedarium_assets::ImageData;

use crate::gpu::{Gpu, GpuError, TextureId};
use crate::shader::Shader;

/// Owned 2D RGBA texture.
pub struct Texture {
    gpu: Rc<dyn Gpu>,
    id: TextureId,
    size: (u32, u32),
}

impl Texture {
    /// Upload decoded pixels (bottom row first). A pixel buffer that does not
    /// match `width * height` is logged and yields an empty texture.
    pub fn new(gpu: &Rc<dyn Gpu>, image: &ImageData) -> Result<Self, GpuError> {
        if !image.is_complete() {
            tracing::warn!(
                width = image.width,
                height = image.height,
                bytes = image.pixels.len(),
                "pixel buffer does not match image size, using empty texture"
            );
            return Self::empty(gpu);
        }
        let id = gpu.create_texture()?;
        gpu.bind_texture(0, Some(id));
        gpu.texture_image_rgba8(image.width, image.height, &image.pixels);
        gpu.bind_texture(0, None);
        Ok(Self {
            gpu: Rc::clone(gpu),
            id,
            size: (image.width, image.height),
        })
    }

    /// Load a PNG. A file that fails to load or decode is logged and yields
    /// an empty texture that samples as black.
    pub fn from_png(gpu: &Rc<dyn Gpu>, path: impl AsRef<Path>) -> Result<Self, GpuError> {
        match kedarium_assets::load_png(path.as_ref()) {
            Ok(image) => Self::new(gpu, &image),
            Err(err) => {
                tracing::warn!(path = %path.as_ref().display(), %err, "using empty texture");
                Self::empty(gpu)
            }
        }
    }

    fn empty(gpu: &Rc<dyn Gpu>) -> Result<Self, GpuError> {
        Ok(Self {
            gpu: Rc::clone(gpu),
            id: gpu.create_texture()?,
            size: (0, 0),
        })
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    /// `(width, height)`; `(0, 0)` when loading failed.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn bind(&self, unit: u32) {
        self.gpu.bind_texture(unit, Some(self.id));
    }

    pub fn unbind(&self, unit: u32) {
        self.gpu.bind_texture(unit, None);
    }

    /// Point the sampler uniform `name` at texture `unit`.
    pub fn apply_unit(&self, shader: &Shader, name: &str, unit: u32) {
        shader.set_int(name, unit as i32);
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.gpu.delete_texture(self.id);
    }
}
