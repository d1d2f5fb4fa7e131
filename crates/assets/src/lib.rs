//! Asset loading: text files, PNG images, Wavefront OBJ meshes, and a keyed
//! registry for loaded resources.
//!
//! Loaders hand back plain CPU-side buffers; uploading them is the render
//! crate's job.
//!
//! # Invariants
//! - Decoded images are RGBA8 with row 0 at the bottom (GL texture origin).
//! - OBJ meshes come out in the 11-float solid layout
//!   (position, color, uv, normal).
//! - Registry lookups never panic; a miss is `None` plus a warning.

mod file;
mod png;
mod obj;
mod registry;

pub use file::read_text;
pub use png::{ImageData, decode_image, load_png};
pub use obj::{OBJ_VERTEX_FLOATS, ObjMesh};
pub use registry::Registry;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("OBJ line {line}: index {index} out of range")]
    ObjIndex { line: usize, index: i64 },
}

pub fn crate_info() -> &'static str {
    "kedarium-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("assets"));
    }

    #[test]
    fn obj_index_error_names_line() {
        let err = AssetError::ObjIndex { line: 7, index: -4 };
        assert_eq!(err.to_string(), "OBJ line 7: index -4 out of range");
    }
}
