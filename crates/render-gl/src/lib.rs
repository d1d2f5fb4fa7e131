//! OpenGL backend: implements [`kedarium_render::Gpu`] over `glow`.
//!
//! # Invariants
//! - The GL context wrapped by [`GlowGpu`] is current on the calling thread
//!   for the whole lifetime of the value.
//! - Handle newtypes map one-to-one onto GL object names.

mod glow_gpu;

pub use glow_gpu::GlowGpu;

pub fn crate_info() -> &'static str {
    "kedarium-render-gl v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render-gl"));
    }
}
