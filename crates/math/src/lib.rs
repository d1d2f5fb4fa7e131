//! Spatial math: 2D/3D vectors, 4x4 matrices and the transform builders the
//! camera and drawables are built on.
//!
//! # Invariants
//! - Matrices are column-major: `m[col][row]`, translation lives in `m[3]`.
//! - `a * b` applies `b` first, then `a` (`rotate` composes `rotation * mat`).
//! - Degenerate inputs never panic and never produce NaN from normalization:
//!   a zero vector normalizes to zero.
//!
//! `glam` conversions are provided for interop; the engine itself only uses
//! the types defined here.

mod mat;
mod transform;
mod vec;

pub use mat::Mat4;
pub use transform::{degrees, look_at, ortho, perspective, radians, rotate, translate};
pub use vec::{Vec2, Vec3, Vector, cross, dot, normalize};

pub fn crate_info() -> &'static str {
    "kedarium-math v0.1.0"
}
