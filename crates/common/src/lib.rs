//! Shared types used across the kedarium crates.
//!
//! # Invariants
//! - Color channels are stored normalized to `[0, 1]`.

mod color;
mod info;

pub use color::Color;
pub use info::{ENGINE_AUTHOR, ENGINE_LICENSE, ENGINE_NAME, ENGINE_VERSION, engine_info};

pub fn crate_info() -> &'static str {
    "kedarium-common v0.1.0"
}
