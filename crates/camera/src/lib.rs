//! Fly camera driven by the frame loop.
//!
//! # Invariants
//! - Pitch stays within [-89, 89] degrees whatever the input.
//! - Yaw is reduced by IEEE remainder into [-180, 180] degrees.
//! - An unlocked camera never moves and never touches the cursor position.

mod camera;
mod config;

pub use camera::{Camera, PITCH_LIMIT};
pub use config::CameraConfig;

pub fn crate_info() -> &'static str {
    "kedarium-camera v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("camera"));
    }
}
