use kedarium_math::Vec3;
use serde::{Deserialize, Serialize};

/// Startup parameters for a [`crate::Camera`]. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// World units per second.
    pub speed: f32,
    /// Degrees per pixel of cursor travel.
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            yaw: -90.0,
            pitch: 0.0,
            fov: 60.0,
            near: 0.1,
            far: 100.0,
            speed: 5.0,
            sensitivity: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: CameraConfig = serde_json::from_str(r#"{ "fov": 90.0, "speed": 2.5 }"#).unwrap();
        assert_eq!(config.fov, 90.0);
        assert_eq!(config.speed, 2.5);
        assert_eq!(config.yaw, -90.0);
        assert_eq!(config.position, Vec3::new(0.0, 0.0, 3.0));
    }
}
