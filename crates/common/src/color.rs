use serde::{Deserialize, Serialize};

/// RGBA color with every channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb8(255, 255, 255);
    pub const BLACK: Self = Self::rgb8(0, 0, 0);
    pub const RED: Self = Self::rgb8(255, 0, 0);
    pub const GREEN: Self = Self::rgb8(0, 255, 0);
    pub const BLUE: Self = Self::rgb8(0, 0, 255);
    pub const YELLOW: Self = Self::rgb8(255, 255, 0);
    pub const CYAN: Self = Self::rgb8(0, 255, 255);
    pub const MAGENTA: Self = Self::rgb8(255, 0, 255);

    /// Build from 8-bit channels and a `[0, 1]` alpha.
    pub const fn rgba8(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha,
        }
    }

    pub const fn rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgba8(red, green, blue, 1.0)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    pub fn rgb(self) -> [f32; 3] {
        [self.red, self.green, self.blue]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_are_normalized() {
        let c = Color::rgba8(51, 102, 255, 0.5);
        assert!((c.red - 0.2).abs() < 1e-6);
        assert!((c.green - 0.4).abs() < 1e-6);
        assert_eq!(c.blue, 1.0);
        assert_eq!(c.alpha, 0.5);
    }

    #[test]
    fn named_constants() {
        assert_eq!(Color::WHITE.to_array(), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(Color::BLACK.to_array(), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(Color::YELLOW.rgb(), [1.0, 1.0, 0.0]);
        assert_eq!(Color::CYAN.rgb(), [0.0, 1.0, 1.0]);
        assert_eq!(Color::MAGENTA.rgb(), [1.0, 0.0, 1.0]);
        assert_eq!(Color::default(), Color::BLACK);
    }

    #[test]
    fn deserializes_from_json() {
        let c: Color =
            serde_json::from_str(r#"{"red":0.1,"green":0.2,"blue":0.3,"alpha":1.0}"#).unwrap();
        assert_eq!(c.rgb(), [0.1, 0.2, 0.3]);
    }
}
