use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Operations shared by [`Vec2`] and [`Vec3`] so `dot` and `normalize` can be
/// written once.
pub trait Vector: Copy + Mul<f32, Output = Self> {
    const ZERO: Self;

    fn dot(self, other: Self) -> f32;

    fn length(self) -> f32 {
        self.dot(self).sqrt()
    }
}

/// Two-component float vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

/// Three-component float vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self::splat(0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Broadcast one value to every component.
    pub const fn splat(value: f32) -> Self {
        Self { x: value, y: value }
    }

    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl Vec3 {
    pub const ZERO: Self = Self::splat(0.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Broadcast one value to every component.
    pub const fn splat(value: f32) -> Self {
        Self {
            x: value,
            y: value,
            z: value,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn dot(self, other: Self) -> f32 {
        Vector::dot(self, other)
    }

    pub fn cross(self, other: Self) -> Self {
        cross(self, other)
    }

    pub fn length(self) -> f32 {
        Vector::length(self)
    }

    pub fn normalize(self) -> Self {
        normalize(self)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Vector for Vec2 {
    const ZERO: Self = Vec2::ZERO;

    fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }
}

impl Vector for Vec3 {
    const ZERO: Self = Vec3::ZERO;

    fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

/// Unit vector in the direction of `v`.
///
/// A zero-length input returns the zero vector instead of dividing by zero.
pub fn normalize<V: Vector>(v: V) -> V {
    let length = v.length();
    if length == 0.0 {
        return V::ZERO;
    }
    v * (1.0 / length)
}

pub fn dot<V: Vector>(a: V, b: V) -> f32 {
    a.dot(b)
}

pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(
        a.y * b.z - a.z * b.y,
        a.z * b.x - a.x * b.z,
        a.x * b.y - a.y * b.x,
    )
}

macro_rules! impl_vector_ops {
    ($ty:ident { $($field:ident),+ }) => {
        impl Add for $ty {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl Sub for $ty {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl Mul<f32> for $ty {
            type Output = Self;

            fn mul(self, scalar: f32) -> Self {
                Self { $($field: self.$field * scalar),+ }
            }
        }

        impl Mul<$ty> for f32 {
            type Output = $ty;

            fn mul(self, vec: $ty) -> $ty {
                vec * self
            }
        }

        impl Neg for $ty {
            type Output = Self;

            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }

        impl AddAssign for $ty {
            fn add_assign(&mut self, rhs: Self) {
                $(self.$field += rhs.$field;)+
            }
        }

        impl SubAssign for $ty {
            fn sub_assign(&mut self, rhs: Self) {
                $(self.$field -= rhs.$field;)+
            }
        }
    };
}

impl_vector_ops!(Vec2 { x, y });
impl_vector_ops!(Vec3 { x, y, z });

impl From<Vec2> for glam::Vec2 {
    fn from(v: Vec2) -> Self {
        glam::Vec2::new(v.x, v.y)
    }
}

impl From<glam::Vec2> for Vec2 {
    fn from(v: glam::Vec2) -> Self {
        Vec2::new(v.x, v.y)
    }
}

impl From<Vec3> for glam::Vec3 {
    fn from(v: Vec3) -> Self {
        glam::Vec3::new(v.x, v.y, v.z)
    }
}

impl From<glam::Vec3> for Vec3 {
    fn from(v: glam::Vec3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Vec3::new(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn default_and_splat() {
        assert_eq!(Vec3::default(), Vec3::ZERO);
        assert_eq!(Vec2::default(), Vec2::new(0.0, 0.0));
        assert_eq!(Vec3::splat(2.5), Vec3::new(2.5, 2.5, 2.5));
        assert_eq!(Vec2::splat(-1.0), Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn arithmetic() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::splat(3.0));
        assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));

        let mut c = a;
        c += b;
        c -= Vec3::splat(1.0);
        assert_eq!(c, Vec3::new(4.0, 6.0, 8.0));
    }

    #[test]
    fn scalar_multiplication_commutes() {
        let v = Vec3::new(1.0, -2.0, 0.5);
        assert_eq!(v * 3.0, 3.0 * v);
        let w = Vec2::new(0.25, 4.0);
        assert_eq!(w * 2.0, 2.0 * w);
        assert_eq!(w * 2.0, Vec2::new(0.5, 8.0));
    }

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(normalize(Vec3::ZERO), Vec3::ZERO);
        assert_eq!(normalize(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            Vec3::new(3.0, 4.0, 0.0),
            Vec3::new(-0.001, 0.002, 0.0005),
            Vec3::new(1e4, -2e4, 3e4),
            Vec3::new(0.0, 0.0, -7.0),
        ];
        for v in samples {
            let once = normalize(v);
            let twice = normalize(once);
            assert!(close(once, twice), "{v:?}");
            assert!((once.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn dot_and_cross() {
        assert_eq!(dot(Vec3::X, Vec3::Y), 0.0);
        assert_eq!(dot(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)), 11.0);
        assert_eq!(cross(Vec3::X, Vec3::Y), Vec3::Z);
        assert_eq!(cross(Vec3::Y, Vec3::X), -Vec3::Z);
        // -Z cross +Y points along +X: the camera's default right vector.
        assert_eq!(cross(-Vec3::Z, Vec3::Y), Vec3::X);
    }

    #[test]
    fn glam_conversion() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let g: glam::Vec3 = v.into();
        assert_eq!(Vec3::from(g), v);
    }

    #[test]
    fn serde_shape() {
        let v: Vec3 = serde_json::from_str(r#"{"x":0.0,"y":1.0,"z":3.0}"#).unwrap();
        assert_eq!(v, Vec3::new(0.0, 1.0, 3.0));
    }
}
