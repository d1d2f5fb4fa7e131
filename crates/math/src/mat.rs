use std::ops::{Index, IndexMut, Mul, MulAssign};

use crate::vec::Vec3;

/// 4x4 float matrix stored column-major: `m[col][row]`.
///
/// The default matrix is all zeros; use [`Mat4::IDENTITY`] or
/// [`Mat4::diagonal`] for a transform base.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Mat4 {
    cols: [[f32; 4]; 4],
}

impl Mat4 {
    pub const ZERO: Self = Self::diagonal(0.0);
    pub const IDENTITY: Self = Self::diagonal(1.0);

    /// Matrix with `value` on the diagonal and zero elsewhere.
    pub const fn diagonal(value: f32) -> Self {
        Self {
            cols: [
                [value, 0.0, 0.0, 0.0],
                [0.0, value, 0.0, 0.0],
                [0.0, 0.0, value, 0.0],
                [0.0, 0.0, 0.0, value],
            ],
        }
    }

    pub const fn from_cols(cols: [[f32; 4]; 4]) -> Self {
        Self { cols }
    }

    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        self.cols
    }

    /// Elements in column-major order, the layout `glUniformMatrix4fv`
    /// expects with `transpose = false`.
    pub fn as_slice(&self) -> &[f32] {
        self.cols.as_flattened()
    }

    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.cols[3][0], self.cols[3][1], self.cols[3][2])
    }

    pub fn transpose(&self) -> Self {
        let mut out = Self::ZERO;
        for col in 0..4 {
            for row in 0..4 {
                out.cols[row][col] = self.cols[col][row];
            }
        }
        out
    }

    /// Multiply a column vector: `self * v`.
    pub fn mul_vec4(&self, v: [f32; 4]) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (row, slot) in out.iter_mut().enumerate() {
            *slot = (0..4).map(|col| self.cols[col][row] * v[col]).sum();
        }
        out
    }

    /// Transform a point (`w = 1`), dividing by the resulting `w` when it is
    /// neither zero nor one.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let [x, y, z, w] = self.mul_vec4([p.x, p.y, p.z, 1.0]);
        if w == 0.0 || w == 1.0 {
            Vec3::new(x, y, z)
        } else {
            Vec3::new(x / w, y / w, z / w)
        }
    }

    pub fn is_finite(&self) -> bool {
        self.as_slice().iter().all(|v| v.is_finite())
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.as_slice()
            .iter()
            .zip(other.as_slice())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl Index<usize> for Mat4 {
    type Output = [f32; 4];

    fn index(&self, col: usize) -> &[f32; 4] {
        &self.cols[col]
    }
}

impl IndexMut<usize> for Mat4 {
    fn index_mut(&mut self, col: usize) -> &mut [f32; 4] {
        &mut self.cols[col]
    }
}

/// `a * b` yields the transform that applies `b` first and then `a`:
/// `result[i][j] = sum_k b[i][k] * a[k][j]`.
impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut result = Mat4::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    result.cols[i][j] += rhs.cols[i][k] * self.cols[k][j];
                }
            }
        }
        result
    }
}

impl MulAssign for Mat4 {
    fn mul_assign(&mut self, rhs: Mat4) {
        *self = *self * rhs;
    }
}

impl From<Mat4> for glam::Mat4 {
    fn from(m: Mat4) -> Self {
        glam::Mat4::from_cols_array_2d(&m.cols)
    }
}

impl From<glam::Mat4> for Mat4 {
    fn from(m: glam::Mat4) -> Self {
        Mat4::from_cols(m.to_cols_array_2d())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(seed: f32) -> Mat4 {
        let mut m = Mat4::ZERO;
        for col in 0..4 {
            for row in 0..4 {
                m[col][row] = seed + (col * 4 + row) as f32 * 0.5 - (row as f32 * seed).sin();
            }
        }
        m
    }

    #[test]
    fn default_is_zero_and_diagonal_fills() {
        assert_eq!(Mat4::default(), Mat4::ZERO);
        let m = Mat4::diagonal(3.0);
        for col in 0..4 {
            for row in 0..4 {
                let expected = if col == row { 3.0 } else { 0.0 };
                assert_eq!(m[col][row], expected);
            }
        }
        assert_eq!(Mat4::diagonal(1.0), Mat4::IDENTITY);
    }

    #[test]
    fn identity_is_neutral() {
        let m = sample(1.3);
        assert_eq!(m * Mat4::IDENTITY, m);
        assert_eq!(Mat4::IDENTITY * m, m);
    }

    #[test]
    fn multiplication_matches_column_major_product() {
        let a = sample(0.7);
        let b = sample(-2.1);
        let ours: glam::Mat4 = (a * b).into();
        let oracle = glam::Mat4::from(a) * glam::Mat4::from(b);
        assert!(ours.abs_diff_eq(oracle, 1e-3));
    }

    #[test]
    fn multiplication_is_not_commutative() {
        let a = sample(0.7);
        let b = sample(-2.1);
        assert!(!(a * b).approx_eq(&(b * a), 1e-3));
    }

    #[test]
    fn right_operand_applies_first() {
        let mut translate = Mat4::IDENTITY;
        translate[3][0] = 5.0;
        let mut scale = Mat4::diagonal(2.0);
        scale[3][3] = 1.0;

        // scale * translate: translate first, then scale the result.
        let p = (scale * translate).transform_point(Vec3::ZERO);
        assert_eq!(p, Vec3::new(10.0, 0.0, 0.0));
        let q = (translate * scale).transform_point(Vec3::ZERO);
        assert_eq!(q, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn slice_is_column_major() {
        let mut m = Mat4::IDENTITY;
        m[3][0] = 7.0;
        assert_eq!(m.as_slice()[12], 7.0);
        assert_eq!(m.as_slice().len(), 16);
        assert_eq!(m.translation(), Vec3::new(7.0, 0.0, 0.0));
    }

    #[test]
    fn transpose_roundtrip() {
        let m = sample(0.2);
        assert_eq!(m.transpose().transpose(), m);
        assert_eq!(m.transpose()[1][0], m[0][1]);
    }
}
