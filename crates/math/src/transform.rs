use std::f32::consts::PI;

use crate::mat::Mat4;
use crate::vec::{Vec3, cross, dot, normalize};

pub fn radians(degrees: f32) -> f32 {
    degrees * (PI / 180.0)
}

pub fn degrees(radians: f32) -> f32 {
    radians * (180.0 / PI)
}

/// Offset the translation column of `mat` by `offset`.
///
/// The offset is added to any existing translation, so repeated calls
/// accumulate.
pub fn translate(mat: Mat4, offset: Vec3) -> Mat4 {
    let mut result = mat;
    result[3][0] += offset.x;
    result[3][1] += offset.y;
    result[3][2] += offset.z;
    result
}

/// Rotate `mat` by `angle` degrees about `axis` (Rodrigues' formula).
///
/// Returns `rotation * mat`. A zero-length axis leaves `mat` unchanged.
pub fn rotate(mat: Mat4, angle: f32, axis: Vec3) -> Mat4 {
    let axis = normalize(axis);
    if axis == Vec3::ZERO {
        return mat;
    }

    let (s, c) = radians(angle).sin_cos();
    let t = 1.0 - c;
    let Vec3 { x, y, z } = axis;

    let mut rotation = Mat4::IDENTITY;
    rotation[0][0] = c + x * x * t;
    rotation[0][1] = y * x * t + z * s;
    rotation[0][2] = z * x * t - y * s;

    rotation[1][0] = x * y * t - z * s;
    rotation[1][1] = c + y * y * t;
    rotation[1][2] = z * y * t + x * s;

    rotation[2][0] = x * z * t + y * s;
    rotation[2][1] = y * z * t - x * s;
    rotation[2][2] = c + z * z * t;

    rotation * mat
}

/// OpenGL orthographic projection mapping the box to the `[-1, 1]` clip cube.
///
/// `right == left`, `top == bottom` or `z_far == z_near` divide by zero.
pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, z_near: f32, z_far: f32) -> Mat4 {
    let mut result = Mat4::IDENTITY;
    result[0][0] = 2.0 / (right - left);
    result[1][1] = 2.0 / (top - bottom);
    result[2][2] = -2.0 / (z_far - z_near);
    result[3][0] = -(right + left) / (right - left);
    result[3][1] = -(top + bottom) / (top - bottom);
    result[3][2] = -(z_far + z_near) / (z_far - z_near);
    result
}

/// OpenGL perspective projection. `fov` is the vertical field of view in
/// degrees and must lie in `(0, 180)`; `aspect` must be non-zero.
///
/// A point at `z = -z_near` lands on clip depth `-w`, one at `z = -z_far` on
/// `+w`.
pub fn perspective(fov: f32, aspect: f32, z_near: f32, z_far: f32) -> Mat4 {
    let focal = 1.0 / (radians(fov) / 2.0).tan();

    let mut result = Mat4::ZERO;
    result[0][0] = focal / aspect;
    result[1][1] = focal;
    result[2][2] = (z_far + z_near) / (z_near - z_far);
    result[2][3] = -1.0;
    result[3][2] = (2.0 * z_far * z_near) / (z_near - z_far);
    result
}

/// Right-handed view matrix looking from `eye` towards `target`.
///
/// When `up` is parallel to the view direction the side axis normalizes to
/// zero and the returned basis is degenerate (finite, but rank-deficient).
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let forward = normalize(target - eye);
    let side = normalize(cross(forward, up));
    let up = cross(side, forward);

    let mut result = Mat4::IDENTITY;
    result[0][0] = side.x;
    result[1][0] = side.y;
    result[2][0] = side.z;
    result[0][1] = up.x;
    result[1][1] = up.y;
    result[2][1] = up.z;
    result[0][2] = -forward.x;
    result[1][2] = -forward.y;
    result[2][2] = -forward.z;
    result[3][0] = -dot(side, eye);
    result[3][1] = -dot(up, eye);
    result[3][2] = dot(forward, eye);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn angle_conversion() {
        assert!((radians(180.0) - PI).abs() < 1e-6);
        assert!((degrees(PI / 2.0) - 90.0).abs() < 1e-4);
    }

    #[test]
    fn translate_accumulates() {
        let once = translate(Mat4::IDENTITY, Vec3::new(1.0, 2.0, 3.0));
        let twice = translate(once, Vec3::new(1.0, 0.0, -1.0));
        assert_eq!(twice.translation(), Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(twice[0], Mat4::IDENTITY[0]);
    }

    #[test]
    fn rotate_then_inverse_is_identity() {
        let axes = [
            Vec3::X,
            Vec3::Y,
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-0.3, 2.0, 5.0),
        ];
        for axis in axes {
            for angle in [0.0, 15.0, 90.0, 137.5, -260.0, 720.0] {
                let forward = rotate(Mat4::IDENTITY, angle, axis);
                let back = rotate(Mat4::IDENTITY, -angle, axis);
                assert!(
                    (forward * back).approx_eq(&Mat4::IDENTITY, EPS),
                    "axis {axis:?} angle {angle}"
                );
                assert!(
                    (back * forward).approx_eq(&Mat4::IDENTITY, EPS),
                    "axis {axis:?} angle {angle}"
                );
            }
        }
    }

    #[test]
    fn rotate_matches_axis_angle() {
        let axis = Vec3::new(0.2, -1.0, 0.4);
        let ours: glam::Mat4 = rotate(Mat4::IDENTITY, 33.0, axis).into();
        let oracle =
            glam::Mat4::from_axis_angle(glam::Vec3::from(axis.normalize()), radians(33.0));
        assert!(ours.abs_diff_eq(oracle, EPS));
    }

    #[test]
    fn rotate_is_counter_clockwise() {
        let m = rotate(Mat4::IDENTITY, 90.0, Vec3::Z);
        assert!(close(m.transform_point(Vec3::X), Vec3::Y));
    }

    #[test]
    fn rotate_premultiplies_existing_transform() {
        let moved = translate(Mat4::IDENTITY, Vec3::X);
        let rotated = rotate(moved, 90.0, Vec3::Z);
        // rotation * translation: the offset itself is rotated.
        assert!(close(rotated.translation(), Vec3::Y));
        assert!(close(rotated.transform_point(Vec3::ZERO), Vec3::Y));
    }

    #[test]
    fn rotate_zero_axis_is_noop() {
        let m = translate(Mat4::IDENTITY, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(rotate(m, 45.0, Vec3::ZERO), m);
    }

    #[test]
    fn ortho_matches_gl_convention() {
        let ours: glam::Mat4 = ortho(0.0, 800.0, 600.0, 0.0, -1.0, 1.0).into();
        let oracle = glam::Mat4::orthographic_rh_gl(0.0, 800.0, 600.0, 0.0, -1.0, 1.0);
        assert!(ours.abs_diff_eq(oracle, EPS));

        // Top-left pixel maps to the top-left clip corner.
        let m = ortho(0.0, 800.0, 600.0, 0.0, -1.0, 1.0);
        assert!(close(m.transform_point(Vec3::ZERO), Vec3::new(-1.0, 1.0, 0.0)));
        assert!(close(
            m.transform_point(Vec3::new(800.0, 600.0, 0.0)),
            Vec3::new(1.0, -1.0, 0.0)
        ));
    }

    #[test]
    fn perspective_matches_gl_convention() {
        let ours: glam::Mat4 = perspective(60.0, 4.0 / 3.0, 0.1, 100.0).into();
        let oracle = glam::Mat4::perspective_rh_gl(radians(60.0), 4.0 / 3.0, 0.1, 100.0);
        assert!(ours.abs_diff_eq(oracle, EPS));
    }

    #[test]
    fn perspective_maps_near_and_far_planes() {
        let (near, far) = (0.5, 50.0);
        let m = perspective(75.0, 16.0 / 9.0, near, far);
        assert_eq!(m[2][3], -1.0);

        let [_, _, z, w] = m.mul_vec4([0.0, 0.0, -near, 1.0]);
        assert!((z / w + 1.0).abs() < EPS);
        let [_, _, z, w] = m.mul_vec4([0.0, 0.0, -far, 1.0]);
        assert!((z / w - 1.0).abs() < 1e-3);
    }

    #[test]
    fn look_at_maps_eye_to_origin() {
        let eye = Vec3::new(0.0, 1.0, 3.0);
        let front = Vec3::new(0.3, -0.2, -1.0).normalize();
        let view = look_at(eye, eye + front, Vec3::Y);
        assert!(close(view.transform_point(eye), Vec3::ZERO));
        // The view direction becomes -Z in eye space.
        assert!(close(
            view.transform_point(eye + front),
            Vec3::new(0.0, 0.0, -1.0)
        ));
    }

    #[test]
    fn look_at_matches_glam() {
        let eye = Vec3::new(4.0, 2.0, -3.0);
        let target = Vec3::new(0.0, 0.5, 0.0);
        let ours: glam::Mat4 = look_at(eye, target, Vec3::Y).into();
        let oracle = glam::Mat4::look_at_rh(eye.into(), target.into(), glam::Vec3::Y);
        assert!(ours.abs_diff_eq(oracle, EPS));
    }

    #[test]
    fn look_at_parallel_up_is_degenerate_but_finite() {
        let view = look_at(Vec3::ZERO, Vec3::new(0.0, 5.0, 0.0), Vec3::Y);
        assert!(view.is_finite());
        assert_eq!(view[0][0], 0.0);
        assert_eq!(view[1][0], 0.0);
        assert_eq!(view[2][0], 0.0);
    }
}
