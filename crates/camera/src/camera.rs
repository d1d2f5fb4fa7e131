use kedarium_input::{Action, CursorControl, CursorMode, InputState, KeyBindings};
use kedarium_math::{Mat4, Vec3, cross, look_at, normalize, ortho, perspective, radians};
use kedarium_render::Shader;

use crate::config::CameraConfig;

/// Pitch is clamped to +/- this many degrees so the view never flips.
pub const PITCH_LIMIT: f32 = 89.0;

/// First-person camera.
///
/// Unlocked it is inert. Locked, the mouse looks around and the movement
/// actions fly it along its own axes. The frame loop decides which.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    yaw: f32,
    pitch: f32,
    fov: f32,
    near: f32,
    far: f32,
    aspect: f32,
    buffer_width: f32,
    buffer_height: f32,
    speed: f32,
    sensitivity: f32,
    matrix: Mat4,
    locked: bool,
}

impl Camera {
    /// Build a camera for a framebuffer of `width` x `height` pixels.
    pub fn new(config: CameraConfig, width: u32, height: u32) -> Self {
        let mut camera = Self {
            position: config.position,
            front: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            yaw: 0.0,
            pitch: 0.0,
            fov: config.fov,
            near: config.near,
            far: config.far,
            aspect: 1.0,
            buffer_width: 1.0,
            buffer_height: 1.0,
            speed: config.speed,
            sensitivity: config.sensitivity,
            matrix: Mat4::IDENTITY,
            locked: false,
        };
        camera.set_rotation(config.yaw, config.pitch);
        camera.set_buffer_size(width, height);
        camera.front = camera.front_from_angles();
        camera
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        if self.locked != locked {
            tracing::info!(locked, "camera lock changed");
        }
        self.locked = locked;
    }

    /// Mouse look. `cursor` is the pointer position and `framebuffer` the
    /// drawable size, both in pixels.
    ///
    /// Unlocked: restores the cursor and does nothing else. Locked: captures
    /// the cursor, turns by the offset from the framebuffer centre and warps
    /// the cursor back there.
    ///
    /// Returns `true` when the cursor was warped back to the centre.
    pub fn handle_mouse(
        &mut self,
        control: &mut dyn CursorControl,
        cursor: (f64, f64),
        framebuffer: (u32, u32),
    ) -> bool {
        if !self.locked {
            control.set_mode(CursorMode::Normal);
            return false;
        }
        control.set_mode(CursorMode::Captured);

        let center_x = f64::from(framebuffer.0) / 2.0;
        let center_y = f64::from(framebuffer.1) / 2.0;
        let dx = (cursor.0 - center_x) as f32;
        let dy = (cursor.1 - center_y) as f32;

        self.set_rotation(
            self.yaw + dx * self.sensitivity,
            self.pitch - dy * self.sensitivity,
        );
        control.warp(center_x, center_y)
    }

    /// Fly along the camera axes. Of each opposite pair only the first held
    /// action counts: forward over back, left over right, up over down.
    pub fn handle_keyboard(&mut self, input: &InputState, bindings: &KeyBindings, dt: f32) {
        if !self.locked {
            return;
        }
        let step = self.speed * dt;
        let held = |action| input.is_action_pressed(bindings, action);
        let side = cross(self.front, self.up);

        if held(Action::MoveForward) {
            self.position += self.front * step;
        } else if held(Action::MoveBack) {
            self.position -= self.front * step;
        }
        if held(Action::MoveLeft) {
            self.position -= side * step;
        } else if held(Action::MoveRight) {
            self.position += side * step;
        }
        if held(Action::MoveUp) {
            self.position += self.up * step;
        } else if held(Action::MoveDown) {
            self.position -= self.up * step;
        }
    }

    /// Recompute `front` from yaw/pitch and compose `projection * view`.
    pub fn update_matrix_3d(&mut self) {
        self.front = self.front_from_angles();
        let view = look_at(self.position, self.position + self.front, self.up);
        let projection = perspective(self.fov, self.aspect, self.near, self.far);
        self.matrix = projection * view;
    }

    /// Pixel-space overlay projection: origin top-left, Y down.
    pub fn update_matrix_2d(&mut self) {
        self.matrix = ortho(0.0, self.buffer_width, self.buffer_height, 0.0, -1.0, 1.0);
    }

    /// Upload the current matrix to `uniform` of `shader`.
    pub fn apply_matrix(&self, shader: &Shader, uniform: &str) {
        shader.set_mat4(uniform, &self.matrix);
    }

    /// Follow a framebuffer resize. A zero height keeps the aspect finite.
    pub fn set_buffer_size(&mut self, width: u32, height: u32) {
        self.buffer_width = width as f32;
        self.buffer_height = height as f32;
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Set yaw and pitch in degrees, clamping pitch and reducing yaw.
    pub fn set_rotation(&mut self, yaw: f32, pitch: f32) {
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw = ieee_remainder(yaw, 360.0);
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit view direction as of the last `update_matrix_3d`.
    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        normalize(cross(self.front, self.up))
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn buffer_size(&self) -> (f32, f32) {
        (self.buffer_width, self.buffer_height)
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    fn front_from_angles(&self) -> Vec3 {
        let (yaw, pitch) = (radians(self.yaw), radians(self.pitch));
        normalize(Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        ))
    }
}

/// `x - n * y` with `n` the nearest integer to `x / y`, ties to even.
fn ieee_remainder(x: f32, y: f32) -> f32 {
    let (x, y) = (f64::from(x), f64::from(y));
    (x - (x / y).round_ties_even() * y) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use kedarium_input::{Key, VirtualCursor};
    use kedarium_render::{Gpu, RecordingGpu, UniformValue};
    use std::rc::Rc;

    fn camera() -> Camera {
        Camera::new(CameraConfig::default(), 800, 600)
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn default_yaw_looks_down_negative_z() {
        let mut cam = camera();
        cam.update_matrix_3d();
        assert!(approx(cam.front(), Vec3::new(0.0, 0.0, -1.0)));
        assert!(approx(cam.right(), Vec3::X));
    }

    #[test]
    fn remainder_matches_ieee() {
        assert_eq!(ieee_remainder(190.0, 360.0), -170.0);
        assert_eq!(ieee_remainder(-190.0, 360.0), 170.0);
        assert_eq!(ieee_remainder(540.0, 360.0), -180.0);
        assert_eq!(ieee_remainder(-90.0, 360.0), -90.0);
    }

    #[test]
    fn unlocked_mouse_only_restores_cursor() {
        let mut cam = camera();
        let mut cursor = VirtualCursor {
            mode: CursorMode::Captured,
            ..Default::default()
        };
        assert!(!cam.handle_mouse(&mut cursor, (0.0, 0.0), (800, 600)));
        assert_eq!(cursor.mode, CursorMode::Normal);
        assert_eq!(cursor.warps, 0);
        assert_eq!(cam.yaw(), -90.0);
        assert_eq!(cam.pitch(), 0.0);
    }

    #[test]
    fn locked_mouse_turns_and_recenters() {
        let mut cam = camera();
        cam.set_locked(true);
        let mut cursor = VirtualCursor::default();
        assert!(cam.handle_mouse(&mut cursor, (410.0, 280.0), (800, 600)));

        assert_eq!(cursor.mode, CursorMode::Captured);
        assert_eq!(cursor.position, (400.0, 300.0));
        assert!((cam.yaw() - -89.0).abs() < 1e-4);
        assert!((cam.pitch() - 2.0).abs() < 1e-4);

        // Centred cursor still warps.
        cam.handle_mouse(&mut cursor, (400.0, 300.0), (800, 600));
        assert_eq!(cursor.warps, 2);
    }

    #[test]
    fn failed_warp_is_reported() {
        let mut cam = camera();
        cam.set_locked(true);
        let mut cursor = VirtualCursor {
            warp_unsupported: true,
            ..Default::default()
        };
        assert!(!cam.handle_mouse(&mut cursor, (410.0, 300.0), (800, 600)));
        assert_eq!(cursor.mode, CursorMode::Captured);
        assert!((cam.yaw() - -89.0).abs() < 1e-4);
    }

    #[test]
    fn pitch_stays_clamped_under_any_mouse_input() {
        let mut cam = camera();
        cam.set_locked(true);
        let mut cursor = VirtualCursor::default();
        let offsets = [-1.0e6, -5000.0, -3.0, 0.0, 7.0, 9000.0, 1.0e6];
        for &dy in &offsets {
            for &dx in &offsets {
                cam.handle_mouse(&mut cursor, (400.0 + dx, 300.0 + dy), (800, 600));
                assert!((-PITCH_LIMIT..=PITCH_LIMIT).contains(&cam.pitch()));
                assert!((-180.0..=180.0).contains(&cam.yaw()));
            }
        }
    }

    #[test]
    fn keyboard_ignored_while_unlocked() {
        let mut cam = camera();
        let mut input = InputState::new();
        input.press(Key::W);
        cam.handle_keyboard(&input, &KeyBindings::default(), 1.0);
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn keyboard_moves_along_axes() {
        let mut cam = camera();
        cam.update_matrix_3d();
        cam.set_locked(true);
        let bindings = KeyBindings::default();
        let mut input = InputState::new();

        input.press(Key::W);
        cam.handle_keyboard(&input, &bindings, 0.5);
        assert!(approx(cam.position(), Vec3::new(0.0, 0.0, 0.5)));

        input.release_all();
        input.press(Key::D);
        input.press(Key::Space);
        cam.handle_keyboard(&input, &bindings, 0.2);
        assert!(approx(cam.position(), Vec3::new(1.0, 1.0, 0.5)));
    }

    #[test]
    fn first_checked_direction_wins() {
        let mut cam = camera();
        cam.update_matrix_3d();
        cam.set_locked(true);
        let mut input = InputState::new();
        for key in [Key::W, Key::S, Key::A, Key::D, Key::Space, Key::LeftShift] {
            input.press(key);
        }
        cam.handle_keyboard(&input, &KeyBindings::default(), 1.0);
        // forward (-Z), left (-X), up (+Y), each 5 units
        assert!(approx(cam.position(), Vec3::new(-5.0, 5.0, -2.0)));
    }

    #[test]
    fn matrix_3d_matches_glam() {
        let mut cam = camera();
        cam.set_rotation(-60.0, 20.0);
        cam.update_matrix_3d();

        let f = cam.front();
        let eye = glam::Vec3::new(0.0, 0.0, 3.0);
        let expected = glam::Mat4::perspective_rh_gl(60f32.to_radians(), 800.0 / 600.0, 0.1, 100.0)
            * glam::Mat4::look_at_rh(eye, eye + glam::Vec3::new(f.x, f.y, f.z), glam::Vec3::Y);
        assert!(cam.matrix().approx_eq(&Mat4::from(expected), 1e-4));
    }

    #[test]
    fn matrix_2d_maps_pixels_to_clip_space() {
        let mut cam = camera();
        cam.update_matrix_2d();
        let top_left = cam.matrix().transform_point(Vec3::ZERO);
        let bottom_right = cam.matrix().transform_point(Vec3::new(800.0, 600.0, 0.0));
        assert!(approx(top_left, Vec3::new(-1.0, 1.0, 0.0)));
        assert!(approx(bottom_right, Vec3::new(1.0, -1.0, 0.0)));
    }

    #[test]
    fn resize_feeds_next_projection() {
        let mut cam = camera();
        cam.set_buffer_size(1920, 1080);
        assert_eq!(cam.buffer_size(), (1920.0, 1080.0));
        cam.update_matrix_3d();

        let mut other = Camera::new(CameraConfig::default(), 1920, 1080);
        other.update_matrix_3d();
        assert!(cam.matrix().approx_eq(&other.matrix(), 1e-6));
        assert!((cam.aspect() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn zero_height_keeps_aspect_finite() {
        let mut cam = camera();
        cam.set_buffer_size(640, 0);
        cam.update_matrix_3d();
        assert!(cam.aspect().is_finite());
        assert!(cam.matrix().is_finite());
    }

    #[test]
    fn apply_matrix_uploads_column_major() {
        let rec = Rc::new(RecordingGpu::new());
        let gpu: Rc<dyn Gpu> = rec.clone();
        let shader = Shader::from_sources(&gpu, "void main() {}", "void main() {}").unwrap();
        shader.use_program();

        let mut cam = camera();
        cam.update_matrix_3d();
        cam.apply_matrix(&shader, "cameraMatrix");

        let mut expected = [0.0; 16];
        expected.copy_from_slice(cam.matrix().as_slice());
        assert_eq!(
            rec.last_uniform("cameraMatrix"),
            Some(UniformValue::Mat4(expected))
        );
    }
}
