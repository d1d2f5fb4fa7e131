use std::cell::RefCell;
use std::rc::{Rc, Weak};

use kedarium_camera::Camera;
use kedarium_common::Color;
use kedarium_input::{Action, CursorControl, InputState, KeyBindings};
use kedarium_render::{
    Capability, Drawable, Element, Gpu, Light, Shader, Solid, Texture, use_fill_mode,
    use_line_mode, use_point_mode,
};

use crate::app::App;
use crate::config::WindowConfig;

/// Uniform names shared with the engine shaders.
const CAMERA_UNIFORM: &str = "cameraMatrix";
const MODEL_UNIFORM: &str = "model";
const POSITION_UNIFORM: &str = "position";
const TEXTURE_UNIFORM: &str = "tex0";

/// Window operations the stage asks the platform layer to carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRequest {
    Maximize,
    Unmaximize,
    Close,
}

/// Frame-loop state that does not depend on the OS window.
///
/// Holds the GPU context, input, the bound shader, texture and camera,
/// and the fullscreen debounce. The runtime feeds it events and calls
/// [`Stage::run_frame`] once per frame; tests do the same headless.
pub struct Stage {
    gpu: Rc<dyn Gpu>,
    title: String,
    width: u32,
    height: u32,
    clear_color: Color,
    delta_time: f32,

    input: InputState,
    bindings: KeyBindings,

    shader: Option<Rc<Shader>>,
    texture: Option<Rc<Texture>>,
    camera: Weak<RefCell<Camera>>,

    fullscreen: bool,
    fullscreen_held: bool,
    closed: bool,
    requests: Vec<WindowRequest>,
}

impl Stage {
    /// Set the baseline GL state: depth test, back-face culling, alpha
    /// blending, multisampling, the clear color and a full viewport.
    pub fn new(gpu: Rc<dyn Gpu>, config: &WindowConfig) -> Self {
        tracing::info!(version = %gpu.version(), "OpenGL context ready");
        for capability in [
            Capability::DepthTest,
            Capability::CullFace,
            Capability::Blend,
            Capability::Multisample,
        ] {
            gpu.enable(capability);
        }
        gpu.clear_color(config.clear_color);
        gpu.viewport(0, 0, config.width as i32, config.height as i32);

        Self {
            gpu,
            title: config.title.clone(),
            width: config.width,
            height: config.height,
            clear_color: config.clear_color,
            delta_time: 0.0,
            input: InputState::new(),
            bindings: config.keys.clone(),
            shader: None,
            texture: None,
            camera: Weak::new(),
            fullscreen: false,
            fullscreen_held: false,
            closed: false,
            requests: Vec::new(),
        }
    }

    pub fn gpu(&self) -> &Rc<dyn Gpu> {
        &self.gpu
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Seconds elapsed between the last two frames.
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
        self.gpu.clear_color(color);
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.bindings
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.input.is_action_pressed(&self.bindings, action)
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Stop the loop after the current frame.
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.requests.push(WindowRequest::Close);
        }
    }

    pub fn maximize(&mut self) {
        self.fullscreen = true;
        self.requests.push(WindowRequest::Maximize);
    }

    pub fn unmaximize(&mut self) {
        self.fullscreen = false;
        self.requests.push(WindowRequest::Unmaximize);
    }

    /// Window requests queued since the last call.
    pub fn take_requests(&mut self) -> Vec<WindowRequest> {
        std::mem::take(&mut self.requests)
    }

    /// Make `shader` the active program for the stage's draw helpers.
    pub fn bind_shader(&mut self, shader: Rc<Shader>) {
        shader.use_program();
        self.shader = Some(shader);
    }

    pub fn shader(&self) -> Option<&Rc<Shader>> {
        self.shader.as_ref()
    }

    /// Bind `texture` on unit 0 for subsequent solids.
    pub fn bind_texture(&mut self, texture: Rc<Texture>) {
        texture.bind(0);
        if let Some(shader) = &self.shader {
            texture.apply_unit(shader, TEXTURE_UNIFORM, 0);
        }
        self.texture = Some(texture);
    }

    pub fn unbind_texture(&mut self) {
        if let Some(texture) = self.texture.take() {
            texture.unbind(0);
        }
    }

    /// Route input and resizes to `camera`. The stage does not keep it
    /// alive: once the camera is dropped the stage behaves as unbound.
    pub fn bind_camera(&mut self, camera: &Rc<RefCell<Camera>>) {
        camera
            .borrow_mut()
            .set_buffer_size(self.width, self.height);
        self.camera = Rc::downgrade(camera);
    }

    pub fn camera(&self) -> Option<Rc<RefCell<Camera>>> {
        self.camera.upgrade()
    }

    /// Framebuffer resize: viewport, bound camera, then stored size.
    pub fn resize(&mut self, width: u32, height: u32) {
        tracing::debug!(width, height, "framebuffer resized");
        self.width = width;
        self.height = height;
        self.gpu.viewport(0, 0, width as i32, height as i32);
        if let Some(camera) = self.camera() {
            camera.borrow_mut().set_buffer_size(width, height);
        }
    }

    /// One full frame: update phase, then render phase. Buffer swapping is
    /// left to the caller.
    pub fn run_frame<A: App + ?Sized>(
        &mut self,
        app: &mut A,
        dt: f32,
        cursor: &mut dyn CursorControl,
    ) {
        self.update(dt, cursor);
        app.update(self);
        self.begin_render();
        app.render(self);
    }

    /// Engine half of the update phase.
    pub fn update(&mut self, dt: f32, cursor: &mut dyn CursorControl) {
        self.delta_time = dt;
        self.apply_polygon_mode_keys();

        let Some(camera) = self.camera() else {
            return;
        };
        let mut camera = camera.borrow_mut();

        if self.is_pressed(Action::LockCamera) {
            camera.set_locked(true);
        }
        if self.is_pressed(Action::UnlockCamera) {
            camera.set_locked(false);
        }

        let toggle = self.is_pressed(Action::ToggleFullscreen);
        if toggle && !self.fullscreen_held {
            if self.fullscreen {
                self.unmaximize();
            } else {
                self.maximize();
            }
        }
        self.fullscreen_held = toggle;

        let framebuffer = (self.width, self.height);
        let recentered = camera.handle_mouse(cursor, self.input.cursor(), framebuffer);
        if recentered {
            // The warp does not always come back as a cursor event.
            self.input
                .set_cursor(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0);
        }
        camera.handle_keyboard(&self.input, &self.bindings, dt);
    }

    /// Engine half of the render phase: clear, then 3D camera upload.
    pub fn begin_render(&mut self) {
        self.gpu.clear();
        self.use_3d();
    }

    /// Upload the bound camera's perspective matrix.
    pub fn use_3d(&self) {
        let (Some(shader), Some(camera)) = (&self.shader, self.camera()) else {
            return;
        };
        let mut camera = camera.borrow_mut();
        camera.update_matrix_3d();
        shader.use_program();
        camera.apply_matrix(shader, CAMERA_UNIFORM);
    }

    /// Upload the bound camera's pixel-space overlay matrix.
    pub fn use_2d(&self) {
        let (Some(shader), Some(camera)) = (&self.shader, self.camera()) else {
            return;
        };
        let mut camera = camera.borrow_mut();
        camera.update_matrix_2d();
        shader.use_program();
        camera.apply_matrix(shader, CAMERA_UNIFORM);
    }

    /// Upload `lights`, their count and the camera position.
    pub fn use_lights(&self, lights: &[Light]) {
        let Some(shader) = &self.shader else {
            return;
        };
        shader.set_int("lightCount", lights.len() as i32);
        for (index, light) in lights.iter().enumerate() {
            light.apply(shader, index);
        }
        if let Some(camera) = self.camera() {
            shader.set_vec3("camPos", camera.borrow().position());
        }
    }

    pub fn render_solid(&self, solid: &Solid) {
        let Some(shader) = &self.shader else {
            return;
        };
        solid.apply_model_matrix(shader, MODEL_UNIFORM);
        if let Some(texture) = &self.texture {
            texture.bind(0);
        }
        solid.render();
    }

    pub fn render_element(&self, element: &Element) {
        let Some(shader) = &self.shader else {
            return;
        };
        element.apply_position(shader, POSITION_UNIFORM);
        element.render();
    }

    fn apply_polygon_mode_keys(&self) {
        let gpu = self.gpu.as_ref();
        if self.is_pressed(Action::PointMode) {
            use_point_mode(gpu);
        } else if self.is_pressed(Action::LineMode) {
            use_line_mode(gpu);
        } else if self.is_pressed(Action::FillMode) {
            use_fill_mode(gpu);
        }
    }
}
