use std::num::NonZeroU32;
use std::rc::Rc;

use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use kedarium_input::CursorMode;
use kedarium_render::{Gpu, GpuError};
use kedarium_render_gl::GlowGpu;
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::monitor::MonitorHandle;
use winit::window::{Fullscreen, Window, WindowId};

use crate::app::App;
use crate::clock::FrameClock;
use crate::config::WindowConfig;
use crate::error::WindowError;
use crate::platform::{WindowCursor, map_key};
use crate::stage::{Stage, WindowRequest};

/// Entry point: opens the window and runs the frame loop until it closes.
pub struct Runtime;

impl Runtime {
    /// Create the window and GL context, build the app with `build`, then
    /// loop until the window is closed.
    ///
    /// Any failure before the first frame is returned and no frame runs.
    pub fn run<A, F>(config: WindowConfig, build: F) -> Result<(), WindowError>
    where
        A: App,
        F: FnOnce(&mut Stage) -> Result<A, GpuError>,
    {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut handler = Handler {
            config,
            build: Some(build),
            phase: Phase::Uninitialized,
            error: None,
        };
        event_loop.run_app(&mut handler)?;

        match handler.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

enum Phase<A> {
    Uninitialized,
    Running(Box<Running<A>>),
    Closed,
}

/// Live window state. Fields drop in declaration order, so the app and
/// every GPU resource go before the context and the window.
struct Running<A> {
    app: A,
    stage: Stage,
    clock: FrameClock,
    cursor_mode: CursorMode,
    windowed_size: PhysicalSize<u32>,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

struct Handler<A, F> {
    config: WindowConfig,
    build: Option<F>,
    phase: Phase<A>,
    error: Option<WindowError>,
}

impl<A, F> Handler<A, F> {
    fn close(&mut self, event_loop: &ActiveEventLoop) {
        if matches!(self.phase, Phase::Running(_)) {
            tracing::info!("window closed");
        }
        self.phase = Phase::Closed;
        event_loop.exit();
    }
}

impl<A, F> ApplicationHandler for Handler<A, F>
where
    A: App,
    F: FnOnce(&mut Stage) -> Result<A, GpuError>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.phase, Phase::Uninitialized) {
            return;
        }
        let Some(build) = self.build.take() else {
            return;
        };

        match create(event_loop, &self.config, build) {
            Ok(running) => {
                running.window.request_redraw();
                self.phase = Phase::Running(Box::new(running));
            }
            Err(err) => {
                tracing::error!(%err, "window initialization failed");
                self.error = Some(err);
                self.close(event_loop);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Phase::Running(running) = &mut self.phase else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => running.stage.close(),
            WindowEvent::Resized(size) => running.resize(size),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                if let Some(key) = map_key(code) {
                    let input = running.stage.input_mut();
                    match state {
                        ElementState::Pressed => input.press(key),
                        ElementState::Released => input.release(key),
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                running.stage.input_mut().set_cursor(position.x, position.y);
            }
            WindowEvent::Focused(false) => running.stage.input_mut().release_all(),
            WindowEvent::RedrawRequested => running.frame(),
            _ => {}
        }

        if running.stage.is_closed() {
            self.close(event_loop);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Phase::Running(running) = &self.phase {
            running.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.phase = Phase::Closed;
    }
}

impl<A: App> Running<A> {
    fn frame(&mut self) {
        let time = self.clock.tick();
        let mut cursor = WindowCursor {
            window: &self.window,
            mode: &mut self.cursor_mode,
        };
        self.stage.run_frame(&mut self.app, time.dt, &mut cursor);

        if let Err(err) = self.surface.swap_buffers(&self.context) {
            tracing::error!(%err, "buffer swap failed");
        }

        for request in self.stage.take_requests() {
            match request {
                WindowRequest::Maximize => self.maximize(),
                WindowRequest::Unmaximize => self.unmaximize(),
                WindowRequest::Close => {}
            }
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        // Minimized windows report a zero size.
        let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return;
        };
        self.surface.resize(&self.context, width, height);
        self.stage.resize(size.width, size.height);
        self.app.on_resize(&mut self.stage, size.width, size.height);
    }

    fn monitor(&self) -> Option<MonitorHandle> {
        self.window
            .primary_monitor()
            .or_else(|| self.window.current_monitor())
    }

    /// Exclusive fullscreen at the monitor's native mode, borderless when no
    /// matching video mode is reported.
    fn maximize(&self) {
        let Some(monitor) = self.monitor() else {
            tracing::warn!("no monitor available for fullscreen");
            return;
        };
        let native = monitor.size();
        let mode = monitor
            .video_modes()
            .filter(|mode| mode.size() == native)
            .max_by_key(|mode| (mode.bit_depth(), mode.refresh_rate_millihertz()));

        let fullscreen = match mode {
            Some(mode) => {
                tracing::info!(
                    width = native.width,
                    height = native.height,
                    refresh_mhz = mode.refresh_rate_millihertz(),
                    "entering exclusive fullscreen"
                );
                Fullscreen::Exclusive(mode)
            }
            None => {
                tracing::info!("entering borderless fullscreen");
                Fullscreen::Borderless(Some(monitor))
            }
        };
        self.window.set_fullscreen(Some(fullscreen));
    }

    /// Back to the configured windowed size, centred on the monitor.
    fn unmaximize(&self) {
        tracing::info!("leaving fullscreen");
        self.window.set_fullscreen(None);
        let size = self.windowed_size;
        let _ = self.window.request_inner_size(size);

        if let Some(monitor) = self.monitor() {
            let origin = monitor.position();
            let bounds = monitor.size();
            let x = origin.x + (bounds.width as i32 - size.width as i32) / 2;
            let y = origin.y + (bounds.height as i32 - size.height as i32) / 2;
            self.window.set_outer_position(PhysicalPosition::new(x, y));
        }
    }
}

/// Window, then context, then function loader, then baseline GL state,
/// then the app. The first failure aborts the rest.
fn create<A, F>(
    event_loop: &ActiveEventLoop,
    config: &WindowConfig,
    build: F,
) -> Result<Running<A>, WindowError>
where
    F: FnOnce(&mut Stage) -> Result<A, GpuError>,
{
    let attributes = Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(PhysicalSize::new(config.width, config.height));
    let mut template = ConfigTemplateBuilder::new().with_alpha_size(8);
    if config.samples > 0 {
        template = template.with_multisampling(config.samples);
    }

    let (window, gl_config) = DisplayBuilder::new()
        .with_window_attributes(Some(attributes))
        .build(event_loop, template, pick_config)
        .map_err(|err| WindowError::Create(err.to_string()))?;
    let window =
        window.ok_or_else(|| WindowError::Create("no window returned by the display".into()))?;
    tracing::info!(
        title = %config.title,
        samples = gl_config.num_samples(),
        "window created"
    );

    let raw_handle = window.window_handle()?.as_raw();
    let context_attributes = ContextAttributesBuilder::new()
        .with_profile(GlProfile::Core)
        .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
        .build(Some(raw_handle));
    let display = gl_config.display();
    let context = unsafe { display.create_context(&gl_config, &context_attributes)? };
    let surface_attributes = window.build_surface_attributes(Default::default())?;
    let surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes)? };
    let context = context.make_current(&surface)?;

    let interval = if config.vsync {
        SwapInterval::Wait(NonZeroU32::MIN)
    } else {
        SwapInterval::DontWait
    };
    if let Err(err) = surface.set_swap_interval(&context, interval) {
        tracing::warn!(%err, "failed to set swap interval");
    }

    // The context was made current on this thread just above and lives in
    // `Running` for as long as the GPU handle does.
    let gpu: Rc<dyn Gpu> =
        Rc::new(unsafe { GlowGpu::from_loader(|symbol| display.get_proc_address(symbol)) });

    let mut stage = Stage::new(gpu, config);
    let size = window.inner_size();
    if (size.width, size.height) != (config.width, config.height) {
        stage.resize(size.width, size.height);
    }
    let app = build(&mut stage)?;

    Ok(Running {
        app,
        stage,
        clock: FrameClock::new(),
        cursor_mode: CursorMode::Normal,
        windowed_size: PhysicalSize::new(config.windowed_width, config.windowed_height),
        surface,
        context,
        window,
    })
}

/// Prefer the config with the most samples.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, candidate| {
            if candidate.num_samples() > best.num_samples() {
                candidate
            } else {
                best
            }
        })
        // glutin reports an error instead of calling the picker with no configs.
        .unwrap_or_else(|| unreachable!("config picker called with no configs"))
}
