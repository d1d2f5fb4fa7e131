use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Result;
use clap::Parser;
use kedarium_assets::{ImageData, ObjMesh, Registry};
use kedarium_camera::Camera;
use kedarium_common::{Color, engine_info};
use kedarium_input::Key;
use kedarium_math::{Vec2, Vec3};
use kedarium_render::{Element, GpuError, Light, Shader, Shape, Solid, Texture};
use kedarium_window::{App, Runtime, Stage, WindowConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kedarium-sandbox", about = "Kedarium demo scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON window config; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// OBJ mesh to place in the scene
    #[arg(short, long)]
    mesh: Option<PathBuf>,

    /// PNG texture for the solids; a checkerboard is generated otherwise
    #[arg(short, long)]
    texture: Option<PathBuf>,

    /// Directory holding solid.vert/frag and gui.vert/frag
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/shaders"))]
    shaders: PathBuf,
}

const PYRAMID_SPIN: f32 = 45.0;

struct Sandbox {
    solid_shader: Rc<Shader>,
    gui_shader: Rc<Shader>,
    camera: Rc<RefCell<Camera>>,
    solids: Registry<Solid>,
    lights: Vec<Light>,
    crosshair: Element,
}

impl Sandbox {
    fn new(stage: &mut Stage, cli: &Cli, config: &WindowConfig) -> Result<Self, GpuError> {
        let gpu = Rc::clone(stage.gpu());
        let solid_shader = Rc::new(Shader::from_files(
            &gpu,
            cli.shaders.join("solid.vert"),
            cli.shaders.join("solid.frag"),
        )?);
        let gui_shader = Rc::new(Shader::from_files(
            &gpu,
            cli.shaders.join("gui.vert"),
            cli.shaders.join("gui.frag"),
        )?);

        let mut solids = Registry::new("solid");
        solids.insert(
            "floor",
            Solid::new(&gpu, Vec3::new(0.0, -1.0, 0.0), &Shape::Plane { length: 20.0, width: 20.0 })?,
        );
        solids.insert("cube", Solid::new(&gpu, Vec3::new(-2.0, 0.0, 0.0), &Shape::Cube { edge: 1.0 })?);
        solids.insert(
            "cuboid",
            Solid::new(
                &gpu,
                Vec3::new(2.0, 0.0, 0.0),
                &Shape::Cuboid {
                    length: 1.5,
                    height: 0.5,
                    width: 0.75,
                },
            )?,
        );
        solids.insert(
            "pyramid",
            Solid::new(&gpu, Vec3::new(0.0, 0.0, -3.0), &Shape::Pyramid { edge: 1.0, height: 1.5 })?,
        );
        if let Some(path) = &cli.mesh {
            match ObjMesh::load(path, Vec3::splat(1.5)) {
                Ok(mesh) => {
                    solids.insert("mesh", Solid::new(&gpu, Vec3::new(0.0, 0.5, 2.0), &Shape::Mesh(mesh))?);
                }
                Err(err) => tracing::warn!(%err, path = %path.display(), "skipping mesh"),
            }
        }

        let texture = match &cli.texture {
            Some(path) => Texture::from_png(&gpu, path)?,
            None => Texture::new(&gpu, &checkerboard(8, Color::WHITE, Color::rgb8(200, 200, 210)))?,
        };

        let camera = Rc::new(RefCell::new(Camera::new(
            config.camera,
            stage.width(),
            stage.height(),
        )));
        stage.bind_shader(Rc::clone(&solid_shader));
        stage.bind_texture(Rc::new(texture));
        stage.bind_camera(&camera);

        let lights = vec![
            Light::new(Vec3::new(3.0, 4.0, 3.0), Color::WHITE, 0.8),
            Light::new(Vec3::new(-4.0, 2.0, -2.0), Color::rgb8(255, 170, 90), 0.6),
        ];
        let crosshair = Element::new(&gpu, crosshair_position(stage), 12.0, 12.0)?;

        tracing::info!(solids = solids.len(), "scene ready");
        Ok(Self {
            solid_shader,
            gui_shader,
            camera,
            solids,
            lights,
            crosshair,
        })
    }
}

impl App for Sandbox {
    fn update(&mut self, stage: &mut Stage) {
        if stage.input().is_pressed(Key::LeftControl) && stage.input().is_pressed(Key::Q) {
            stage.close();
        }
        let dt = stage.delta_time();
        if let Some(pyramid) = self.solids.get_mut("pyramid") {
            pyramid.rotate(PYRAMID_SPIN * dt, Vec3::Y);
        }
    }

    fn render(&mut self, stage: &mut Stage) {
        stage.use_lights(&self.lights);
        for (_, solid) in self.solids.iter() {
            stage.render_solid(solid);
        }

        if !self.camera.borrow().locked() {
            stage.bind_shader(Rc::clone(&self.gui_shader));
            stage.use_2d();
            stage.render_element(&self.crosshair);
            stage.bind_shader(Rc::clone(&self.solid_shader));
        }
    }

    fn on_resize(&mut self, stage: &mut Stage, _width: u32, _height: u32) {
        self.crosshair.set_position(crosshair_position(stage));
    }
}

fn crosshair_position(stage: &Stage) -> Vec2 {
    Vec2::new(
        stage.width() as f32 / 2.0 - 6.0,
        stage.height() as f32 / 2.0 - 6.0,
    )
}

/// Square RGBA checkerboard with `cells` cells per side, 8 pixels each.
fn checkerboard(cells: u32, a: Color, b: Color) -> ImageData {
    let size = cells * 8;
    let to_rgba = |c: Color| c.to_array().map(|v| (v * 255.0).round() as u8);
    let (a, b) = (to_rgba(a), to_rgba(b));
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let cell = (x / 8 + y / 8) % 2;
            pixels.extend_from_slice(if cell == 0 { &a } else { &b });
        }
    }
    ImageData {
        width: size,
        height: size,
        pixels,
    }
}

fn load_config(cli: &Cli) -> Result<WindowConfig> {
    let mut config = match &cli.config {
        Some(path) => WindowConfig::from_json_file(path)?,
        None => WindowConfig::default(),
    };
    if let Some(width) = cli.width {
        config.width = width;
        config.windowed_width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
        config.windowed_height = height;
    }
    Ok(config)
}

fn check_shader_dir(dir: &Path) {
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "shader directory not found");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("{}", engine_info());
    let config = load_config(&cli)?;
    check_shader_dir(&cli.shaders);

    let app_config = config.clone();
    Runtime::run(config, |stage| Sandbox::new(stage, &cli, &app_config))?;

    tracing::info!("kedarium-sandbox exited");
    Ok(())
}
