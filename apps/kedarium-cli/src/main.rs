use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use kedarium_assets::ObjMesh;
use kedarium_camera::{Camera, CameraConfig};
use kedarium_input::{Key, VirtualCursor};
use kedarium_math::{Mat4, Vec2, Vec3};
use kedarium_render::{Element, Gpu, GpuError, Light, RecordingGpu, Shader, Shape, Solid};
use kedarium_window::{App, Stage, WindowConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kedarium-cli", about = "Headless tool for the kedarium engine")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine and crate info
    Info,
    /// Print the camera view-projection matrix
    Camera {
        #[arg(long, default_value = "-90", allow_hyphen_values = true)]
        yaw: f32,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        pitch: f32,
        #[arg(long, default_value = "60")]
        fov: f32,
        #[arg(long, default_value = "800")]
        width: u32,
        #[arg(long, default_value = "600")]
        height: u32,
    },
    /// Parse an OBJ file and print its counts and bounds
    Obj {
        path: PathBuf,
        /// Target size per axis; 0 keeps the mesh's own extent
        #[arg(long, num_args = 3, default_values_t = [0.0, 0.0, 0.0])]
        dims: Vec<f32>,
    },
    /// Drive the frame loop against an in-memory GPU
    DryRun {
        /// Number of frames to run
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Fixed delta time per frame, in seconds
        #[arg(long, default_value = "0.016")]
        dt: f32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("{}", kedarium_common::engine_info());
            println!("common: {}", kedarium_common::crate_info());
            println!("math: {}", kedarium_math::crate_info());
            println!("input: {}", kedarium_input::crate_info());
            println!("assets: {}", kedarium_assets::crate_info());
            println!("render: {}", kedarium_render::crate_info());
            println!("render-gl: {}", kedarium_render_gl::crate_info());
            println!("camera: {}", kedarium_camera::crate_info());
            println!("window: {}", kedarium_window::crate_info());
        }
        Commands::Camera {
            yaw,
            pitch,
            fov,
            width,
            height,
        } => {
            let config = CameraConfig {
                fov,
                ..CameraConfig::default()
            };
            let mut camera = Camera::new(config, width, height);
            camera.set_rotation(yaw, pitch);
            camera.update_matrix_3d();

            let front = camera.front();
            println!(
                "yaw={:.3} pitch={:.3} aspect={:.4}",
                camera.yaw(),
                camera.pitch(),
                camera.aspect()
            );
            println!("front=({:.4}, {:.4}, {:.4})", front.x, front.y, front.z);
            print_matrix(&camera.matrix());
        }
        Commands::Obj { path, dims } => {
            let dims = Vec3::new(dims[0], dims[1], dims[2]);
            let mesh = ObjMesh::load(&path, dims)?;
            println!("{}", path.display());
            println!(
                "vertices={} ({} bytes) indices={} ({} bytes) triangles={}",
                mesh.vertex_count(),
                mesh.vertex_bytes(),
                mesh.index_count(),
                mesh.index_bytes(),
                mesh.index_count() / 3
            );
            match mesh.bounds() {
                Some((min, max)) => println!(
                    "bounds=({:.4}, {:.4}, {:.4})..({:.4}, {:.4}, {:.4})",
                    min.x, min.y, min.z, max.x, max.y, max.z
                ),
                None => println!("bounds=empty"),
            }
        }
        Commands::DryRun { frames, dt } => {
            let report = dry_run(frames, dt)?;
            println!("Dry run: frames={frames}, dt={dt}");
            println!(
                "draws={} (per frame {}) uniform writes={}",
                report.draws,
                report.draws / frames.max(1) as usize,
                report.uniform_writes
            );
            println!(
                "camera: position=({:.3}, {:.3}, {:.3}) yaw={:.3}",
                report.camera_position.x,
                report.camera_position.y,
                report.camera_position.z,
                report.camera_yaw
            );
            println!(
                "handles: live during run={}, after teardown={}, double deletes={}",
                report.live_during, report.live_after, report.double_deletes
            );
            println!(
                "Balance: {}",
                if report.live_after == 0 && report.double_deletes == 0 {
                    "OK"
                } else {
                    "LEAK"
                }
            );
        }
    }

    Ok(())
}

fn print_matrix(m: &Mat4) {
    // Rows as they read on paper; storage is column-major.
    for row in 0..4 {
        println!(
            "[{:>10.5} {:>10.5} {:>10.5} {:>10.5}]",
            m[0][row], m[1][row], m[2][row], m[3][row]
        );
    }
}

const DRY_VERTEX: &str = "#version 330 core\nvoid main() {}";
const DRY_FRAGMENT: &str = "#version 330 core\nvoid main() {}";

/// Minimal scene: three solids, two lights and one overlay element.
struct DryScene {
    solids: Vec<Solid>,
    lights: Vec<Light>,
    overlay: Element,
}

impl DryScene {
    fn new(gpu: &Rc<dyn Gpu>) -> Result<Self, GpuError> {
        Ok(Self {
            solids: vec![
                Solid::new(gpu, Vec3::new(-2.0, 0.0, 0.0), &Shape::Cube { edge: 1.0 })?,
                Solid::new(gpu, Vec3::ZERO, &Shape::Pyramid { edge: 1.0, height: 1.0 })?,
                Solid::new(gpu, Vec3::new(0.0, -1.0, 0.0), &Shape::Plane { length: 10.0, width: 10.0 })?,
            ],
            lights: vec![Light::default(), Light::new(Vec3::new(0.0, 5.0, 0.0), kedarium_common::Color::CYAN, 0.5)],
            overlay: Element::new(gpu, Vec2::new(8.0, 8.0), 32.0, 32.0)?,
        })
    }
}

impl App for DryScene {
    fn update(&mut self, stage: &mut Stage) {
        let spin = 90.0 * stage.delta_time();
        if let Some(pyramid) = self.solids.get_mut(1) {
            pyramid.rotate(spin, Vec3::Y);
        }
    }

    fn render(&mut self, stage: &mut Stage) {
        stage.use_lights(&self.lights);
        for solid in &self.solids {
            stage.render_solid(solid);
        }
        stage.use_2d();
        stage.render_element(&self.overlay);
    }
}

#[derive(Debug)]
struct DryRunReport {
    draws: usize,
    uniform_writes: usize,
    camera_position: Vec3,
    camera_yaw: f32,
    live_during: usize,
    live_after: usize,
    double_deletes: usize,
}

/// Run `frames` frames with the camera locked, W held and the cursor
/// nudged right each frame, then tear everything down.
fn dry_run(frames: u64, dt: f32) -> Result<DryRunReport, GpuError> {
    let rec = Rc::new(RecordingGpu::new());
    let gpu: Rc<dyn Gpu> = rec.clone();
    let config = WindowConfig::default();

    let (camera_position, camera_yaw, live_during) = {
        let mut stage = Stage::new(Rc::clone(&gpu), &config);
        let shader = Rc::new(Shader::from_sources(&gpu, DRY_VERTEX, DRY_FRAGMENT)?);
        let camera = Rc::new(RefCell::new(Camera::new(config.camera, config.width, config.height)));
        stage.bind_shader(shader);
        stage.bind_camera(&camera);

        let mut scene = DryScene::new(&gpu)?;
        let mut cursor = VirtualCursor::default();
        let center = (f64::from(config.width) / 2.0, f64::from(config.height) / 2.0);

        stage.input_mut().set_cursor(center.0, center.1);
        stage.input_mut().press(config.keys.lock);
        stage.run_frame(&mut scene, dt, &mut cursor);
        stage.input_mut().release(config.keys.lock);
        stage.input_mut().press(Key::W);

        for _ in 1..frames {
            stage.input_mut().set_cursor(center.0 + 4.0, center.1);
            stage.run_frame(&mut scene, dt, &mut cursor);
        }

        let live = rec.live_handles();
        let camera = camera.borrow();
        (camera.position(), camera.yaw(), live)
    };

    Ok(DryRunReport {
        draws: rec.draw_count(),
        uniform_writes: rec.uniform_writes().len(),
        camera_position,
        camera_yaw,
        live_during,
        live_after: rec.live_handles(),
        double_deletes: rec.double_deletes(),
    })
}
