use std::hint::black_box;
use std::time::Instant;

use kedarium_math::{Mat4, Vec3, look_at, perspective, rotate, translate};

fn bench_multiply(iterations: usize) {
    let a = rotate(Mat4::IDENTITY, 30.0, Vec3::new(1.0, 1.0, 0.0));
    let b = translate(Mat4::IDENTITY, Vec3::new(1.0, 2.0, 3.0));

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(black_box(a) * black_box(b));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  mat4 * mat4 ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_model_matrix(iterations: usize) {
    let start = Instant::now();
    for i in 0..iterations {
        let angle = (i % 360) as f32;
        let model = translate(Mat4::IDENTITY, Vec3::new(0.0, 0.5, -2.0));
        let _ = black_box(rotate(black_box(model), black_box(angle), Vec3::Y));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  translate + rotate ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_view_projection(iterations: usize) {
    let eye = Vec3::new(0.0, 1.0, 3.0);
    let start = Instant::now();
    for i in 0..iterations {
        // Simulate a camera sweeping its yaw
        let yaw = (i % 360) as f32;
        let front = Vec3::new(yaw.to_radians().cos(), 0.0, yaw.to_radians().sin());
        let view = look_at(black_box(eye), eye + front, Vec3::Y);
        let proj = perspective(black_box(60.0), 16.0 / 9.0, 0.1, 100.0);
        let _ = black_box(proj * view);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  look_at + perspective ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Transform Benchmarks ===\n");

    println!("Matrix product:");
    bench_multiply(100_000);
    bench_multiply(1_000_000);

    println!("\nModel matrix:");
    bench_model_matrix(100_000);

    println!("\nCamera view-projection:");
    bench_view_projection(100_000);

    println!("\n=== Done ===");
}
