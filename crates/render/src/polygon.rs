use crate::gpu::{Gpu, PolygonMode};

pub fn use_point_mode(gpu: &dyn Gpu) {
    gpu.polygon_mode(PolygonMode::Point);
}

pub fn use_line_mode(gpu: &dyn Gpu) {
    gpu.polygon_mode(PolygonMode::Line);
}

pub fn use_fill_mode(gpu: &dyn Gpu) {
    gpu.polygon_mode(PolygonMode::Fill);
}
