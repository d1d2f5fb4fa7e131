use crate::stage::Stage;

/// User hooks called by the frame loop.
///
/// `update` runs after input, delta time and camera handling for the frame;
/// `render` runs after the clear and the 3D camera upload, before the swap.
pub trait App {
    fn update(&mut self, stage: &mut Stage);

    fn render(&mut self, stage: &mut Stage);

    /// Called after the viewport and bound camera follow a resize.
    fn on_resize(&mut self, _stage: &mut Stage, _width: u32, _height: u32) {}
}
