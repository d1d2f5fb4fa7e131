/// Whether the OS cursor is free or captured for free-look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    #[default]
    Normal,
    /// Hidden and confined to the window.
    Captured,
}

/// Cursor operations the camera needs from the platform.
pub trait CursorControl {
    fn set_mode(&mut self, mode: CursorMode);

    /// Move the cursor to `(x, y)` framebuffer pixels. Returns `false` when
    /// the platform cannot move it.
    fn warp(&mut self, x: f64, y: f64) -> bool;
}

/// In-memory cursor for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct VirtualCursor {
    pub mode: CursorMode,
    pub position: (f64, f64),
    pub warps: usize,
    /// Reject every warp, as platforms without cursor positioning do.
    pub warp_unsupported: bool,
}

impl CursorControl for VirtualCursor {
    fn set_mode(&mut self, mode: CursorMode) {
        if self.mode != mode {
            tracing::debug!(?mode, "cursor mode changed");
        }
        self.mode = mode;
    }

    fn warp(&mut self, x: f64, y: f64) -> bool {
        if self.warp_unsupported {
            return false;
        }
        self.position = (x, y);
        self.warps += 1;
        true
    }
}
