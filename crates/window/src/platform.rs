use kedarium_input::{CursorControl, CursorMode, Key};
use winit::dpi::PhysicalPosition;
use winit::keyboard::KeyCode;
use winit::window::{CursorGrabMode, Window};

/// Map a winit physical key to an engine key. Unbindable keys map to `None`.
pub(crate) fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,

        KeyCode::Digit0 => Key::Num0,
        KeyCode::Digit1 => Key::Num1,
        KeyCode::Digit2 => Key::Num2,
        KeyCode::Digit3 => Key::Num3,
        KeyCode::Digit4 => Key::Num4,
        KeyCode::Digit5 => Key::Num5,
        KeyCode::Digit6 => Key::Num6,
        KeyCode::Digit7 => Key::Num7,
        KeyCode::Digit8 => Key::Num8,
        KeyCode::Digit9 => Key::Num9,

        KeyCode::Escape => Key::Escape,
        KeyCode::Space => Key::Space,
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::ShiftLeft => Key::LeftShift,
        KeyCode::ControlLeft => Key::LeftControl,

        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,

        _ => return None,
    };
    Some(key)
}

/// [`CursorControl`] over a winit window.
pub(crate) struct WindowCursor<'a> {
    pub window: &'a Window,
    /// Mode last applied to the window, kept across frames.
    pub mode: &'a mut CursorMode,
}

impl CursorControl for WindowCursor<'_> {
    fn set_mode(&mut self, mode: CursorMode) {
        if *self.mode == mode {
            return;
        }
        match mode {
            CursorMode::Normal => {
                if let Err(err) = self.window.set_cursor_grab(CursorGrabMode::None) {
                    tracing::warn!(%err, "failed to release cursor");
                }
                self.window.set_cursor_visible(true);
            }
            CursorMode::Captured => {
                let grab = self
                    .window
                    .set_cursor_grab(CursorGrabMode::Confined)
                    .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Locked));
                if let Err(err) = grab {
                    tracing::warn!(%err, "failed to capture cursor");
                }
                self.window.set_cursor_visible(false);
            }
        }
        tracing::debug!(?mode, "cursor mode changed");
        *self.mode = mode;
    }

    fn warp(&mut self, x: f64, y: f64) -> bool {
        match self.window.set_cursor_position(PhysicalPosition::new(x, y)) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(%err, "cursor warp unsupported");
                false
            }
        }
    }
}
