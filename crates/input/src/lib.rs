//! Input: platform-free key codes, per-frame key/cursor state, and the
//! mapping from keys to engine actions.
//!
//! # Invariants
//! - Nothing here depends on a windowing library; the window crate
//!   translates OS events into [`Key`] presses and cursor positions.
//! - Every [`Action`] has exactly one bound key at a time.

pub mod action;
mod cursor;
mod key;
mod state;

pub use action::{Action, KeyBindings};
pub use cursor::{CursorControl, CursorMode, VirtualCursor};
pub use key::Key;
pub use state::InputState;

pub fn crate_info() -> &'static str {
    "kedarium-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
