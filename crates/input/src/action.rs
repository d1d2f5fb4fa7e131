use serde::{Deserialize, Serialize};

use crate::key::Key;

/// An engine-level action a key can trigger.
///
/// The frame loop and camera consume actions through [`KeyBindings`], never
/// hard-coded keys, so every binding can be remapped from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Capture the cursor and start free-look.
    LockCamera,
    /// Release the cursor and stop camera input.
    UnlockCamera,
    /// Switch between fullscreen and windowed.
    ToggleFullscreen,
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    /// Rasterize polygons as points.
    PointMode,
    /// Rasterize polygons as outlines.
    LineMode,
    /// Rasterize filled polygons.
    FillMode,
}

impl Action {
    pub const ALL: [Action; 12] = [
        Action::LockCamera,
        Action::UnlockCamera,
        Action::ToggleFullscreen,
        Action::MoveForward,
        Action::MoveBack,
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveUp,
        Action::MoveDown,
        Action::PointMode,
        Action::LineMode,
        Action::FillMode,
    ];
}

/// Key assigned to each [`Action`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub lock: Key,
    pub unlock: Key,
    pub fullscreen: Key,
    pub forward: Key,
    pub back: Key,
    pub left: Key,
    pub right: Key,
    pub up: Key,
    pub down: Key,
    pub point_mode: Key,
    pub line_mode: Key,
    pub fill_mode: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            lock: Key::E,
            unlock: Key::Escape,
            fullscreen: Key::F11,
            forward: Key::W,
            back: Key::S,
            left: Key::A,
            right: Key::D,
            up: Key::Space,
            down: Key::LeftShift,
            point_mode: Key::Num1,
            line_mode: Key::Num2,
            fill_mode: Key::Num3,
        }
    }
}

impl KeyBindings {
    pub fn key_for(&self, action: Action) -> Key {
        match action {
            Action::LockCamera => self.lock,
            Action::UnlockCamera => self.unlock,
            Action::ToggleFullscreen => self.fullscreen,
            Action::MoveForward => self.forward,
            Action::MoveBack => self.back,
            Action::MoveLeft => self.left,
            Action::MoveRight => self.right,
            Action::MoveUp => self.up,
            Action::MoveDown => self.down,
            Action::PointMode => self.point_mode,
            Action::LineMode => self.line_mode,
            Action::FillMode => self.fill_mode,
        }
    }

    pub fn bind(&mut self, action: Action, key: Key) {
        let slot = match action {
            Action::LockCamera => &mut self.lock,
            Action::UnlockCamera => &mut self.unlock,
            Action::ToggleFullscreen => &mut self.fullscreen,
            Action::MoveForward => &mut self.forward,
            Action::MoveBack => &mut self.back,
            Action::MoveLeft => &mut self.left,
            Action::MoveRight => &mut self.right,
            Action::MoveUp => &mut self.up,
            Action::MoveDown => &mut self.down,
            Action::PointMode => &mut self.point_mode,
            Action::LineMode => &mut self.line_mode,
            Action::FillMode => &mut self.fill_mode,
        };
        *slot = key;
    }

    /// First action bound to `key`, in [`Action::ALL`] order.
    pub fn action_for(&self, key: Key) -> Option<Action> {
        Action::ALL
            .into_iter()
            .find(|&action| self.key_for(action) == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_layout() {
        let b = KeyBindings::default();
        assert_eq!(b.key_for(Action::LockCamera), Key::E);
        assert_eq!(b.key_for(Action::UnlockCamera), Key::Escape);
        assert_eq!(b.key_for(Action::ToggleFullscreen), Key::F11);
        assert_eq!(b.key_for(Action::MoveUp), Key::Space);
        assert_eq!(b.key_for(Action::MoveDown), Key::LeftShift);
        assert_eq!(b.key_for(Action::LineMode), Key::Num2);
    }

    #[test]
    fn rebinding_changes_lookup() {
        let mut b = KeyBindings::default();
        b.bind(Action::ToggleFullscreen, Key::F);
        assert_eq!(b.key_for(Action::ToggleFullscreen), Key::F);
        assert_eq!(b.action_for(Key::F), Some(Action::ToggleFullscreen));
        assert_eq!(b.action_for(Key::F11), None);
    }

    #[test]
    fn every_action_round_trips_through_its_key() {
        let b = KeyBindings::default();
        for action in Action::ALL {
            assert_eq!(b.action_for(b.key_for(action)), Some(action));
        }
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let b: KeyBindings = serde_json::from_str(r#"{"lock":"L","forward":"I"}"#).unwrap();
        assert_eq!(b.lock, Key::L);
        assert_eq!(b.forward, Key::I);
        assert_eq!(b.unlock, Key::Escape);
        assert_eq!(b.fullscreen, Key::F11);
    }
}
