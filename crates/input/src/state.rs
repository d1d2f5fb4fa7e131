use std::collections::HashSet;

use crate::action::{Action, KeyBindings};
use crate::key::Key;

/// Keys currently held and the last reported cursor position, in
/// framebuffer pixels with the origin at the top-left.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    cursor: (f64, f64),
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_action_pressed(&self, bindings: &KeyBindings, action: Action) -> bool {
        self.is_pressed(bindings.key_for(action))
    }

    /// Drop every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn set_cursor(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
    }

    pub fn cursor(&self) -> (f64, f64) {
        self.cursor
    }
}
