//! Input state management
//!
//! Polls the keyboard (macroquad) into a plain snapshot, and provides the
//! edge latch that turns a held key into a single press.

use macroquad::prelude::*;
use super::Action;

/// What the player is holding this frame. Plain data: the simulation reads
/// it, nothing writes it after sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    /// Jump key level (held), not the edge
    pub jump: bool,
    pub restart: bool,
}

impl InputSnapshot {
    /// Mark an action as held
    pub fn with(mut self, action: Action) -> Self {
        match action {
            Action::MoveLeft => self.left = true,
            Action::MoveRight => self.right = true,
            Action::Jump => self.jump = true,
            Action::Restart => self.restart = true,
        }
        self
    }
}

/// Edge trigger: fires on the frame a key goes down, then stays quiet
/// until it has been released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JumpLatch {
    held: bool,
}

impl JumpLatch {
    pub fn new() -> Self {
        Self { held: false }
    }

    /// Feed the current key level; returns true only on a fresh press
    pub fn press(&mut self, down: bool) -> bool {
        let fired = down && !self.held;
        self.held = down;
        fired
    }
}

/// Keyboard-backed input source
pub struct KeyboardInput;

impl KeyboardInput {
    pub fn new() -> Self {
        Self
    }

    /// Sample every action once. Call at the start of the frame.
    pub fn sample(&self) -> InputSnapshot {
        let mut snapshot = InputSnapshot::default();
        for action in Action::ALL {
            if self.keyboard_down(action) {
                snapshot = snapshot.with(action);
            }
        }
        snapshot
    }

    fn keyboard_down(&self, action: Action) -> bool {
        match action {
            Action::MoveLeft => is_key_down(KeyCode::A) || is_key_down(KeyCode::Left),
            Action::MoveRight => is_key_down(KeyCode::D) || is_key_down(KeyCode::Right),
            Action::Jump => {
                is_key_down(KeyCode::W) || is_key_down(KeyCode::Up) || is_key_down(KeyCode::Space)
            }
            Action::Restart => is_key_down(KeyCode::R) || is_key_down(KeyCode::Enter),
        }
    }
}

impl Default for KeyboardInput {
    fn default() -> Self {
        Self::new()
    }
}
