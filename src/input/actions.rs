//! Game action definitions
//!
//! The runner only needs a handful of actions. Keyboard bindings:
//! - A / Left arrow = MoveLeft
//! - D / Right arrow = MoveRight
//! - W / Up arrow / Space = Jump
//! - R / Enter = Restart

/// All actions the simulation reads from input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Restart,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::MoveLeft, Action::MoveRight, Action::Jump, Action::Restart];
}
