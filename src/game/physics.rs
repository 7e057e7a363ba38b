//! Physics & Movement Simulator
//!
//! Fixed-step player integration. One call is one frame: there is no delta
//! time, so every constant in [`PhysicsConfig`] is "per frame".

use crate::config::PhysicsConfig;
use crate::input::InputSnapshot;
use super::entity::Player;

/// What happened during a movement step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveResult {
    /// A jump was granted this frame
    pub jumped: bool,
    /// The player hit the edge of the screen band
    pub clamped: bool,
}

/// Advance the player by one frame.
///
/// `jump_pressed` is the edge-triggered press from the input latch, not the
/// key level.
pub fn step_player(
    player: &mut Player,
    input: &InputSnapshot,
    jump_pressed: bool,
    physics: &PhysicsConfig,
) -> MoveResult {
    let mut result = MoveResult::default();

    if input.left {
        player.vx = (player.vx - physics.acceleration).max(-player.max_speed);
    }
    if input.right {
        player.vx = (player.vx + physics.acceleration).min(player.max_speed);
    }

    if jump_pressed && player.jumps_used < player.jump_max {
        player.vy = -player.jump_power;
        player.jumps_used += 1;
        player.on_ground = false;
        result.jumped = true;
    }

    player.vx *= physics.friction;

    player.vy += physics.gravity;
    if let Some(cap) = physics.terminal_velocity {
        player.vy = player.vy.min(cap);
    }

    player.x += player.vx;
    player.y += player.vy;

    if player.x < physics.min_screen_x {
        player.x = physics.min_screen_x;
        player.vx = 0.0;
        result.clamped = true;
    }
    if player.x > physics.max_screen_x {
        player.x = physics.max_screen_x;
        player.vx = 0.0;
        result.clamped = true;
    }

    result
}
