//! Frame Events
//!
//! What happened during the last tick. The session clears the queue at the
//! start of every tick and appends as the frame runs; the main loop reads it
//! after the tick and logs it. The simulation never reads its own events.

use super::run_state::GameOverCause;

/// Append-only list of one tick's events
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Events in the order they were sent
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a frame can report
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameEvent {
    Jumped { jumps_used: u32 },
    Landed,
    HitCeiling,
    HitWall,
    Collected { points: u64 },
    LevelUp { level: u32, world_speed: f32 },
    GameOver { cause: GameOverCause, score: u64, new_high_score: bool },
    Restarted,
}

impl FrameEvent {
    /// Fires most frames while the player stands on something
    pub fn is_routine(&self) -> bool {
        matches!(self, FrameEvent::Landed)
    }
}
