//! Run State Machine
//!
//! `Running` until a terminal condition fires, then `GameOver` until an
//! explicit restart. Owns the score, level counter and the game-over banner
//! animation.

use crate::config::RunConfig;
use super::entity::Player;

/// Top-level run phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    #[default]
    Running,
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    /// Feet touched the lava surface
    Lava,
    /// Dropped below the bottom of the viewport
    FellOffScreen,
    /// Scrolled too far behind the camera's trailing edge
    LeftBehind,
}

impl GameOverCause {
    pub fn label(&self) -> &'static str {
        match self {
            GameOverCause::Lava => "lava",
            GameOverCause::FellOffScreen => "fell off screen",
            GameOverCause::LeftBehind => "left behind",
        }
    }
}

/// Check the terminal conditions in priority order
pub fn terminal_condition(
    player: &Player,
    camera_x: f32,
    lava_level: f32,
    viewport_height: f32,
    trailing_margin: f32,
) -> Option<GameOverCause> {
    if player.bottom() >= lava_level {
        Some(GameOverCause::Lava)
    } else if player.y > viewport_height {
        Some(GameOverCause::FellOffScreen)
    } else if player.x + camera_x < camera_x - trailing_margin {
        Some(GameOverCause::LeftBehind)
    } else {
        None
    }
}

/// Game-over banner slide-in
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Banner {
    elapsed: u32,
    frames: u32,
}

impl Banner {
    pub fn new(frames: u32) -> Self {
        Self { elapsed: 0, frames: frames.max(1) }
    }

    pub fn tick(&mut self) {
        self.elapsed = (self.elapsed + 1).min(self.frames);
    }

    /// Eased progress in [0, 1]
    pub fn progress(&self) -> f32 {
        let t = self.elapsed as f32 / self.frames as f32;
        // ease-out cubic
        1.0 - (1.0 - t).powi(3)
    }

    /// Resting y of the banner headline for a viewport height
    pub fn target_y(viewport_height: f32) -> f32 {
        viewport_height / 2.0 - 50.0
    }

    /// Current headline y; slides down from above the viewport
    pub fn current_y(&self, viewport_height: f32) -> f32 {
        let start = -50.0;
        start + (Self::target_y(viewport_height) - start) * self.progress()
    }
}

/// Score, level and phase for one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    pub score: u64,
    pub high_score: u64,
    pub level: u32,
    pub phase: RunPhase,
    pub banner: Banner,
    /// Why the last run ended
    pub cause: Option<GameOverCause>,
    /// Camera x at which the next level starts
    next_level_at: f32,
    config: RunConfig,
}

impl RunState {
    pub fn new(high_score: u64, config: &RunConfig) -> Self {
        Self {
            score: 0,
            high_score,
            level: 1,
            phase: RunPhase::Running,
            banner: Banner::new(config.banner_frames),
            cause: None,
            next_level_at: config.level_distance,
            config: config.clone(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Per-frame distance bonus: `floor(world_speed)`
    pub fn add_distance(&mut self, world_speed: f32) {
        if self.is_running() {
            self.score += world_speed.floor().max(0.0) as u64;
        }
    }

    pub fn add_points(&mut self, points: u64) {
        if self.is_running() {
            self.score += points;
        }
    }

    /// Advance the level when the camera has travelled far enough.
    /// Returns the new level number.
    pub fn advance_level(&mut self, camera_x: f32) -> Option<u32> {
        if !self.is_running() || camera_x < self.next_level_at {
            return None;
        }
        self.level += 1;
        self.next_level_at += self.config.level_distance;
        Some(self.level)
    }

    /// Enter `GameOver`. Returns true when the high score was beaten.
    pub fn end_run(&mut self, cause: GameOverCause) -> bool {
        if !self.is_running() {
            return false;
        }
        self.phase = RunPhase::GameOver;
        self.cause = Some(cause);
        self.banner = Banner::new(self.config.banner_frames);

        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }

    /// Per-frame bookkeeping while the run is over
    pub fn tick_game_over(&mut self) {
        if self.phase == RunPhase::GameOver {
            self.banner.tick();
        }
    }

    /// Back to a fresh `Running` state; the high score survives
    pub fn restart(&mut self) {
        *self = Self::new(self.high_score, &self.config);
    }
}
