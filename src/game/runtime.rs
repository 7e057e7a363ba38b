//! Game Runtime
//!
//! [`GameSession`] owns one run's worth of state and advances it one fixed
//! step per call to [`GameSession::tick`]. Frame order:
//!
//! 1. camera scroll + speed-up (and level advance)
//! 2. generator extends the frontier
//! 3. simulator applies input, gravity, friction
//! 4. resolver corrects against platforms, picks up collectibles
//! 5. stale platforms/collectibles are pruned
//! 6. state machine checks terminal conditions and scores the frame
//!
//! The render collaborator only ever sees a [`RenderSnapshot`].

use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::config::GameConfig;
use crate::input::{InputSnapshot, JumpLatch};
use crate::storage::HighScoreStore;
use super::collision::{collect_items, resolve_platforms, BroadPhase};
use super::entity::{Camera, Collectible, Platform, Player, Rect};
use super::event::{EventQueue, FrameEvent};
use super::generator::{LevelGenerator, LevelSink};
use super::physics::step_player;
use super::run_state::{terminal_condition, RunPhase, RunState};

/// Viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Read-only view of one frame for the renderer
#[derive(Debug, Clone, Copy)]
pub struct RenderSnapshot<'a> {
    /// Player in screen space
    pub player: Rect,
    pub platforms: &'a [Platform],
    pub collectibles: &'a [Collectible],
    pub camera_x: f32,
    pub world_speed: f32,
    pub score: u64,
    pub high_score: u64,
    pub level: u32,
    pub phase: RunPhase,
    pub banner_progress: f32,
    pub banner_y: f32,
    pub lava_level: f32,
    pub viewport: Viewport,
    pub frame: u64,
}

/// One game instance: world, player, run state and the high-score store
pub struct GameSession {
    config: GameConfig,
    pub player: Player,
    pub camera: Camera,
    pub platforms: Vec<Platform>,
    pub collectibles: Vec<Collectible>,
    pub run: RunState,
    /// Events from the last tick (cleared at the start of each tick)
    pub events: EventQueue<FrameEvent>,
    generator: LevelGenerator,
    rng: StdRng,
    store: Box<dyn HighScoreStore>,
    jump_latch: JumpLatch,
    restart_latch: JumpLatch,
    viewport: Viewport,
    lava_level: f32,
    frame: u64,
}

impl GameSession {
    /// Build a session and start the first run.
    ///
    /// A failed high-score read is logged and treated as 0.
    pub fn new(config: GameConfig, store: Box<dyn HighScoreStore>, seed: u64) -> Self {
        let high_score = match store.get_high_score() {
            Ok(score) => score,
            Err(e) => {
                tracing::warn!("could not read high score: {}, starting from 0", e);
                0
            }
        };

        let viewport = Viewport::new(config.viewport.width, config.viewport.height);
        let lava_level = viewport.height - config.run.lava_depth;

        let mut session = Self {
            player: Player::new(&config.physics),
            camera: Camera::new(config.run.initial_world_speed),
            platforms: Vec::new(),
            collectibles: Vec::new(),
            run: RunState::new(high_score, &config.run),
            events: EventQueue::new(),
            generator: LevelGenerator::new(&config.physics, &config.generator),
            rng: StdRng::seed_from_u64(seed),
            store,
            jump_latch: JumpLatch::new(),
            restart_latch: JumpLatch::new(),
            viewport,
            lava_level,
            frame: 0,
            config,
        };
        session.start_level();
        session
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Fresh camera, fresh level from frontier zero, player at spawn
    fn start_level(&mut self) {
        self.camera = Camera::new(self.config.run.initial_world_speed);
        self.platforms.clear();
        self.collectibles.clear();
        self.generator.reset();
        self.player.respawn(&self.config.physics, self.lava_level);
        self.generate();
    }

    fn generate(&mut self) {
        let mut sink = LevelSink {
            platforms: &mut self.platforms,
            collectibles: &mut self.collectibles,
        };
        self.generator.generate(
            &mut self.rng,
            &mut self.camera,
            self.viewport.width,
            self.lava_level,
            &mut sink,
        );
    }

    /// Explicit restart command. Keeps the high score.
    pub fn restart(&mut self) {
        self.run.restart();
        self.start_level();
        self.events.send(FrameEvent::Restarted);
        tracing::info!("run restarted (high score {})", self.run.high_score);
    }

    /// Viewport changed: re-derive the lava surface and move the course
    /// with it, so platform heights stay measured from the floor. The banner
    /// target is computed from the height at snapshot time.
    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width, height);
        if viewport == self.viewport || width <= 0.0 || height <= 0.0 {
            return;
        }
        let lava_level = height - self.config.run.lava_depth;
        let shift = lava_level - self.lava_level;
        for platform in &mut self.platforms {
            platform.rect.y += shift;
        }
        for item in &mut self.collectibles {
            item.rect.y += shift;
        }
        self.player.y += shift;

        self.viewport = viewport;
        self.lava_level = lava_level;
        tracing::debug!("viewport resized to {}x{}, lava at {}", width, height, self.lava_level);
    }

    /// Advance one fixed step.
    ///
    /// The frame that ends the run scores no distance: the game-over banner
    /// shows the score at the moment the run ended, without a final
    /// `floor(world_speed)` for the terminal frame.
    pub fn tick(&mut self, input: InputSnapshot) {
        self.events.clear();
        self.frame += 1;

        let jump_pressed = self.jump_latch.press(input.jump);
        let restart_pressed = self.restart_latch.press(input.restart);

        if !self.run.is_running() {
            if restart_pressed {
                self.restart();
            } else {
                self.run.tick_game_over();
            }
            return;
        }

        // Scroll and escalate
        self.camera.x += self.camera.world_speed;
        self.camera.world_speed += self.config.run.world_speed_increase;
        if let Some(level) = self.run.advance_level(self.camera.x) {
            self.camera.world_speed += self.config.run.level_speed_bonus;
            self.events.send(FrameEvent::LevelUp { level, world_speed: self.camera.world_speed });
            tracing::info!("level {} (speed {:.2})", level, self.camera.world_speed);
        }

        self.generate();

        let moved = step_player(&mut self.player, &input, jump_pressed, &self.config.physics);
        if moved.jumped {
            self.events.send(FrameEvent::Jumped { jumps_used: self.player.jumps_used });
        }

        let broad = BroadPhase::around_camera(
            self.camera.x,
            self.viewport.width,
            self.config.generator.visibility_margin,
        );
        let contacts = resolve_platforms(&mut self.player, self.camera.x, broad, &self.platforms);
        if contacts.landed {
            self.events.send(FrameEvent::Landed);
        }
        if contacts.hit_ceiling {
            self.events.send(FrameEvent::HitCeiling);
        }
        if contacts.hit_wall {
            self.events.send(FrameEvent::HitWall);
        }

        let pickups = collect_items(
            &self.player,
            self.camera.x,
            broad,
            &mut self.collectibles,
            self.camera.world_speed,
            self.config.run.collectible_multiplier,
        );
        for pickup in pickups {
            self.run.add_points(pickup.points);
            self.events.send(FrameEvent::Collected { points: pickup.points });
        }

        let mut sink = LevelSink {
            platforms: &mut self.platforms,
            collectibles: &mut self.collectibles,
        };
        let pruned = self.generator.prune(self.camera.x, &mut sink);
        if pruned.platforms + pruned.collectibles > 0 {
            tracing::trace!("pruned {} platforms, {} collectibles", pruned.platforms, pruned.collectibles);
        }

        if let Some(cause) = terminal_condition(
            &self.player,
            self.camera.x,
            self.lava_level,
            self.viewport.height,
            self.config.run.trailing_margin,
        ) {
            let new_high_score = self.run.end_run(cause);
            if new_high_score {
                if let Err(e) = self.store.set_high_score(self.run.high_score) {
                    tracing::warn!("could not save high score: {}", e);
                }
            }
            self.events.send(FrameEvent::GameOver { cause, score: self.run.score, new_high_score });
            tracing::info!(
                "game over ({}): score {}, level {}{}",
                cause.label(),
                self.run.score,
                self.run.level,
                if new_high_score { ", new high score" } else { "" }
            );
            return;
        }

        self.run.add_distance(self.camera.world_speed);
    }

    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        RenderSnapshot {
            player: self.player.screen_rect(),
            platforms: &self.platforms,
            collectibles: &self.collectibles,
            camera_x: self.camera.x,
            world_speed: self.camera.world_speed,
            score: self.run.score,
            high_score: self.run.high_score,
            level: self.run.level,
            phase: self.run.phase,
            banner_progress: self.run.banner.progress(),
            banner_y: self.run.banner.current_y(self.viewport.height),
            lava_level: self.lava_level,
            viewport: self.viewport,
            frame: self.frame,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::run_state::Banner;
    use crate::input::Action;
    use crate::storage::{MemoryStore, StorageError};
    use std::cell::Cell;
    use std::rc::Rc;

    fn session() -> GameSession {
        GameSession::new(GameConfig::default(), Box::new(MemoryStore::new()), 42)
    }

    fn idle() -> InputSnapshot {
        InputSnapshot::default()
    }

    fn jump() -> InputSnapshot {
        InputSnapshot::default().with(Action::Jump)
    }

    /// Tick until the player stands on the runway
    fn settle(session: &mut GameSession) {
        for _ in 0..60 {
            session.tick(idle());
            if session.player.on_ground {
                return;
            }
        }
        panic!("player never landed");
    }

    /// Put the player's feet on the lava with nothing around to land on
    fn strand_over_lava(session: &mut GameSession) {
        session.platforms.clear();
        session.collectibles.clear();
        session.camera.next_spawn_x = 1.0e9;
        session.player.y = session.lava_level - session.player.height;
    }

    struct FlakyStore {
        writes: Rc<Cell<u32>>,
    }

    impl HighScoreStore for FlakyStore {
        fn get_high_score(&self) -> Result<u64, StorageError> {
            Err(StorageError::PermissionDenied("locked".to_string()))
        }

        fn set_high_score(&mut self, _score: u64) -> Result<(), StorageError> {
            self.writes.set(self.writes.get() + 1);
            Err(StorageError::IoError("disk full".to_string()))
        }
    }

    #[test]
    fn test_new_session_starts_running_on_runway() {
        let session = session();
        assert!(session.run.is_running());
        assert_eq!(session.run.level, 1);
        assert_eq!(session.camera.x, 0.0);
        assert_eq!(session.platforms[0].rect.x, 0.0);
        assert_eq!(session.player.y, session.lava_level - 200.0);
    }

    #[test]
    fn test_player_lands_and_resets_jumps() {
        let mut session = session();
        settle(&mut session);
        assert!(session.player.on_ground);
        assert_eq!(session.player.jumps_used, 0);
        assert_eq!(session.player.bottom(), session.platforms[0].rect.y);
    }

    #[test]
    fn test_holding_jump_fires_once() {
        let mut session = session();
        settle(&mut session);

        let mut jumps = 0;
        for _ in 0..40 {
            session.tick(jump());
            jumps += session.events.iter().filter(|e| matches!(e, FrameEvent::Jumped { .. })).count();
        }
        assert_eq!(jumps, 1);
        assert!(session.player.jumps_used <= session.player.jump_max);
    }

    #[test]
    fn test_air_jump_needs_release() {
        let mut session = session();
        settle(&mut session);

        session.tick(jump());
        assert_eq!(session.player.jumps_used, 1);
        session.tick(jump());
        assert_eq!(session.player.jumps_used, 1);
        session.tick(idle());
        session.tick(jump());
        assert_eq!(session.player.jumps_used, 2);

        // Exhausted until landing
        session.tick(idle());
        session.tick(jump());
        assert_eq!(session.player.jumps_used, 2);
        assert!(session.player.vy > -15.0);
    }

    #[test]
    fn test_distance_score_accumulates() {
        let mut session = session();
        session.tick(idle());
        // floor(1.505)
        assert_eq!(session.run.score, 1);
        for _ in 0..10 {
            session.tick(idle());
        }
        assert_eq!(session.run.score, 11);
        assert!(session.camera.world_speed > 1.5);
    }

    #[test]
    fn test_frontier_and_pruning_hold_every_frame() {
        let mut session = session();
        for _ in 0..600 {
            session.player.y = session.lava_level - 300.0;
            session.player.vy = 0.0;
            session.tick(idle());
            let cutoff = session.camera.x - session.config.generator.retention_margin;
            assert!(session.platforms.iter().all(|p| p.rect.x >= cutoff));
            assert!(session.collectibles.iter().all(|c| c.rect.x >= cutoff));
            // The camera scrolls before generation, so the frontier covers it
            let target = session.generator.target_frontier(session.camera.x, session.viewport().width);
            assert!(session.camera.next_spawn_x >= target);
        }
        assert!(session.run.is_running());
    }

    #[test]
    fn test_game_over_at_hazard() {
        let mut session = session();
        session.run.score = 77;
        strand_over_lava(&mut session);

        session.tick(idle());
        assert_eq!(session.run.phase, RunPhase::GameOver);
        assert_eq!(session.run.score, 77);
        assert!(session.events.iter().any(|e| matches!(e, FrameEvent::GameOver { score: 77, .. })));

        for _ in 0..20 {
            session.tick(idle());
        }
        assert_eq!(session.run.score, 77);
        assert!(session.snapshot().banner_progress > 0.0);
    }

    #[test]
    fn test_new_high_score_is_persisted() {
        let mut session = session();
        session.run.score = 900;
        strand_over_lava(&mut session);
        session.tick(idle());
        assert_eq!(session.run.high_score, 900);
        assert_eq!(session.store.get_high_score(), Ok(900));
    }

    #[test]
    fn test_storage_failures_degrade_gracefully() {
        let writes = Rc::new(Cell::new(0));
        let store = FlakyStore { writes: writes.clone() };
        let mut session = GameSession::new(GameConfig::default(), Box::new(store), 1);
        assert_eq!(session.run.high_score, 0);

        session.run.score = 10;
        strand_over_lava(&mut session);
        session.tick(idle());
        assert_eq!(writes.get(), 1);
        assert_eq!(session.run.high_score, 10);
        assert_eq!(session.run.phase, RunPhase::GameOver);
    }

    #[test]
    fn test_restart_resets_run() {
        let mut session = session();
        session.run.high_score = 1000;
        for _ in 0..30 {
            session.tick(idle());
        }
        session.run.score = 500;
        session.run.level = 3;

        session.restart();

        assert_eq!(session.run.score, 0);
        assert_eq!(session.run.level, 1);
        assert!(session.run.is_running());
        assert_eq!(session.run.high_score, 1000);
        assert_eq!(session.camera.x, 0.0);
        assert_eq!(session.camera.world_speed, 1.5);
        assert_eq!(session.platforms[0].rect.x, 0.0);
        assert_eq!(session.player.vx, 0.0);
        assert_eq!(session.player.vy, 0.0);
        assert_eq!(session.player.jumps_used, 0);
        assert!(session.events.iter().any(|e| *e == FrameEvent::Restarted));
    }

    #[test]
    fn test_restart_key_only_after_game_over() {
        let mut session = session();
        let restart = InputSnapshot::default().with(Action::Restart);
        for _ in 0..5 {
            session.tick(restart);
        }
        assert!(session.camera.x > 0.0);

        strand_over_lava(&mut session);
        session.tick(restart);
        assert_eq!(session.run.phase, RunPhase::GameOver);
        // Still held from before: needs a fresh press
        session.tick(restart);
        assert_eq!(session.run.phase, RunPhase::GameOver);
        session.tick(idle());
        session.tick(restart);
        assert!(session.run.is_running());
        assert_eq!(session.camera.x, 0.0);
    }

    #[test]
    fn test_level_advance_adds_speed() {
        let mut config = GameConfig::default();
        config.run.level_distance = 30.0;
        let mut session = GameSession::new(config, Box::new(MemoryStore::new()), 3);

        let mut levels = Vec::new();
        for _ in 0..25 {
            session.tick(idle());
            for event in session.events.iter() {
                if let FrameEvent::LevelUp { level, .. } = event {
                    levels.push(*level);
                }
            }
        }
        assert_eq!(levels.first(), Some(&2));
        assert!(session.camera.world_speed > 2.5);
    }

    #[test]
    fn test_collecting_awards_points_once() {
        let mut session = session();
        settle(&mut session);
        let rect = session.player.world_rect(session.camera.x);
        session.collectibles.push(Collectible::new(rect));
        let before = session.run.score;

        session.tick(idle());
        let bonus = session
            .events
            .iter()
            .filter_map(|e| match e {
                FrameEvent::Collected { points } => Some(*points),
                _ => None,
            })
            .sum::<u64>();
        assert_eq!(bonus, (session.camera.world_speed * 50.0).floor() as u64);
        assert_eq!(session.run.score, before + bonus + session.camera.world_speed.floor() as u64);

        let after_first = session.run.score;
        session.tick(idle());
        assert!(!session.events.iter().any(|e| matches!(e, FrameEvent::Collected { .. })));
        assert_eq!(session.run.score, after_first + session.camera.world_speed.floor() as u64);
    }

    #[test]
    fn test_resize_moves_lava_and_banner() {
        let mut session = session();
        session.resize(1024.0, 768.0);
        assert_eq!(session.lava_level, 768.0 - 32.0);
        assert_eq!(Banner::target_y(session.viewport.height), 334.0);
        assert_eq!(session.snapshot().viewport, Viewport::new(1024.0, 768.0));

        // Degenerate sizes are ignored
        session.resize(0.0, 0.0);
        assert_eq!(session.viewport(), Viewport::new(1024.0, 768.0));
    }

    #[test]
    fn test_resize_mid_run_keeps_course_above_lava() {
        let mut session = session();
        settle(&mut session);
        for _ in 0..30 {
            session.tick(idle());
        }
        let heights: Vec<f32> = session.platforms.iter().map(|p| session.lava_level - p.rect.y).collect();
        let standing = session.lava_level - session.player.bottom();

        session.resize(800.0, 400.0);

        assert_eq!(session.lava_level, 368.0);
        for (platform, height) in session.platforms.iter().zip(&heights) {
            assert!((session.lava_level - platform.rect.y - height).abs() < 1e-3);
        }
        assert!((session.lava_level - session.player.bottom() - standing).abs() < 1e-3);
        assert!(session.platforms.iter().all(|p| p.rect.bottom() < session.lava_level));
        assert!(session.collectibles.iter().all(|c| c.rect.bottom() < session.lava_level));

        for _ in 0..20 {
            session.tick(idle());
        }
        assert!(session.run.is_running());
        assert!(session.player.on_ground);
        assert!(session.platforms.iter().all(|p| p.rect.y < session.lava_level));
    }

    #[test]
    fn test_resize_before_first_frame() {
        let mut session = session();
        session.resize(1280.0, 400.0);
        for _ in 0..60 {
            session.tick(idle());
        }
        assert!(session.run.is_running());
        assert!(session.player.on_ground);
    }

    #[test]
    fn test_same_seed_same_level() {
        let a = session();
        let b = session();
        assert_eq!(a.platforms, b.platforms);
        assert_eq!(a.collectibles, b.collectibles);
    }
}
