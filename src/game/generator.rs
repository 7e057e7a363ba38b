//! Procedural Level Generator
//!
//! Keeps a generation frontier ahead of the camera and fills the space with
//! platforms (and the odd collectible). Every random draw is bounded by the
//! player's jump kinematics so the next platform is always reachable from
//! the previous one with a full-effort jump.

use rand::Rng;
use crate::config::{GeneratorConfig, PhysicsConfig};
use super::entity::{Camera, Collectible, Platform, Rect, BLOCK_PALETTE};

/// Jump envelope derived from physics, and the random ranges it allows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReachabilityBounds {
    /// `jump_power² / (2 * gravity)`
    pub max_jump_height: f32,
    /// `max_speed * (jump_power / gravity)`
    pub max_jump_distance: f32,
    /// Platform heights are drawn from `[base, base + height_span]`
    pub height_span: f32,
    /// Gaps are drawn from `[min_gap, min_gap + gap_span]`
    pub gap_span: f32,
}

impl ReachabilityBounds {
    pub fn new(physics: &PhysicsConfig, generator: &GeneratorConfig) -> Self {
        let max_jump_height = physics.max_jump_height();
        let max_jump_distance = physics.max_jump_distance();
        Self {
            max_jump_height,
            max_jump_distance,
            height_span: generator
                .height_cap
                .min(max_jump_height - generator.height_safety_margin)
                .max(0.0),
            gap_span: generator
                .gap_cap
                .min(max_jump_distance - generator.gap_safety_margin)
                .max(0.0),
        }
    }
}

/// Counts from one generation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerationStats {
    pub platforms: usize,
    pub collectibles: usize,
    pub skips: usize,
}

/// Counts from one pruning pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PruneStats {
    pub platforms: usize,
    pub collectibles: usize,
}

/// Where newly generated content goes
pub struct LevelSink<'a> {
    pub platforms: &'a mut Vec<Platform>,
    pub collectibles: &'a mut Vec<Collectible>,
}

/// Endless platform stream generator
#[derive(Debug, Clone)]
pub struct LevelGenerator {
    config: GeneratorConfig,
    bounds: ReachabilityBounds,
    /// Right edge of the last platform emitted (world x)
    last_platform_right: Option<f32>,
}

impl LevelGenerator {
    pub fn new(physics: &PhysicsConfig, config: &GeneratorConfig) -> Self {
        Self {
            config: config.clone(),
            bounds: ReachabilityBounds::new(physics, config),
            last_platform_right: None,
        }
    }

    /// World x the frontier must reach for the current camera
    pub fn target_frontier(&self, camera_x: f32, viewport_width: f32) -> f32 {
        camera_x + viewport_width + self.config.lookahead
    }

    /// Forget the previous run
    pub fn reset(&mut self) {
        self.last_platform_right = None;
    }

    /// Largest gap a single draw can produce
    fn max_gap(&self) -> f32 {
        self.config.min_gap + self.bounds.gap_span
    }

    /// A bare stretch is only allowed if the next platform can still be
    /// reached across it
    fn can_skip(&self, frontier: f32) -> bool {
        match self.last_platform_right {
            Some(right) => {
                let open = frontier - right;
                open + self.config.skip_step + self.max_gap() <= self.bounds.max_jump_distance
            }
            None => true,
        }
    }

    /// Emit the spawn runway when a run starts from frontier zero
    fn emit_runway<R: Rng>(&mut self, rng: &mut R, camera: &mut Camera, floor_y: f32, sink: &mut LevelSink<'_>) {
        let top = floor_y - self.config.base_height;
        let rect = Rect::new(camera.next_spawn_x, top, self.config.runway_width, self.config.platform_thickness);
        sink.platforms.push(Platform::new(rect, rng.gen_range(0..BLOCK_PALETTE.len())));
        camera.next_spawn_x += self.config.runway_width;
        self.last_platform_right = Some(rect.right());
    }

    /// Extend content until the frontier clears the lookahead window.
    ///
    /// `floor_y` is the lava surface; platform heights are measured up from it.
    pub fn generate<R: Rng>(
        &mut self,
        rng: &mut R,
        camera: &mut Camera,
        viewport_width: f32,
        floor_y: f32,
        sink: &mut LevelSink<'_>,
    ) -> GenerationStats {
        let mut stats = GenerationStats::default();
        let target = self.target_frontier(camera.x, viewport_width);

        if self.last_platform_right.is_none() && camera.next_spawn_x == 0.0 && self.config.runway_width > 0.0 {
            self.emit_runway(rng, camera, floor_y, sink);
            stats.platforms += 1;
        }

        while camera.next_spawn_x < target {
            let wants_platform = rng.gen_bool(self.config.platform_chance);
            if !wants_platform && self.can_skip(camera.next_spawn_x) {
                camera.next_spawn_x += self.config.skip_step;
                stats.skips += 1;
                continue;
            }

            let height = self.config.base_height + rng.gen_range(0.0..=self.bounds.height_span);
            let width = self.config.width_unit * (1 + rng.gen_range(0..self.config.width_choices)) as f32;
            let gap = self.config.min_gap + rng.gen_range(0.0..=self.bounds.gap_span);

            let rect = Rect::new(
                camera.next_spawn_x + gap,
                floor_y - height,
                width,
                self.config.platform_thickness,
            );
            sink.platforms.push(Platform::new(rect, rng.gen_range(0..BLOCK_PALETTE.len())));
            stats.platforms += 1;

            if rng.gen_bool(self.config.collectible_chance) {
                let size = self.config.collectible_size;
                let item = Rect::new(rect.x + (rect.w - size) / 2.0, rect.y - size, size, size);
                sink.collectibles.push(Collectible::new(item));
                stats.collectibles += 1;
            }

            camera.next_spawn_x += gap + width;
            self.last_platform_right = Some(rect.right());
        }

        if stats != GenerationStats::default() {
            tracing::debug!(
                "generated {} platforms, {} collectibles, {} skips; frontier at {:.0}",
                stats.platforms,
                stats.collectibles,
                stats.skips,
                camera.next_spawn_x
            );
        }

        stats
    }

    /// Drop everything that has scrolled past the retention margin
    pub fn prune(&self, camera_x: f32, sink: &mut LevelSink<'_>) -> PruneStats {
        let cutoff = camera_x - self.config.retention_margin;
        let platforms_before = sink.platforms.len();
        let collectibles_before = sink.collectibles.len();

        sink.platforms.retain(|p| p.rect.x >= cutoff);
        sink.collectibles.retain(|c| c.rect.x >= cutoff);

        PruneStats {
            platforms: platforms_before - sink.platforms.len(),
            collectibles: collectibles_before - sink.collectibles.len(),
        }
    }
}
