//! Game configuration
//!
//! Tunables for physics, level generation and the run. Stored as RON
//! (Rusty Object Notation) so the file is easy to hand-edit. Every field has
//! a default, so a partial file only overrides what it names.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default config file, looked up next to the working directory
pub const CONFIG_FILE: &str = "lava_runner.ron";

/// Error type for config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Player movement tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration per frame
    pub gravity: f32,
    /// Horizontal velocity multiplier applied every frame
    pub friction: f32,
    /// Horizontal acceleration per frame while a direction is held
    pub acceleration: f32,
    pub max_speed: f32,
    pub jump_power: f32,
    /// Jumps available before landing again
    pub jump_max: u32,
    /// Optional fall speed cap (None = unbounded gravity accumulation)
    pub terminal_velocity: Option<f32>,
    pub player_width: f32,
    pub player_height: f32,
    /// Screen-fixed spawn column
    pub spawn_x: f32,
    /// Spawn height above the lava
    pub spawn_height: f32,
    /// Screen band the player is kept inside
    pub min_screen_x: f32,
    pub max_screen_x: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            friction: 0.85,
            acceleration: 1.2,
            max_speed: 8.0,
            jump_power: 15.0,
            jump_max: 2,
            terminal_velocity: None,
            player_width: 32.0,
            player_height: 64.0,
            spawn_x: 100.0,
            spawn_height: 200.0,
            min_screen_x: 50.0,
            max_screen_x: 200.0,
        }
    }
}

impl PhysicsConfig {
    /// Apex height of a full-power jump: v² / 2g
    pub fn max_jump_height(&self) -> f32 {
        self.jump_power * self.jump_power / (2.0 * self.gravity)
    }

    /// Horizontal distance covered at top speed while rising: v_x · (v_y / g)
    pub fn max_jump_distance(&self) -> f32 {
        self.max_speed * (self.jump_power / self.gravity)
    }
}

/// Level generator tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// How far past the right edge of the viewport to keep content generated
    pub lookahead: f32,
    /// How far behind the camera content is kept before pruning
    pub retention_margin: f32,
    /// Extra band around the viewport considered by collision
    pub visibility_margin: f32,
    pub platform_chance: f64,
    pub collectible_chance: f64,
    /// Frontier advance when no platform is emitted
    pub skip_step: f32,
    /// Lowest platform top, measured up from the floor
    pub base_height: f32,
    pub height_cap: f32,
    pub height_safety_margin: f32,
    pub min_gap: f32,
    pub gap_cap: f32,
    pub gap_safety_margin: f32,
    /// Platform width unit; widths are 1, 2 or 3 units
    pub width_unit: f32,
    pub width_choices: u32,
    pub platform_thickness: f32,
    pub collectible_size: f32,
    /// Width of the runway emitted under the spawn point
    pub runway_width: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            lookahead: 1000.0,
            retention_margin: 200.0,
            visibility_margin: 100.0,
            platform_chance: 0.8,
            collectible_chance: 0.3,
            skip_step: 64.0,
            base_height: 80.0,
            height_cap: 120.0,
            height_safety_margin: 50.0,
            min_gap: 32.0,
            gap_cap: 80.0,
            gap_safety_margin: 40.0,
            width_unit: 64.0,
            width_choices: 3,
            platform_thickness: 32.0,
            collectible_size: 32.0,
            runway_width: 256.0,
        }
    }
}

/// Run pacing and scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub initial_world_speed: f32,
    pub world_speed_increase: f32,
    /// Collectible score = floor(world_speed * multiplier)
    pub collectible_multiplier: f32,
    /// Camera travel per level
    pub level_distance: f32,
    /// World speed bonus on each level advance
    pub level_speed_bonus: f32,
    /// Lava band thickness at the bottom of the viewport
    pub lava_depth: f32,
    /// How far the player may trail the camera before the run ends
    pub trailing_margin: f32,
    /// Frames for the game-over banner to slide in
    pub banner_frames: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            initial_world_speed: 1.5,
            world_speed_increase: 0.005,
            collectible_multiplier: 50.0,
            level_distance: 10_000.0,
            level_speed_bonus: 1.0,
            lava_depth: 32.0,
            trailing_margin: 100.0,
            banner_frames: 45,
        }
    }
}

/// Initial window size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub generator: GeneratorConfig,
    pub run: RunConfig,
    pub viewport: ViewportConfig,
}

impl GameConfig {
    /// Parse from a RON string and validate
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron(&source)
    }

    /// Load from a file, falling back to defaults when the file is missing
    /// or invalid
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                tracing::info!("loaded config from {}", path.display());
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                tracing::warn!("ignoring {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reject configurations the generator cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        let g = &self.generator;
        let r = &self.run;

        let positive = [
            ("physics.gravity", p.gravity),
            ("physics.max_speed", p.max_speed),
            ("physics.jump_power", p.jump_power),
            ("physics.player_width", p.player_width),
            ("physics.player_height", p.player_height),
            ("generator.lookahead", g.lookahead),
            ("generator.skip_step", g.skip_step),
            ("generator.width_unit", g.width_unit),
            ("generator.platform_thickness", g.platform_thickness),
            ("viewport.width", self.viewport.width),
            ("viewport.height", self.viewport.height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Validation(format!("{} must be positive, got {}", name, value)));
            }
        }

        if !(0.0..=1.0).contains(&p.friction) {
            return Err(ConfigError::Validation(format!("physics.friction must be in [0, 1], got {}", p.friction)));
        }
        if p.jump_max == 0 {
            return Err(ConfigError::Validation("physics.jump_max must be at least 1".to_string()));
        }
        if p.min_screen_x > p.max_screen_x {
            return Err(ConfigError::Validation(format!(
                "physics.min_screen_x ({}) exceeds max_screen_x ({})",
                p.min_screen_x, p.max_screen_x
            )));
        }
        if let Some(cap) = p.terminal_velocity {
            if !(cap.is_finite() && cap > 0.0) {
                return Err(ConfigError::Validation(format!("physics.terminal_velocity must be positive, got {}", cap)));
            }
        }
        for (name, chance) in [("generator.platform_chance", g.platform_chance), ("generator.collectible_chance", g.collectible_chance)] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::Validation(format!("{} must be in [0, 1], got {}", name, chance)));
            }
        }
        if g.width_choices == 0 {
            return Err(ConfigError::Validation("generator.width_choices must be at least 1".to_string()));
        }

        let non_negative = [
            ("generator.height_safety_margin", g.height_safety_margin),
            ("generator.gap_safety_margin", g.gap_safety_margin),
            ("generator.min_gap", g.min_gap),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Validation(format!("{} must not be negative, got {}", name, value)));
            }
        }

        let height_room = p.max_jump_height() - g.height_safety_margin;
        if height_room <= 0.0 || g.height_cap.min(height_room) >= p.max_jump_height() {
            return Err(ConfigError::Validation(format!(
                "max jump height {:.1} leaves no room above the {:.1} safety margin",
                p.max_jump_height(),
                g.height_safety_margin
            )));
        }
        let gap_room = p.max_jump_distance() - g.gap_safety_margin;
        if gap_room <= 0.0 || g.min_gap + gap_room.min(g.gap_cap).max(0.0) > p.max_jump_distance() {
            return Err(ConfigError::Validation(format!(
                "max jump distance {:.1} cannot cover the minimum gap {:.1}",
                p.max_jump_distance(),
                g.min_gap
            )));
        }

        if r.banner_frames == 0 {
            return Err(ConfigError::Validation("run.banner_frames must be at least 1".to_string()));
        }
        if !(r.level_distance.is_finite() && r.level_distance > 0.0) {
            return Err(ConfigError::Validation(format!("run.level_distance must be positive, got {}", r.level_distance)));
        }

        Ok(())
    }
}
