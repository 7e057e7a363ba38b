//! Entity Model
//!
//! Plain data records for everything the simulation moves or collides with.
//! Platforms and collectibles live in world space; the player's `x` is
//! screen-fixed and must be offset by the camera before comparing.

use serde::{Deserialize, Serialize};
use crate::config::PhysicsConfig;

/// Axis-aligned rectangle (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap test; touching edges do not count.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// Horizontal span test used for the broad phase
    #[inline]
    pub fn within_x(&self, min_x: f32, max_x: f32) -> bool {
        self.right() >= min_x && self.x <= max_x
    }
}

/// The player character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Screen-fixed horizontal position
    pub x: f32,
    /// World-vertical position (top edge)
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    pub max_speed: f32,
    pub jump_power: f32,
    pub on_ground: bool,
    pub jumps_used: u32,
    pub jump_max: u32,
}

impl Player {
    pub fn new(physics: &PhysicsConfig) -> Self {
        Self {
            x: physics.spawn_x,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            width: physics.player_width,
            height: physics.player_height,
            max_speed: physics.max_speed,
            jump_power: physics.jump_power,
            on_ground: false,
            jumps_used: 0,
            jump_max: physics.jump_max,
        }
    }

    /// Player rectangle in world space
    pub fn world_rect(&self, camera_x: f32) -> Rect {
        Rect::new(self.x + camera_x, self.y, self.width, self.height)
    }

    /// Player rectangle in screen space (what the renderer draws)
    pub fn screen_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Put the player back at the spawn point, standing still
    pub fn respawn(&mut self, physics: &PhysicsConfig, lava_level: f32) {
        *self = Self::new(physics);
        self.y = lava_level - physics.spawn_height;
    }
}

/// Block material (render-only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockType {
    Stone,
    Wood,
}

/// The seven platform looks: palette color (RGB) and material
pub const BLOCK_PALETTE: [(u32, BlockType); 7] = [
    (0x8b7355, BlockType::Stone),
    (0xa0522d, BlockType::Wood),
    (0x654321, BlockType::Stone),
    (0x5d4e37, BlockType::Wood),
    (0x8b4513, BlockType::Wood),
    (0x696969, BlockType::Stone),
    (0x778899, BlockType::Stone),
];

/// A solid platform. Immutable after generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    pub block: BlockType,
    /// Index into [`BLOCK_PALETTE`]
    pub palette: usize,
}

impl Platform {
    pub fn new(rect: Rect, palette: usize) -> Self {
        let palette = palette % BLOCK_PALETTE.len();
        Self {
            rect,
            block: BLOCK_PALETTE[palette].1,
            palette,
        }
    }

    pub fn color(&self) -> u32 {
        BLOCK_PALETTE[self.palette].0
    }
}

/// A bonus item floating above a platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub rect: Rect,
    pub collected: bool,
    /// Points awarded when collected (0 until then)
    pub reward: u64,
}

impl Collectible {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            collected: false,
            reward: 0,
        }
    }
}

/// Scrolling camera and generation frontier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World offset of the left edge of the viewport
    pub x: f32,
    /// World units scrolled per frame
    pub world_speed: f32,
    /// World x up to which content has been generated
    pub next_spawn_x: f32,
}

impl Camera {
    pub fn new(world_speed: f32) -> Self {
        Self {
            x: 0.0,
            world_speed,
            next_spawn_x: 0.0,
        }
    }
}
