//! Game Module
//!
//! The endless runner itself: entities, per-frame movement and contact
//! rules, the procedural generator, run bookkeeping, and the session that
//! ties them together once per display refresh.
//!
//! Key pieces:
//! - Entity: plain rectangles for the player, platforms and emeralds
//! - Generator: keeps the course filled ahead of the camera
//! - Runtime: one `GameSession` tick per frame, plus a render snapshot
//! - Driver: guards against two live loops sharing the window

pub mod entity;
pub mod physics;
pub mod collision;
pub mod generator;
pub mod run_state;
pub mod event;
pub mod runtime;
pub mod driver;
pub mod renderer;

// Re-export what the main loop drives
pub use runtime::{GameSession, Viewport};
pub use driver::{FrameDriver, FrameStatus, InstanceSlot};
pub use renderer::draw_frame;
