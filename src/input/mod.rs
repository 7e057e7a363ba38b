//! Input handling
//!
//! The simulation never reads devices directly. Once per frame the keyboard
//! is sampled into an [`InputSnapshot`], which is passed by value into the
//! frame tick. Jump is edge-latched so holding the key fires once.

mod actions;
mod state;

pub use actions::*;
pub use state::*;
