//! Lava Runner: an endless side-scroller over a lava floor
//!
//! The world scrolls right at a slowly rising speed. Platforms are generated
//! ahead of the camera so the next one is always reachable; emeralds add to
//! the score. Touch the lava, fall off the screen, or get left behind and
//! the run is over. Press R to go again.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod config;
mod game;
mod input;
mod storage;

use std::path::Path;
use macroquad::prelude::*;
use config::{GameConfig, ViewportConfig, CONFIG_FILE};
use game::{FrameDriver, FrameStatus, GameSession, InstanceSlot, Viewport};
use input::KeyboardInput;

fn window_conf() -> Conf {
    let viewport = ViewportConfig::default();
    Conf {
        window_title: format!("Lava Runner v{}", VERSION),
        window_width: viewport.width as i32,
        window_height: viewport.height as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    #[cfg(not(target_arch = "wasm32"))]
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = GameConfig::load_or_default(Path::new(CONFIG_FILE));
    let store = storage::default_store();
    let seed = (miniquad::date::now() * 1000.0) as u64;
    tracing::info!("Lava Runner v{} (seed {})", VERSION, seed);

    let mut slot = InstanceSlot::new();
    let mut driver = FrameDriver::install(&mut slot, GameSession::new(config, store, seed));
    let keyboard = KeyboardInput::new();

    loop {
        let input = keyboard.sample();
        let viewport = Viewport::new(screen_width(), screen_height());
        if driver.frame(input, viewport) == FrameStatus::Cancelled {
            break;
        }

        game::draw_frame(&driver.session().snapshot());

        next_frame().await
    }
}
