//! Render sink
//!
//! Draws a [`RenderSnapshot`] with macroquad's immediate-mode shapes. Pure
//! presentation: nothing here feeds back into the simulation.

use macroquad::prelude::*;
use super::entity::{BlockType, Platform};
use super::run_state::RunPhase;
use super::runtime::RenderSnapshot;

const BACKGROUND: u32 = 0x2c1810;
const LAVA: u32 = 0xff4500;
const LAVA_DARK: u32 = 0xcc3300;
const LAVA_BRIGHT: u32 = 0xff6600;
const EMERALD: u32 = 0x27ae60;
const EMERALD_FACET: u32 = 0x2ecc71;
const COLLECTED: u32 = 0xf39c12;
const SHIRT: u32 = 0x4a90e2;
const SKIN: u32 = 0xfdbcb4;
const PANTS: u32 = 0x2c5282;
const HAIR: u32 = 0x8b4513;

/// Extra distance past the viewport edges that still gets drawn
const DRAW_MARGIN: f32 = 100.0;

fn rgb(hex: u32) -> Color {
    Color::from_rgba((hex >> 16) as u8, (hex >> 8) as u8, hex as u8, 255)
}

fn shade(color: Color, amount: f32) -> Color {
    Color::new(
        (color.r + amount).clamp(0.0, 1.0),
        (color.g + amount).clamp(0.0, 1.0),
        (color.b + amount).clamp(0.0, 1.0),
        color.a,
    )
}

/// Draw one frame
pub fn draw_frame(snapshot: &RenderSnapshot<'_>) {
    clear_background(rgb(BACKGROUND));

    draw_lava(snapshot);

    let view_w = snapshot.viewport.width;
    for platform in snapshot.platforms {
        let screen_x = platform.rect.x - snapshot.camera_x;
        if screen_x + platform.rect.w >= -DRAW_MARGIN && screen_x <= view_w + DRAW_MARGIN {
            draw_platform(platform, screen_x);
        }
    }

    for item in snapshot.collectibles {
        let screen_x = item.rect.x - snapshot.camera_x;
        if screen_x + item.rect.w < -DRAW_MARGIN || screen_x > view_w + DRAW_MARGIN {
            continue;
        }
        if item.collected {
            draw_rectangle(screen_x, item.rect.y, item.rect.w, item.rect.h, rgb(COLLECTED));
        } else {
            draw_emerald(screen_x, item.rect.y, item.rect.w, item.rect.h, snapshot.frame);
        }
    }

    draw_player(snapshot);
    draw_hud(snapshot);

    if snapshot.phase == RunPhase::GameOver {
        draw_game_over(snapshot);
    }
}

fn draw_lava(snapshot: &RenderSnapshot<'_>) {
    let top = snapshot.lava_level;
    let width = snapshot.viewport.width;
    let depth = (snapshot.viewport.height - top).max(0.0);
    draw_rectangle(0.0, top, width, depth, rgb(LAVA));

    let t = snapshot.frame as f32 * 0.05;
    let mut x = 0.0;
    while x < width {
        let bubble_y = top + (t + x * 0.1).sin() * 4.0;
        draw_rectangle(x, bubble_y, 16.0, 8.0, rgb(LAVA_DARK));
        draw_rectangle(x + 4.0, bubble_y + 2.0, 8.0, 4.0, rgb(LAVA_BRIGHT));
        x += 32.0;
    }
}

fn draw_platform(platform: &Platform, screen_x: f32) {
    let r = platform.rect;
    let base = rgb(platform.color());
    draw_rectangle(screen_x, r.y, r.w, r.h, base);

    let dark = shade(base, -0.08);
    match platform.block {
        BlockType::Wood => {
            let mut gx = 0.0;
            while gx < r.w {
                draw_rectangle(screen_x + gx, r.y, 1.0, r.h, dark);
                gx += 4.0;
            }
        }
        BlockType::Stone => {
            let light = shade(base, 0.06);
            let mut bx = 0.0;
            while bx < r.w {
                draw_rectangle(screen_x + bx + 2.0, r.y + 2.0, 3.0, 2.0, dark);
                draw_rectangle(screen_x + bx + 10.0, r.y + 10.0, 2.0, 2.0, dark);
                draw_rectangle(screen_x + bx + 6.0, r.y + 3.0, 2.0, 1.0, light);
                bx += 16.0;
            }
        }
    }
    draw_rectangle_lines(screen_x, r.y, r.w, r.h, 1.0, dark);
}

fn draw_emerald(x: f32, y: f32, w: f32, h: f32, frame: u64) {
    draw_rectangle(x, y, w, h, rgb(EMERALD));
    draw_rectangle(x + 4.0, y + 4.0, 8.0, 8.0, rgb(EMERALD_FACET));
    draw_rectangle(x + 20.0, y + 20.0, 8.0, 8.0, rgb(EMERALD_FACET));

    let t = frame as f32 * 0.16;
    let sparkle = Color::new(1.0, 1.0, 1.0, 0.8);
    draw_rectangle(x + 4.0 + t.sin() * 4.0, y + 4.0, 2.0, 2.0, sparkle);
    draw_rectangle(x + 24.0 + (t * 1.2).cos() * 4.0, y + 6.0, 2.0, 2.0, sparkle);
}

fn draw_player(snapshot: &RenderSnapshot<'_>) {
    let p = snapshot.player;
    let leg_h = p.h * 0.25;
    let head_h = p.h * 0.25;
    draw_rectangle(p.x, p.y, p.w, head_h, rgb(SKIN));
    draw_rectangle(p.x + p.w * 0.125, p.y, p.w * 0.75, head_h * 0.375, rgb(HAIR));
    draw_rectangle(p.x, p.y + head_h, p.w, p.h - head_h - leg_h, rgb(SHIRT));
    draw_rectangle(p.x, p.y + p.h - leg_h, p.w / 2.0, leg_h, rgb(PANTS));
    draw_rectangle(p.x + p.w / 2.0, p.y + p.h - leg_h, p.w / 2.0, leg_h, rgb(PANTS));
    draw_rectangle_lines(p.x, p.y, p.w, p.h, 2.0, BLACK);
}

fn draw_hud(snapshot: &RenderSnapshot<'_>) {
    draw_text(&format!("Score: {}", snapshot.score), 10.0, 24.0, 24.0, WHITE);
    draw_text(&format!("Level: {}", snapshot.level), 10.0, 48.0, 20.0, WHITE);
    draw_text(&format!("Speed: {}", snapshot.world_speed.floor()), 10.0, 70.0, 16.0, WHITE);

    let best = format!("Best: {}", snapshot.high_score);
    let dims = measure_text(&best, None, 20, 1.0);
    draw_text(&best, snapshot.viewport.width - dims.width - 10.0, 24.0, 20.0, WHITE);
}

fn draw_game_over(snapshot: &RenderSnapshot<'_>) {
    let view = snapshot.viewport;
    let alpha = 0.8 * snapshot.banner_progress;
    draw_rectangle(0.0, 0.0, view.width, view.height, Color::new(0.0, 0.0, 0.0, alpha));

    let y = snapshot.banner_y;
    let final_score = format!("Final Score: {}", snapshot.score);
    let lines = [
        ("GAME OVER!", 48u16, 0.0),
        (final_score.as_str(), 24, 50.0),
        ("Press R to try again!", 24, 100.0),
    ];
    for (text, size, offset) in lines {
        let dims = measure_text(text, None, size, 1.0);
        draw_text(text, (view.width - dims.width) / 2.0, y + offset, size as f32, WHITE);
    }
}
