//! Rendering layer.
//!
//! `render` receives a drawing `Surface` and an immutable view of the game
//! state.  No game logic is performed; this module only translates state
//! into fill / text primitives.  `terminal` provides the crossterm surface.

pub mod terminal;

use crossterm::style::Color;

use crate::entities::{Enemy, GameState, GameStatus, DOT_SIZE};
use crate::geometry::{Aabb, Bounded};

pub use terminal::TerminalSurface;

// ── Colour palette ────────────────────────────────────────────────────────────

pub const C_BACKGROUND: Color = Color::Black;
pub const C_PLAYER: Color = Color::Green;
pub const C_BULLET: Color = Color::White;
pub const C_ENEMY: Color = Color::Red;
pub const C_GAME_OVER: Color = Color::White;

pub const GAME_OVER_TEXT: &str = "GAME OVER";

/// A 2D raster target addressed in logical playfield pixels.
pub trait Surface {
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Aabb, color: Color);
    /// Draw `text` horizontally centred on `x`, on the row containing `y`.
    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: Color);
    /// Score readout sink, written once per frame.
    fn show_score(&mut self, score: u32);
    /// Push the finished frame out.
    fn present(&mut self) -> std::io::Result<()>;
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame, back to front.
pub fn render<S: Surface>(surface: &mut S, state: &GameState) -> std::io::Result<()> {
    surface.clear(C_BACKGROUND);

    surface.fill_rect(state.player.bounds(), C_PLAYER);
    for bullet in &state.bullets {
        surface.fill_rect(bullet.bounds(), C_BULLET);
    }
    for enemy in &state.formation.enemies {
        draw_enemy(surface, enemy);
    }

    surface.show_score(state.score);

    if state.status == GameStatus::GameOver {
        surface.fill_text(GAME_OVER_TEXT, state.width / 2.0, state.height / 2.0, C_GAME_OVER);
    }

    surface.present()
}

/// One 5px square per set bitmap cell, offset from the enemy's top-left.
fn draw_enemy<S: Surface>(surface: &mut S, enemy: &Enemy) {
    for (row, bits) in enemy.kind.bitmap().iter().enumerate() {
        for (col, &bit) in bits.iter().enumerate() {
            if bit == 1 {
                let dot = Aabb::new(
                    enemy.x + col as f32 * DOT_SIZE,
                    enemy.y + row as f32 * DOT_SIZE,
                    DOT_SIZE,
                    DOT_SIZE,
                );
                surface.fill_rect(dot, C_ENEMY);
            }
        }
    }
}
