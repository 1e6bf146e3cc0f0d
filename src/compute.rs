//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` and returns a brand-new `GameState`.  The only side effects
//! are the injected RNG at session start and consuming the fire signal in
//! `tick`.

use log::{debug, info};
use rand::Rng;

use crate::entities::{Bullet, GameState, GameStatus, Player, BASE_HEIGHT, BASE_WIDTH};
use crate::formation;
use crate::geometry::Bounded;
use crate::input::{Command, InputState};

/// Points awarded per enemy destroyed.
pub const SCORE_PER_ENEMY: u32 = 10;

/// Smallest playfield a resize may produce.
pub const MIN_WIDTH: f32 = 160.0;
pub const MIN_HEIGHT: f32 = MIN_WIDTH * BASE_HEIGHT / BASE_WIDTH;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh session on a playfield of the given size.  The grid is laid
/// out at the base resolution and scaled down with the playfield.
pub fn init_state(width: f32, height: f32, rng: &mut impl Rng) -> GameState {
    info!("new session on a {}x{} playfield", width, height);
    let mut grid = formation::spawn(rng);
    if width != BASE_WIDTH || height != BASE_HEIGHT {
        grid = formation::rescale(&grid, width / BASE_WIDTH, height / BASE_HEIGHT);
    }
    GameState {
        player: Player::centred(width, height),
        bullets: Vec::new(),
        formation: grid,
        score: 0,
        status: GameStatus::Playing,
        frame: 0,
        width,
        height,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Step left unless already at the wall.  The check runs before the move.
pub fn move_player_left(state: &GameState) -> GameState {
    if state.player.x <= 0.0 {
        return state.clone();
    }
    GameState {
        player: Player {
            x: state.player.x - state.player.speed,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

pub fn move_player_right(state: &GameState) -> GameState {
    if state.player.x + state.player.width >= state.width {
        return state.clone();
    }
    GameState {
        player: Player {
            x: state.player.x + state.player.speed,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

/// Fire from the player's centre — only when no bullet is in flight.
pub fn player_shoot(state: &GameState) -> GameState {
    if !state.bullets.is_empty() {
        return state.clone();
    }
    let p = &state.player;
    GameState {
        bullets: vec![Bullet::new(p.x + p.width / 2.0, p.y)],
        ..state.clone()
    }
}

/// Move bullets up, drop the ones that left the top, and resolve hits.
/// Each bullet takes out at most one enemy.
pub fn advance_bullets(state: &GameState) -> GameState {
    let mut enemies = state.formation.enemies.clone();
    let mut score = state.score;
    let mut bullets = Vec::with_capacity(state.bullets.len());

    for bullet in &state.bullets {
        let moved = Bullet {
            y: bullet.y - bullet.speed,
            ..bullet.clone()
        };
        if moved.y < 0.0 {
            continue;
        }
        match enemies.iter().rposition(|e| moved.collides_with(e)) {
            Some(hit) => {
                let enemy = enemies.remove(hit);
                score += SCORE_PER_ENEMY;
                debug!("enemy destroyed at ({}, {}), score {}", enemy.x, enemy.y, score);
            }
            None => bullets.push(moved),
        }
    }

    let mut next = state.clone();
    next.formation.enemies = enemies;
    next.bullets = bullets;
    next.score = score;
    next
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the session by one frame.  A finished session is returned as-is.
///
/// Fire is edge-triggered: the signal is consumed here whether or not a
/// bullet could be spawned, so holding the key never auto-repeats.
pub fn tick(state: &GameState, input: &mut InputState) -> GameState {
    if state.status == GameStatus::GameOver {
        return state.clone();
    }

    // ── 1. Horizontal movement ───────────────────────────────────────────────
    let mut next = state.clone();
    if input.is_held(Command::MoveLeft) {
        next = move_player_left(&next);
    }
    if input.is_held(Command::MoveRight) {
        next = move_player_right(&next);
    }

    // ── 2. Fire ──────────────────────────────────────────────────────────────
    if input.take_fire() {
        next = player_shoot(&next);
    }

    // ── 3. Bullets & hits ────────────────────────────────────────────────────
    next = advance_bullets(&next);

    // ── 4. Formation march ───────────────────────────────────────────────────
    next.formation = formation::advance(&next.formation, next.width);

    // ── 5. Terminal check ────────────────────────────────────────────────────
    if formation::reached_bottom(&next.formation, next.height) {
        info!("enemies reached the bottom, final score {}", next.score);
        next.status = GameStatus::GameOver;
    }

    next.frame += 1;
    next
}

// ── Resize ───────────────────────────────────────────────────────────────────

/// Largest 4:3 playfield that fits the container, capped at the base
/// resolution and floored at `MIN_WIDTH` x `MIN_HEIGHT`.
pub fn fit_playfield(container_width: f32, container_height: f32) -> (f32, f32) {
    let width = container_width
        .min(BASE_WIDTH)
        .min(container_height * BASE_WIDTH / BASE_HEIGHT);
    // NaN from a broken container size also lands on the floor
    let width = if width.is_nan() { MIN_WIDTH } else { width.max(MIN_WIDTH) };
    (width, width * BASE_HEIGHT / BASE_WIDTH)
}

/// Refit the playfield to a new container.  The player is re-centred on the
/// bottom edge; enemy positions scale with the playfield.
pub fn resize(state: &GameState, container_width: f32, container_height: f32) -> GameState {
    let (width, height) = fit_playfield(container_width, container_height);
    if width == state.width && height == state.height {
        return state.clone();
    }
    info!(
        "playfield resized {}x{} -> {}x{}",
        state.width, state.height, width, height
    );

    let sx = width / state.width.max(MIN_WIDTH);
    let sy = height / state.height.max(MIN_HEIGHT);
    GameState {
        player: Player::centred(width, height),
        formation: formation::rescale(&state.formation, sx, sy),
        width,
        height,
        ..state.clone()
    }
}
