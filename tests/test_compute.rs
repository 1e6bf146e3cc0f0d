use invaders::compute::*;
use invaders::entities::*;
use invaders::input::{Command, InputState};

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// 800x600 session with the player centred and no enemies.
fn make_state() -> GameState {
    GameState {
        player: Player::centred(800.0, 600.0),
        bullets: Vec::new(),
        formation: Formation {
            enemies: Vec::new(),
            heading: Heading::Right,
        },
        score: 0,
        status: GameStatus::Playing,
        frame: 0,
        width: 800.0,
        height: 600.0,
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn fire() -> InputState {
    let mut input = InputState::new();
    input.press(Command::Fire);
    input
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_player_position() {
    let s = init_state(800.0, 600.0, &mut seeded_rng());
    assert_eq!(s.player.x, 375.0);
    assert_eq!(s.player.y, 570.0);
}

#[test]
fn init_state_fresh_session() {
    let s = init_state(800.0, 600.0, &mut seeded_rng());
    assert_eq!(s.formation.enemies.len(), 50);
    assert!(s.bullets.is_empty());
    assert_eq!(s.score, 0);
    assert_eq!(s.frame, 0);
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!((s.width, s.height), (800.0, 600.0));
    assert_eq!((s.formation.enemies[0].x, s.formation.enemies[0].y), (50.0, 50.0));
}

#[test]
fn init_state_scales_grid_to_small_playfield() {
    // 80x24 terminal at 10x20 px per cell leaves an 800x420 container
    let (width, height) = fit_playfield(800.0, 420.0);
    assert_eq!((width, height), (560.0, 420.0));

    let s = init_state(width, height, &mut seeded_rng());
    assert_eq!(s.formation.enemies.len(), 50);
    let first = &s.formation.enemies[0];
    assert!((first.x - 35.0).abs() < 1e-3 && (first.y - 35.0).abs() < 1e-3);
    assert!(!invaders::formation::touches_wall(&s.formation, width));
}

#[test]
fn small_playfield_session_keeps_playing() {
    let (width, height) = fit_playfield(800.0, 420.0);
    let mut s = init_state(width, height, &mut seeded_rng());
    let mut input = InputState::new();
    for _ in 0..200 {
        s = tick(&s, &mut input);
    }
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.formation.enemies.len(), 50);
}

// ── player movement ───────────────────────────────────────────────────────────

#[test]
fn left_held_for_ten_ticks() {
    let mut s = make_state();
    let mut input = InputState::new();
    input.press(Command::MoveLeft);
    for _ in 0..10 {
        s = tick(&s, &mut input);
    }
    assert_eq!(s.player.x, 325.0);
}

#[test]
fn right_held_moves_by_speed() {
    let mut s = make_state();
    let mut input = InputState::new();
    input.press(Command::MoveRight);
    s = tick(&s, &mut input);
    assert_eq!(s.player.x, 380.0);
}

#[test]
fn both_directions_cancel() {
    let mut s = make_state();
    let mut input = InputState::new();
    input.press(Command::MoveLeft);
    input.press(Command::MoveRight);
    s = tick(&s, &mut input);
    assert_eq!(s.player.x, 375.0);
}

#[test]
fn move_left_stops_at_wall() {
    let mut s = make_state();
    s.player.x = 5.0;
    let s = move_player_left(&s);
    assert_eq!(s.player.x, 0.0);
    let s = move_player_left(&s);
    assert_eq!(s.player.x, 0.0);
}

#[test]
fn move_left_checks_before_moving() {
    // Pre-move check: from x=3 one more step is still allowed
    let mut s = make_state();
    s.player.x = 3.0;
    assert_eq!(move_player_left(&s).player.x, -2.0);
}

#[test]
fn move_right_stops_touching_wall() {
    let mut s = make_state();
    s.player.x = 745.0;
    let s = move_player_right(&s);
    assert_eq!(s.player.x, 750.0);
    let s = move_player_right(&s);
    assert_eq!(s.player.x, 750.0);
}

#[test]
fn move_does_not_mutate_original() {
    let s = make_state();
    let _ = move_player_left(&s);
    let _ = move_player_right(&s);
    assert_eq!(s.player.x, 375.0);
}

// ── player_shoot ──────────────────────────────────────────────────────────────

#[test]
fn shoot_spawns_bullet_at_player_centre() {
    let s = make_state();
    let s2 = player_shoot(&s);
    assert_eq!(s2.bullets.len(), 1);
    assert_eq!(s2.bullets[0].x, 400.0);
    assert_eq!(s2.bullets[0].y, 570.0);
    assert_eq!(s2.bullets[0].speed, 10.0);
}

#[test]
fn shoot_blocked_while_bullet_alive() {
    let mut s = make_state();
    s.bullets.push(Bullet::new(100.0, 100.0));
    let s2 = player_shoot(&s);
    assert_eq!(s2.bullets.len(), 1);
    assert_eq!(s2.bullets[0].x, 100.0);
}

// ── fire is edge-triggered ────────────────────────────────────────────────────

#[test]
fn fire_spawns_one_bullet_and_clears_signal() {
    let mut s = make_state();
    let mut input = fire();
    s = tick(&s, &mut input);
    assert_eq!(s.bullets.len(), 1);
    assert_eq!(s.bullets[0].y, 560.0); // spawned at 570, moved once
    assert!(!input.is_held(Command::Fire));
}

#[test]
fn held_fire_does_not_repeat_after_miss() {
    let mut s = make_state();
    let mut input = fire();

    // Ticks 1..3: exactly one bullet
    for _ in 0..3 {
        s = tick(&s, &mut input);
        assert_eq!(s.bullets.len(), 1);
    }

    // 570 - 10n < 0 first at n = 58
    while s.frame < 57 {
        s = tick(&s, &mut input);
    }
    assert_eq!(s.bullets.len(), 1);
    assert_eq!(s.bullets[0].y, 0.0);
    s = tick(&s, &mut input);
    assert!(s.bullets.is_empty());

    // No new press → no new bullet
    for _ in 0..5 {
        s = tick(&s, &mut input);
        assert!(s.bullets.is_empty());
    }

    // Release and press again
    input.release(Command::Fire);
    input.press(Command::Fire);
    s = tick(&s, &mut input);
    assert_eq!(s.bullets.len(), 1);
}

#[test]
fn fire_while_bullet_in_flight_is_consumed() {
    let mut s = make_state();
    s.bullets.push(Bullet::new(400.0, 300.0));
    let mut input = fire();
    s = tick(&s, &mut input);
    assert_eq!(s.bullets.len(), 1);
    assert_eq!(s.bullets[0].y, 290.0);
    assert!(!input.is_held(Command::Fire));
}

// ── bullets & collisions ──────────────────────────────────────────────────────

#[test]
fn bullet_moves_up_by_speed() {
    let mut s = make_state();
    s.bullets.push(Bullet::new(400.0, 300.0));
    let s2 = advance_bullets(&s);
    assert_eq!(s2.bullets[0].y, 290.0);
}

#[test]
fn bullet_removed_above_top() {
    let mut s = make_state();
    s.bullets.push(Bullet::new(400.0, 9.0));
    let s2 = advance_bullets(&s);
    assert!(s2.bullets.is_empty());
    assert_eq!(s2.score, 0);
}

#[test]
fn bullet_at_zero_survives() {
    let mut s = make_state();
    s.bullets.push(Bullet::new(400.0, 10.0));
    let s2 = advance_bullets(&s);
    assert_eq!(s2.bullets[0].y, 0.0);
}

#[test]
fn bullet_hits_enemy() {
    let mut s = make_state();
    s.formation.enemies.push(Enemy::new(98.0, 100.0, EnemyKind::Robot));
    s.bullets.push(Bullet::new(100.0, 110.0)); // moves to y=100
    let s2 = tick(&s, &mut InputState::new());
    assert!(s2.bullets.is_empty());
    assert!(s2.formation.enemies.is_empty());
    assert_eq!(s2.score, 10);
}

#[test]
fn bullet_misses_enemy_to_the_right() {
    let mut s = make_state();
    s.formation.enemies.push(Enemy::new(106.0, 100.0, EnemyKind::Robot));
    s.bullets.push(Bullet::new(100.0, 110.0));
    let s2 = advance_bullets(&s);
    assert_eq!(s2.bullets.len(), 1);
    assert_eq!(s2.formation.enemies.len(), 1);
    assert_eq!(s2.score, 0);
}

#[test]
fn bullet_destroys_only_one_enemy() {
    let mut s = make_state();
    s.formation.enemies.push(Enemy::new(90.0, 100.0, EnemyKind::Robot));
    s.formation.enemies.push(Enemy::new(95.0, 100.0, EnemyKind::Dragon));
    s.bullets.push(Bullet::new(100.0, 110.0));
    let s2 = advance_bullets(&s);
    assert_eq!(s2.formation.enemies.len(), 1);
    assert_eq!(s2.score, 10);
}

#[test]
fn enemies_march_each_tick() {
    let mut s = make_state();
    s.formation.enemies.push(Enemy::new(100.0, 100.0, EnemyKind::Robot));
    let s2 = tick(&s, &mut InputState::new());
    assert_eq!(s2.formation.enemies[0].x, 102.0);
    assert_eq!(s2.frame, 1);
}

#[test]
fn formation_reversal_through_tick() {
    let mut s = init_state(800.0, 600.0, &mut seeded_rng());
    // Shift the grid so its right column touches the wall after one step
    for e in &mut s.formation.enemies {
        e.x += 168.0; // rightmost: 758 → 760, right edge 800
    }
    let before = s.clone();
    let s2 = tick(&s, &mut InputState::new());
    assert_eq!(s2.formation.heading, Heading::Left);
    for (b, a) in before.formation.enemies.iter().zip(&s2.formation.enemies) {
        assert_eq!(a.y, b.y + 20.0);
    }
}

// ── game over ─────────────────────────────────────────────────────────────────

#[test]
fn enemy_reaching_bottom_ends_game() {
    let mut s = make_state();
    s.formation.enemies.push(Enemy::new(100.0, 560.0, EnemyKind::Robot));
    let s2 = tick(&s, &mut InputState::new());
    assert_eq!(s2.status, GameStatus::GameOver);
}

#[test]
fn enemy_just_above_bottom_keeps_playing() {
    let mut s = make_state();
    s.formation.enemies.push(Enemy::new(100.0, 559.0, EnemyKind::Robot));
    let s2 = tick(&s, &mut InputState::new());
    assert_eq!(s2.status, GameStatus::Playing);
}

#[test]
fn game_over_freezes_state() {
    let mut s = make_state();
    s.formation.enemies.push(Enemy::new(100.0, 560.0, EnemyKind::Robot));
    s.formation.enemies.push(Enemy::new(300.0, 100.0, EnemyKind::Turtle));
    let over = tick(&s, &mut InputState::new());
    assert_eq!(over.status, GameStatus::GameOver);

    let mut input = InputState::new();
    input.press(Command::MoveLeft);
    input.press(Command::Fire);
    let mut later = over.clone();
    for _ in 0..10 {
        later = tick(&later, &mut input);
    }
    assert_eq!(later, over);
}

// ── resize ────────────────────────────────────────────────────────────────────

#[test]
fn fit_playfield_caps_at_base_resolution() {
    assert_eq!(fit_playfield(1920.0, 1080.0), (800.0, 600.0));
}

#[test]
fn fit_playfield_keeps_aspect() {
    assert_eq!(fit_playfield(400.0, 1000.0), (400.0, 300.0));
    // Short container: height is the constraint
    assert_eq!(fit_playfield(800.0, 300.0), (400.0, 300.0));
}

#[test]
fn fit_playfield_guards_degenerate_sizes() {
    assert_eq!(fit_playfield(0.0, 0.0), (MIN_WIDTH, MIN_HEIGHT));
    assert_eq!(fit_playfield(-50.0, 600.0), (MIN_WIDTH, MIN_HEIGHT));
}

#[test]
fn resize_rescales_enemies_and_recentres_player() {
    let s = init_state(800.0, 600.0, &mut seeded_rng());
    let r = resize(&s, 400.0, 1000.0);
    assert_eq!((r.width, r.height), (400.0, 300.0));
    assert_eq!((r.player.x, r.player.y), (175.0, 270.0));
    assert_eq!((r.formation.enemies[0].x, r.formation.enemies[0].y), (25.0, 25.0));
    assert_eq!(r.formation.enemies.len(), 50);
    assert_eq!(r.score, s.score);
}

#[test]
fn resize_to_same_size_is_identity() {
    let s = init_state(800.0, 600.0, &mut seeded_rng());
    assert_eq!(resize(&s, 1000.0, 1000.0), s);
}

#[test]
fn resize_to_zero_stays_finite() {
    let s = init_state(800.0, 600.0, &mut seeded_rng());
    let r = resize(&s, 0.0, 0.0);
    assert_eq!((r.width, r.height), (MIN_WIDTH, MIN_HEIGHT));
    assert!(r
        .formation
        .enemies
        .iter()
        .all(|e| e.x.is_finite() && e.y.is_finite()));
}

// ── properties ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Frame {
    left: bool,
    right: bool,
    fire: bool,
}

fn frames() -> impl Strategy<Value = Vec<Frame>> {
    prop::collection::vec(
        (any::<bool>(), any::<bool>(), any::<bool>())
            .prop_map(|(left, right, fire)| Frame { left, right, fire }),
        1..300,
    )
}

proptest! {
    #[test]
    fn session_invariants_hold(seed in any::<u64>(), script in frames()) {
        let mut s = init_state(800.0, 600.0, &mut StdRng::seed_from_u64(seed));
        let mut input = InputState::new();
        for f in script {
            for (held, cmd) in [(f.left, Command::MoveLeft), (f.right, Command::MoveRight)] {
                if held { input.press(cmd) } else { input.release(cmd) }
            }
            if f.fire {
                input.press(Command::Fire);
            }

            let next = tick(&s, &mut input);
            prop_assert!(next.bullets.len() <= 1);
            prop_assert!(next.formation.enemies.len() <= s.formation.enemies.len());
            prop_assert!(next.score >= s.score);
            let killed = (s.formation.enemies.len() - next.formation.enemies.len()) as u32;
            prop_assert_eq!(next.score - s.score, 10 * killed);
            if s.status == GameStatus::GameOver {
                prop_assert_eq!(&next, &s);
            }
            s = next;
        }
    }

    #[test]
    fn score_is_ten_per_kill(seed in any::<u64>(), picks in prop::collection::vec(any::<usize>(), 0..50)) {
        let mut s = init_state(800.0, 600.0, &mut StdRng::seed_from_u64(seed));
        for (n, pick) in picks.iter().enumerate() {
            let target = &s.formation.enemies[pick % s.formation.enemies.len()];
            // Lands inside the target after one 10px step, clear of its neighbours
            s.bullets = vec![Bullet::new(target.x + 10.0, target.y + 30.0)];
            s = advance_bullets(&s);
            prop_assert!(s.bullets.is_empty());
            prop_assert_eq!(s.score, 10 * (n as u32 + 1));
        }
        prop_assert_eq!(s.formation.enemies.len(), 50 - picks.len());
    }
}
