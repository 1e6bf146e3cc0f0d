//! Enemy grid: spawn and lockstep movement.
//!
//! The whole grid shares one `Heading`.  All enemies step by the same delta,
//! then the wall check runs once over the moved grid, so a single touch
//! reverses and lowers every enemy together.

use log::debug;
use rand::Rng;

use crate::entities::{Enemy, EnemyKind, Formation, Heading};

pub const ROWS: usize = 5;
pub const COLS: usize = 10;
pub const SPACING: f32 = 60.0;
pub const ORIGIN_X: f32 = 50.0;
pub const ORIGIN_Y: f32 = 50.0;

/// Horizontal distance covered per tick.
pub const STEP: f32 = 2.0;
/// Vertical drop applied once per wall contact.
pub const DESCENT: f32 = 20.0;

/// Lay out the 5x10 grid, each enemy with an independently chosen sprite.
pub fn spawn(rng: &mut impl Rng) -> Formation {
    let mut enemies = Vec::with_capacity(ROWS * COLS);
    for row in 0..ROWS {
        for col in 0..COLS {
            let kind = EnemyKind::ALL[rng.gen_range(0..EnemyKind::ALL.len())];
            enemies.push(Enemy::new(
                col as f32 * SPACING + ORIGIN_X,
                row as f32 * SPACING + ORIGIN_Y,
                kind,
            ));
        }
    }
    Formation {
        enemies,
        heading: Heading::Right,
    }
}

/// True when any enemy touches or crosses either side wall.
pub fn touches_wall(formation: &Formation, playfield_width: f32) -> bool {
    formation
        .enemies
        .iter()
        .any(|e| e.x <= 0.0 || e.x + e.width >= playfield_width)
}

/// Move the grid one step along its heading, bouncing off the walls.
pub fn advance(formation: &Formation, playfield_width: f32) -> Formation {
    let dx = formation.heading.sign() * STEP;
    let mut next = Formation {
        enemies: formation
            .enemies
            .iter()
            .map(|e| Enemy { x: e.x + dx, ..e.clone() })
            .collect(),
        heading: formation.heading,
    };

    if touches_wall(&next, playfield_width) {
        next.heading = next.heading.reversed();
        for enemy in &mut next.enemies {
            enemy.y += DESCENT;
        }
        debug!("formation bounced, now heading {:?}", next.heading);
    }
    next
}

/// True once any enemy's bottom edge is at or below the playfield bottom.
pub fn reached_bottom(formation: &Formation, playfield_height: f32) -> bool {
    formation
        .enemies
        .iter()
        .any(|e| e.y + e.height >= playfield_height)
}

/// Scale every enemy position by the given factors; sizes are untouched.
pub fn rescale(formation: &Formation, sx: f32, sy: f32) -> Formation {
    Formation {
        enemies: formation
            .enemies
            .iter()
            .map(|e| Enemy {
                x: e.x * sx,
                y: e.y * sy,
                ..e.clone()
            })
            .collect(),
        heading: formation.heading,
    }
}
