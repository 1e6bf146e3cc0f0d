//! All game entity types — pure data, no logic.

use crate::geometry::{Aabb, Bounded};

// ── Playfield & entity dimensions (logical pixels) ───────────────────────────

pub const BASE_WIDTH: f32 = 800.0;
pub const BASE_HEIGHT: f32 = 600.0;

pub const PLAYER_WIDTH: f32 = 50.0;
pub const PLAYER_HEIGHT: f32 = 30.0;
pub const PLAYER_SPEED: f32 = 5.0;

pub const BULLET_WIDTH: f32 = 5.0;
pub const BULLET_HEIGHT: f32 = 15.0;
pub const BULLET_SPEED: f32 = 10.0;

pub const ENEMY_SIZE: f32 = 40.0;
/// Side length of one bitmap cell when an enemy is drawn.
pub const DOT_SIZE: f32 = 5.0;

pub type Bitmap = [[u8; 8]; 8];

// ── Enemy sprites ────────────────────────────────────────────────────────────

const TURTLE: Bitmap = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 1, 1, 1, 1, 0, 0],
    [0, 0, 1, 0, 0, 1, 0, 0],
    [0, 1, 1, 1, 1, 1, 1, 0],
    [0, 1, 0, 1, 1, 0, 1, 0],
    [0, 1, 1, 1, 1, 1, 1, 0],
    [0, 0, 1, 1, 1, 1, 0, 0],
];

const ROBOT: Bitmap = [
    [0, 0, 0, 1, 1, 0, 0, 0],
    [0, 0, 1, 1, 1, 1, 0, 0],
    [0, 1, 1, 1, 1, 1, 1, 0],
    [1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1],
    [0, 0, 0, 1, 1, 0, 0, 0],
    [0, 0, 0, 1, 1, 0, 0, 0],
];

const RABBIT: Bitmap = [
    [0, 0, 0, 1, 1, 0, 0, 0],
    [0, 0, 1, 0, 0, 1, 0, 0],
    [0, 1, 0, 0, 0, 0, 1, 0],
    [1, 1, 1, 1, 1, 1, 1, 1],
    [0, 1, 1, 1, 1, 1, 1, 0],
    [0, 0, 1, 1, 1, 1, 0, 0],
    [0, 0, 0, 1, 1, 0, 0, 0],
    [0, 0, 0, 1, 1, 0, 0, 0],
];

const DRAGON: Bitmap = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 1, 1, 1, 1, 0, 0],
    [0, 1, 0, 0, 0, 0, 1, 0],
    [1, 0, 0, 1, 1, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 1, 1, 0, 0, 1],
    [0, 1, 0, 0, 0, 0, 1, 0],
    [0, 0, 1, 1, 1, 1, 0, 0],
];

const CHARACTER: Bitmap = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 1, 1, 0, 0, 1, 1, 0],
    [1, 1, 1, 1, 1, 1, 1, 1],
    [0, 1, 1, 1, 1, 1, 1, 0],
    [0, 0, 1, 1, 1, 1, 0, 0],
    [0, 0, 0, 1, 1, 0, 0, 0],
    [0, 0, 0, 1, 1, 0, 0, 0],
    [0, 0, 0, 1, 1, 0, 0, 0],
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Turtle,
    Robot,
    Rabbit,
    Dragon,
    Character,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Turtle,
        EnemyKind::Robot,
        EnemyKind::Rabbit,
        EnemyKind::Dragon,
        EnemyKind::Character,
    ];

    pub fn bitmap(&self) -> &'static Bitmap {
        match self {
            EnemyKind::Turtle => &TURTLE,
            EnemyKind::Robot => &ROBOT,
            EnemyKind::Rabbit => &RABBIT,
            EnemyKind::Dragon => &DRAGON,
            EnemyKind::Character => &CHARACTER,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// Shared horizontal direction of the whole formation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    Right,
    Left,
}

impl Heading {
    pub fn sign(&self) -> f32 {
        match self {
            Heading::Right => 1.0,
            Heading::Left => -1.0,
        }
    }

    pub fn reversed(&self) -> Heading {
        match self {
            Heading::Right => Heading::Left,
            Heading::Left => Heading::Right,
        }
    }
}

// ── Player, projectile & enemy ───────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

impl Player {
    /// Player seated on the bottom edge, centred horizontally.
    pub fn centred(playfield_width: f32, playfield_height: f32) -> Self {
        Player {
            x: (playfield_width - PLAYER_WIDTH) / 2.0,
            y: playfield_height - PLAYER_HEIGHT,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            speed: PLAYER_SPEED,
        }
    }
}

/// Player shot; always travels upward.
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

impl Bullet {
    pub fn new(x: f32, y: f32) -> Self {
        Bullet {
            x,
            y,
            width: BULLET_WIDTH,
            height: BULLET_HEIGHT,
            speed: BULLET_SPEED,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn new(x: f32, y: f32, kind: EnemyKind) -> Self {
        Enemy {
            x,
            y,
            width: ENEMY_SIZE,
            height: ENEMY_SIZE,
            kind,
        }
    }
}

impl Bounded for Player {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

impl Bounded for Bullet {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

impl Bounded for Enemy {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

/// The enemy grid. Direction is held once for the whole group.
#[derive(Clone, Debug, PartialEq)]
pub struct Formation {
    pub enemies: Vec<Enemy>,
    pub heading: Heading,
}

// ── Master game state ────────────────────────────────────────────────────────

/// One play session.  Cloneable so the step functions in `compute` can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Player,
    /// Live player bullets; never more than one.
    pub bullets: Vec<Bullet>,
    pub formation: Formation,
    pub score: u32,
    pub status: GameStatus,
    pub frame: u64,
    /// Playfield size in logical pixels.
    pub width: f32,
    pub height: f32,
}
