//! World entities and the authoritative world state

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};

use super::constants::{GROUND_Y, PLAYER_HEIGHT, PLAYER_X, SCREEN_HEIGHT, SCREEN_WIDTH};
use super::physics;

/// Vertical motion phase of a player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlayerMotion {
    /// Standing on, or jumping from, the ground line
    #[default]
    Grounded,
    /// Dropping in from above after a reset; becomes `Grounded` on landing
    Respawning,
}

/// A connected player. Only the vertical axis moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub y: f64,
    pub vy: f64,
    /// Server-side only. Decoded snapshots always read `Grounded`.
    #[serde(skip)]
    pub motion: PlayerMotion,
}

/// Compares what a snapshot carries; `motion` never leaves the server.
impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.y == other.y && self.vy == other.vy
    }
}

impl Player {
    /// A player standing on the ground line
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            y: GROUND_Y,
            vy: 0.0,
            motion: PlayerMotion::Grounded,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.y >= GROUND_Y
    }

    /// Body rectangle, feet at `self.y`
    pub fn body(&self) -> physics::Rect {
        physics::Rect::player_body(PLAYER_X, self.y)
    }

    /// Mid-body height, where shots leave the player
    pub fn muzzle_y(&self) -> f64 {
        self.y - PLAYER_HEIGHT / 2.0
    }
}

/// A walking enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enemy {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub shoot_timer: f64,
    pub dead: bool,
    pub death_timer: f64,
    pub walk_phase: f64,
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Player,
    Enemy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    #[serde(rename = "from")]
    pub origin: Origin,
}

impl Bullet {
    /// Strictly inside the visible rectangle; boundary positions are out.
    pub fn in_bounds(&self) -> bool {
        self.x > 0.0 && self.x < SCREEN_WIDTH && self.y > 0.0 && self.y < SCREEN_HEIGHT
    }
}

/// RGBA colour, serialized with upper-case channel keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    #[serde(rename = "R")]
    pub r: u8,
    #[serde(rename = "G")]
    pub g: u8,
    #[serde(rename = "B")]
    pub b: u8,
    #[serde(rename = "A")]
    pub a: u8,
}

/// The sun, derived from elapsed world time every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sun {
    pub x: f64,
    pub y: f64,
    pub color: Rgba,
}

impl Sun {
    pub fn at(elapsed: f64) -> Self {
        physics::sun_at(elapsed)
    }
}

impl Default for Sun {
    fn default() -> Self {
        Self::at(0.0)
    }
}

/// Aggregate world state. Serializes directly as the per-tick snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldState {
    pub sun: Sun,
    pub players: HashMap<String, Player>,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub points: i64,
    pub level: i64,
    pub game_over: bool,
    /// Elapsed world time in seconds
    #[serde(skip)]
    pub elapsed: f64,
    /// Ticks simulated since startup
    #[serde(skip)]
    pub tick: u64,
}

impl WorldState {
    pub fn new() -> Self {
        Self {
            sun: Sun::default(),
            players: HashMap::new(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            points: 0,
            level: 1,
            game_over: false,
            elapsed: 0.0,
            tick: 0,
        }
    }

    /// Insert a fresh grounded player, replacing any previous one with the same id
    pub fn spawn_player(&mut self, id: &str) {
        self.players.insert(id.to_string(), Player::new(id));
    }

    pub fn remove_player(&mut self, id: &str) -> Option<Player> {
        self.players.remove(id)
    }

    /// Clear round progress. Players are kept.
    pub fn reset_round(&mut self) {
        self.points = 0;
        self.level = 1;
        self.game_over = false;
        self.elapsed = 0.0;
        self.enemies.clear();
        self.bullets.clear();
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to the single world state. All access goes through `lock`.
#[derive(Clone, Default)]
pub struct World {
    inner: Arc<Mutex<WorldState>>,
}

impl World {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(WorldState::new())),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, WorldState> {
        self.inner.lock()
    }

    pub fn player_count(&self) -> usize {
        self.lock().players.len()
    }
}
