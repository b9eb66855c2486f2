//! Vertical physics, sun arc and overlap tests

use std::f64::consts::PI;

use super::constants::{
    ENEMY_BULLET_SIZE, GRAVITY, GROUND_Y, PLAYER_HEIGHT, PLAYER_WIDTH, SCREEN_HEIGHT,
    SCREEN_WIDTH, SUN_GREEN_END, SUN_GREEN_START, SUN_PERIOD,
};
use super::world::{Rgba, Sun};

/// Axis-aligned rectangle with its origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    /// Player body: horizontally centred on `x`, standing on `feet_y`
    pub fn player_body(x: f64, feet_y: f64) -> Self {
        Self {
            x: x - PLAYER_WIDTH / 2.0,
            y: feet_y - PLAYER_HEIGHT,
            w: PLAYER_WIDTH,
            h: PLAYER_HEIGHT,
        }
    }

    /// Enemy bullet hitbox centred on the bullet
    pub fn enemy_bullet(x: f64, y: f64) -> Self {
        let half = ENEMY_BULLET_SIZE / 2.0;
        Self {
            x: x - half,
            y: y - half,
            w: ENEMY_BULLET_SIZE,
            h: ENEMY_BULLET_SIZE,
        }
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Strict distance check between two points
pub fn within(x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) -> bool {
    let dx = x1 - x2;
    let dy = y1 - y2;
    (dx * dx + dy * dy).sqrt() < radius
}

/// Semi-implicit Euler step under gravity. Returns the new (y, vy).
pub fn fall(y: f64, vy: f64, dt: f64) -> (f64, f64) {
    let vy = vy + GRAVITY * dt;
    (y + vy * dt, vy)
}

/// Gravity step clamped to the ground line.
/// Returns (y, vy, landed) where `landed` means ground contact this step.
pub fn fall_to_ground(y: f64, vy: f64, dt: f64) -> (f64, f64, bool) {
    let (y, vy) = fall(y, vy, dt);
    if y > GROUND_Y {
        (GROUND_Y, 0.0, true)
    } else {
        (y, vy, y == GROUND_Y)
    }
}

/// Sun position and colour for a given elapsed time.
///
/// The sun rises at the left of a half circle centred on the bottom middle of
/// the screen, peaks half a period later and sets at the right edge, while its
/// green channel fades from bright to dim.
pub fn sun_at(elapsed: f64) -> Sun {
    let center_x = SCREEN_WIDTH / 2.0;
    let center_y = SCREEN_HEIGHT;
    let radius = SCREEN_WIDTH / 2.0;

    let progress = elapsed.rem_euclid(SUN_PERIOD) / SUN_PERIOD;
    let theta = PI - progress * PI;

    Sun {
        x: center_x + radius * theta.cos(),
        y: center_y - radius * theta.sin(),
        color: Rgba {
            r: 255,
            g: lerp(SUN_GREEN_START, SUN_GREEN_END, progress) as u8,
            b: 0,
            a: 255,
        },
    }
}
