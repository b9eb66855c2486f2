//! World dimensions and gameplay tuning

pub const SCREEN_WIDTH: f64 = 800.0;
pub const SCREEN_HEIGHT: f64 = 600.0;
/// Feet of a grounded player
pub const GROUND_Y: f64 = 500.0;

pub const PLAYER_X: f64 = 100.0;
pub const PLAYER_WIDTH: f64 = 20.0;
pub const PLAYER_HEIGHT: f64 = 40.0;

/// Downward acceleration in px/s^2
pub const GRAVITY: f64 = 800.0;
pub const JUMP_IMPULSE: f64 = -350.0;

pub const PLAYER_BULLET_SPEED: f64 = 500.0;
pub const ENEMY_BULLET_SPEED: f64 = -300.0;
pub const ENEMY_BULLET_SIZE: f64 = 5.0;

/// Seconds for one sunrise-to-sunset sweep
pub const SUN_PERIOD: f64 = 30.0;
pub const SUN_GREEN_START: f64 = 255.0;
pub const SUN_GREEN_END: f64 = 100.0;

pub const ENEMY_SPAWN_MARGIN: f64 = 50.0;
pub const ENEMY_SPAWN_LIFT: f64 = 10.0;
pub const ENEMY_BASE_SPEED: f64 = 100.0;
pub const ENEMY_SPEED_PER_LEVEL: f64 = 10.0;
/// Walk cycle advance per second
pub const ENEMY_WALK_RATE: f64 = 4.0;
pub const ENEMY_FIRST_SHOT_MIN: f64 = 2.0;
pub const ENEMY_NEXT_SHOT_MIN: f64 = 1.5;
/// Width of the random window added to the shot delays above
pub const ENEMY_SHOT_JITTER: f64 = 1.0;
/// Enemies at or left of `-ENEMY_CULL_LEFT` are dropped
pub const ENEMY_CULL_LEFT: f64 = 50.0;
/// Enemies at or below `GROUND_Y + ENEMY_CULL_BELOW` are dropped
pub const ENEMY_CULL_BELOW: f64 = 100.0;

pub const KILL_RADIUS: f64 = 15.0;
pub const KILL_BONUS: i64 = 100;
pub const CONTACT_RADIUS: f64 = 20.0;

/// Where consumed bullets are parked until the cull pass drops them
pub const CONSUMED_BULLET_X: f64 = -1000.0;
