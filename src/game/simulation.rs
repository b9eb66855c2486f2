//! Fixed-tick world simulation

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::combat::{CollisionReport, CombatSystem, ContactPolicy};
use super::constants::{
    ENEMY_BASE_SPEED, ENEMY_BULLET_SPEED, ENEMY_CULL_BELOW, ENEMY_CULL_LEFT,
    ENEMY_FIRST_SHOT_MIN, ENEMY_NEXT_SHOT_MIN, ENEMY_SHOT_JITTER, ENEMY_SPAWN_LIFT,
    ENEMY_SPAWN_MARGIN, ENEMY_SPEED_PER_LEVEL, ENEMY_WALK_RATE, GROUND_Y, PLAYER_HEIGHT,
    SCREEN_WIDTH,
};
use super::physics;
use super::world::{Bullet, Enemy, Origin, PlayerMotion, Sun, WorldState};

/// Everything notable that happened during one step
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub spawned_enemy: bool,
    pub enemy_shots: u32,
    /// Respawning players that touched the ground this tick
    pub landed: Vec<String>,
    pub collisions: CollisionReport,
}

/// Owns the randomness and rules the world is advanced with
pub struct Simulation {
    rng: ChaCha8Rng,
    contact_policy: ContactPolicy,
}

impl Simulation {
    pub fn new(seed: u64, contact_policy: ContactPolicy) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            contact_policy,
        }
    }

    pub fn contact_policy(&self) -> ContactPolicy {
        self.contact_policy
    }

    /// Advance the world by `dt` seconds. The caller holds the world lock.
    pub fn step(&mut self, state: &mut WorldState, dt: f64) -> TickReport {
        state.tick += 1;
        state.elapsed += dt;
        state.sun = Sun::at(state.elapsed);

        let landed = Self::update_players(state, dt);

        // A finished round keeps the sky and players moving but freezes combat
        if state.game_over {
            return TickReport {
                landed,
                ..TickReport::default()
            };
        }

        Self::update_bullets(state, dt);
        let enemy_shots = self.update_enemies(state, dt);
        Self::cull_enemies(state);
        let spawned_enemy = self.spawn_enemy(state);

        let collisions = CombatSystem::resolve(state, self.contact_policy);
        state.bullets.retain(Bullet::in_bounds);

        TickReport {
            spawned_enemy,
            enemy_shots,
            landed,
            collisions,
        }
    }

    fn update_players(state: &mut WorldState, dt: f64) -> Vec<String> {
        let mut landed = Vec::new();

        for player in state.players.values_mut() {
            let (y, vy, on_ground) = physics::fall_to_ground(player.y, player.vy, dt);
            player.y = y;
            player.vy = vy;

            if on_ground && player.motion == PlayerMotion::Respawning {
                player.motion = PlayerMotion::Grounded;
                landed.push(player.id.clone());
            }
        }

        landed
    }

    fn update_bullets(state: &mut WorldState, dt: f64) {
        for bullet in &mut state.bullets {
            bullet.x += bullet.vx * dt;
            bullet.y += bullet.vy * dt;
        }
        state.bullets.retain(Bullet::in_bounds);
    }

    fn update_enemies(&mut self, state: &mut WorldState, dt: f64) -> u32 {
        let mut shots = 0;

        for enemy in &mut state.enemies {
            if enemy.dead {
                enemy.death_timer += dt;
                let (y, vy) = physics::fall(enemy.y, enemy.vy, dt);
                enemy.y = y;
                enemy.vy = vy;
                continue;
            }

            enemy.x += enemy.vx * dt;
            enemy.walk_phase += dt * ENEMY_WALK_RATE;
            enemy.shoot_timer -= dt;

            if enemy.shoot_timer <= 0.0 {
                state.bullets.push(Bullet {
                    x: enemy.x,
                    y: enemy.y - PLAYER_HEIGHT / 2.0,
                    vx: ENEMY_BULLET_SPEED,
                    vy: 0.0,
                    origin: Origin::Enemy,
                });
                enemy.shoot_timer = self.shot_delay(ENEMY_NEXT_SHOT_MIN);
                shots += 1;
            }
        }

        shots
    }

    fn cull_enemies(state: &mut WorldState) {
        state
            .enemies
            .retain(|e| e.x > -ENEMY_CULL_LEFT && e.y < GROUND_Y + ENEMY_CULL_BELOW);
    }

    /// Keep exactly one enemy around: spawn at the right edge when none remain
    fn spawn_enemy(&mut self, state: &mut WorldState) -> bool {
        if !state.enemies.is_empty() {
            return false;
        }

        let enemy = Enemy {
            x: SCREEN_WIDTH + ENEMY_SPAWN_MARGIN,
            y: GROUND_Y - ENEMY_SPAWN_LIFT,
            vx: -ENEMY_BASE_SPEED - state.level as f64 * ENEMY_SPEED_PER_LEVEL,
            vy: 0.0,
            shoot_timer: self.shot_delay(ENEMY_FIRST_SHOT_MIN),
            dead: false,
            death_timer: 0.0,
            walk_phase: 0.0,
        };
        state.enemies.push(enemy);
        true
    }

    fn shot_delay(&mut self, min: f64) -> f64 {
        min + self.rng.gen_range(0.0..ENEMY_SHOT_JITTER)
    }
}
