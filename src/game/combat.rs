//! Combat system - hit detection, scoring and player contacts

use std::str::FromStr;

use super::constants::{CONSUMED_BULLET_X, CONTACT_RADIUS, KILL_BONUS, KILL_RADIUS, PLAYER_X};
use super::physics::{within, Rect};
use super::world::{Origin, PlayerMotion, WorldState};

/// What happens when an enemy or enemy bullet reaches a player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContactPolicy {
    /// Report the contact, leave the round running
    #[default]
    LogOnly,
    /// End the round by raising the game-over flag
    GameOver,
}

impl FromStr for ContactPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log_only" | "log" => Ok(Self::LogOnly),
            "game_over" => Ok(Self::GameOver),
            other => Err(format!("unknown contact policy: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// Enemy bullet overlapped the player's body
    Shot,
    /// Live enemy walked into the player
    Touched,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub player_id: String,
    pub kind: ContactKind,
}

/// Outcome of one collision pass
#[derive(Debug, Clone, Default)]
pub struct CollisionReport {
    pub kills: u32,
    pub contacts: Vec<Contact>,
    /// Set when this pass moved the world into game over
    pub ended_round: bool,
}

/// Collision resolution for a single tick
pub struct CombatSystem;

impl CombatSystem {
    /// Resolve all collisions for this tick. Consumed bullets are parked off
    /// screen; the caller's cull pass removes them.
    pub fn resolve(state: &mut WorldState, policy: ContactPolicy) -> CollisionReport {
        let kills = Self::resolve_kills(state);
        let contacts = Self::detect_contacts(state);

        let ended_round = match policy {
            ContactPolicy::GameOver if !contacts.is_empty() && !state.game_over => {
                state.game_over = true;
                true
            }
            _ => false,
        };

        CollisionReport {
            kills,
            contacts,
            ended_round,
        }
    }

    /// Player bullets against live enemies. First hit wins per enemy.
    fn resolve_kills(state: &mut WorldState) -> u32 {
        let mut kills = 0;

        for enemy in state.enemies.iter_mut().filter(|e| !e.dead) {
            let hit = state.bullets.iter_mut().find(|b| match b.origin {
                Origin::Player => within(enemy.x, enemy.y, b.x, b.y, KILL_RADIUS),
                Origin::Enemy => false,
            });

            if let Some(bullet) = hit {
                enemy.dead = true;
                enemy.death_timer = 0.0;
                enemy.vy = 0.0;
                bullet.x = CONSUMED_BULLET_X;
                kills += 1;
            }
        }

        state.points += i64::from(kills) * KILL_BONUS;
        kills
    }

    /// Enemy bullets and live enemies against landed players
    fn detect_contacts(state: &WorldState) -> Vec<Contact> {
        let mut contacts = Vec::new();

        let targets = state
            .players
            .values()
            .filter(|p| p.motion == PlayerMotion::Grounded);

        for player in targets {
            let body = player.body();

            let shot = state.bullets.iter().any(|b| match b.origin {
                Origin::Enemy => body.overlaps(&Rect::enemy_bullet(b.x, b.y)),
                Origin::Player => false,
            });
            if shot {
                contacts.push(Contact {
                    player_id: player.id.clone(),
                    kind: ContactKind::Shot,
                });
            }

            let touched = state
                .enemies
                .iter()
                .filter(|e| !e.dead)
                .any(|e| within(e.x, e.y, PLAYER_X, player.y, CONTACT_RADIUS));
            if touched {
                contacts.push(Contact {
                    player_id: player.id.clone(),
                    kind: ContactKind::Touched,
                });
            }
        }

        contacts
    }
}
