//! Player commands applied to the world

use serde::{Deserialize, Serialize};

use super::constants::{JUMP_IMPULSE, PLAYER_BULLET_SPEED, PLAYER_HEIGHT, PLAYER_X};
use super::world::{Bullet, Origin, PlayerMotion, WorldState};

/// Discrete actions a client can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Jump,
    Shoot,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    /// Unknown player, airborne jump, or shooting after game over
    Ignored,
}

/// Apply one command for `player_id`. The caller holds the world lock.
pub fn apply_command(state: &mut WorldState, player_id: &str, command: Command) -> CommandOutcome {
    if !state.players.contains_key(player_id) {
        return CommandOutcome::Ignored;
    }

    match command {
        Command::Jump => jump(state, player_id),
        Command::Shoot => shoot(state, player_id),
        Command::Reset => reset(state, player_id),
    }
}

fn jump(state: &mut WorldState, player_id: &str) -> CommandOutcome {
    match state.players.get_mut(player_id) {
        Some(player) if player.is_grounded() => {
            player.vy = JUMP_IMPULSE;
            CommandOutcome::Applied
        }
        _ => CommandOutcome::Ignored,
    }
}

fn shoot(state: &mut WorldState, player_id: &str) -> CommandOutcome {
    if state.game_over {
        return CommandOutcome::Ignored;
    }
    let Some(player) = state.players.get(player_id) else {
        return CommandOutcome::Ignored;
    };

    let bullet = Bullet {
        x: PLAYER_X,
        y: player.muzzle_y(),
        vx: PLAYER_BULLET_SPEED,
        vy: 0.0,
        origin: Origin::Player,
    };
    state.bullets.push(bullet);
    CommandOutcome::Applied
}

/// Start a fresh round and drop the issuing player in from above the screen.
/// The regular tick integrates the fall.
fn reset(state: &mut WorldState, player_id: &str) -> CommandOutcome {
    state.reset_round();

    match state.players.get_mut(player_id) {
        Some(player) => {
            player.y = -PLAYER_HEIGHT;
            player.vy = 0.0;
            player.motion = PlayerMotion::Respawning;
            CommandOutcome::Applied
        }
        None => CommandOutcome::Ignored,
    }
}
