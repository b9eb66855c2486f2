//! WebSocket protocol message definitions
//! Inbound wire types; the outbound snapshot is `WorldState` itself.

use serde::{Deserialize, Serialize};

use crate::game::commands::Command;

/// Messages sent from client to server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// One discrete user action
    Command {
        /// Player the command is for; defaults to the sending connection's player
        #[serde(rename = "playerId", default, skip_serializing_if = "Option::is_none")]
        player_id: Option<String>,
        command: Command,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed client message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("command for player {claimed} sent on connection of {connection}")]
    ForeignPlayer { claimed: String, connection: String },
}

impl ClientMsg {
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Resolve the command a connection owned by `connection_player` may apply
    pub fn into_command(self, connection_player: &str) -> Result<Command, ProtocolError> {
        match self {
            ClientMsg::Command { player_id, command } => match player_id {
                Some(claimed) if !claimed.is_empty() && claimed != connection_player => {
                    Err(ProtocolError::ForeignPlayer {
                        claimed,
                        connection: connection_player.to_string(),
                    })
                }
                _ => Ok(command),
            },
        }
    }
}
