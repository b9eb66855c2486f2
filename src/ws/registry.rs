//! Connected clients and per-tick snapshot fan-out

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;
use uuid::Uuid;

use crate::game::World;

/// One encoded snapshot, shared by every recipient
pub type Payload = Arc<str>;

/// Registry entry for one open connection
#[derive(Debug, Clone)]
pub struct ClientHandle {
    pub connection_id: Uuid,
    tx: mpsc::Sender<Payload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    #[error("client buffer full, snapshot dropped")]
    Full,
    #[error("client writer closed")]
    Closed,
}

impl ClientHandle {
    /// Queue a snapshot without waiting
    pub fn try_send(&self, payload: &Payload) -> Result<(), SendError> {
        self.tx.try_send(payload.clone()).map_err(|e| match e {
            TrySendError::Full(_) => SendError::Full,
            TrySendError::Closed(_) => SendError::Closed,
        })
    }
}

/// Result of one fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    /// Recipients whose buffer was full this tick
    pub dropped: usize,
    /// Recipients whose writer has gone away but have not deregistered yet
    pub failed: usize,
}

/// Player id -> connection map.
///
/// Lock order is registry entry first, then the world lock. The fan-out never
/// holds the world lock, so connect/disconnect cannot deadlock with a tick.
pub struct ClientRegistry {
    clients: DashMap<String, ClientHandle>,
    world: World,
}

impl ClientRegistry {
    pub fn new(world: World) -> Self {
        Self {
            clients: DashMap::new(),
            world,
        }
    }

    /// Register a connection and create its player at the ground line.
    /// An existing entry for the same id is replaced.
    pub fn connect(&self, player_id: &str, tx: mpsc::Sender<Payload>) -> Uuid {
        let connection_id = Uuid::new_v4();
        let entry = self.clients.entry(player_id.to_string());
        self.world.lock().spawn_player(player_id);
        entry.insert(ClientHandle { connection_id, tx });
        connection_id
    }

    /// Remove the entry and its player, but only if `connection_id` still owns it.
    pub fn disconnect(&self, player_id: &str, connection_id: Uuid) -> bool {
        match self.clients.entry(player_id.to_string()) {
            Entry::Occupied(entry) if entry.get().connection_id == connection_id => {
                self.world.lock().remove_player(player_id);
                entry.remove();
                true
            }
            _ => false,
        }
    }

    /// Offer the payload to every registered connection. Failures are
    /// isolated per recipient and never remove the entry.
    pub fn broadcast(&self, payload: &Payload) -> BroadcastReport {
        let mut report = BroadcastReport::default();

        for client in self.clients.iter() {
            match client.value().try_send(payload) {
                Ok(()) => report.delivered += 1,
                Err(SendError::Full) => {
                    debug!(player_id = %client.key(), "Client buffer full, dropping snapshot");
                    report.dropped += 1;
                }
                Err(SendError::Closed) => {
                    debug!(player_id = %client.key(), "Client writer gone, awaiting read cleanup");
                    report.failed += 1;
                }
            }
        }

        report
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Whether `connection_id` is still the live connection for `player_id`
    pub fn owns(&self, player_id: &str, connection_id: Uuid) -> bool {
        self.clients
            .get(player_id)
            .is_some_and(|c| c.connection_id == connection_id)
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.clients.contains_key(player_id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.clients.iter().map(|c| c.key().clone()).collect()
    }
}

/// Deregisters a connection when dropped, on every exit path of its handler.
pub struct Registration {
    clients: Arc<ClientRegistry>,
    player_id: String,
    connection_id: Uuid,
}

impl Registration {
    pub fn new(clients: Arc<ClientRegistry>, player_id: String, tx: mpsc::Sender<Payload>) -> Self {
        let connection_id = clients.connect(&player_id, tx);
        Self {
            clients,
            player_id,
            connection_id,
        }
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn connection_id(&self) -> Uuid {
        self.connection_id
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.clients.disconnect(&self.player_id, self.connection_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> (World, Arc<ClientRegistry>) {
        let world = World::new();
        let clients = Arc::new(ClientRegistry::new(world.clone()));
        (world, clients)
    }

    #[test]
    fn connect_and_disconnect_keep_maps_in_step() {
        let (world, clients) = registry();
        let (tx_a, _rx_a) = mpsc::channel(4);
        let (tx_b, _rx_b) = mpsc::channel(4);

        let a = clients.connect("a", tx_a);
        clients.connect("b", tx_b);
        assert_eq!(clients.len(), 2);
        assert_eq!(world.player_count(), 2);

        assert!(clients.disconnect("a", a));
        assert_eq!(clients.ids(), vec!["b".to_string()]);
        let state = world.lock();
        assert_eq!(state.players.len(), 1);
        assert!(state.players.contains_key("b"));
    }

    #[test]
    fn stale_connection_does_not_evict_replacement() {
        let (world, clients) = registry();
        let (tx_old, _rx_old) = mpsc::channel(4);
        let (tx_new, _rx_new) = mpsc::channel(4);

        let old = clients.connect("a", tx_old);
        let new = clients.connect("a", tx_new);
        assert_ne!(old, new);
        assert_eq!(clients.len(), 1);

        assert!(!clients.owns("a", old));
        assert!(clients.owns("a", new));
        assert!(!clients.disconnect("a", old));
        assert!(clients.contains("a"));
        assert_eq!(world.player_count(), 1);

        assert!(clients.disconnect("a", new));
        assert!(clients.is_empty());
        assert_eq!(world.player_count(), 0);
    }

    #[test]
    fn registration_guard_cleans_up_on_drop() {
        let (world, clients) = registry();
        let (tx, _rx) = mpsc::channel(4);
        {
            let reg = Registration::new(clients.clone(), "a".into(), tx);
            assert_eq!(reg.player_id(), "a");
            assert!(clients.contains("a"));
            assert_eq!(world.player_count(), 1);
        }
        assert!(clients.is_empty());
        assert_eq!(world.player_count(), 0);
    }

    #[test]
    fn broadcast_isolates_failing_recipients() {
        let (_world, clients) = registry();
        let (tx_ok, mut rx_ok) = mpsc::channel(4);
        let (tx_full, _rx_full) = mpsc::channel(1);
        let (tx_gone, rx_gone) = mpsc::channel(4);
        drop(rx_gone);

        clients.connect("ok", tx_ok);
        clients.connect("full", tx_full);
        clients.connect("gone", tx_gone);

        let first: Payload = Arc::from("tick-1");
        let second: Payload = Arc::from("tick-2");

        let report = clients.broadcast(&first);
        assert_eq!(report.delivered, 2);
        assert_eq!(report.failed, 1);

        let report = clients.broadcast(&second);
        assert_eq!(
            report,
            BroadcastReport {
                delivered: 1,
                dropped: 1,
                failed: 1
            }
        );

        // Failed recipients stay registered until their reader notices
        assert_eq!(clients.len(), 3);
        assert_eq!(tokio_test::block_on(rx_ok.recv()).as_deref(), Some("tick-1"));
        assert_eq!(tokio_test::block_on(rx_ok.recv()).as_deref(), Some("tick-2"));
    }
}
