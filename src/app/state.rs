//! Application state shared across routes

use std::sync::Arc;

use crate::config::Config;
use crate::game::snapshot::SnapshotStats;
use crate::game::{GameLoop, Simulation, World};
use crate::ws::ClientRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub world: World,
    pub clients: Arc<ClientRegistry>,
    pub snapshot_stats: Arc<SnapshotStats>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let world = World::new();
        let clients = Arc::new(ClientRegistry::new(world.clone()));

        Self {
            config: Arc::new(config),
            world,
            clients,
            snapshot_stats: Arc::new(SnapshotStats::default()),
        }
    }

    /// Build the tick loop driving this state's world
    pub fn game_loop(&self) -> GameLoop {
        let seed = self.config.world_seed.unwrap_or_else(rand::random);
        let simulation = Simulation::new(seed, self.config.contact_policy);

        GameLoop::new(
            self.world.clone(),
            self.clients.clone(),
            simulation,
            self.snapshot_stats.clone(),
        )
    }
}
