//! Authoritative tick loop: simulate, snapshot, fan out

use std::sync::Arc;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::util::time::{tick_delta, TICK_INTERVAL};
use crate::ws::registry::{BroadcastReport, ClientRegistry};

use super::combat::ContactKind;
use super::simulation::{Simulation, TickReport};
use super::snapshot::{self, SnapshotStats};
use super::World;

pub struct GameLoop {
    world: World,
    clients: Arc<ClientRegistry>,
    simulation: Simulation,
    stats: Arc<SnapshotStats>,
}

impl GameLoop {
    pub fn new(
        world: World,
        clients: Arc<ClientRegistry>,
        simulation: Simulation,
        stats: Arc<SnapshotStats>,
    ) -> Self {
        Self {
            world,
            clients,
            simulation,
            stats,
        }
    }

    /// Run forever at the fixed tick rate
    pub async fn run(mut self) {
        info!(
            contact_policy = ?self.simulation.contact_policy(),
            tick_ms = TICK_INTERVAL.as_millis() as u64,
            "Game loop started"
        );

        let mut ticker = interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            self.tick();
        }
    }

    /// One step plus one broadcast. Snapshots go out in tick order because a
    /// single task produces them.
    pub fn tick(&mut self) -> Option<BroadcastReport> {
        let (report, encoded) = {
            let mut state = self.world.lock();
            let report = self.simulation.step(&mut state, tick_delta());
            (report, snapshot::encode(&state))
        };

        log_report(&report);

        let payload = match encoded {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "Skipping broadcast");
                return None;
            }
        };

        self.stats.record(payload.len());
        Some(self.clients.broadcast(&payload))
    }
}

fn log_report(report: &TickReport) {
    if report.spawned_enemy {
        debug!("Enemy spawned");
    }
    if report.collisions.kills > 0 {
        info!(kills = report.collisions.kills, "Enemy killed");
    }
    for player_id in &report.landed {
        debug!(player_id = %player_id, "Player respawned");
    }
    for contact in &report.collisions.contacts {
        let cause = match contact.kind {
            ContactKind::Shot => "enemy_bullet",
            ContactKind::Touched => "enemy",
        };
        warn!(player_id = %contact.player_id, cause, "Player hit");
    }
    if report.collisions.ended_round {
        info!("Game over");
    }
}
