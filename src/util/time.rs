//! Time utilities for game simulation

use std::time::{Duration, Instant};

/// Server start time for uptime tracking
static SERVER_START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize server start time (call once at startup)
pub fn init_server_time() {
    SERVER_START.get_or_init(Instant::now);
}

/// Get server uptime in seconds
pub fn uptime_secs() -> u64 {
    SERVER_START
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0)
}

/// Nominal simulation rate
pub const SIMULATION_TPS: u32 = 60;

/// Wall-clock spacing of ticks. Slightly shorter than 1/60 s, so the world
/// runs a little faster than real time.
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Calculate delta time for physics (in seconds)
pub fn tick_delta() -> f64 {
    1.0 / SIMULATION_TPS as f64
}
