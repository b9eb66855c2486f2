//! Game simulation modules

pub mod combat;
pub mod commands;
pub mod constants;
pub mod physics;
pub mod simulation;
pub mod snapshot;
pub mod ticker;
pub mod world;

pub use combat::ContactPolicy;
pub use commands::Command;
pub use simulation::Simulation;
pub use ticker::GameLoop;
pub use world::{Bullet, Enemy, Origin, Player, Sun, World, WorldState};
