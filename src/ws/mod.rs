//! WebSocket transport: wire protocol, client registry, connection handler

pub mod handler;
pub mod protocol;
pub mod registry;

pub use registry::ClientRegistry;
