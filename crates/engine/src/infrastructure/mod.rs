//! Infrastructure: port traits and their concrete adapters.

pub mod auto_battle;
pub mod clock;
pub mod event_sink;
pub mod memory;
pub mod pacing;
pub mod persistence;
pub mod ports;
pub mod settings;
pub mod template_loader;
