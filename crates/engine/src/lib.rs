//! Delve Engine library.
//!
//! Drives dungeon runs for an idle RPG: run generation, the encounter
//! loop, rewards, party stat snapshots and crash-safe persistence.
//!
//! ## Structure
//!
//! - `entities/` - Template store and dungeon progression
//! - `use_cases/` - The run lifecycle, orchestrated across entities and ports
//! - `infrastructure/` - Port traits and their adapters
//! - `app` - Application composition

pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod use_cases;

/// Test fixtures shared by the engine's test modules.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
