//! Use cases: user stories orchestrated across entities and ports.

pub mod dungeon;

pub use dungeon::DungeonUseCases;
