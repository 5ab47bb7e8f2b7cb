//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Combat resolution (the battle system lives outside the engine)
//! - Character roster and inventory (owned by the wider game)
//! - Persistence (could swap JSON files -> browser storage -> SQLite)
//! - Presentation (battle log and progress UI)
//! - Clock/Random/Pacing (for testing)

mod error;
mod events;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::*;

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::*;

// =============================================================================
// Presentation Ports
// =============================================================================
pub use events::*;

// =============================================================================
// Testability Ports
// =============================================================================
pub use testing::*;

// =============================================================================
// Error Types
// =============================================================================
pub use error::*;
