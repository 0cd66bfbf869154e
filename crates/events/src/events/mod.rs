use serde::{Deserialize, Serialize};

// Declare all domain modules
pub mod check;
pub mod general;

// Re-export all domain events
pub use check::*;
pub use general::*;

/// Top-level application event grouped by domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", rename_all = "snake_case")]
pub enum AppEvent {
    Check(CheckEvent),
    General(GeneralEvent),
}
