//! Session lifecycle states

use serde::{Deserialize, Serialize};

/// The three lifecycle states of a FusionSession
///
/// CREATED → ACTIVE on first ingest; CLOSED is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// Constructed, no signal ingested yet
    Created,
    /// Receiving signals
    Active,
    /// Finalized; further ingest/assess calls fail
    Closed,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Created => "CREATED",
            SessionState::Active => "ACTIVE",
            SessionState::Closed => "CLOSED",
        };
        write!(f, "{}", name)
    }
}
