//! Core types for VetFuse

mod assessment;
mod signal;
mod species;
mod state;

pub use assessment::{FusedEstimate, PainAssessment, TriageLevel};
pub use signal::{RawValue, SignalModality, SignalRecord, SignalSource};
pub use species::{SpeciesProfile, SpeciesTable};
pub use state::SessionState;
