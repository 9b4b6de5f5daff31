//! Core engine for VetFuse

pub mod buffer;
pub mod fuser;
pub mod session;
pub mod triage;

pub use buffer::SignalBuffer;
pub use fuser::BayesianFuser;
pub use session::{FusionSession, SessionContext};
pub use triage::TriageClassifier;
