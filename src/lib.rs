//! VetFuse: multimodal pain-signal fusion and triage for veterinary monitoring
//!
//! Pipeline: detector output → SignalRecord → SignalBuffer → BayesianFuser
//! → TriageClassifier → PainAssessment

pub mod config;
pub mod core;
pub mod error;
pub mod types;

pub use error::{Error, Result};

// =============================================================================
// TRIAGE THRESHOLDS - documented defaults, overridable via EngineConfig
// =============================================================================

/// Adjusted probability at or above which triage is at least LOW
pub const TRIAGE_THRESHOLD_LOW: f64 = 0.2;

/// Adjusted probability at or above which triage is at least MODERATE
pub const TRIAGE_THRESHOLD_MODERATE: f64 = 0.4;

/// Adjusted probability at or above which triage is at least URGENT
pub const TRIAGE_THRESHOLD_URGENT: f64 = 0.6;

/// Adjusted probability at or above which triage is EMERGENCY
pub const TRIAGE_THRESHOLD_EMERGENCY: f64 = 0.8;

/// Minimum fused confidence for escalation past MODERATE
/// Low-confidence high-probability readings must not drive urgent alerts
pub const MIN_ESCALATION_CONFIDENCE: f64 = 0.3;

// =============================================================================
// FUSION CONSTANTS
// =============================================================================

/// Confidence bonus coefficient for cross-modal agreement
pub const AGREEMENT_BONUS: f64 = 0.15;

/// Maximum age of a buffered record before it is excluded from fusion (seconds)
pub const STALENESS_WINDOW_SECS: u64 = 10;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "0.1.0";
