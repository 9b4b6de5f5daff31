//! Assessment output types
//!
//! A PainAssessment is produced fresh on every assess() call and never
//! mutated after return. "No eligible signal" is a defined sentinel value
//! (probability None, confidence 0), clinically distinct from a confirmed
//! zero-probability assessment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{SignalModality, SignalSource};

/// Clinical triage urgency, ordered from least to most urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageLevel {
    Routine,
    Low,
    Moderate,
    Urgent,
    Emergency,
}

impl TriageLevel {
    /// Wire name of this level
    pub fn as_str(&self) -> &'static str {
        match self {
            TriageLevel::Routine => "routine",
            TriageLevel::Low => "low",
            TriageLevel::Moderate => "moderate",
            TriageLevel::Urgent => "urgent",
            TriageLevel::Emergency => "emergency",
        }
    }
}

impl std::fmt::Display for TriageLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Intermediate fuser output, before triage classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusedEstimate {
    /// Fused pain probability, None when no eligible signal
    pub pain_probability: Option<f64>,
    /// Aggregate confidence (0 when no eligible signal)
    pub confidence: f64,
    /// Sources that contributed, sorted
    pub sources: Vec<SignalSource>,
    /// Channel coverage derived from sources
    pub modality: Option<SignalModality>,
    /// Cross-modal agreement (1.0 = perfect), present only when both
    /// modalities contributed
    pub agreement: Option<f64>,
}

impl FusedEstimate {
    /// Sentinel estimate for an empty or fully-stale buffer
    pub fn insufficient() -> Self {
        Self {
            pain_probability: None,
            confidence: 0.0,
            sources: Vec::new(),
            modality: None,
            agreement: None,
        }
    }

    /// Did any signal contribute?
    pub fn has_signal(&self) -> bool {
        self.pain_probability.is_some()
    }
}

/// One clinically interpretable decision per observation window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PainAssessment {
    /// Fused pain probability in [0, 1], None when no eligible signal
    pub pain_probability: Option<f64>,
    /// Overall confidence in [0, 1]
    pub confidence: f64,
    /// Sources actually used, sorted
    pub sources: Vec<SignalSource>,
    /// visual / audio / multimodal, None when no eligible signal
    pub modality: Option<SignalModality>,
    /// Clinical urgency level
    pub triage_level: TriageLevel,
    /// When this assessment was produced
    pub timestamp: DateTime<Utc>,
}

impl PainAssessment {
    /// Create an assessment from a fused estimate and its triage level
    pub fn new(estimate: FusedEstimate, triage_level: TriageLevel) -> Self {
        Self {
            pain_probability: estimate.pain_probability,
            confidence: estimate.confidence,
            sources: estimate.sources,
            modality: estimate.modality,
            triage_level,
            timestamp: Utc::now(),
        }
    }

    /// Sentinel for "no current assessment": no probability, zero
    /// confidence, routine triage
    pub fn insufficient_signal() -> Self {
        Self::new(FusedEstimate::insufficient(), TriageLevel::Routine)
    }

    /// Did any signal contribute, or is this the sentinel?
    pub fn has_signal(&self) -> bool {
        self.pain_probability.is_some()
    }
}

// =============================================================================
// TESTS
// =============================================================================
