//! Triage classification
//!
//! Deterministic, monotonic mapping from (pain probability, confidence,
//! species profile) to a clinical urgency level. Same inputs always yield
//! the same level - no hidden state, no randomness.

use crate::config::TriageCalibration;
use crate::types::{SpeciesProfile, TriageLevel};

/// Threshold-driven urgency classifier
#[derive(Debug, Clone, Default)]
pub struct TriageClassifier {
    calibration: TriageCalibration,
}

impl TriageClassifier {
    /// Classifier with default calibration
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier with deployment calibration
    pub fn with_calibration(calibration: TriageCalibration) -> Self {
        Self { calibration }
    }

    /// Classify a fused probability into an urgency level
    ///
    /// The species hiding adjustment runs first, then the threshold ladder,
    /// then the low-confidence cap.
    pub fn classify(
        &self,
        pain_probability: f64,
        confidence: f64,
        profile: &SpeciesProfile,
    ) -> TriageLevel {
        let adjusted = adjust_for_hiding(pain_probability, profile.pain_hiding_factor);
        let level = self.level_for(adjusted);
        self.apply_confidence_cap(level, confidence)
    }

    /// Map an adjusted probability through the threshold ladder
    fn level_for(&self, adjusted: f64) -> TriageLevel {
        let c = &self.calibration;
        if adjusted >= c.emergency_threshold {
            TriageLevel::Emergency
        } else if adjusted >= c.urgent_threshold {
            TriageLevel::Urgent
        } else if adjusted >= c.moderate_threshold {
            TriageLevel::Moderate
        } else if adjusted >= c.low_threshold {
            TriageLevel::Low
        } else {
            TriageLevel::Routine
        }
    }

    /// Low-confidence cap policy: below the minimum confidence the reported
    /// level never exceeds MODERATE, bounding false-positive urgent alerts
    pub fn apply_confidence_cap(&self, level: TriageLevel, confidence: f64) -> TriageLevel {
        if confidence < self.calibration.min_confidence {
            level.min(TriageLevel::Moderate)
        } else {
            level
        }
    }
}

/// Species pain-hiding adjustment: `p + h * (1 - p)`, clamped to [0, 1]
///
/// An observed low score under-represents true pain likelihood for a
/// species that masks pain well, so apparent probability is pushed upward
/// by the unclaimed mass. Monotonic in both arguments.
pub fn adjust_for_hiding(pain_probability: f64, hiding_factor: f64) -> f64 {
    (pain_probability + hiding_factor * (1.0 - pain_probability)).clamp(0.0, 1.0)
}

// =============================================================================
// TESTS
// =============================================================================
