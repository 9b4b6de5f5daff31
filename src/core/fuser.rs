//! Bayesian signal fusion
//!
//! Combines 0..N signal records into one pain probability and one aggregate
//! confidence. Sources are grouped by modality and combined by
//! confidence-weighted average; when both modalities are present their
//! agreement raises the fused confidence, not the probability, so
//! cross-modal corroboration is never double-counted as pain mass.

use crate::config::FusionCalibration;
use crate::types::{FusedEstimate, SignalModality, SignalRecord, SignalSource};

/// Confidence-weighted estimate for one modality
#[derive(Debug, Clone, Copy)]
struct ModalityEstimate {
    probability: f64,
    confidence: f64,
}

/// Fusion engine
#[derive(Debug, Clone, Default)]
pub struct BayesianFuser {
    calibration: FusionCalibration,
}

impl BayesianFuser {
    /// Fuser with default calibration
    pub fn new() -> Self {
        Self::default()
    }

    /// Fuser with deployment calibration
    pub fn with_calibration(calibration: FusionCalibration) -> Self {
        Self { calibration }
    }

    /// Fuse a buffer snapshot into one estimate
    ///
    /// An empty snapshot yields the insufficient-signal sentinel, never a
    /// fabricated zero probability - "no signal" must stay distinguishable
    /// from "confirmed no pain".
    pub fn fuse(&self, records: &[SignalRecord]) -> FusedEstimate {
        if records.is_empty() {
            return FusedEstimate::insufficient();
        }

        let visual: Vec<&SignalRecord> = records
            .iter()
            .filter(|r| r.modality() == SignalModality::Visual)
            .collect();
        let audio: Vec<&SignalRecord> = records
            .iter()
            .filter(|r| r.modality() == SignalModality::Audio)
            .collect();

        let visual_estimate = combine_modality(&visual);
        let audio_estimate = combine_modality(&audio);

        let (probability, confidence, agreement) = match (visual_estimate, audio_estimate) {
            (Some(v), Some(a)) => {
                // Agreement between independent modalities is stronger
                // evidence than either alone; reflect it in confidence only
                let agreement = 1.0 - (v.probability - a.probability).abs();
                let probability = weighted_pair(v, a);
                let confidence =
                    (v.confidence + a.confidence) / 2.0 + self.calibration.agreement_bonus * agreement;
                (probability, confidence, Some(agreement))
            }
            (Some(m), None) | (None, Some(m)) => (m.probability, m.confidence, None),
            // records is non-empty, so at least one modality is present
            (None, None) => return FusedEstimate::insufficient(),
        };

        let mut sources: Vec<SignalSource> = records.iter().map(|r| r.source).collect();
        sources.sort();
        sources.dedup();
        let modality = SignalModality::from_sources(&sources);

        // Absorb floating-point drift
        FusedEstimate {
            pain_probability: Some(probability.clamp(0.0, 1.0)),
            confidence: confidence.clamp(0.0, 1.0),
            sources,
            modality,
            agreement,
        }
    }
}

/// Confidence-weighted average within one modality
///
/// Empty modality contributes nothing (None), not zero: absence must not
/// pull the estimate toward "no pain". All-zero confidence degenerates to a
/// plain mean with zero confidence; no division by zero anywhere.
fn combine_modality(records: &[&SignalRecord]) -> Option<ModalityEstimate> {
    if records.is_empty() {
        return None;
    }
    let n = records.len() as f64;
    let weight_sum: f64 = records.iter().map(|r| r.confidence).sum();
    let probability = if weight_sum > 0.0 {
        records
            .iter()
            .map(|r| r.normalized_value * r.confidence)
            .sum::<f64>()
            / weight_sum
    } else {
        records.iter().map(|r| r.normalized_value).sum::<f64>() / n
    };
    Some(ModalityEstimate {
        probability,
        confidence: weight_sum / n,
    })
}

/// Cross-modal combine, using confidence as inverse-variance-style weights
fn weighted_pair(v: ModalityEstimate, a: ModalityEstimate) -> f64 {
    let weight_sum = v.confidence + a.confidence;
    if weight_sum > 0.0 {
        (v.probability * v.confidence + a.probability * a.confidence) / weight_sum
    } else {
        (v.probability + a.probability) / 2.0
    }
}

// =============================================================================
// TESTS
// =============================================================================
