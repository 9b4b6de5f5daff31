//! Signal record model: one normalized, confidence-scored observation
//!
//! Producers (vision and audio detectors) emit SignalRecords; the fusion
//! engine consumes them. Records are value objects - once constructed they
//! are never mutated, so the buffer and the fuser can read the same record
//! from concurrent contexts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Producer of a biological signal (closed set)
///
/// Unknown sources are a construction-time rejection: serde fails to
/// deserialize any string outside this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    /// Grimace-scale action-unit scorer
    VisionGrimace,
    /// Photoplethysmography-based vitals estimator
    VisionVitals,
    /// Posture/pose analyzer
    VisionPose,
    /// Vocal-acoustic feature extractor (pitch, jitter, shimmer, HNR)
    AudioVocal,
    /// Breathing-sound analyzer
    AudioBreathing,
}

impl SignalSource {
    /// All sources, in canonical order
    pub fn all() -> [SignalSource; 5] {
        [
            SignalSource::VisionGrimace,
            SignalSource::VisionVitals,
            SignalSource::VisionPose,
            SignalSource::AudioVocal,
            SignalSource::AudioBreathing,
        ]
    }

    /// The broad channel this source belongs to
    pub fn modality(&self) -> SignalModality {
        match self {
            SignalSource::VisionGrimace | SignalSource::VisionVitals | SignalSource::VisionPose => {
                SignalModality::Visual
            }
            SignalSource::AudioVocal | SignalSource::AudioBreathing => SignalModality::Audio,
        }
    }

    /// Wire name of this source
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalSource::VisionGrimace => "vision_grimace",
            SignalSource::VisionVitals => "vision_vitals",
            SignalSource::VisionPose => "vision_pose",
            SignalSource::AudioVocal => "audio_vocal",
            SignalSource::AudioBreathing => "audio_breathing",
        }
    }
}

impl std::fmt::Display for SignalSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Broad channel of a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalModality {
    Visual,
    Audio,
    /// Both channels contributed
    Multimodal,
}

impl SignalModality {
    /// Derive the modality covered by a set of sources, None if empty
    pub fn from_sources(sources: &[SignalSource]) -> Option<SignalModality> {
        let has_visual = sources.iter().any(|s| s.modality() == SignalModality::Visual);
        let has_audio = sources.iter().any(|s| s.modality() == SignalModality::Audio);
        match (has_visual, has_audio) {
            (true, true) => Some(SignalModality::Multimodal),
            (true, false) => Some(SignalModality::Visual),
            (false, true) => Some(SignalModality::Audio),
            (false, false) => None,
        }
    }
}

impl std::fmt::Display for SignalModality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SignalModality::Visual => "visual",
            SignalModality::Audio => "audio",
            SignalModality::Multimodal => "multimodal",
        };
        write!(f, "{}", name)
    }
}

/// Producer-defined raw payload behind a normalized score
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Scalar(f64),
    Label(String),
    Map(HashMap<String, serde_json::Value>),
}

/// One normalized, confidence-scored observation from a single producer
///
/// `normalized_value` and `confidence` must lie in [0, 1]; construction
/// rejects out-of-range values rather than coercing them, so producers
/// cannot inject values that would corrupt the fusion arithmetic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalRecord {
    /// Which producer emitted this record
    pub source: SignalSource,
    /// Species identifier, e.g. "cat"
    pub species_id: String,
    /// Producer-defined raw payload (scale scores, feature maps, labels)
    pub raw_value: RawValue,
    /// Pain-relevant score in [0, 1], scale-independent
    pub normalized_value: f64,
    /// Producer's confidence in [0, 1]
    pub confidence: f64,
    /// Producer-reported capture time in seconds (monotonic or wall-clock)
    pub timestamp: f64,
    /// Opaque key-value pairs, not interpreted by the core
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl SignalRecord {
    /// Create a validated record; out-of-range scores are rejected
    pub fn new(
        source: SignalSource,
        species_id: impl Into<String>,
        raw_value: RawValue,
        normalized_value: f64,
        confidence: f64,
        timestamp: f64,
    ) -> Result<Self> {
        let record = Self {
            source,
            species_id: species_id.into(),
            raw_value,
            normalized_value,
            confidence,
            timestamp,
            metadata: HashMap::new(),
        };
        record.validate()?;
        Ok(record)
    }

    /// Attach a metadata entry (builder style, consumes self)
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Re-check the range invariants
    ///
    /// Also applied at the ingestion boundary, which covers records built
    /// through deserialization instead of [`SignalRecord::new`].
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("normalized_value", self.normalized_value)?;
        check_unit_interval("confidence", self.confidence)?;
        Ok(())
    }

    /// The broad channel this record belongs to
    pub fn modality(&self) -> SignalModality {
        self.source.modality()
    }
}

/// Reject values outside [0, 1]; NaN fails the range check as well
fn check_unit_interval(field: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidSignal(format!(
            "{} must be within [0, 1], got {}",
            field, value
        )))
    }
}

// =============================================================================
// TESTS
// =============================================================================
