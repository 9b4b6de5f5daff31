//! Engine calibration configuration
//!
//! The fusion weights, triage thresholds, staleness window, and species
//! table are calibration constants, not business logic: deployments may
//! override any of them from a TOML file. Defaults are the documented
//! constants in the crate root, pending real clinical validation data.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{SpeciesProfile, SpeciesTable};
use crate::{
    AGREEMENT_BONUS, MIN_ESCALATION_CONFIDENCE, STALENESS_WINDOW_SECS, TRIAGE_THRESHOLD_EMERGENCY,
    TRIAGE_THRESHOLD_LOW, TRIAGE_THRESHOLD_MODERATE, TRIAGE_THRESHOLD_URGENT,
};

/// Fusion algorithm calibration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionCalibration {
    /// Confidence bonus coefficient for cross-modal agreement
    pub agreement_bonus: f64,
}

impl Default for FusionCalibration {
    fn default() -> Self {
        Self {
            agreement_bonus: AGREEMENT_BONUS,
        }
    }
}

impl FusionCalibration {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.agreement_bonus) {
            return Err(Error::Config(format!(
                "agreement_bonus must be within [0, 1], got {}",
                self.agreement_bonus
            )));
        }
        Ok(())
    }
}

/// Triage classifier calibration
///
/// The four thresholds partition adjusted probability into the five levels:
/// [0, low) routine, [low, moderate) low, [moderate, urgent) moderate,
/// [urgent, emergency) urgent, [emergency, 1] emergency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageCalibration {
    pub low_threshold: f64,
    pub moderate_threshold: f64,
    pub urgent_threshold: f64,
    pub emergency_threshold: f64,
    /// Below this fused confidence the reported level is capped at MODERATE
    pub min_confidence: f64,
}

impl Default for TriageCalibration {
    fn default() -> Self {
        Self {
            low_threshold: TRIAGE_THRESHOLD_LOW,
            moderate_threshold: TRIAGE_THRESHOLD_MODERATE,
            urgent_threshold: TRIAGE_THRESHOLD_URGENT,
            emergency_threshold: TRIAGE_THRESHOLD_EMERGENCY,
            min_confidence: MIN_ESCALATION_CONFIDENCE,
        }
    }
}

impl TriageCalibration {
    fn validate(&self) -> Result<()> {
        let thresholds = [
            ("low_threshold", self.low_threshold),
            ("moderate_threshold", self.moderate_threshold),
            ("urgent_threshold", self.urgent_threshold),
            ("emergency_threshold", self.emergency_threshold),
            ("min_confidence", self.min_confidence),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        let ascending = self.low_threshold < self.moderate_threshold
            && self.moderate_threshold < self.urgent_threshold
            && self.urgent_threshold < self.emergency_threshold;
        if !ascending {
            return Err(Error::Config(format!(
                "triage thresholds must be strictly ascending, got {} / {} / {} / {}",
                self.low_threshold,
                self.moderate_threshold,
                self.urgent_threshold,
                self.emergency_threshold
            )));
        }
        Ok(())
    }
}

/// Full engine configuration: fusion + triage calibration, staleness
/// window, and species table extensions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum record age eligible for fusion, in seconds
    pub staleness_window_secs: Option<u64>,
    pub fusion: FusionCalibration,
    pub triage: TriageCalibration,
    /// Deployment species profiles, merged over the built-in table
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub species: Vec<SpeciesProfile>,
}

impl EngineConfig {
    /// Parse and validate a TOML configuration string
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            species_overrides = config.species.len(),
            "loaded engine configuration"
        );
        Ok(config)
    }

    /// Validate calibration ranges and species profile sanity
    pub fn validate(&self) -> Result<()> {
        self.fusion.validate()?;
        self.triage.validate()?;
        for profile in &self.species {
            if profile.species_id.trim().is_empty() {
                return Err(Error::Config("species profile with empty species_id".into()));
            }
            if !(0.0..=1.0).contains(&profile.pain_hiding_factor) {
                return Err(Error::Config(format!(
                    "pain_hiding_factor for '{}' must be within [0, 1], got {}",
                    profile.species_id, profile.pain_hiding_factor
                )));
            }
            if profile.vocal_frequency_range.0 >= profile.vocal_frequency_range.1 {
                return Err(Error::Config(format!(
                    "vocal_frequency_range for '{}' must have low < high",
                    profile.species_id
                )));
            }
        }
        Ok(())
    }

    /// Staleness window as a Duration
    pub fn staleness_window(&self) -> Duration {
        Duration::from_secs(self.staleness_window_secs.unwrap_or(STALENESS_WINDOW_SECS))
    }

    /// Built-in species table with this deployment's overrides merged in
    pub fn species_table(&self) -> SpeciesTable {
        let mut table = SpeciesTable::builtin();
        table.extend(self.species.iter().cloned());
        table
    }
}

// =============================================================================
// TESTS
// =============================================================================
