//! Species calibration profiles
//!
//! Lookup is a total function: unknown species resolve to a documented
//! fallback profile. Absence of calibration data must never abort an
//! assessment.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Calibration data for one species
///
/// Immutable once constructed. `pain_hiding_factor` is the probability mass
/// subtracted from apparent pain by species-typical masking: prey animals
/// score high, social carnivores low.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesProfile {
    /// Table key, e.g. "cat"
    pub species_id: String,
    /// Binomial name, e.g. "Felis catus"
    pub scientific_name: String,
    /// How strongly this species masks outward pain expression (0-1)
    pub pain_hiding_factor: f64,
    /// Vocalization band in Hz (low, high)
    pub vocal_frequency_range: (f64, f64),
    /// Grimace scale (facial action units) validated for this species
    pub grimace_supported: bool,
    /// Glasgow Composite Pain Scale validated for this species
    pub gcps_supported: bool,
    /// Resting respiration rate band, breaths/min
    pub typical_respiration_range: (u32, u32),
    /// Resting heart rate band, beats/min
    pub typical_heart_rate_range: (u32, u32),
}

impl SpeciesProfile {
    /// Fallback profile for species without calibration data
    ///
    /// Hiding factor 0.5 and wide physiologic ranges: conservative middle
    /// ground that neither suppresses nor inflates triage.
    pub fn fallback(species_id: impl Into<String>) -> Self {
        let species_id = species_id.into();
        Self {
            scientific_name: species_id.clone(),
            species_id,
            pain_hiding_factor: 0.5,
            vocal_frequency_range: (50.0, 8000.0),
            grimace_supported: false,
            gcps_supported: false,
            typical_respiration_range: (15, 40),
            typical_heart_rate_range: (60, 180),
        }
    }
}

lazy_static! {
    /// Built-in calibration table
    static ref BUILTIN_PROFILES: HashMap<String, SpeciesProfile> = {
        let mut m = HashMap::new();
        for profile in [
            SpeciesProfile {
                species_id: "cat".into(),
                scientific_name: "Felis catus".into(),
                pain_hiding_factor: 0.6,
                vocal_frequency_range: (50.0, 10000.0),
                grimace_supported: true,
                gcps_supported: false,
                typical_respiration_range: (20, 30),
                typical_heart_rate_range: (120, 140),
            },
            SpeciesProfile {
                species_id: "dog".into(),
                scientific_name: "Canis familiaris".into(),
                pain_hiding_factor: 0.2,
                vocal_frequency_range: (40.0, 8000.0),
                grimace_supported: false,
                gcps_supported: true,
                typical_respiration_range: (10, 30),
                typical_heart_rate_range: (60, 140),
            },
            SpeciesProfile {
                species_id: "rabbit".into(),
                scientific_name: "Oryctolagus cuniculus".into(),
                pain_hiding_factor: 0.8,
                vocal_frequency_range: (100.0, 16000.0),
                grimace_supported: true,
                gcps_supported: false,
                typical_respiration_range: (30, 60),
                typical_heart_rate_range: (130, 325),
            },
            SpeciesProfile {
                species_id: "horse".into(),
                scientific_name: "Equus caballus".into(),
                pain_hiding_factor: 0.7,
                vocal_frequency_range: (30.0, 5000.0),
                grimace_supported: true,
                gcps_supported: false,
                typical_respiration_range: (8, 16),
                typical_heart_rate_range: (28, 44),
            },
            SpeciesProfile {
                species_id: "bird".into(),
                scientific_name: "Aves".into(),
                pain_hiding_factor: 0.9,
                vocal_frequency_range: (200.0, 12000.0),
                grimace_supported: false,
                gcps_supported: false,
                typical_respiration_range: (15, 45),
                typical_heart_rate_range: (140, 250),
            },
        ] {
            m.insert(profile.species_id.clone(), profile);
        }
        m
    };
}

/// Species calibration table: built-in profiles plus deployment overrides
#[derive(Debug, Clone)]
pub struct SpeciesTable {
    profiles: HashMap<String, SpeciesProfile>,
}

impl Default for SpeciesTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SpeciesTable {
    /// Table with the built-in profiles only
    pub fn builtin() -> Self {
        Self {
            profiles: BUILTIN_PROFILES.clone(),
        }
    }

    /// Insert or replace a profile, keyed by its lowercased species_id
    pub fn insert(&mut self, profile: SpeciesProfile) {
        self.profiles
            .insert(profile.species_id.to_lowercase(), profile);
    }

    /// Merge deployment profiles over the current table
    pub fn extend(&mut self, profiles: impl IntoIterator<Item = SpeciesProfile>) {
        for profile in profiles {
            self.insert(profile);
        }
    }

    /// Total lookup: known species return their profile, unknown species
    /// return the fallback. Lookup is case-insensitive.
    pub fn profile_for(&self, species_id: &str) -> SpeciesProfile {
        self.profiles
            .get(&species_id.to_lowercase())
            .cloned()
            .unwrap_or_else(|| SpeciesProfile::fallback(species_id))
    }

    /// Is this species in the table (calibrated)?
    pub fn is_calibrated(&self, species_id: &str) -> bool {
        self.profiles.contains_key(&species_id.to_lowercase())
    }

    /// Number of calibrated species
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let table = SpeciesTable::builtin();
        let cat = table.profile_for("cat");
        assert_eq!(cat.scientific_name, "Felis catus");
        assert!((cat.pain_hiding_factor - 0.6).abs() < 1e-12);
        assert!(cat.grimace_supported);
        assert!(!cat.gcps_supported);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = SpeciesTable::builtin();
        assert_eq!(table.profile_for("Cat"), table.profile_for("cat"));
    }

    #[test]
    fn test_unknown_species_falls_back() {
        let table = SpeciesTable::builtin();
        let ferret = table.profile_for("ferret");
        assert_eq!(ferret.species_id, "ferret");
        assert!((ferret.pain_hiding_factor - 0.5).abs() < 1e-12);
        assert!(!ferret.grimace_supported);
        assert!(!table.is_calibrated("ferret"));
    }

    #[test]
    fn test_extend_overrides_builtin() {
        let mut table = SpeciesTable::builtin();
        let mut cat = table.profile_for("cat");
        cat.pain_hiding_factor = 0.75;
        table.extend([cat]);
        assert!((table.profile_for("cat").pain_hiding_factor - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_prey_species_hide_more_than_predators() {
        let table = SpeciesTable::builtin();
        let rabbit = table.profile_for("rabbit");
        let dog = table.profile_for("dog");
        assert!(rabbit.pain_hiding_factor > dog.pain_hiding_factor);
    }

    #[test]
    fn test_profile_ranges_are_ordered() {
        let table = SpeciesTable::builtin();
        for id in ["cat", "dog", "rabbit", "horse", "bird"] {
            let p = table.profile_for(id);
            assert!(
                p.vocal_frequency_range.0 < p.vocal_frequency_range.1,
                "vocal range inverted for {}",
                id
            );
            assert!(p.typical_respiration_range.0 < p.typical_respiration_range.1);
            assert!(p.typical_heart_rate_range.0 < p.typical_heart_rate_range.1);
        }
    }
}
