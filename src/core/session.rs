//! Fusion session: one monitored patient, one signal buffer, one lifecycle
//!
//! Sessions are independently owned units - no shared state between
//! sessions, no global registry. Within a session, ingest calls may arrive
//! concurrently from independent producer threads (vision pipeline, audio
//! pipeline); the state lock is held across buffer operations so a
//! concurrent close can never interleave with an in-flight ingest.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Instant;

use crate::config::EngineConfig;
use crate::core::{BayesianFuser, SignalBuffer, TriageClassifier};
use crate::error::{Error, Result};
use crate::types::{PainAssessment, SessionState, SignalRecord, SpeciesProfile};

/// Identity and provenance of a monitoring session
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    pub species_id: String,
    pub patient_id: Option<String>,
    /// Opaque deployment metadata, not interpreted by the core
    pub metadata: HashMap<String, serde_json::Value>,
}

impl SessionContext {
    /// Context without a patient id
    pub fn new(session_id: impl Into<String>, species_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            species_id: species_id.into(),
            patient_id: None,
            metadata: HashMap::new(),
        }
    }

    /// Attach a patient id (builder style, consumes self)
    pub fn with_patient(mut self, patient_id: impl Into<String>) -> Self {
        self.patient_id = Some(patient_id.into());
        self
    }
}

/// One monitoring session: CREATED → ACTIVE → CLOSED
///
/// All methods take `&self`; a session can be shared across producer
/// threads behind an `Arc`.
#[derive(Debug)]
pub struct FusionSession {
    context: SessionContext,
    profile: SpeciesProfile,
    state: RwLock<SessionState>,
    buffer: SignalBuffer,
    fuser: BayesianFuser,
    classifier: TriageClassifier,
}

impl FusionSession {
    /// Session with default calibration and the built-in species table
    pub fn new(context: SessionContext) -> Self {
        Self::with_config(context, &EngineConfig::default())
    }

    /// Session with deployment calibration
    ///
    /// The species profile is resolved here, once; an unknown species gets
    /// the fallback profile and a warning, never an error.
    pub fn with_config(context: SessionContext, config: &EngineConfig) -> Self {
        let table = config.species_table();
        if !table.is_calibrated(&context.species_id) {
            tracing::warn!(
                session_id = %context.session_id,
                species_id = %context.species_id,
                "no calibration for species, using fallback profile"
            );
        }
        let profile = table.profile_for(&context.species_id);
        tracing::info!(
            session_id = %context.session_id,
            species_id = %context.species_id,
            "session created"
        );
        Self {
            profile,
            state: RwLock::new(SessionState::Created),
            buffer: SignalBuffer::with_staleness_window(config.staleness_window()),
            fuser: BayesianFuser::with_calibration(config.fusion.clone()),
            classifier: TriageClassifier::with_calibration(config.triage.clone()),
            context,
        }
    }

    /// Validate and buffer one observation
    ///
    /// The first accepted record transitions CREATED → ACTIVE. A record
    /// that fails validation never enters the buffer and does not activate
    /// the session.
    pub fn ingest(&self, record: SignalRecord) -> Result<()> {
        self.ingest_at(record, Instant::now())
    }

    /// Clock-injected ingest, for deterministic staleness tests
    pub fn ingest_at(&self, record: SignalRecord, now: Instant) -> Result<()> {
        record.validate()?;

        let mut state = self.state.write().unwrap();
        match *state {
            SessionState::Closed => {
                return Err(Error::SessionClosed(self.context.session_id.clone()))
            }
            SessionState::Created => {
                *state = SessionState::Active;
                tracing::info!(session_id = %self.context.session_id, "session active");
            }
            SessionState::Active => {}
        }
        tracing::debug!(
            session_id = %self.context.session_id,
            source = %record.source,
            normalized_value = record.normalized_value,
            confidence = record.confidence,
            "signal ingested"
        );
        self.buffer.ingest_at(record, now);
        Ok(())
    }

    /// Assess whatever the buffer currently holds
    ///
    /// Pure function of buffer state at call time: no blocking, no I/O,
    /// bounded work, suitable for once-per-frame invocation. Zero eligible
    /// signals yields the insufficient-signal sentinel, not an error -
    /// except on a closed session, which is terminal.
    pub fn assess(&self) -> Result<PainAssessment> {
        self.assess_at(Instant::now())
    }

    /// Clock-injected assess, for deterministic staleness tests
    pub fn assess_at(&self, now: Instant) -> Result<PainAssessment> {
        let state = self.state.read().unwrap();
        match *state {
            SessionState::Closed => {
                return Err(Error::SessionClosed(self.context.session_id.clone()))
            }
            // Zero signals is a legitimate transient state
            SessionState::Created => return Ok(PainAssessment::insufficient_signal()),
            SessionState::Active => {}
        }

        let snapshot = self.buffer.snapshot_at(now);
        let estimate = self.fuser.fuse(&snapshot);
        let assessment = match estimate.pain_probability {
            Some(probability) => {
                let level = self
                    .classifier
                    .classify(probability, estimate.confidence, &self.profile);
                PainAssessment::new(estimate, level)
            }
            None => PainAssessment::insufficient_signal(),
        };
        tracing::debug!(
            session_id = %self.context.session_id,
            pain_probability = ?assessment.pain_probability,
            confidence = assessment.confidence,
            triage_level = %assessment.triage_level,
            "assessment produced"
        );
        Ok(assessment)
    }

    /// Finalize the session and drop buffered signals
    ///
    /// Idempotent; only ingest/assess on a closed session are errors.
    pub fn close(&self) -> Result<()> {
        let mut state = self.state.write().unwrap();
        if *state == SessionState::Closed {
            return Ok(());
        }
        *state = SessionState::Closed;
        self.buffer.clear();
        tracing::info!(session_id = %self.context.session_id, "session closed");
        Ok(())
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        *self.state.read().unwrap()
    }

    /// Session identity
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// The species profile resolved at construction
    pub fn profile(&self) -> &SpeciesProfile {
        &self.profile
    }
}

// =============================================================================
// TESTS
// =============================================================================
