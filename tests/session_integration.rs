//! Integration tests for session lifecycle, staleness, and concurrency

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use vetfuse::core::{FusionSession, SessionContext};
use vetfuse::error::Error;
use vetfuse::types::{RawValue, SessionState, SignalRecord, SignalSource};

fn signal(source: SignalSource, value: f64, confidence: f64) -> SignalRecord {
    SignalRecord::new(source, "cat", RawValue::Scalar(value), value, confidence, 0.0).unwrap()
}

/// CREATED → ACTIVE → CLOSED, with the right operations at each stage
#[test]
fn test_lifecycle_progression() {
    let session = FusionSession::new(SessionContext::new("life", "cat"));
    assert_eq!(session.state(), SessionState::Created);

    // assess in CREATED: sentinel, not an error
    assert!(!session.assess().unwrap().has_signal());

    session.ingest(signal(SignalSource::VisionGrimace, 0.4, 0.8)).unwrap();
    assert_eq!(session.state(), SessionState::Active);

    session.close().unwrap();
    assert_eq!(session.state(), SessionState::Closed);

    assert!(matches!(
        session.ingest(signal(SignalSource::AudioVocal, 0.2, 0.5)),
        Err(Error::SessionClosed(_))
    ));
    assert!(matches!(session.assess(), Err(Error::SessionClosed(_))));
}

/// A record past the staleness window is excluded from the next assess
#[test]
fn test_stale_record_excluded_from_assessment() {
    let session = FusionSession::new(SessionContext::new("stale", "cat"));
    let t0 = Instant::now();

    session
        .ingest_at(signal(SignalSource::VisionGrimace, 0.8, 0.9), t0)
        .unwrap();

    // Inside the 10 s window
    let fresh = session.assess_at(t0 + Duration::from_secs(5)).unwrap();
    assert!(fresh.has_signal());

    // Past the window: explicit "no current signal", not an error and not 0.0
    let late = session.assess_at(t0 + Duration::from_secs(11)).unwrap();
    assert!(!late.has_signal());
    assert_eq!(late.pain_probability, None);
}

/// Only the stale source drops out; fresh sources keep contributing
#[test]
fn test_partial_staleness() {
    let session = FusionSession::new(SessionContext::new("partial", "cat"));
    let t0 = Instant::now();

    session
        .ingest_at(signal(SignalSource::VisionGrimace, 0.8, 0.9), t0)
        .unwrap();
    session
        .ingest_at(signal(SignalSource::AudioVocal, 0.4, 0.7), t0 + Duration::from_secs(8))
        .unwrap();

    let assessment = session.assess_at(t0 + Duration::from_secs(12)).unwrap();
    assert_eq!(assessment.sources, vec![SignalSource::AudioVocal]);
    assert!((assessment.pain_probability.unwrap() - 0.4).abs() < 1e-9);
}

/// Concurrent producers and an assessor never observe inconsistent state
#[test]
fn test_concurrent_ingest_and_assess() {
    let session = Arc::new(FusionSession::new(SessionContext::new("conc", "cat")));
    let mut handles = Vec::new();

    // Vision and audio pipelines running in parallel
    for (source, base) in [
        (SignalSource::VisionGrimace, 0.3),
        (SignalSource::VisionVitals, 0.4),
        (SignalSource::AudioVocal, 0.5),
        (SignalSource::AudioBreathing, 0.6),
    ] {
        let session = Arc::clone(&session);
        handles.push(thread::spawn(move || {
            for i in 0..200 {
                let value = (base + (i % 4) as f64 * 0.05).min(1.0);
                session
                    .ingest(signal(source, value, 0.8))
                    .expect("ingest should succeed while active");
            }
        }));
    }

    for _ in 0..200 {
        let assessment = session.assess().unwrap();
        if let Some(p) = assessment.pain_probability {
            assert!((0.0..=1.0).contains(&p), "probability {} out of range", p);
            assert!((0.0..=1.0).contains(&assessment.confidence));
            assert!(!assessment.sources.is_empty());
        }
    }

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(session.state(), SessionState::Active);
}

/// Sessions share nothing: signals in one never appear in another
#[test]
fn test_sessions_are_isolated() {
    let a = FusionSession::new(SessionContext::new("iso-a", "cat"));
    let b = FusionSession::new(SessionContext::new("iso-b", "cat"));

    a.ingest(signal(SignalSource::VisionGrimace, 0.9, 0.9)).unwrap();

    assert!(a.assess().unwrap().has_signal());
    assert!(!b.assess().unwrap().has_signal());
    assert_eq!(b.state(), SessionState::Created);
}

/// Closing one session leaves parallel sessions untouched
#[test]
fn test_close_does_not_leak_across_sessions() {
    let a = FusionSession::new(SessionContext::new("close-a", "dog"));
    let b = FusionSession::new(SessionContext::new("close-b", "dog"));

    a.ingest(signal(SignalSource::AudioVocal, 0.5, 0.8)).unwrap();
    b.ingest(signal(SignalSource::AudioVocal, 0.5, 0.8)).unwrap();

    a.close().unwrap();
    assert!(matches!(a.assess(), Err(Error::SessionClosed(_))));
    assert!(b.assess().unwrap().has_signal());
}

/// A close racing concurrent ingests ends with a consistent terminal state
#[test]
fn test_concurrent_close() {
    let session = Arc::new(FusionSession::new(SessionContext::new("race", "cat")));
    session.ingest(signal(SignalSource::VisionGrimace, 0.5, 0.8)).unwrap();

    let mut handles = Vec::new();
    for _ in 0..4 {
        let session = Arc::clone(&session);
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                // Ok while active, SessionClosed afterwards; nothing else
                match session.ingest(signal(SignalSource::AudioVocal, 0.4, 0.6)) {
                    Ok(()) | Err(Error::SessionClosed(_)) => {}
                    Err(e) => panic!("unexpected error: {}", e),
                }
            }
        }));
    }
    session.close().unwrap();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(session.state(), SessionState::Closed);
    assert!(matches!(session.assess(), Err(Error::SessionClosed(_))));
}
