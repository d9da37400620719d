//! Step classification policy
//!
//! Consumes one step record at a time and decides between three outcomes:
//!
//! 1. **AbortEvent**: a primary is escaping the world with a multiplicity in
//!    the configured kill band; the event is not worth simulating further.
//! 2. **Record**: the step is a significant momentum-transfer interaction on
//!    a tracked primary outside any sensitive detector.
//! 3. **Ignore**: everything else.
//!
//! Classification is a pure function of the step and the event config; the
//! recorder applies the side effects (node insertion, multiplicity bump) when
//! the outcome is `Record`.

use crate::config::EventConfig;
use crate::step::{StepRecord, StepStatus, TRANSPORTATION};
use crate::tree::InteractionType;

// ═══════════════════════════════════════════════════════════════════════════════
// STEP OUTCOME
// ═══════════════════════════════════════════════════════════════════════════════

/// Decision produced for one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing to do for this step
    Ignore,
    /// Ask the engine to abort the in-flight event
    AbortEvent,
    /// Record an interaction node with the given tag
    Record(InteractionType),
}

impl StepOutcome {
    /// Whether this outcome records a node
    pub fn is_record(&self) -> bool {
        matches!(self, StepOutcome::Record(_))
    }

    /// Whether this outcome requests an event abort
    pub fn is_abort(&self) -> bool {
        matches!(self, StepOutcome::AbortEvent)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STEP CLASSIFIER
// ═══════════════════════════════════════════════════════════════════════════════

/// Stateless step-classification policy
#[derive(Debug, Clone, Copy, Default)]
pub struct StepClassifier;

impl StepClassifier {
    /// Create a classifier
    pub fn new() -> Self {
        Self
    }

    /// Classify one step against the event config
    ///
    /// Rules in order, first match wins:
    /// 1. world-escape abort (primaries leaving the world with an
    ///    uninteresting multiplicity, when the kill switch is on)
    /// 2. eligibility filter: pure transportation, secondaries, and
    ///    sensitive-detector hits are ignored, as are tracks without an
    ///    attached primary record (not tracked by this core)
    /// 3. momentum-transfer test against the configured threshold
    pub fn classify(&self, config: &EventConfig, step: &StepRecord) -> StepOutcome {
        if self.should_abort(config, step) {
            log::debug!(
                "abort: primary track {} escaping world with multiplicity in kill band",
                step.track_id
            );
            return StepOutcome::AbortEvent;
        }

        // Recording eligibility is evaluated independently of the abort check.
        if step.process == TRANSPORTATION {
            return StepOutcome::Ignore;
        }
        if !step.is_primary() {
            return StepOutcome::Ignore;
        }
        if step.in_sensitive_detector {
            return StepOutcome::Ignore;
        }
        let primary = match &step.primary {
            Some(handle) => handle,
            // missing record means the track is not one this core tracks
            None => return StepOutcome::Ignore,
        };

        let transfer = step.momentum_transfer();
        if transfer > config.allowed_momentum_transfer {
            log::trace!(
                "track {}: momentum transfer {:.6} above threshold {:.6} (multiplicity {})",
                step.track_id,
                transfer,
                config.allowed_momentum_transfer,
                primary.borrow().effective_multiplicity()
            );
            StepOutcome::Record(InteractionType::SecondaryParticle)
        } else {
            StepOutcome::Ignore
        }
    }

    fn should_abort(&self, config: &EventConfig, step: &StepRecord) -> bool {
        if !config.kill_events_escaping_world {
            return false;
        }
        if step.status != StepStatus::WorldBoundary || !step.is_primary() {
            return false;
        }
        match &step.primary {
            Some(handle) => {
                config.multiplicity_in_band(handle.borrow().effective_multiplicity())
            }
            None => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::Momentum3;
    use crate::step::primary_handle;

    fn interacting_step(track_id: i32, parent_id: i32) -> StepRecord {
        // |post|² − |pre|² = 0.05, well above the test threshold of 0.02
        StepRecord::new(
            track_id,
            parent_id,
            Momentum3::new(10.0_f64.sqrt(), 0.0, 0.0),
            Momentum3::new(10.05_f64.sqrt(), 0.0, 0.0),
            "compt",
        )
    }

    fn test_config() -> EventConfig {
        EventConfig::default().with_momentum_threshold(0.02)
    }

    #[test]
    fn test_transportation_always_ignored() {
        let classifier = StepClassifier::new();
        let config = test_config();
        let step = StepRecord::new(
            1,
            0,
            Momentum3::new(10.0, 0.0, 0.0),
            Momentum3::zero(),
            TRANSPORTATION,
        )
        .with_primary(primary_handle(2));
        assert_eq!(classifier.classify(&config, &step), StepOutcome::Ignore);
    }

    #[test]
    fn test_secondary_track_ignored() {
        let classifier = StepClassifier::new();
        let config = test_config();
        let step = interacting_step(12, 3).with_primary(primary_handle(2));
        assert_eq!(classifier.classify(&config, &step), StepOutcome::Ignore);
    }

    #[test]
    fn test_sensitive_detector_hit_ignored() {
        let classifier = StepClassifier::new();
        let config = test_config();
        let step = interacting_step(1, 0)
            .with_sensitive_detector()
            .with_primary(primary_handle(2));
        assert_eq!(classifier.classify(&config, &step), StepOutcome::Ignore);
    }

    #[test]
    fn test_missing_record_is_not_an_error() {
        let classifier = StepClassifier::new();
        let config = test_config();
        let step = interacting_step(1, 0);
        assert_eq!(classifier.classify(&config, &step), StepOutcome::Ignore);
    }

    #[test]
    fn test_momentum_transfer_above_threshold_records() {
        let classifier = StepClassifier::new();
        let config = test_config();
        let step = interacting_step(1, 0).with_primary(primary_handle(2));
        assert_eq!(
            classifier.classify(&config, &step),
            StepOutcome::Record(InteractionType::SecondaryParticle)
        );
    }

    #[test]
    fn test_momentum_transfer_below_threshold_ignored() {
        let classifier = StepClassifier::new();
        let config = EventConfig::default().with_momentum_threshold(0.1);
        let step = interacting_step(1, 0).with_primary(primary_handle(2));
        assert_eq!(classifier.classify(&config, &step), StepOutcome::Ignore);
    }

    #[test]
    fn test_classify_is_pure() {
        let classifier = StepClassifier::new();
        let config = test_config();
        let handle = primary_handle(2);
        let step = interacting_step(1, 0).with_primary(handle.clone());

        classifier.classify(&config, &step);
        classifier.classify(&config, &step);
        // classification alone never mutates the record
        assert_eq!(handle.borrow().effective_multiplicity(), 2);
    }

    #[test]
    fn test_escape_abort_in_band() {
        let classifier = StepClassifier::new();
        let config = EventConfig::default().with_escape_band(2, 5, 4);
        let step = StepRecord::new(
            1,
            0,
            Momentum3::new(1.0, 0.0, 0.0),
            Momentum3::new(1.0, 0.0, 0.0),
            TRANSPORTATION,
        )
        .with_status(StepStatus::WorldBoundary)
        .with_primary(primary_handle(3));
        assert_eq!(classifier.classify(&config, &step), StepOutcome::AbortEvent);
    }

    #[test]
    fn test_escape_abort_excluded_point() {
        let classifier = StepClassifier::new();
        let config = EventConfig::default().with_escape_band(2, 5, 4);
        let step = StepRecord::new(
            1,
            0,
            Momentum3::new(1.0, 0.0, 0.0),
            Momentum3::new(1.0, 0.0, 0.0),
            TRANSPORTATION,
        )
        .with_status(StepStatus::WorldBoundary)
        .with_primary(primary_handle(4));
        assert_eq!(classifier.classify(&config, &step), StepOutcome::Ignore);
    }

    #[test]
    fn test_escape_abort_out_of_band() {
        let classifier = StepClassifier::new();
        let config = EventConfig::default().with_escape_band(2, 5, 4);
        for multiplicity in [0, 1, 6, 13] {
            let step = StepRecord::new(
                1,
                0,
                Momentum3::new(1.0, 0.0, 0.0),
                Momentum3::new(1.0, 0.0, 0.0),
                TRANSPORTATION,
            )
            .with_status(StepStatus::WorldBoundary)
            .with_primary(primary_handle(multiplicity));
            assert_eq!(
                classifier.classify(&config, &step),
                StepOutcome::Ignore,
                "multiplicity {} must not abort",
                multiplicity
            );
        }
    }

    #[test]
    fn test_escape_abort_requires_kill_switch() {
        let classifier = StepClassifier::new();
        let mut config = EventConfig::default().with_escape_band(2, 5, 4);
        config.kill_events_escaping_world = false;
        let step = StepRecord::new(
            1,
            0,
            Momentum3::new(1.0, 0.0, 0.0),
            Momentum3::new(1.0, 0.0, 0.0),
            TRANSPORTATION,
        )
        .with_status(StepStatus::WorldBoundary)
        .with_primary(primary_handle(3));
        assert_eq!(classifier.classify(&config, &step), StepOutcome::Ignore);
    }

    #[test]
    fn test_escape_abort_requires_world_boundary_and_primary() {
        let classifier = StepClassifier::new();
        let config = EventConfig::default().with_escape_band(2, 5, 4);

        let interior = StepRecord::new(
            1,
            0,
            Momentum3::new(1.0, 0.0, 0.0),
            Momentum3::new(1.0, 0.0, 0.0),
            TRANSPORTATION,
        )
        .with_primary(primary_handle(3));
        assert_eq!(classifier.classify(&config, &interior), StepOutcome::Ignore);

        let secondary = StepRecord::new(
            8,
            1,
            Momentum3::new(1.0, 0.0, 0.0),
            Momentum3::new(1.0, 0.0, 0.0),
            TRANSPORTATION,
        )
        .with_status(StepStatus::WorldBoundary)
        .with_primary(primary_handle(3));
        assert_eq!(classifier.classify(&config, &secondary), StepOutcome::Ignore);
    }

    #[test]
    fn test_escape_abort_without_record_ignored() {
        let classifier = StepClassifier::new();
        let config = EventConfig::default().with_escape_band(2, 5, 4);
        let step = StepRecord::new(
            1,
            0,
            Momentum3::new(1.0, 0.0, 0.0),
            Momentum3::new(1.0, 0.0, 0.0),
            TRANSPORTATION,
        )
        .with_status(StepStatus::WorldBoundary);
        assert_eq!(classifier.classify(&config, &step), StepOutcome::Ignore);
    }
}
