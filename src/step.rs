//! Step records and primary-particle bookkeeping
//!
//! One `StepRecord` is produced by the transport engine for every discrete
//! segment of simulated particle transport. The record carries everything the
//! classifier needs: track identity, pre/post momenta, the process that ended
//! the step, the post-step volume's sensitive-detector flag, the boundary
//! status, and, for tracks descending from a tracked primary, a handle to
//! the primary particle's mutable record.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::kinematics::{momentum_transfer, Momentum3};
use crate::tree::TrackId;

/// Process name the engine assigns to pure-movement steps
pub const TRANSPORTATION: &str = "Transportation";

// ═══════════════════════════════════════════════════════════════════════════════
// STEP STATUS
// ═══════════════════════════════════════════════════════════════════════════════

/// Post-step boundary status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepStatus {
    /// Step ended inside a volume
    Interior,
    /// Step ended on a geometry boundary between volumes
    GeometryBoundary,
    /// Step ended on the world boundary (the track is leaving the setup)
    WorldBoundary,
}

impl StepStatus {
    /// Get a human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            StepStatus::Interior => "interior",
            StepStatus::GeometryBoundary => "geometry boundary",
            StepStatus::WorldBoundary => "world boundary",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PRIMARY PARTICLE RECORD
// ═══════════════════════════════════════════════════════════════════════════════

/// Mutable record attached to a primary track for the lifetime of one event
///
/// The generated-photon count and the recorded-interaction count are kept as
/// two explicit fields. The externally observable multiplicity is
/// `gamma_multiplicity + 10 * recorded_interactions`, so a primary that has
/// interacted reads ≥ 10 and a pristine one reads its generation count 0..9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryParticleInfo {
    gamma_multiplicity: i32,
    recorded_interactions: u32,
}

impl PrimaryParticleInfo {
    /// Create a record with the generation-time photon count
    pub fn new(gamma_multiplicity: i32) -> Self {
        Self {
            gamma_multiplicity,
            recorded_interactions: 0,
        }
    }

    /// Generated-photon count set at generation time
    pub fn gamma_multiplicity(&self) -> i32 {
        self.gamma_multiplicity
    }

    /// Number of qualifying momentum-transfer interactions recorded so far
    pub fn recorded_interactions(&self) -> u32 {
        self.recorded_interactions
    }

    /// The observable multiplicity: generation count plus 10 per interaction
    ///
    /// Monotonically non-decreasing within one event; every qualifying
    /// interaction moves it up by exactly 10.
    pub fn effective_multiplicity(&self) -> i32 {
        self.gamma_multiplicity + 10 * self.recorded_interactions as i32
    }

    /// Count one qualifying interaction (+10 on the observable multiplicity)
    pub fn register_interaction(&mut self) {
        self.recorded_interactions += 1;
    }

    /// Whether any qualifying interaction has been recorded
    pub fn has_interacted(&self) -> bool {
        self.recorded_interactions > 0
    }
}

/// Shared handle to a primary's record
///
/// The event owns the records through the recorder's registry; step records
/// carry a clone of the handle. One event in flight at a time, so `Rc` is
/// sufficient.
pub type PrimaryHandle = Rc<RefCell<PrimaryParticleInfo>>;

// ═══════════════════════════════════════════════════════════════════════════════
// STEP RECORD
// ═══════════════════════════════════════════════════════════════════════════════

/// One discrete transport step, as reported by the engine
#[derive(Debug, Clone)]
pub struct StepRecord {
    /// ID of the track that took this step
    pub track_id: TrackId,
    /// Parent track ID; 0 denotes a primary
    pub parent_id: TrackId,
    /// Kinetic momentum at the pre-step point
    pub pre_momentum: Momentum3,
    /// Kinetic momentum at the post-step point
    pub post_momentum: Momentum3,
    /// Name of the process that defined the post-step point
    pub process: String,
    /// Whether the post-step volume has an attached sensitive detector
    pub in_sensitive_detector: bool,
    /// Post-step boundary status
    pub status: StepStatus,
    /// Handle to the primary's record, when this track descends from a
    /// tracked primary; `None` means the track is not one this core tracks
    pub primary: Option<PrimaryHandle>,
}

impl StepRecord {
    /// Create a step record with interior status and no detector hit
    pub fn new(
        track_id: TrackId,
        parent_id: TrackId,
        pre_momentum: Momentum3,
        post_momentum: Momentum3,
        process: impl Into<String>,
    ) -> Self {
        Self {
            track_id,
            parent_id,
            pre_momentum,
            post_momentum,
            process: process.into(),
            in_sensitive_detector: false,
            status: StepStatus::Interior,
            primary: None,
        }
    }

    /// Set the post-step boundary status
    pub fn with_status(mut self, status: StepStatus) -> Self {
        self.status = status;
        self
    }

    /// Flag the post-step volume as sensitive-detector
    pub fn with_sensitive_detector(mut self) -> Self {
        self.in_sensitive_detector = true;
        self
    }

    /// Attach the primary's record handle
    pub fn with_primary(mut self, primary: PrimaryHandle) -> Self {
        self.primary = Some(primary);
        self
    }

    /// Whether this step belongs to a primary track (parent ID 0)
    pub fn is_primary(&self) -> bool {
        self.parent_id == 0
    }

    /// Momentum transfer across this step: `| |p_post|² − |p_pre|² |`
    pub fn momentum_transfer(&self) -> f64 {
        momentum_transfer(&self.pre_momentum, &self.post_momentum)
    }
}

/// Create a fresh primary record handle
pub fn primary_handle(gamma_multiplicity: i32) -> PrimaryHandle {
    Rc::new(RefCell::new(PrimaryParticleInfo::new(gamma_multiplicity)))
}
