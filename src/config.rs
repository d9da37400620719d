//! Event-scoped classification configuration
//!
//! Supplied once per event or run by the engine's command layer. The fields
//! mirror the recognized external options: the world-escape kill switch, the
//! registered-multiplicity band with its one excluded point, and the
//! momentum-transfer threshold (in momentum-squared units).

use serde::{Deserialize, Serialize};

/// Configuration consulted by the step classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    /// Abort events whose primaries escape the world without interacting
    pub kill_events_escaping_world: bool,
    /// Lower bound (inclusive) of the registered-multiplicity band
    pub min_reg_multiplicity: i32,
    /// Upper bound (inclusive) of the registered-multiplicity band
    pub max_reg_multiplicity: i32,
    /// Single multiplicity value excluded from the band
    pub excluded_multiplicity: i32,
    /// Momentum-transfer threshold above which a step is recorded
    pub allowed_momentum_transfer: f64,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            kill_events_escaping_world: false,
            min_reg_multiplicity: 1,
            max_reg_multiplicity: 9,
            excluded_multiplicity: -1,
            allowed_momentum_transfer: 1e-4,
        }
    }
}

impl EventConfig {
    /// Config with all classification switched off (every step ignored)
    pub fn disabled() -> Self {
        Self {
            kill_events_escaping_world: false,
            allowed_momentum_transfer: f64::INFINITY,
            ..Default::default()
        }
    }

    /// Enable world-escape killing for the given multiplicity band
    pub fn with_escape_band(mut self, min: i32, max: i32, excluded: i32) -> Self {
        self.kill_events_escaping_world = true;
        self.min_reg_multiplicity = min;
        self.max_reg_multiplicity = max;
        self.excluded_multiplicity = excluded;
        self
    }

    /// Set the momentum-transfer threshold
    pub fn with_momentum_threshold(mut self, threshold: f64) -> Self {
        self.allowed_momentum_transfer = threshold;
        self
    }

    /// Whether a multiplicity falls in the kill band:
    /// `min ≤ m ≤ max` and `m ≠ excluded`
    pub fn multiplicity_in_band(&self, multiplicity: i32) -> bool {
        multiplicity >= self.min_reg_multiplicity
            && multiplicity <= self.max_reg_multiplicity
            && multiplicity != self.excluded_multiplicity
    }
}
