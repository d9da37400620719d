//! # Decay Tracker
//!
//! Step-classification and decay-tree bookkeeping core for particle-transport
//! simulations. The surrounding transport engine calls into this crate once
//! per simulated step and once per event; the crate answers with a
//! classification decision and incrementally builds a forest of per-primary
//! decay trees.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     TRANSPORT ENGINE (external)             │
//! │   physics processes · geometry · RNG · run/event control    │
//! └───────────────┬─────────────────────────────────────────────┘
//!                 │ one StepRecord per step, reset per event
//!                 ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  EventRecorder                                              │
//! │  ┌───────────────────┐        ┌─────────────────────────┐   │
//! │  │  StepClassifier    │──────► │  DecayGraph             │   │
//! │  │  · escape abort    │ Record │  · branches (arena)     │   │
//! │  │  · eligibility     │        │  · track→branch index   │   │
//! │  │  · Δ|p|² threshold │        │  · node→branch index    │   │
//! │  └───────────────────┘        └─────────────────────────┘   │
//! │          │                                                  │
//! │          └── AbortEvent ──► engine tears down the event     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use decay_tracker::{EventConfig, EventRecorder, Momentum3, StepRecord};
//!
//! let mut recorder = EventRecorder::new(
//!     EventConfig::default().with_momentum_threshold(0.02),
//! );
//!
//! // engine attaches a record to each primary at generation time
//! let primary = recorder.register_primary(1, 2);
//!
//! // one call per transport step
//! let step = StepRecord::new(
//!     1,
//!     0,
//!     Momentum3::new(10.0_f64.sqrt(), 0.0, 0.0),
//!     Momentum3::new(10.05_f64.sqrt(), 0.0, 0.0),
//!     "compt",
//! )
//! .with_primary(primary);
//! let outcome = recorder.on_step(&step);
//! assert!(outcome.is_record());
//! ```

// Core modules
pub mod classifier;
pub mod config;
pub mod error;
pub mod kinematics;
pub mod recorder;
pub mod step;
pub mod tree;


// Re-exports
pub use classifier::{StepClassifier, StepOutcome};
pub use config::EventConfig;
pub use error::TrackerError;
pub use kinematics::{momentum_transfer, Momentum3};
pub use recorder::EventRecorder;
pub use step::{
    primary_handle, PrimaryHandle, PrimaryParticleInfo, StepRecord, StepStatus, TRANSPORTATION,
};
pub use tree::{Branch, BranchId, DecayGraph, GraphStats, InteractionType, NodeId, TrackId};

/// Convenience alias for `Result<T, TrackerError>`
pub type TrackerResult<T> = std::result::Result<T, TrackerError>;
