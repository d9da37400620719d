//! Event recorder facade
//!
//! The handle the transport engine actually holds. Owns the event's decay
//! graph and the registry of primary-particle records, allocates node IDs,
//! forwards every step to the classifier, and applies the side effects of a
//! `Record` outcome: one node appended to the primary's branch and one +10
//! bump on the primary's multiplicity.
//!
//! ```text
//! engine ──► on_step(record) ──► StepClassifier::classify
//!                │                        │
//!                │   Record(tag)          ▼
//!                ├──────────────► DecayGraph::add_node_to_branch
//!                │                PrimaryParticleInfo::register_interaction
//!                │   AbortEvent
//!                └──────────────► abort_requested = true  (engine tears down)
//! ```
//!
//! The recorder holds no state across events beyond its config: `begin_event`
//! clears the graph, the registry, and the node-ID counter.

use std::collections::HashMap;

use crate::classifier::{StepClassifier, StepOutcome};
use crate::config::EventConfig;
use crate::step::{primary_handle, PrimaryHandle, StepRecord};
use crate::tree::{BranchId, DecayGraph, GraphStats, NodeId, TrackId};
use crate::TrackerResult;

/// Per-event bookkeeping facade around the classifier and the decay graph
#[derive(Debug)]
pub struct EventRecorder {
    config: EventConfig,
    classifier: StepClassifier,
    graph: DecayGraph,
    primaries: HashMap<TrackId, PrimaryHandle>,
    next_node_id: NodeId,
    steps_seen: u64,
    nodes_recorded: u64,
    abort_requested: bool,
}

impl Default for EventRecorder {
    fn default() -> Self {
        Self::new(EventConfig::default())
    }
}

impl EventRecorder {
    /// Create a recorder with the given event config
    pub fn new(config: EventConfig) -> Self {
        Self {
            config,
            classifier: StepClassifier::new(),
            graph: DecayGraph::new(),
            primaries: HashMap::new(),
            next_node_id: 1,
            steps_seen: 0,
            nodes_recorded: 0,
            abort_requested: false,
        }
    }

    fn allocate_node_id(&mut self) -> NodeId {
        let id = self.next_node_id;
        self.next_node_id += 1;
        id
    }

    /// Attach a fresh record to a primary track at generation time
    ///
    /// Returns the handle the engine should carry on that track's step
    /// records. Registering the same track again replaces its record.
    pub fn register_primary(
        &mut self,
        track_id: TrackId,
        gamma_multiplicity: i32,
    ) -> PrimaryHandle {
        let handle = primary_handle(gamma_multiplicity);
        self.primaries.insert(track_id, handle.clone());
        handle
    }

    /// Record handle for a registered primary track
    pub fn primary(&self, track_id: TrackId) -> Option<PrimaryHandle> {
        self.primaries.get(&track_id).cloned()
    }

    /// Consume one step: classify it and apply any side effects
    pub fn on_step(&mut self, step: &StepRecord) -> StepOutcome {
        self.steps_seen += 1;
        let outcome = self.classifier.classify(&self.config, step);
        match outcome {
            StepOutcome::AbortEvent => {
                self.abort_requested = true;
                log::info!(
                    "event abort requested: primary track {} escaping world",
                    step.track_id
                );
            }
            StepOutcome::Record(interaction) => {
                let node_id = self.allocate_node_id();
                match self.graph.add_node_to_branch(node_id, step.track_id, interaction) {
                    Ok(()) => {
                        if let Some(primary) = &step.primary {
                            primary.borrow_mut().register_interaction();
                        }
                        self.nodes_recorded += 1;
                        log::debug!(
                            "node {} recorded on track {} ({})",
                            node_id,
                            step.track_id,
                            interaction.name()
                        );
                    }
                    Err(e) => {
                        // allocator-issued IDs never collide; reaching this
                        // means the graph was mutated behind the recorder
                        log::error!("dropping node {} for track {}: {}", node_id, step.track_id, e);
                        return StepOutcome::Ignore;
                    }
                }
            }
            StepOutcome::Ignore => {}
        }
        outcome
    }

    /// Declare that `parent_track` spawned `child_track`
    ///
    /// The child's branch forks from the parent's, so primary-photon lookups
    /// on the child resolve through the parent chain.
    pub fn register_fork(
        &mut self,
        child_track: TrackId,
        parent_track: TrackId,
    ) -> TrackerResult<BranchId> {
        self.graph.register_fork(child_track, parent_track)
    }

    /// Whether an abort was requested during this event
    pub fn abort_requested(&self) -> bool {
        self.abort_requested
    }

    /// Event-boundary reset: graph, registry, counters
    pub fn begin_event(&mut self) {
        self.graph.clean();
        self.primaries.clear();
        self.next_node_id = 1;
        self.steps_seen = 0;
        self.nodes_recorded = 0;
        self.abort_requested = false;
        log::debug!("event reset");
    }

    /// The event's decay graph
    pub fn graph(&self) -> &DecayGraph {
        &self.graph
    }

    /// The event config in force
    pub fn config(&self) -> &EventConfig {
        &self.config
    }

    /// Steps consumed since the last reset
    pub fn steps_seen(&self) -> u64 {
        self.steps_seen
    }

    /// Nodes recorded since the last reset
    pub fn nodes_recorded(&self) -> u64 {
        self.nodes_recorded
    }

    /// Structural counts of the current forest
    pub fn stats(&self) -> GraphStats {
        self.graph.stats()
    }

    /// One-line event summary
    pub fn summary(&self) -> String {
        format!(
            "{} steps seen, {} nodes recorded, {}{}",
            self.steps_seen,
            self.nodes_recorded,
            self.graph.stats(),
            if self.abort_requested {
                " [abort requested]"
            } else {
                ""
            }
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
