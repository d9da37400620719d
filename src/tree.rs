//! Decay-tree forest: branches, nodes, and ancestry resolution
//!
//! The interaction history of one simulated event is a forest: every tracked
//! particle owns one *branch*, and each recorded interaction appends a *node*
//! to that branch in temporal order. A branch spawned by a secondary particle
//! remembers the branch it forked from, so the primary photon behind any node
//! can be recovered by walking the fork chain to a root.
//!
//! ```text
//!   track 1 (root)     track 2 (root)
//!   ┌──────────────┐   ┌──────────────┐
//!   │ n1 → n3 → n5 │   │ n2 → n4      │
//!   └──────┬───────┘   └──────────────┘
//!          │ fork
//!   ┌──────▼───────┐
//!   │ track 9: n7  │   find_primary_photon(n7) == 1
//!   └──────────────┘
//! ```
//!
//! Branches live in an arena keyed by index, with a track→branch map and a
//! node→branch map alongside. No pointer links, so incremental growth never
//! dangles and the whole structure serializes cleanly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::TrackerResult;

/// Track identifier assigned by the transport engine; parent ID 0 = primary
pub type TrackId = i32;

/// Node identifier, monotonically assigned within one event
pub type NodeId = i32;

/// Index of a branch in the graph's arena
pub type BranchId = usize;

// ═══════════════════════════════════════════════════════════════════════════════
// INTERACTION TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// Kind of interaction a node records
///
/// The step classifier currently only produces `SecondaryParticle`; the other
/// tags exist for collaborators that discriminate scatter categories when
/// filling the tree.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionType {
    /// Unscattered primary gamma
    PrimaryGamma,
    /// Scatter inside the active medium
    ScatteredActiveMedium,
    /// Scatter inside passive material
    ScatteredPassiveMedium,
    /// Interaction that spawned or involved a secondary particle
    SecondaryParticle,
    /// Tag not determined
    Unknown,
}

impl InteractionType {
    /// Get a human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            InteractionType::PrimaryGamma => "primary gamma",
            InteractionType::ScatteredActiveMedium => "scattered in active medium",
            InteractionType::ScatteredPassiveMedium => "scattered in passive medium",
            InteractionType::SecondaryParticle => "secondary particle",
            InteractionType::Unknown => "unknown",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BRANCH
// ═══════════════════════════════════════════════════════════════════════════════

/// Ordered history of recorded interaction nodes belonging to one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// ID of the track corresponding to this branch
    track_id: TrackId,
    /// Node IDs in insertion order (temporal order along the track)
    node_ids: Vec<NodeId>,
    /// Interaction tags, parallel to `node_ids`
    interactions: Vec<InteractionType>,
    /// Branch this one forked from; `None` for a branch coming directly
    /// from a primary
    primary_branch_id: Option<BranchId>,
}

impl Branch {
    fn new(track_id: TrackId, primary_branch_id: Option<BranchId>) -> Self {
        Self {
            track_id,
            node_ids: Vec::new(),
            interactions: Vec::new(),
            primary_branch_id,
        }
    }

    fn add_node(&mut self, node_id: NodeId, interaction: InteractionType) {
        self.node_ids.push(node_id);
        self.interactions.push(interaction);
    }

    /// Track this branch belongs to
    pub fn track_id(&self) -> TrackId {
        self.track_id
    }

    /// Branch this one forked from, if any
    pub fn primary_branch_id(&self) -> Option<BranchId> {
        self.primary_branch_id
    }

    /// First node recorded on this branch
    pub fn primary_node_id(&self) -> Option<NodeId> {
        self.node_ids.first().copied()
    }

    /// Most recently recorded node
    pub fn last_node_id(&self) -> Option<NodeId> {
        self.node_ids.last().copied()
    }

    /// Node preceding `node_id` on this branch, `None` if it is the first
    /// or does not belong here
    pub fn previous_node_id(&self, node_id: NodeId) -> Option<NodeId> {
        let pos = self.node_ids.iter().position(|&n| n == node_id)?;
        if pos == 0 {
            None
        } else {
            Some(self.node_ids[pos - 1])
        }
    }

    /// Interaction tag recorded for `node_id`
    pub fn interaction_of(&self, node_id: NodeId) -> Option<InteractionType> {
        let pos = self.node_ids.iter().position(|&n| n == node_id)?;
        Some(self.interactions[pos])
    }

    /// Node IDs in temporal order
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    /// Number of nodes on this branch
    pub fn len(&self) -> usize {
        self.node_ids.len()
    }

    /// Whether this branch has no nodes yet
    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DECAY GRAPH
// ═══════════════════════════════════════════════════════════════════════════════

/// Forest of decay branches for one simulated event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecayGraph {
    branches: Vec<Branch>,
    track_branch: HashMap<TrackId, BranchId>,
    node_branch: HashMap<NodeId, BranchId>,
}

impl DecayGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node to the branch owning `track_id`
    ///
    /// A track seen for the first time gets a fresh root branch
    /// (`primary_branch_id = None`). Rejects a `node_id` that is already
    /// owned by a branch: every node belongs to exactly one branch.
    pub fn add_node_to_branch(
        &mut self,
        node_id: NodeId,
        track_id: TrackId,
        interaction: InteractionType,
    ) -> TrackerResult<()> {
        if self.node_branch.contains_key(&node_id) {
            return Err(TrackerError::DuplicateNode(node_id));
        }
        let branch_id = match self.track_branch.get(&track_id) {
            Some(&id) => id,
            None => self.create_branch(track_id, None),
        };
        self.branches[branch_id].add_node(node_id, interaction);
        self.node_branch.insert(node_id, branch_id);
        Ok(())
    }

    /// Create an empty branch for `child_track`, forked from the branch
    /// owning `parent_track`
    ///
    /// Called by whoever spawned the secondary, before any node lands on the
    /// child track. A track already bound to a branch keeps it for the whole
    /// event, so rebinding is rejected.
    pub fn register_fork(
        &mut self,
        child_track: TrackId,
        parent_track: TrackId,
    ) -> TrackerResult<BranchId> {
        if self.track_branch.contains_key(&child_track) {
            return Err(TrackerError::TrackAlreadyBound(child_track));
        }
        let parent_branch = *self
            .track_branch
            .get(&parent_track)
            .ok_or(TrackerError::TrackNotFound(parent_track))?;
        Ok(self.create_branch(child_track, Some(parent_branch)))
    }

    fn create_branch(&mut self, track_id: TrackId, parent: Option<BranchId>) -> BranchId {
        let id = self.branches.len();
        self.branches.push(Branch::new(track_id, parent));
        self.track_branch.insert(track_id, id);
        id
    }

    /// Resolve the primary photon behind `node_id`
    ///
    /// Walks the fork chain from the owning branch up to a root and returns
    /// the root's track ID. The walk is bounded by the number of branches in
    /// the event; exceeding it means the ancestry is cyclic, which indicates
    /// a prior structural bug rather than a normal runtime condition.
    pub fn find_primary_photon(&self, node_id: NodeId) -> TrackerResult<TrackId> {
        let mut branch_id = *self
            .node_branch
            .get(&node_id)
            .ok_or(TrackerError::NodeNotFound(node_id))?;
        let mut hops = 0usize;
        loop {
            match self.branches[branch_id].primary_branch_id {
                None => return Ok(self.branches[branch_id].track_id),
                Some(parent) => {
                    hops += 1;
                    if hops > self.branches.len() {
                        log::error!(
                            "cyclic ancestry walking from node {} (aborted after {} hops)",
                            node_id,
                            hops
                        );
                        return Err(TrackerError::CorruptedAncestry {
                            node: node_id,
                            depth: hops,
                        });
                    }
                    branch_id = parent;
                }
            }
        }
    }

    /// Branch bound to `track_id`, if any
    pub fn branch_of_track(&self, track_id: TrackId) -> Option<&Branch> {
        self.track_branch
            .get(&track_id)
            .map(|&id| &self.branches[id])
    }

    /// Branch owning `node_id`, if any
    pub fn branch_of_node(&self, node_id: NodeId) -> Option<&Branch> {
        self.node_branch
            .get(&node_id)
            .map(|&id| &self.branches[id])
    }

    /// Branch by arena index
    pub fn branch(&self, branch_id: BranchId) -> Option<&Branch> {
        self.branches.get(branch_id)
    }

    /// Number of branches in the forest
    pub fn n_branches(&self) -> usize {
        self.branches.len()
    }

    /// Total number of recorded nodes
    pub fn n_nodes(&self) -> usize {
        self.node_branch.len()
    }

    /// Whether the graph holds no branches at all
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Drop every branch, node, and index entry
    pub fn clear_vectors(&mut self) {
        self.branches.clear();
        self.track_branch.clear();
        self.node_branch.clear();
    }

    /// Event-boundary reset; no cross-event state survives this call
    pub fn clean(&mut self) {
        self.clear_vectors();
    }

    /// Structural counts for the engine's output layer
    pub fn stats(&self) -> GraphStats {
        let n_forks = self
            .branches
            .iter()
            .filter(|b| b.primary_branch_id.is_some())
            .count();
        GraphStats {
            n_branches: self.branches.len(),
            n_nodes: self.node_branch.len(),
            n_roots: self.branches.len() - n_forks,
            n_forks,
        }
    }

    /// Pretty-printed JSON rendition of the whole forest
    pub fn to_json(&self) -> TrackerResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TrackerError::SerializationError(e.to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// GRAPH STATS
// ═══════════════════════════════════════════════════════════════════════════════

/// Structural counts over one event's forest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Total branches
    pub n_branches: usize,
    /// Total recorded nodes
    pub n_nodes: usize,
    /// Branches coming directly from a primary
    pub n_roots: usize,
    /// Branches forked from another branch
    pub n_forks: usize,
}

impl std::fmt::Display for GraphStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} branches ({} roots, {} forks), {} nodes",
            self.n_branches, self.n_roots, self.n_forks, self.n_nodes
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_node_creates_root_branch() {
        let mut graph = DecayGraph::new();
        graph
            .add_node_to_branch(1, 5, InteractionType::SecondaryParticle)
            .unwrap();

        let branch = graph.branch_of_track(5).unwrap();
        assert_eq!(branch.track_id(), 5);
        assert_eq!(branch.primary_branch_id(), None);
        assert_eq!(branch.len(), 1);
        assert_eq!(graph.n_branches(), 1);
        assert_eq!(graph.n_nodes(), 1);
    }

    #[test]
    fn test_nodes_append_in_order() {
        let mut graph = DecayGraph::new();
        for node in 1..=4 {
            graph
                .add_node_to_branch(node, 2, InteractionType::SecondaryParticle)
                .unwrap();
        }
        let branch = graph.branch_of_track(2).unwrap();
        assert_eq!(branch.node_ids(), &[1, 2, 3, 4]);
        assert_eq!(branch.primary_node_id(), Some(1));
        assert_eq!(branch.last_node_id(), Some(4));
        assert_eq!(branch.previous_node_id(3), Some(2));
        assert_eq!(branch.previous_node_id(1), None);
        assert_eq!(graph.n_branches(), 1);
    }

    #[test]
    fn test_interaction_tags_parallel_to_nodes() {
        let mut graph = DecayGraph::new();
        graph
            .add_node_to_branch(1, 3, InteractionType::PrimaryGamma)
            .unwrap();
        graph
            .add_node_to_branch(2, 3, InteractionType::ScatteredActiveMedium)
            .unwrap();

        let branch = graph.branch_of_track(3).unwrap();
        assert_eq!(branch.interaction_of(1), Some(InteractionType::PrimaryGamma));
        assert_eq!(
            branch.interaction_of(2),
            Some(InteractionType::ScatteredActiveMedium)
        );
        assert_eq!(branch.interaction_of(99), None);
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut graph = DecayGraph::new();
        graph
            .add_node_to_branch(1, 2, InteractionType::Unknown)
            .unwrap();
        let err = graph
            .add_node_to_branch(1, 3, InteractionType::Unknown)
            .unwrap_err();
        assert!(matches!(err, TrackerError::DuplicateNode(1)));
        // the failed insert left no trace
        assert_eq!(graph.n_branches(), 1);
        assert_eq!(graph.n_nodes(), 1);
        assert!(graph.branch_of_track(3).is_none());
    }

    #[test]
    fn test_fork_registration() {
        let mut graph = DecayGraph::new();
        graph
            .add_node_to_branch(1, 1, InteractionType::SecondaryParticle)
            .unwrap();
        let child = graph.register_fork(9, 1).unwrap();
        graph
            .add_node_to_branch(2, 9, InteractionType::SecondaryParticle)
            .unwrap();

        let branch = graph.branch(child).unwrap();
        assert_eq!(branch.track_id(), 9);
        assert!(branch.primary_branch_id().is_some());
        assert_eq!(graph.find_primary_photon(2).unwrap(), 1);
    }

    #[test]
    fn test_fork_of_unknown_parent_fails() {
        let mut graph = DecayGraph::new();
        let err = graph.register_fork(9, 1).unwrap_err();
        assert!(matches!(err, TrackerError::TrackNotFound(1)));
    }

    #[test]
    fn test_rebinding_track_fails() {
        let mut graph = DecayGraph::new();
        graph
            .add_node_to_branch(1, 1, InteractionType::SecondaryParticle)
            .unwrap();
        graph
            .add_node_to_branch(2, 9, InteractionType::SecondaryParticle)
            .unwrap();
        let err = graph.register_fork(9, 1).unwrap_err();
        assert!(matches!(err, TrackerError::TrackAlreadyBound(9)));
    }

    #[test]
    fn test_find_primary_photon_depth_chain() {
        let mut graph = DecayGraph::new();
        graph
            .add_node_to_branch(1, 1, InteractionType::SecondaryParticle)
            .unwrap();
        // fork chain: 1 ← 10 ← 20 ← 30
        graph.register_fork(10, 1).unwrap();
        graph.register_fork(20, 10).unwrap();
        graph.register_fork(30, 20).unwrap();
        graph
            .add_node_to_branch(2, 30, InteractionType::SecondaryParticle)
            .unwrap();

        assert_eq!(graph.find_primary_photon(2).unwrap(), 1);
        assert_eq!(graph.find_primary_photon(1).unwrap(), 1);
    }

    #[test]
    fn test_find_primary_photon_unknown_node() {
        let graph = DecayGraph::new();
        let err = graph.find_primary_photon(42).unwrap_err();
        assert!(matches!(err, TrackerError::NodeNotFound(42)));
    }

    #[test]
    fn test_cycle_detected_as_corruption() {
        let mut graph = DecayGraph::new();
        graph
            .add_node_to_branch(1, 1, InteractionType::SecondaryParticle)
            .unwrap();
        graph.register_fork(2, 1).unwrap();
        graph
            .add_node_to_branch(2, 2, InteractionType::SecondaryParticle)
            .unwrap();
        // corrupt the arena directly: 0 → 1 → 0 → …
        graph.branches[0].primary_branch_id = Some(1);

        let err = graph.find_primary_photon(2).unwrap_err();
        assert!(matches!(err, TrackerError::CorruptedAncestry { node: 2, .. }));
    }

    #[test]
    fn test_clean_resets_everything() {
        let mut graph = DecayGraph::new();
        graph
            .add_node_to_branch(1, 1, InteractionType::SecondaryParticle)
            .unwrap();
        graph.register_fork(2, 1).unwrap();
        graph.clean();

        assert!(graph.is_empty());
        assert_eq!(graph.n_nodes(), 0);
        assert!(graph.branch_of_track(1).is_none());
        assert!(graph.find_primary_photon(1).is_err());
        // IDs are free again after a reset
        graph
            .add_node_to_branch(1, 1, InteractionType::SecondaryParticle)
            .unwrap();
    }

    #[test]
    fn test_stats_counts() {
        let mut graph = DecayGraph::new();
        graph
            .add_node_to_branch(1, 1, InteractionType::SecondaryParticle)
            .unwrap();
        graph
            .add_node_to_branch(2, 2, InteractionType::SecondaryParticle)
            .unwrap();
        graph.register_fork(9, 1).unwrap();
        graph
            .add_node_to_branch(3, 9, InteractionType::SecondaryParticle)
            .unwrap();

        let stats = graph.stats();
        assert_eq!(stats.n_branches, 3);
        assert_eq!(stats.n_roots, 2);
        assert_eq!(stats.n_forks, 1);
        assert_eq!(stats.n_nodes, 3);
        assert!(stats.to_string().contains("3 branches"));
    }

    #[test]
    fn test_json_export_roundtrip() {
        let mut graph = DecayGraph::new();
        graph
            .add_node_to_branch(1, 1, InteractionType::SecondaryParticle)
            .unwrap();
        graph.register_fork(7, 1).unwrap();
        graph
            .add_node_to_branch(2, 7, InteractionType::ScatteredPassiveMedium)
            .unwrap();

        let json = graph.to_json().unwrap();
        let restored: DecayGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, graph);
        assert_eq!(restored.find_primary_photon(2).unwrap(), 1);
    }
}
