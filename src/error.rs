//! Error types for decay-tree bookkeeping operations

use thiserror::Error;

use crate::tree::{NodeId, TrackId};

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("node {0} does not belong to any branch")]
    NodeNotFound(NodeId),

    #[error("track {0} has no branch in this event")]
    TrackNotFound(TrackId),

    #[error("node {0} is already owned by a branch")]
    DuplicateNode(NodeId),

    #[error("track {0} is already bound to a branch")]
    TrackAlreadyBound(TrackId),

    #[error("ancestry chain from node {node} did not terminate after {depth} hops")]
    CorruptedAncestry { node: NodeId, depth: usize },

    #[error("serialization error: {0}")]
    SerializationError(String),
}
