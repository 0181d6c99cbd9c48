//! Innovation tracking for NEAT.
//!
//! Every connection gene receives an innovation number when it first enters a
//! genome, and every hidden node created by mutation receives a fresh
//! [`NodeId`]. Both come from an [`InnovationRegistry`]: an explicit counter
//! service owned by the [`Population`](crate::Population) and passed by `&mut`
//! to the operations that create genes. There is no process-wide state, so
//! independent runs (and tests) never share counters.
//!
//! Numbers handed out are strictly increasing and never reused for the life
//! of a registry. [`InnovationRegistry::reset`] rewinds both counters and is
//! meant for test isolation only.

use serde::{Deserialize, Serialize};

use crate::gene::{Innovation, NodeId};

/// Monotonic source of connection innovations and node ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnovationRegistry {
    next_innovation: Innovation,
    next_node: u64,
}

impl InnovationRegistry {
    /// A registry whose first innovation and node id are both 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry continuing from the given counters.
    #[must_use]
    pub fn starting_at(next_innovation: Innovation, next_node: u64) -> Self {
        Self {
            next_innovation,
            next_node,
        }
    }

    /// Hand out the next connection innovation.
    pub fn next_innovation(&mut self) -> Innovation {
        let innovation = self.next_innovation;
        self.next_innovation += 1;
        innovation
    }

    /// Hand out the next node id.
    pub fn next_node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    /// Make sure an externally assigned innovation is never handed out again.
    pub fn observe_innovation(&mut self, innovation: Innovation) {
        if innovation >= self.next_innovation {
            self.next_innovation = innovation + 1;
        }
    }

    /// Make sure an externally assigned node id is never handed out again.
    pub fn observe_node(&mut self, id: NodeId) {
        if id.0 >= self.next_node {
            self.next_node = id.0 + 1;
        }
    }

    /// The innovation the next call to [`next_innovation`](Self::next_innovation) returns.
    #[must_use]
    pub fn peek_innovation(&self) -> Innovation {
        self.next_innovation
    }

    /// The id the next call to [`next_node_id`](Self::next_node_id) returns.
    #[must_use]
    pub fn peek_node_id(&self) -> NodeId {
        NodeId(self.next_node)
    }

    /// Rewind both counters to 0.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
