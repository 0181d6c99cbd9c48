//! Gene types for NEAT genomes.
//!
//! This module defines the fundamental building blocks of NEAT networks:
//! - [`NodeGene`]: a neuron, identified by its [`NodeId`]
//! - [`ConnectionGene`]: a weighted link between two nodes, identified by its
//!   innovation number once it belongs to a genome

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::activation::Activation;

/// Innovation number of a connection gene.
///
/// Assigned once by the [`InnovationRegistry`](crate::InnovationRegistry) and
/// preserved through every copy and crossover.
pub type Innovation = u64;

/// Identity of a node. Equal ids denote the same node across genomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// The role of a node in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Always outputs 1.0.
    Bias,
    /// Receives an external value.
    Input,
    /// Internal node added through mutation.
    Hidden,
    /// Produces a network output.
    Output,
}

/// A node gene representing a neuron in the NEAT network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeGene {
    /// Identity of this node.
    pub id: NodeId,
    /// The role of this node.
    pub kind: NodeKind,
    /// The activation function applied to this node's input sum.
    pub activation: Activation,
}

impl NodeGene {
    /// Create a node with the default activation.
    #[must_use]
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            activation: Activation::default(),
        }
    }

    /// Create a bias node.
    #[must_use]
    pub fn bias(id: NodeId) -> Self {
        Self::new(id, NodeKind::Bias)
    }

    /// Create an input node.
    #[must_use]
    pub fn input(id: NodeId) -> Self {
        Self::new(id, NodeKind::Input)
    }

    /// Create an output node.
    #[must_use]
    pub fn output(id: NodeId) -> Self {
        Self::new(id, NodeKind::Output)
    }

    /// Create a hidden node.
    #[must_use]
    pub fn hidden(id: NodeId) -> Self {
        Self::new(id, NodeKind::Hidden)
    }

    /// Replace the activation function.
    #[must_use]
    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.kind == NodeKind::Hidden
    }
}

/// A connection gene representing a weighted link between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionGene {
    /// Source node.
    pub from: NodeId,
    /// Target node.
    pub to: NodeId,
    /// The connection weight.
    pub weight: f64,
    /// Disabled connections are skipped by the network but kept for crossover.
    pub enabled: bool,
    /// `None` until the connection is added to a genome.
    pub innovation: Option<Innovation>,
}

impl ConnectionGene {
    /// Create a new enabled connection without an innovation number.
    #[must_use]
    pub fn new(from: NodeId, to: NodeId, weight: f64) -> Self {
        Self {
            from,
            to,
            weight,
            enabled: true,
            innovation: None,
        }
    }

    /// Create a connection carrying a preset innovation number.
    #[must_use]
    pub fn with_innovation(from: NodeId, to: NodeId, weight: f64, innovation: Innovation) -> Self {
        Self {
            innovation: Some(innovation),
            ..Self::new(from, to, weight)
        }
    }

    /// Whether this gene links `from` to `to` (ordered).
    #[inline]
    #[must_use]
    pub fn links(&self, from: NodeId, to: NodeId) -> bool {
        self.from == from && self.to == to
    }
}
