//! Network phenotype built from a genome's enabled connections.
//!
//! [`Network::activate`] runs a single worklist relaxation: neurons are
//! computed in the order signal reaches them from the inputs and bias, each
//! at most once per call. Recurrent links that point at a neuron not yet
//! computed read 0. This is a best-effort pass and does not iterate to a
//! fixed point; a graph produced by this crate's structural operators is
//! acyclic anyway, but toggled or hand-built genomes may not be.
//!
//! The network keeps no state between calls: values live in per-call buffers,
//! so two activations with the same inputs give identical outputs.

use std::collections::VecDeque;

use thiserror::Error;

use crate::activation::Activation;
use crate::gene::{NodeId, NodeKind};
use crate::genome::Genome;

/// Validation report for [`Network::activate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("input data length mismatch: expected {expected}, received {received}")]
    InputLengthMismatch { expected: usize, received: usize },
}

#[derive(Debug, Clone, Copy)]
struct Link {
    from: usize,
    weight: f64,
}

#[derive(Debug, Clone)]
struct Neuron {
    id: NodeId,
    activation: Activation,
    incoming: Vec<Link>,
    outgoing: Vec<usize>,
}

/// An activation-ready network.
#[derive(Debug, Clone)]
pub struct Network {
    neurons: Vec<Neuron>,
    /// Indices of input neurons, ascending node id.
    inputs: Vec<usize>,
    biases: Vec<usize>,
    /// Indices of output neurons, ascending node id.
    outputs: Vec<usize>,
    hidden: Vec<usize>,
}

impl Network {
    /// Build the network for a genome. Disabled connections are left out.
    #[must_use]
    pub fn from_genome(genome: &Genome) -> Self {
        let mut neurons = Vec::with_capacity(genome.node_count());
        let mut inputs = Vec::new();
        let mut biases = Vec::new();
        let mut outputs = Vec::new();
        let mut hidden = Vec::new();

        for (idx, node) in genome.nodes().enumerate() {
            neurons.push(Neuron {
                id: node.id,
                activation: node.activation,
                incoming: Vec::new(),
                outgoing: Vec::new(),
            });
            match node.kind {
                NodeKind::Input => inputs.push(idx),
                NodeKind::Bias => biases.push(idx),
                NodeKind::Output => outputs.push(idx),
                NodeKind::Hidden => hidden.push(idx),
            }
        }

        // Nodes arrive in ascending id order, so ids can be binary searched.
        let index_of = |id: NodeId| neurons.binary_search_by_key(&id, |n: &Neuron| n.id).ok();
        let links: Vec<(usize, usize, f64)> = genome
            .connections()
            .filter(|c| c.enabled)
            .filter_map(|c| Some((index_of(c.from)?, index_of(c.to)?, c.weight)))
            .collect();

        for (from, to, weight) in links {
            neurons[from].outgoing.push(to);
            neurons[to].incoming.push(Link { from, weight });
        }

        Self {
            neurons,
            inputs,
            biases,
            outputs,
            hidden,
        }
    }

    #[must_use]
    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    #[must_use]
    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    #[must_use]
    pub fn num_hidden(&self) -> usize {
        self.hidden.len()
    }

    /// Number of enabled links.
    #[must_use]
    pub fn num_links(&self) -> usize {
        self.neurons.iter().map(|n| n.incoming.len()).sum()
    }

    /// Node ids of the input neurons, in the order `activate` reads inputs.
    pub fn input_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inputs.iter().map(|&idx| self.neurons[idx].id)
    }

    /// Node ids of the output neurons, in the order `activate` writes outputs.
    pub fn output_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.outputs.iter().map(|&idx| self.neurons[idx].id)
    }

    /// Check the input vector against the number of input neurons.
    pub fn check_inputs(&self, inputs: &[f64]) -> Result<(), NetworkError> {
        if inputs.len() == self.inputs.len() {
            Ok(())
        } else {
            Err(NetworkError::InputLengthMismatch {
                expected: self.inputs.len(),
                received: inputs.len(),
            })
        }
    }

    /// Propagate `inputs` through the network and return the output values.
    ///
    /// A length mismatch is logged and tolerated: inputs are matched to input
    /// neurons by position, surplus values are ignored and missing ones leave
    /// their neuron without a value (read as 0 downstream).
    pub fn activate(&self, inputs: &[f64]) -> Vec<f64> {
        if let Err(err) = self.check_inputs(inputs) {
            log::warn!("{err}");
        }

        let count = self.neurons.len();
        let mut values: Vec<Option<f64>> = vec![None; count];
        let mut done = vec![false; count];
        let mut queued = vec![false; count];
        let mut queue = VecDeque::with_capacity(count);

        for (position, &idx) in self.inputs.iter().enumerate() {
            values[idx] = inputs.get(position).copied();
        }
        for &idx in &self.biases {
            values[idx] = Some(1.0);
        }
        for &idx in self.inputs.iter().chain(&self.biases) {
            queued[idx] = true;
            queue.push_back(idx);
        }

        while let Some(idx) = queue.pop_front() {
            queued[idx] = false;
            if done[idx] {
                continue;
            }

            let neuron = &self.neurons[idx];
            if !neuron.incoming.is_empty() {
                let sum: f64 = neuron
                    .incoming
                    .iter()
                    .map(|link| values[link.from].unwrap_or(0.0) * link.weight)
                    .sum();
                values[idx] = Some(neuron.activation.apply(sum));
            }
            done[idx] = true;

            for &next in &neuron.outgoing {
                if !queued[next] {
                    queued[next] = true;
                    queue.push_back(next);
                }
            }
        }

        self.outputs
            .iter()
            .map(|&idx| values[idx].unwrap_or(0.0))
            .collect()
    }
}
