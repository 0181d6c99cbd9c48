//! NEAT genome: a node set plus a connection-gene set, and every mutation
//! operator that reshapes them.
//!
//! Nodes are keyed by [`NodeId`] and connections by innovation number, both in
//! ordered maps so that iteration (and therefore every random pick) is
//! deterministic for a seeded rng.
//!
//! Invariants kept by every operation here:
//! - at most one connection per ordered `(from, to)` pair;
//! - every connection's endpoints are in the node map;
//! - structural mutations never close a cycle (disabled genes included).

use std::collections::BTreeMap;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::config::NeatConfig;
use crate::gene::{ConnectionGene, Innovation, NodeGene, NodeId, NodeKind};
use crate::innovation::InnovationRegistry;
use crate::topology::{EdgeFilter, GraphTopology};

/// Uniform draw from `[min, max)`; degenerates to `min` when the range is empty.
pub(crate) fn random_between<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    rng.random::<f64>() * (max - min) + min
}

/// A NEAT genome representing a network topology.
///
/// Serializes as plain gene lists; ids and innovations travel inside the
/// genes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "GeneLists", into = "GeneLists")]
pub struct Genome {
    nodes: BTreeMap<NodeId, NodeGene>,
    connections: BTreeMap<Innovation, ConnectionGene>,
    /// Gene count (nodes + connections) of the seed this lineage grew from.
    initial_size: usize,
}

#[derive(Serialize, Deserialize)]
struct GeneLists {
    initial_size: usize,
    nodes: Vec<NodeGene>,
    connections: Vec<ConnectionGene>,
}

impl From<Genome> for GeneLists {
    fn from(genome: Genome) -> Self {
        Self {
            initial_size: genome.initial_size,
            nodes: genome.nodes.into_values().collect(),
            connections: genome.connections.into_values().collect(),
        }
    }
}

impl From<GeneLists> for Genome {
    fn from(lists: GeneLists) -> Self {
        let mut genome = Self::empty();
        for node in lists.nodes {
            genome.add_node(node);
        }
        for connection in lists.connections {
            genome.add_inherited_connection(connection);
        }
        genome.initial_size = lists.initial_size;
        genome
    }
}

impl Genome {
    /// A genome with no genes.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a seed genome. Connections without an innovation number get one
    /// from the registry; node ids are reported to the registry so that
    /// mutation never reuses them.
    pub fn new(
        nodes: impl IntoIterator<Item = NodeGene>,
        connections: impl IntoIterator<Item = ConnectionGene>,
        registry: &mut InnovationRegistry,
    ) -> Self {
        let mut genome = Self::empty();
        for node in nodes {
            registry.observe_node(node.id);
            genome.add_node(node);
        }
        for connection in connections {
            genome.add_connection(connection, registry);
        }
        genome.initial_size = genome.complexity();
        genome
    }

    /// Seed genome with an optional bias node, `inputs` input nodes and
    /// `outputs` output nodes, every input (and the bias) connected to every
    /// output with a random weight.
    pub fn fully_connected<R: Rng>(
        inputs: usize,
        outputs: usize,
        use_bias: bool,
        config: &NeatConfig,
        rng: &mut R,
        registry: &mut InnovationRegistry,
    ) -> Self {
        let mut nodes = Vec::with_capacity(inputs + outputs + 1);
        if use_bias {
            nodes.push(NodeGene::bias(registry.next_node_id()));
        }
        for _ in 0..inputs {
            nodes.push(NodeGene::input(registry.next_node_id()));
        }
        let sources: Vec<NodeId> = nodes.iter().map(|n| n.id).collect();
        let targets: Vec<NodeId> = (0..outputs).map(|_| registry.next_node_id()).collect();
        nodes.extend(targets.iter().map(|&id| NodeGene::output(id)));

        let strength = config.connection_strength;
        let mut connections = Vec::with_capacity(sources.len() * targets.len());
        for &from in &sources {
            for &to in &targets {
                let weight = random_between(rng, -strength, strength);
                connections.push(ConnectionGene::new(from, to, weight));
            }
        }

        Self::new(nodes, connections, registry)
    }

    // --- lookups -----------------------------------------------------------

    /// Nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeGene> + '_ {
        self.nodes.values()
    }

    /// Connections in ascending innovation order.
    pub fn connections(&self) -> impl Iterator<Item = &ConnectionGene> + '_ {
        self.connections.values()
    }

    /// Innovation numbers in ascending order.
    pub fn innovations(&self) -> impl Iterator<Item = Innovation> + '_ {
        self.connections.keys().copied()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&NodeGene> {
        self.nodes.get(&id)
    }

    #[must_use]
    pub fn connection_at(&self, innovation: Innovation) -> Option<&ConnectionGene> {
        self.connections.get(&innovation)
    }

    /// Mutable access to a connection. Endpoints and innovation must not be
    /// changed through this handle; weight and enabled flag are fair game.
    pub fn connection_at_mut(&mut self, innovation: Innovation) -> Option<&mut ConnectionGene> {
        self.connections.get_mut(&innovation)
    }

    #[must_use]
    pub fn connection_exists(&self, from: NodeId, to: NodeId) -> bool {
        self.connections.values().any(|c| c.links(from, to))
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    #[must_use]
    pub fn enabled_connection_count(&self) -> usize {
        self.connections.values().filter(|c| c.enabled).count()
    }

    /// Total gene count: nodes plus connections.
    #[must_use]
    pub fn complexity(&self) -> usize {
        self.nodes.len() + self.connections.len()
    }

    #[must_use]
    pub fn initial_size(&self) -> usize {
        self.initial_size
    }

    pub(crate) fn set_initial_size(&mut self, initial_size: usize) {
        self.initial_size = initial_size;
    }

    #[must_use]
    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.values().filter(|n| n.kind == kind).count()
    }

    #[must_use]
    pub fn hidden_ids(&self) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|n| n.is_hidden())
            .map(|n| n.id)
            .collect()
    }

    /// Whether adding `from -> to` would close a cycle through any connection,
    /// enabled or disabled.
    #[must_use]
    pub fn would_create_cycle(&self, from: NodeId, to: NodeId) -> bool {
        GraphTopology::from_genome(self, EdgeFilter::All).would_create_cycle(from, to)
    }

    /// Whether the enabled connections contain a cycle.
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        GraphTopology::from_genome(self, EdgeFilter::Enabled).has_cycle()
    }

    /// Deep copy sharing no state with `self`.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    // --- insertion ---------------------------------------------------------

    /// Insert a node unless one with the same id exists.
    pub fn add_node(&mut self, node: NodeGene) {
        self.nodes.entry(node.id).or_insert(node);
    }

    /// Insert a connection.
    ///
    /// Returns `None` and changes nothing when a connection with the same
    /// ordered `(from, to)` pair already exists, when an endpoint is not in
    /// the genome, or when the preset innovation is already taken. Otherwise
    /// returns the innovation the connection is stored under: the preset one
    /// if it carries one, else a fresh one from the registry.
    pub fn add_connection(
        &mut self,
        connection: ConnectionGene,
        registry: &mut InnovationRegistry,
    ) -> Option<Innovation> {
        if !self.accepts(&connection) {
            return None;
        }
        let innovation = match connection.innovation {
            Some(innovation) => {
                registry.observe_innovation(innovation);
                innovation
            }
            None => registry.next_innovation(),
        };
        self.insert_connection(connection, innovation)
    }

    /// Insert a connection that already carries its innovation number.
    pub(crate) fn add_inherited_connection(
        &mut self,
        connection: ConnectionGene,
    ) -> Option<Innovation> {
        let innovation = connection.innovation?;
        if !self.accepts(&connection) {
            return None;
        }
        self.insert_connection(connection, innovation)
    }

    fn accepts(&self, connection: &ConnectionGene) -> bool {
        if self.connection_exists(connection.from, connection.to) {
            return false;
        }
        if !self.nodes.contains_key(&connection.from) || !self.nodes.contains_key(&connection.to)
        {
            log::debug!(
                "dropping connection {} -> {}: endpoint missing from genome",
                connection.from,
                connection.to
            );
            return false;
        }
        true
    }

    fn insert_connection(
        &mut self,
        mut connection: ConnectionGene,
        innovation: Innovation,
    ) -> Option<Innovation> {
        if self.connections.contains_key(&innovation) {
            return None;
        }
        connection.innovation = Some(innovation);
        self.connections.insert(innovation, connection);
        Some(innovation)
    }

    // --- mutation ----------------------------------------------------------

    /// Apply one round of mutation.
    ///
    /// Exactly one top-level branch fires: add-node, else add-connection, else
    /// the independent activation / weight / toggle rolls followed by the
    /// set-enable roll.
    pub fn mutate<R: Rng>(
        &mut self,
        config: &NeatConfig,
        rng: &mut R,
        registry: &mut InnovationRegistry,
    ) {
        if rng.random::<f64>() < config.mutate_add_node_probability {
            self.mutate_add_node(rng, registry);
        } else if rng.random::<f64>() < config.mutate_add_connection_probability {
            self.mutate_add_connection(config, rng, registry);
        } else {
            if rng.random::<f64>() < config.mutate_activation_probability {
                self.mutate_modify_activation(None, rng);
            }
            if rng.random::<f64>() < config.mutate_connection_weights_probability {
                self.mutate_connections_weights(config, rng);
            }
            if rng.random::<f64>() < config.mutate_toggle_enable_probability {
                let value = rng.random::<bool>();
                self.mutate_set_connection(value, rng);
            }
            if rng.random::<f64>() < config.mutate_set_enable_probability {
                self.mutate_set_connection(true, rng);
            }
        }
    }

    /// Split a random enabled connection with a new hidden node.
    ///
    /// The split connection is disabled; `from -> new` gets weight 1 and
    /// `new -> to` inherits the old weight, so the signal is preserved.
    /// Returns the new node id, or `None` when no connection is enabled.
    pub fn mutate_add_node<R: Rng>(
        &mut self,
        rng: &mut R,
        registry: &mut InnovationRegistry,
    ) -> Option<NodeId> {
        let enabled: Vec<Innovation> = self
            .connections
            .iter()
            .filter(|(_, c)| c.enabled)
            .map(|(&innovation, _)| innovation)
            .collect();
        let &split = enabled.choose(rng)?;

        let old = self.connections.get_mut(&split)?;
        old.enabled = false;
        let (from, to, weight) = (old.from, old.to, old.weight);

        let node = NodeGene::hidden(registry.next_node_id());
        let id = node.id;
        self.add_node(node);
        self.add_connection(ConnectionGene::new(from, id, 1.0), registry);
        self.add_connection(ConnectionGene::new(id, to, weight), registry);
        Some(id)
    }

    /// Try up to `max_add_connection_tries` random candidate edges and add the
    /// first that is neither a duplicate nor recurrent.
    ///
    /// Returns the innovation of the added connection.
    pub fn mutate_add_connection<R: Rng>(
        &mut self,
        config: &NeatConfig,
        rng: &mut R,
        registry: &mut InnovationRegistry,
    ) -> Option<Innovation> {
        let sources: Vec<&NodeGene> = self
            .nodes
            .values()
            .filter(|n| n.kind != NodeKind::Output)
            .collect();
        if sources.is_empty() {
            return None;
        }
        let topology = GraphTopology::from_genome(self, EdgeFilter::All);
        let strength = config.connection_strength;

        let mut accepted = None;
        for _ in 0..config.max_add_connection_tries {
            let Some(&from) = sources.choose(rng) else {
                break;
            };
            let targets: Vec<NodeId> = self
                .nodes
                .values()
                .filter(|n| {
                    !matches!(n.kind, NodeKind::Input | NodeKind::Bias)
                        && n.id != from.id
                        && !(from.kind == NodeKind::Output && n.kind == NodeKind::Output)
                })
                .map(|n| n.id)
                .collect();
            let Some(&to) = targets.choose(rng) else {
                continue;
            };

            let weight = random_between(rng, -strength, strength);
            if !self.connection_exists(from.id, to) && !topology.would_create_cycle(from.id, to) {
                accepted = Some(ConnectionGene::new(from.id, to, weight));
                break;
            }
        }

        let connection = accepted?;
        self.add_connection(connection, registry)
    }

    /// Give `node` (or, when `None`, a random hidden node) a random activation.
    pub fn mutate_modify_activation<R: Rng>(&mut self, node: Option<NodeId>, rng: &mut R) {
        let activation = Activation::random(rng);
        let target = match node {
            Some(id) => Some(id),
            None => self.hidden_ids().choose(rng).copied(),
        };
        if let Some(gene) = target.and_then(|id| self.nodes.get_mut(&id)) {
            gene.activation = activation;
        }
    }

    /// Set the enabled flag of one random connection currently not equal to
    /// `value`. No-op when every connection already matches.
    pub fn mutate_set_connection<R: Rng>(&mut self, value: bool, rng: &mut R) {
        let candidates: Vec<Innovation> = self
            .connections
            .iter()
            .filter(|(_, c)| c.enabled != value)
            .map(|(&innovation, _)| innovation)
            .collect();
        if let Some(connection) = candidates
            .choose(rng)
            .and_then(|innovation| self.connections.get_mut(innovation))
        {
            connection.enabled = value;
        }
    }

    /// Perturb (by a tenth of a fresh draw) or replace every enabled weight.
    pub fn mutate_connections_weights<R: Rng>(&mut self, config: &NeatConfig, rng: &mut R) {
        let strength = config.connection_strength;
        for connection in self.connections.values_mut().filter(|c| c.enabled) {
            let draw = random_between(rng, -strength, strength);
            let perturbed = rng.random::<f64>() < config.connection_perturbation_probability;
            connection.weight = if perturbed {
                connection.weight + draw / 10.0
            } else {
                draw
            };
        }
    }

    /// Remove a random hidden node together with every connection touching it.
    ///
    /// Not scheduled by [`mutate`](Self::mutate); callers opt in explicitly.
    /// Returns the removed node id.
    pub fn mutate_remove_node<R: Rng>(&mut self, rng: &mut R) -> Option<NodeId> {
        let &id = self.hidden_ids().choose(rng)?;
        self.nodes.remove(&id);
        self.connections.retain(|_, c| c.from != id && c.to != id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    /// 2 inputs, 1 output, one connection per input.
    fn two_by_one(registry: &mut InnovationRegistry) -> Genome {
        Genome::new(
            vec![
                NodeGene::input(NodeId(0)),
                NodeGene::input(NodeId(1)),
                NodeGene::output(NodeId(2)),
            ],
            vec![
                ConnectionGene::new(NodeId(0), NodeId(2), 2.0),
                ConnectionGene::new(NodeId(1), NodeId(2), -1.0),
            ],
            registry,
        )
    }

    fn assert_no_duplicate_pairs(genome: &Genome) {
        let mut pairs: Vec<(NodeId, NodeId)> = genome.connections().map(|c| (c.from, c.to)).collect();
        let before = pairs.len();
        pairs.sort();
        pairs.dedup();
        assert_eq!(pairs.len(), before, "duplicate (from, to) pair");
    }

    #[test]
    fn test_new_assigns_innovations_in_order() {
        let mut registry = InnovationRegistry::new();
        let genome = two_by_one(&mut registry);
        assert_eq!(genome.innovations().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(genome.initial_size(), 5);
        assert_eq!(registry.peek_node_id(), NodeId(3));
    }

    #[test]
    fn test_fully_connected_genome() {
        let mut registry = InnovationRegistry::new();
        let mut rng = test_rng();
        let config = NeatConfig::default();
        let genome = Genome::fully_connected(2, 2, true, &config, &mut rng, &mut registry);

        assert_eq!(genome.count_kind(NodeKind::Bias), 1);
        assert_eq!(genome.count_kind(NodeKind::Input), 2);
        assert_eq!(genome.count_kind(NodeKind::Output), 2);
        // (2 inputs + bias) * 2 outputs
        assert_eq!(genome.connection_count(), 6);
        assert!(genome
            .connections()
            .all(|c| c.weight.abs() <= config.connection_strength));
    }

    #[test]
    fn test_add_connection_rejects_duplicates() {
        let mut registry = InnovationRegistry::new();
        let mut genome = two_by_one(&mut registry);

        let dup = genome.add_connection(ConnectionGene::new(NodeId(0), NodeId(2), 9.0), &mut registry);
        assert!(dup.is_none());
        assert_eq!(genome.connection_count(), 2);
        // A rejected duplicate must not burn an innovation number.
        assert_eq!(registry.peek_innovation(), 2);
    }

    #[test]
    fn test_add_connection_requires_endpoints() {
        let mut registry = InnovationRegistry::new();
        let mut genome = two_by_one(&mut registry);
        let dangling = ConnectionGene::new(NodeId(0), NodeId(77), 1.0);
        assert!(genome.add_connection(dangling, &mut registry).is_none());
    }

    #[test]
    fn test_add_connection_keeps_preset_innovation() {
        let mut registry = InnovationRegistry::new();
        let mut genome = two_by_one(&mut registry);
        genome.add_node(NodeGene::hidden(NodeId(5)));

        let preset = ConnectionGene::with_innovation(NodeId(0), NodeId(5), 1.0, 40);
        assert_eq!(genome.add_connection(preset, &mut registry), Some(40));
        assert_eq!(registry.next_innovation(), 41);
    }

    #[test]
    fn test_add_node_is_idempotent() {
        let mut genome = Genome::empty();
        genome.add_node(NodeGene::hidden(NodeId(4)).with_activation(Activation::Tanh));
        genome.add_node(NodeGene::hidden(NodeId(4)).with_activation(Activation::Relu));
        assert_eq!(genome.node_count(), 1);
        assert_eq!(genome.node(NodeId(4)).unwrap().activation, Activation::Tanh);
    }

    #[test]
    fn test_mutate_add_node_splits_single_connection() {
        let mut registry = InnovationRegistry::new();
        let mut rng = test_rng();
        let mut genome = Genome::new(
            vec![NodeGene::input(NodeId(0)), NodeGene::output(NodeId(1))],
            vec![ConnectionGene::new(NodeId(0), NodeId(1), 0.7)],
            &mut registry,
        );

        let id = genome.mutate_add_node(&mut rng, &mut registry).unwrap();

        assert_eq!(genome.node_count(), 3);
        assert_eq!(genome.connection_count(), 3);
        assert_eq!(genome.enabled_connection_count(), 2);
        assert!(!genome.connection_at(0).unwrap().enabled);

        let into = genome.connections().find(|c| c.links(NodeId(0), id)).unwrap();
        let out = genome.connections().find(|c| c.links(id, NodeId(1))).unwrap();
        assert!(into.enabled && out.enabled);
        assert_eq!(into.weight, 1.0);
        assert_eq!(out.weight, 0.7);
        assert!(into.innovation.unwrap() > 0 && out.innovation.unwrap() > 0);
    }

    #[test]
    fn test_mutate_add_node_without_enabled_connections() {
        let mut registry = InnovationRegistry::new();
        let mut rng = test_rng();
        let mut genome = two_by_one(&mut registry);
        for innovation in [0, 1] {
            genome.connection_at_mut(innovation).unwrap().enabled = false;
        }
        assert!(genome.mutate_add_node(&mut rng, &mut registry).is_none());
        assert_eq!(genome.node_count(), 3);
    }

    #[test]
    fn test_mutate_add_connection_never_creates_cycles() {
        let mut registry = InnovationRegistry::new();
        let mut rng = test_rng();
        let config = NeatConfig::default();
        let mut genome = two_by_one(&mut registry);
        for _ in 0..6 {
            genome.mutate_add_node(&mut rng, &mut registry);
        }
        for _ in 0..200 {
            genome.mutate_add_connection(&config, &mut rng, &mut registry);
        }
        assert!(!genome.has_cycle());
        assert!(!GraphTopology::from_genome(&genome, EdgeFilter::All).has_cycle());
        assert_no_duplicate_pairs(&genome);
    }

    #[test]
    fn test_mutate_add_connection_fills_missing_edge() {
        let mut registry = InnovationRegistry::new();
        let mut rng = test_rng();
        let config = NeatConfig {
            max_add_connection_tries: 50,
            ..NeatConfig::default()
        };
        let mut genome = Genome::new(
            vec![NodeGene::input(NodeId(0)), NodeGene::output(NodeId(1))],
            Vec::new(),
            &mut registry,
        );
        let added = genome.mutate_add_connection(&config, &mut rng, &mut registry);
        assert_eq!(added, Some(0));
        assert!(genome.connection_exists(NodeId(0), NodeId(1)));

        // The only legal edge now exists, so further attempts exhaust silently.
        assert!(genome
            .mutate_add_connection(&config, &mut rng, &mut registry)
            .is_none());
        assert_eq!(genome.connection_count(), 1);
    }

    #[test]
    fn test_mutate_modify_activation() {
        let mut registry = InnovationRegistry::new();
        let mut rng = test_rng();
        let mut genome = two_by_one(&mut registry);

        // No hidden nodes: nothing changes.
        let before = genome.clone();
        genome.mutate_modify_activation(None, &mut rng);
        assert_eq!(genome, before);

        // Explicit target is honoured even for non-hidden nodes.
        let mut changed = false;
        for _ in 0..20 {
            genome.mutate_modify_activation(Some(NodeId(2)), &mut rng);
            changed |= genome.node(NodeId(2)).unwrap().activation != Activation::Sigmoid;
        }
        assert!(changed);
    }

    #[test]
    fn test_mutate_set_connection() {
        let mut registry = InnovationRegistry::new();
        let mut rng = test_rng();
        let mut genome = two_by_one(&mut registry);

        genome.mutate_set_connection(true, &mut rng);
        assert_eq!(genome.enabled_connection_count(), 2);

        genome.mutate_set_connection(false, &mut rng);
        assert_eq!(genome.enabled_connection_count(), 1);
        genome.mutate_set_connection(false, &mut rng);
        assert_eq!(genome.enabled_connection_count(), 0);
        genome.mutate_set_connection(true, &mut rng);
        assert_eq!(genome.enabled_connection_count(), 1);
    }

    #[test]
    fn test_mutate_connections_weights_only_touches_enabled() {
        let mut registry = InnovationRegistry::new();
        let mut rng = test_rng();
        let config = NeatConfig::default();
        let mut genome = two_by_one(&mut registry);
        genome.connection_at_mut(1).unwrap().enabled = false;

        genome.mutate_connections_weights(&config, &mut rng);

        assert_ne!(genome.connection_at(0).unwrap().weight, 2.0);
        assert_eq!(genome.connection_at(1).unwrap().weight, -1.0);
    }

    #[test]
    fn test_weight_perturbation_is_small() {
        let mut registry = InnovationRegistry::new();
        let mut rng = test_rng();
        let config = NeatConfig {
            connection_perturbation_probability: 1.0,
            ..NeatConfig::default()
        };
        let mut genome = two_by_one(&mut registry);
        genome.mutate_connections_weights(&config, &mut rng);

        let delta = (genome.connection_at(0).unwrap().weight - 2.0).abs();
        assert!(delta <= config.connection_strength / 10.0);
    }

    #[test]
    fn test_mutate_remove_node() {
        let mut registry = InnovationRegistry::new();
        let mut rng = test_rng();
        let mut genome = two_by_one(&mut registry);
        assert!(genome.mutate_remove_node(&mut rng).is_none());

        let hidden = genome.mutate_add_node(&mut rng, &mut registry).unwrap();
        let removed = genome.mutate_remove_node(&mut rng);

        assert_eq!(removed, Some(hidden));
        assert!(genome.node(hidden).is_none());
        assert!(genome.connections().all(|c| c.from != hidden && c.to != hidden));
        assert_eq!(genome.connection_count(), 2);
    }

    #[test]
    fn test_copy_is_independent() {
        let mut registry = InnovationRegistry::new();
        let mut rng = test_rng();
        let original = two_by_one(&mut registry);
        let mut copy = original.copy();
        assert_eq!(copy, original);

        copy.mutate_add_node(&mut rng, &mut registry);
        copy.connection_at_mut(1).unwrap().weight = 100.0;

        assert_eq!(original.node_count(), 3);
        assert_eq!(original.connection_at(1).unwrap().weight, -1.0);
        assert!(original.connections().all(|c| c.enabled));
    }

    #[test]
    fn test_repeated_mutation_keeps_invariants() {
        let mut registry = InnovationRegistry::new();
        let mut rng = test_rng();
        let config = NeatConfig {
            mutate_add_node_probability: 0.2,
            mutate_add_connection_probability: 0.5,
            mutate_toggle_enable_probability: 0.3,
            mutate_set_enable_probability: 0.3,
            mutate_activation_probability: 0.3,
            ..NeatConfig::default()
        };
        let mut genome = Genome::fully_connected(3, 2, true, &config, &mut rng, &mut registry);

        for _ in 0..300 {
            genome.mutate(&config, &mut rng, &mut registry);
        }

        assert_no_duplicate_pairs(&genome);
        assert!(!genome.has_cycle());
        assert!(genome
            .connections()
            .all(|c| genome.node(c.from).is_some() && genome.node(c.to).is_some()));
        assert!(genome.node_count() > 6);
    }
}
