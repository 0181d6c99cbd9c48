//! An individual of the population: a genome plus its fitness bookkeeping.

use std::sync::OnceLock;

use rand::Rng;
use slotmap::new_key_type;

use crate::config::NeatConfig;
use crate::genome::Genome;
use crate::innovation::InnovationRegistry;
use crate::network::Network;
use crate::species::SpeciesId;

new_key_type! {
    /// Handle of an organism in the population's organism table.
    pub struct OrganismId;
}

/// A genome with fitness, generation and species bookkeeping.
///
/// The [`Network`] is built from the genome on the first call to
/// [`activate`](Self::activate) and cached. The cache is not invalidated by
/// later mutation of the genome: a network built before a mutation keeps the
/// old structure until [`reset_network`](Self::reset_network) is called.
#[derive(Debug, Clone, Default)]
pub struct Organism {
    genome: Genome,
    /// Raw score from the fitness function.
    pub fitness: f64,
    /// Fitness after the stagnation and complexity penalties.
    pub adjusted_fitness: f64,
    /// Generation this organism was bred in.
    pub generation: usize,
    /// Species this organism was last assigned to, if any.
    pub species: Option<SpeciesId>,
    network: OnceLock<Network>,
}

impl Organism {
    #[must_use]
    pub fn new(genome: Genome) -> Self {
        Self {
            genome,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Mutable genome access. Does not touch the cached network.
    pub fn genome_mut(&mut self) -> &mut Genome {
        &mut self.genome
    }

    #[must_use]
    pub fn into_genome(self) -> Genome {
        self.genome
    }

    /// Copy of the genome with fresh bookkeeping: zero fitness, generation 0,
    /// no species and no cached network.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self::new(self.genome.copy())
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.genome.node_count()
    }

    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.genome.connection_count()
    }

    #[must_use]
    pub fn initial_size(&self) -> usize {
        self.genome.initial_size()
    }

    /// The cached network, built on first use.
    pub fn network(&self) -> &Network {
        self.network.get_or_init(|| Network::from_genome(&self.genome))
    }

    /// Run the network on `inputs`.
    pub fn activate(&self, inputs: &[f64]) -> Vec<f64> {
        self.network().activate(inputs)
    }

    /// Drop the cached network so the next activation rebuilds it.
    pub fn reset_network(&mut self) {
        self.network = OnceLock::new();
    }

    /// Mutate the genome. The cached network is left alone.
    pub fn mutate<R: Rng>(
        &mut self,
        config: &NeatConfig,
        rng: &mut R,
        registry: &mut InnovationRegistry,
    ) {
        self.genome.mutate(config, rng, registry);
    }
}
