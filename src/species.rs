//! Species: clusters of compatible organisms that share fitness and breed
//! among themselves.
//!
//! A species holds the ids of its members in the population's organism
//! table. The representative used for compatibility tests and the best
//! organism seen so far are owned snapshots, so they outlive the generation
//! they were taken from.

use std::fmt;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::compatibility::{distance, is_similar};
use crate::config::NeatConfig;
use crate::crossover::crossover;
use crate::genome::Genome;
use crate::innovation::InnovationRegistry;
use crate::organism::{Organism, OrganismId};

/// Generations without improvement before a species is marked extinct.
pub const STAGNATION_LIMIT: usize = 15;
/// Factor applied to the fitness of members of an extinct species.
pub const STAGNATION_PENALTY: f64 = 0.01;
/// Fitness subtracted per gene grown beyond the seed genome.
pub const COMPLEXITY_PENALTY: f64 = 0.01;
/// Copies of the best organism carried into a large enough offspring batch.
pub const ELITISM: usize = 5;

/// Stable identifier of a species within a population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(pub u64);

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Species {
    id: SpeciesId,
    members: Vec<OrganismId>,
    representative: Option<Genome>,
    best: Option<Organism>,
    /// Generations this species has survived.
    pub age: usize,
    /// Generations since the best fitness last improved.
    pub stagnant: usize,
    /// Mean raw fitness of the members at the last adjustment.
    pub average_fitness: f64,
    /// Set once `stagnant` reaches [`STAGNATION_LIMIT`].
    pub extinct: bool,
}

impl Species {
    #[must_use]
    pub fn new(id: SpeciesId) -> Self {
        Self {
            id,
            members: Vec::new(),
            representative: None,
            best: None,
            age: 0,
            stagnant: 0,
            average_fitness: 0.0,
            extinct: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> SpeciesId {
        self.id
    }

    /// Member ids, fittest first after [`adjust_fitness`](Self::adjust_fitness).
    #[must_use]
    pub fn members(&self) -> &[OrganismId] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: OrganismId) -> bool {
        self.members.contains(&id)
    }

    #[must_use]
    pub fn representative(&self) -> Option<&Genome> {
        self.representative.as_ref()
    }

    #[must_use]
    pub fn best(&self) -> Option<&Organism> {
        self.best.as_ref()
    }

    /// Whether `genome` is close enough to the representative to join.
    #[must_use]
    pub fn is_compatible(&self, genome: &Genome, config: &NeatConfig) -> bool {
        self.representative
            .as_ref()
            .is_some_and(|rep| is_similar(genome, rep, config))
    }

    /// Add a member and point its species hint here. The first member of a
    /// species without a representative becomes the representative.
    pub fn add_organism(&mut self, id: OrganismId, organism: &mut Organism) {
        if self.representative.is_none() {
            self.representative = Some(organism.genome().copy());
        }
        self.members.push(id);
        organism.species = Some(self.id);
    }

    /// Remove a member. Returns whether it was present.
    pub fn remove_organism(&mut self, id: OrganismId) -> bool {
        match self.members.iter().position(|&m| m == id) {
            Some(index) => {
                self.members.remove(index);
                true
            }
            None => false,
        }
    }

    /// Compute adjusted fitness for every member, order members fittest
    /// first, pick a new random representative and track the best organism.
    pub fn adjust_fitness<R: Rng>(
        &mut self,
        organisms: &mut SlotMap<OrganismId, Organism>,
        rng: &mut R,
    ) {
        self.stagnant += 1;
        self.extinct = self.stagnant >= STAGNATION_LIMIT;

        self.members.retain(|&id| organisms.contains_key(id));
        if self.members.is_empty() {
            self.average_fitness = 0.0;
            return;
        }

        let mut fitness_sum = 0.0;
        for &id in &self.members {
            let Some(organism) = organisms.get_mut(id) else {
                continue;
            };
            let genome = organism.genome();
            let growth = genome.complexity() as f64 - genome.initial_size() as f64;

            let mut adjusted = organism.fitness;
            if self.extinct {
                adjusted *= STAGNATION_PENALTY;
            }
            adjusted -= COMPLEXITY_PENALTY * growth;

            organism.adjusted_fitness = adjusted;
            fitness_sum += organism.fitness;
        }

        let adjusted_of = |id: &OrganismId| {
            organisms
                .get(*id)
                .map_or(f64::NEG_INFINITY, |o| o.adjusted_fitness)
        };
        self.members
            .sort_by(|a, b| adjusted_of(b).total_cmp(&adjusted_of(a)));

        self.average_fitness = fitness_sum / self.members.len() as f64;

        if let Some(rep) = self.members.choose(rng).and_then(|&id| organisms.get(id)) {
            self.representative = Some(rep.genome().copy());
        }

        if let Some(top) = organisms.get(self.members[0]) {
            let improved = self
                .best
                .as_ref()
                .map_or(true, |best| top.fitness > best.fitness);
            if improved {
                self.best = Some(top.clone());
                self.stagnant = 0;
            }
        }
    }

    /// Drop the weakest `proportion` of the members, keeping
    /// `ceil((1 - proportion) * len)` of them in their current order.
    pub fn cull(&mut self, proportion: f64) {
        if proportion <= 0.0 {
            return;
        }
        let len = self.members.len();
        let removed = ((len as f64 * proportion).floor() as usize).min(len);
        self.members.truncate(len - removed);
    }

    /// Breed `expected` offspring from the current members.
    ///
    /// When more than [`ELITISM`] offspring are expected, the first
    /// [`ELITISM`] are copies of the best organism. Every other slot is
    /// either a mutated copy of one random member or the crossover of two
    /// random members (mutated as well when a second roll passes or the
    /// parents are identical).
    pub fn reproduce<R: Rng>(
        &self,
        expected: usize,
        generation: usize,
        organisms: &SlotMap<OrganismId, Organism>,
        config: &NeatConfig,
        rng: &mut R,
        registry: &mut InnovationRegistry,
    ) -> Vec<Organism> {
        let ancestors: Vec<&Organism> = self
            .members
            .iter()
            .filter_map(|&id| organisms.get(id))
            .collect();
        if ancestors.is_empty() {
            return Vec::new();
        }

        let mut offspring = Vec::with_capacity(expected);
        for slot in 0..expected {
            let elite = if slot < ELITISM && expected > ELITISM {
                self.best.as_ref()
            } else {
                None
            };

            let child = if let Some(best) = elite {
                let mut child = best.copy();
                child.generation = generation;
                child
            } else if rng.random::<f64>() < config.mutate_only_probability {
                let Some(parent) = ancestors.choose(rng) else {
                    break;
                };
                let mut child = parent.copy();
                child.mutate(config, rng, registry);
                child.generation = generation;
                child
            } else {
                let (Some(mother), Some(father)) = (ancestors.choose(rng), ancestors.choose(rng))
                else {
                    break;
                };
                let mut child = crossover(mother, father, rng);
                if rng.random::<f64>() < config.mutate_only_probability
                    || distance(mother.genome(), father.genome(), config) == 0.0
                {
                    child.mutate(config, rng, registry);
                }
                child.generation = generation;
                child.species = mother.species;
                child
            };
            offspring.push(child);
        }
        offspring
    }
}
