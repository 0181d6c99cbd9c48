//! Population and the generational scheduler.
//!
//! Each [`epoch`](Population::epoch) adjusts fitness inside every species,
//! keeps the top fifth of each, shares the next generation's slots out in
//! proportion to average species fitness, breeds the offspring and sorts
//! them into species again.

use std::collections::HashSet;
use std::mem;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use slotmap::SlotMap;

use crate::config::NeatConfig;
use crate::error::NeatError;
use crate::gene::{ConnectionGene, NodeGene};
use crate::genome::Genome;
use crate::innovation::InnovationRegistry;
use crate::organism::{Organism, OrganismId};
use crate::species::{Species, SpeciesId};

/// Share of each species kept as parents for the next generation.
const SURVIVAL_CULL: f64 = 0.8;

/// A population of organisms evolving under one configuration.
///
/// All randomness comes from the single rng `R`, so a population built with
/// [`Population::with_seed`] replays identically.
#[derive(Debug)]
pub struct Population<R: Rng = ChaCha8Rng> {
    config: NeatConfig,
    ancestor: Genome,
    organisms: SlotMap<OrganismId, Organism>,
    species: Vec<Species>,
    best: Option<Organism>,
    generation: usize,
    registry: InnovationRegistry,
    rng: R,
    next_species_id: u64,
}

impl Population<ChaCha8Rng> {
    /// Build a population from a seed genome's nodes and connections, with an
    /// rng seeded from the thread rng.
    pub fn new(
        nodes: impl IntoIterator<Item = NodeGene>,
        connections: impl IntoIterator<Item = ConnectionGene>,
        config: NeatConfig,
    ) -> Result<Self, NeatError> {
        Self::with_rng(nodes, connections, config, ChaCha8Rng::from_rng(&mut rand::rng()))
    }

    /// Like [`Population::new`] with a fixed seed.
    pub fn with_seed(
        nodes: impl IntoIterator<Item = NodeGene>,
        connections: impl IntoIterator<Item = ConnectionGene>,
        config: NeatConfig,
        seed: u64,
    ) -> Result<Self, NeatError> {
        Self::with_rng(nodes, connections, config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Population<R> {
    /// Build a population from a seed genome's nodes and connections with a
    /// caller-supplied rng.
    pub fn with_rng(
        nodes: impl IntoIterator<Item = NodeGene>,
        connections: impl IntoIterator<Item = ConnectionGene>,
        config: NeatConfig,
        rng: R,
    ) -> Result<Self, NeatError> {
        let mut registry = InnovationRegistry::new();
        let ancestor = Genome::new(nodes, connections, &mut registry);
        Self::from_ancestor(ancestor, config, rng, registry)
    }

    /// Build a population of `population_size` mutated copies of `ancestor`
    /// and sort them into species.
    pub fn from_ancestor(
        ancestor: Genome,
        config: NeatConfig,
        rng: R,
        mut registry: InnovationRegistry,
    ) -> Result<Self, NeatError> {
        config.validate()?;
        for node in ancestor.nodes() {
            registry.observe_node(node.id);
        }
        for innovation in ancestor.innovations() {
            registry.observe_innovation(innovation);
        }

        let mut population = Self {
            config,
            ancestor,
            organisms: SlotMap::with_key(),
            species: Vec::new(),
            best: None,
            generation: 0,
            registry,
            rng,
            next_species_id: 0,
        };

        for _ in 0..population.config.population_size {
            let mut organism = Organism::new(population.ancestor.copy());
            organism.mutate(&population.config, &mut population.rng, &mut population.registry);
            population.organisms.insert(organism);
        }
        population.speciate();

        log::info!(
            "population of {} organisms across {} species",
            population.organisms.len(),
            population.species.len()
        );
        Ok(population)
    }

    // --- accessors ---------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &NeatConfig {
        &self.config
    }

    /// The genome every organism of generation 0 was copied from.
    #[must_use]
    pub fn ancestor(&self) -> &Genome {
        &self.ancestor
    }

    #[must_use]
    pub fn organisms(&self) -> &SlotMap<OrganismId, Organism> {
        &self.organisms
    }

    #[must_use]
    pub fn organism(&self, id: OrganismId) -> Option<&Organism> {
        self.organisms.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.organisms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.organisms.is_empty()
    }

    #[must_use]
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Best organism of the top species as of the last epoch.
    #[must_use]
    pub fn best(&self) -> Option<&Organism> {
        self.best.as_ref()
    }

    #[must_use]
    pub fn registry(&self) -> &InnovationRegistry {
        &self.registry
    }

    // --- membership --------------------------------------------------------

    /// Insert an organism. It joins a species at the next
    /// [`speciate`](Self::speciate) call.
    pub fn add_organism(&mut self, organism: Organism) -> OrganismId {
        self.organisms.insert(organism)
    }

    /// Insert a fresh, unmutated copy of the ancestor.
    pub fn add_ancestor_copy(&mut self) -> OrganismId {
        let organism = Organism::new(self.ancestor.copy());
        self.add_organism(organism)
    }

    /// Remove an organism from the table and from its species.
    pub fn remove_organism(&mut self, id: OrganismId) -> Option<Organism> {
        let organism = self.organisms.remove(id)?;
        for species in &mut self.species {
            species.remove_organism(id);
        }
        Some(organism)
    }

    // --- evolution ---------------------------------------------------------

    /// Evaluate every organism with `fitness_fn` and breed a new generation
    /// until one scores at least `threshold` or `max_iterations` rounds have
    /// run (`None` runs until convergence).
    ///
    /// Returns the converged organism, or the one with the highest adjusted
    /// fitness when the budget runs out. `None` only for an empty population.
    ///
    /// When the budget runs out the last call was an epoch, so the returned
    /// organism belongs to a freshly bred generation that has not been
    /// evaluated: its `fitness` is 0. Re-evaluate it before relying on it.
    pub fn run<F>(
        &mut self,
        threshold: f64,
        mut fitness_fn: F,
        max_iterations: Option<usize>,
    ) -> Option<&Organism>
    where
        F: FnMut(&Organism) -> f64,
    {
        let mut remaining = max_iterations;
        while remaining != Some(0) {
            if let Some(left) = remaining.as_mut() {
                *left -= 1;
            }

            let mut converged = None;
            for (id, organism) in &mut self.organisms {
                organism.fitness = fitness_fn(&*organism);
                if organism.fitness >= threshold {
                    converged = Some(id);
                    break;
                }
            }
            if let Some(id) = converged {
                log::info!(
                    "converged in generation {} with fitness {:.4}",
                    self.generation,
                    self.organisms[id].fitness
                );
                return self.organisms.get(id);
            }

            self.epoch();
        }

        self.organisms
            .values()
            .reduce(|best, o| if o.adjusted_fitness > best.adjusted_fitness { o } else { best })
    }

    /// Advance one generation.
    pub fn epoch(&mut self) {
        self.generation += 1;
        if self.config.adaptive_compatibility {
            self.adapt_compatibility();
        }

        for species in &mut self.species {
            species.adjust_fitness(&mut self.organisms, &mut self.rng);
            species.cull(SURVIVAL_CULL);
        }

        let best_adjusted =
            |s: &Species| s.best().map_or(f64::NEG_INFINITY, |o| o.adjusted_fitness);
        self.species
            .sort_by(|a, b| best_adjusted(b).total_cmp(&best_adjusted(a)));
        if let Some(best) = self.species.first().and_then(Species::best) {
            self.best = Some(best.clone());
        }

        let averages: Vec<f64> = self.species.iter().map(|s| s.average_fitness).collect();
        let counts = offspring_counts(&averages, self.config.population_size);
        let parents = mem::take(&mut self.organisms);

        for (species, expected) in self.species.iter_mut().zip(counts) {
            let offspring = species.reproduce(
                expected,
                self.generation,
                &parents,
                &self.config,
                &mut self.rng,
                &mut self.registry,
            );
            for child in offspring {
                self.organisms.insert(child);
            }
            species.cull(1.0);
        }

        self.speciate();

        self.species.retain(|species| {
            if species.is_empty() {
                log::debug!("species {} died out at age {}", species.id(), species.age);
            }
            !species.is_empty()
        });
        for species in &mut self.species {
            species.age += 1;
        }

        log::info!(
            "generation {}: best fitness {:.4}, population {}/{}, species {}",
            self.generation,
            self.best.as_ref().map_or(f64::NAN, |o| o.fitness),
            self.organisms.len(),
            self.config.population_size,
            self.species.len()
        );
    }

    /// Assign every organism that is not yet a species member to the first
    /// compatible species, trying its previous species first. Organisms that
    /// fit nowhere found a new species.
    pub fn speciate(&mut self) {
        let assigned: HashSet<OrganismId> = self
            .species
            .iter()
            .flat_map(|s| s.members().iter().copied())
            .collect();
        let pending: Vec<OrganismId> = self
            .organisms
            .keys()
            .filter(|id| !assigned.contains(id))
            .collect();

        for id in pending {
            let Some(organism) = self.organisms.get_mut(id) else {
                continue;
            };
            let genome = organism.genome();
            let previous = organism.species.and_then(|hint| {
                self.species
                    .iter()
                    .position(|s| s.id() == hint && s.is_compatible(genome, &self.config))
            });
            let index = match previous.or_else(|| {
                self.species
                    .iter()
                    .position(|s| s.is_compatible(genome, &self.config))
            }) {
                Some(index) => index,
                None => {
                    let species_id = SpeciesId(self.next_species_id);
                    self.next_species_id += 1;
                    log::debug!("new species {species_id} in generation {}", self.generation);
                    self.species.push(Species::new(species_id));
                    self.species.len() - 1
                }
            };
            self.species[index].add_organism(id, organism);
        }
    }

    /// Move the compatibility threshold one step toward producing
    /// `compatibility_modifier_target` species.
    fn adapt_compatibility(&mut self) {
        let count = self.species.len();
        let target = self.config.compatibility_modifier_target;
        if count == target {
            return;
        }
        let step = self.config.compatibility_modifier;
        let threshold = if count < target {
            self.config.max_compatibility_distance - step
        } else {
            self.config.max_compatibility_distance + step
        };
        self.config.max_compatibility_distance = threshold.max(step);
        log::debug!(
            "compatibility threshold now {:.3} ({count} species, target {target})",
            self.config.max_compatibility_distance
        );
    }
}

/// Offspring slots per species, in proportion to average fitness.
///
/// Negative averages count as 0. When no species has a positive average the
/// slots are shared evenly.
fn offspring_counts(averages: &[f64], population_size: usize) -> Vec<usize> {
    let population_size = population_size as f64;
    let clamped: Vec<f64> = averages
        .iter()
        .map(|&avg| if avg.is_finite() { avg.max(0.0) } else { 0.0 })
        .collect();
    let sum: f64 = clamped.iter().sum();
    let shares_by_fitness = sum.is_finite() && sum > 0.0;
    let even_share = population_size / averages.len().max(1) as f64;

    clamped
        .iter()
        .map(|&avg| {
            let share = if shares_by_fitness {
                avg / sum * population_size
            } else {
                even_share
            };
            if share.is_finite() && share > 0.0 {
                share.round() as usize
            } else {
                0
            }
        })
        .collect()
}
