//! # Augment NEAT
//!
//! NeuroEvolution of Augmenting Topologies: a population of networks whose
//! weights and structure both evolve, grouped into species so that new
//! structure gets a few generations to prove itself before it has to compete
//! with the whole population.
//!
//! ## Features
//!
//! - **Innovation tracking**: an explicit [`InnovationRegistry`] hands out
//!   connection innovation numbers and node ids; no global state
//! - **Structural mutation**: add-node, add-connection (cycle-checked),
//!   weight perturbation, enable toggling and activation changes
//! - **Speciation**: compatibility distance against a per-species
//!   representative, with fitness sharing, stagnation and complexity penalties
//! - **Deterministic runs**: one injectable rng feeds every draw
//! - **TOML configuration**: every parameter has a default; files list only
//!   what they change
//!
//! ## Quick Start
//!
//! ```rust
//! use augment_neat::{ConnectionGene, NeatConfig, NodeGene, NodeId, Population};
//!
//! let nodes = vec![
//!     NodeGene::bias(NodeId(0)),
//!     NodeGene::input(NodeId(1)),
//!     NodeGene::input(NodeId(2)),
//!     NodeGene::output(NodeId(3)),
//! ];
//! let connections = vec![
//!     ConnectionGene::new(NodeId(0), NodeId(3), 0.0),
//!     ConnectionGene::new(NodeId(1), NodeId(3), 0.0),
//!     ConnectionGene::new(NodeId(2), NodeId(3), 0.0),
//! ];
//! let config = NeatConfig {
//!     population_size: 50,
//!     ..NeatConfig::default()
//! };
//!
//! let mut population = Population::with_seed(nodes, connections, config, 42).unwrap();
//! let best = population
//!     .run(
//!         0.9,
//!         |organism| organism.activate(&[1.0, 0.0])[0],
//!         Some(20),
//!     )
//!     .unwrap();
//! println!("best fitness: {}", best.fitness);
//! ```
//!
//! ## Architecture
//!
//! ### Genome and phenotype
//!
//! A [`Genome`] holds nodes keyed by [`NodeId`] and connection genes keyed by
//! innovation number. An [`Organism`] wraps a genome with its fitness and
//! lazily builds a [`Network`] from the enabled connections the first time it
//! is activated. The network is cached and not rebuilt on later mutation.
//!
//! ### Generations
//!
//! [`Population::epoch`] adjusts fitness per species, keeps the top fifth of
//! each species as parents, shares the next generation's slots out in
//! proportion to average species fitness and re-speciates the offspring.

pub mod activation;
pub mod compatibility;
pub mod config;
pub mod crossover;
pub mod error;
pub mod gene;
pub mod genome;
pub mod innovation;
pub mod network;
pub mod organism;
pub mod population;
pub mod species;
pub mod topology;

// Re-exports for convenience
pub use activation::Activation;
pub use compatibility::{distance, is_similar};
pub use config::NeatConfig;
pub use crossover::{crossover, crossover_genomes};
pub use error::NeatError;
pub use gene::{ConnectionGene, Innovation, NodeGene, NodeId, NodeKind};
pub use genome::Genome;
pub use innovation::InnovationRegistry;
pub use network::{Network, NetworkError};
pub use organism::{Organism, OrganismId};
pub use population::Population;
pub use species::{Species, SpeciesId};
pub use topology::{EdgeFilter, GraphTopology};
