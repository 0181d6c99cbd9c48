//! XOR example for augment-neat.
//!
//! Evolves a network that solves XOR, the classic neuroevolution benchmark:
//! it cannot be solved without at least one hidden node, so the population has
//! to grow structure.
//!
//! Run with: `RUST_LOG=info cargo run --example xor [config.toml]`

use std::path::Path;

use augment_neat::{Genome, InnovationRegistry, NeatConfig, Organism, Population};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Fitness a champion needs to count as a solution.
const TARGET_FITNESS: f64 = 3.9;

/// XOR truth table.
const TEST_CASES: [([f64; 2], f64); 4] = [
    ([0.0, 0.0], 0.0),
    ([0.0, 1.0], 1.0),
    ([1.0, 0.0], 1.0),
    ([1.0, 1.0], 0.0),
];

/// Fitness: 4 minus the squared error over the truth table, so 4.0 is perfect.
fn xor_fitness(organism: &Organism) -> f64 {
    let error: f64 = TEST_CASES
        .iter()
        .map(|(inputs, expected)| (organism.activate(inputs)[0] - expected).powi(2))
        .sum();
    4.0 - error
}

fn main() {
    env_logger::init();

    println!("NEAT XOR Example");
    println!("================\n");

    let config = match std::env::args().nth(1) {
        Some(path) => match NeatConfig::load(Path::new(&path)) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
        },
        None => NeatConfig {
            population_size: 150,
            mutate_add_node_probability: 0.05,
            mutate_add_connection_probability: 0.1,
            ..NeatConfig::default()
        },
    };

    let generations = 300;
    let seed = 42;
    println!("Population: {}", config.population_size);
    println!("Generations: {}", generations);
    println!();

    // Bias and two inputs wired to one output with random weights.
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut registry = InnovationRegistry::new();
    let ancestor = Genome::fully_connected(2, 1, true, &config, &mut rng, &mut registry);

    let mut population = match Population::from_ancestor(ancestor, config, rng, registry) {
        Ok(population) => population,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let Some(champion) = population.run(TARGET_FITNESS, xor_fitness, Some(generations)) else {
        println!("Population died out.");
        return;
    };
    let champion = champion.clone();
    // A champion returned after the budget ran out has not been scored yet.
    let fitness = xor_fitness(&champion);

    if fitness >= TARGET_FITNESS {
        println!("Solved in generation {}", population.generation());
    } else {
        println!("No solution found within {} generations", generations);
    }
    println!("==================");
    println!("Species: {}", population.species().len());
    println!("Best fitness: {:.4}", fitness);
    println!("Nodes: {}", champion.node_count());
    println!(
        "Enabled connections: {}",
        champion.genome().enabled_connection_count()
    );
    println!("Hidden nodes: {}", champion.genome().hidden_ids().len());

    println!("\nChampion XOR outputs:");
    for (inputs, expected) in &TEST_CASES {
        let output = champion.activate(inputs)[0];
        let rounded = if output > 0.5 { 1.0 } else { 0.0 };
        let status = if (rounded - expected).abs() < 0.1 {
            "✓"
        } else {
            "✗"
        };
        println!(
            "  {} XOR {} = {:.4} (expected {}) {}",
            inputs[0] as i32, inputs[1] as i32, output, *expected as i32, status
        );
    }
}
