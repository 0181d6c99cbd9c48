//! Benchmarks for augment-neat.

use std::hint::black_box;

use augment_neat::{
    crossover_genomes, distance, ConnectionGene, Genome, InnovationRegistry, NeatConfig,
    NodeGene, NodeId, Organism, Population,
};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn grown_genome(
    config: &NeatConfig,
    rng: &mut ChaCha8Rng,
    registry: &mut InnovationRegistry,
    steps: usize,
) -> Genome {
    let mut genome = Genome::fully_connected(4, 2, true, config, rng, registry);
    for _ in 0..steps {
        genome.mutate_add_node(rng, registry);
        genome.mutate_add_connection(config, rng, registry);
    }
    genome
}

fn bench_genome_creation(c: &mut Criterion) {
    let config = NeatConfig::default();

    c.bench_function("genome_fully_connected", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut registry = InnovationRegistry::new();
        b.iter(|| {
            black_box(Genome::fully_connected(
                4,
                2,
                true,
                &config,
                &mut rng,
                &mut registry,
            ));
        });
    });
}

fn bench_mutation(c: &mut Criterion) {
    let config = NeatConfig {
        mutate_add_connection_probability: 0.3,
        mutate_add_node_probability: 0.1,
        ..NeatConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut registry = InnovationRegistry::new();
    let genome = grown_genome(&config, &mut rng, &mut registry, 5);

    c.bench_function("genome_mutation", |b| {
        let mut g = genome.clone();
        b.iter(|| {
            g.mutate(&config, &mut rng, &mut registry);
            black_box(&g);
        });
    });
}

fn bench_crossover(c: &mut Criterion) {
    let config = NeatConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut registry = InnovationRegistry::new();
    let parent1 = grown_genome(&config, &mut rng, &mut registry, 10);
    let parent2 = grown_genome(&config, &mut rng, &mut registry, 10);

    c.bench_function("genome_crossover", |b| {
        b.iter(|| {
            black_box(crossover_genomes(&parent1, &parent2, &mut rng));
        });
    });
}

fn bench_activation(c: &mut Criterion) {
    let config = NeatConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut registry = InnovationRegistry::new();
    let organism = Organism::new(grown_genome(&config, &mut rng, &mut registry, 20));
    let inputs = [0.5, -0.5, 0.25, 1.0];

    c.bench_function("network_activate", |b| {
        b.iter(|| {
            black_box(organism.activate(black_box(&inputs)));
        });
    });
}

fn bench_compatibility_distance(c: &mut Criterion) {
    let config = NeatConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut registry = InnovationRegistry::new();
    let genome1 = grown_genome(&config, &mut rng, &mut registry, 10);
    let genome2 = grown_genome(&config, &mut rng, &mut registry, 10);

    c.bench_function("compatibility_distance", |b| {
        b.iter(|| {
            black_box(distance(&genome1, &genome2, &config));
        });
    });
}

fn bench_epoch(c: &mut Criterion) {
    let nodes = vec![
        NodeGene::bias(NodeId(0)),
        NodeGene::input(NodeId(1)),
        NodeGene::input(NodeId(2)),
        NodeGene::output(NodeId(3)),
    ];
    let connections = vec![
        ConnectionGene::new(NodeId(0), NodeId(3), 0.0),
        ConnectionGene::new(NodeId(1), NodeId(3), 0.0),
        ConnectionGene::new(NodeId(2), NodeId(3), 0.0),
    ];
    let config = NeatConfig {
        population_size: 150,
        ..NeatConfig::default()
    };

    c.bench_function("population_epoch_150", |b| {
        let mut population =
            Population::with_seed(nodes.clone(), connections.clone(), config.clone(), 42)
                .expect("valid config");
        b.iter(|| {
            population.run(f64::INFINITY, |o| o.activate(&[1.0, 0.0])[0], Some(1));
        });
    });
}

criterion_group!(
    benches,
    bench_genome_creation,
    bench_mutation,
    bench_crossover,
    bench_activation,
    bench_compatibility_distance,
    bench_epoch,
);
criterion_main!(benches);
