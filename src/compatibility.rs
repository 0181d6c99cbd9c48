//! Compatibility distance between genomes.
//!
//! The "excess" term is the difference in connection counts rather than the
//! number of genes past the other genome's highest innovation. Genes present
//! in only one genome count as disjoint after that difference has been taken
//! out once.

use std::collections::BTreeSet;

use crate::config::NeatConfig;
use crate::gene::Innovation;
use crate::genome::Genome;

/// Compatibility distance between two genomes. Symmetric, and 0 for a genome
/// compared with itself.
#[must_use]
pub fn distance(a: &Genome, b: &Genome, config: &NeatConfig) -> f64 {
    let count_a = a.connection_count();
    let count_b = b.connection_count();
    let size = count_a.max(count_b).max(1) as f64;

    let excess = count_a.abs_diff(count_b) as f64;
    let mut disjoint = -excess;
    let mut weight_sum = 0.0;

    let union: BTreeSet<Innovation> = a.innovations().chain(b.innovations()).collect();
    for innovation in union {
        match (a.connection_at(innovation), b.connection_at(innovation)) {
            (Some(gene_a), Some(gene_b)) => weight_sum += (gene_a.weight - gene_b.weight).abs(),
            _ => disjoint += 1.0,
        }
    }

    let normaliser = (size - disjoint) / config.weight_difference_coefficient;
    let weight_term = if normaliser == 0.0 || !normaliser.is_finite() {
        0.0
    } else {
        weight_sum / normaliser
    };

    (excess * config.excess_coefficient + disjoint * config.disjoint_coefficient) / size
        + weight_term
}

/// Whether two genomes are close enough to share a species.
#[must_use]
pub fn is_similar(a: &Genome, b: &Genome, config: &NeatConfig) -> bool {
    distance(a, b, config) <= config.max_compatibility_distance
}
