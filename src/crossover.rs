//! Gene-alignment recombination.
//!
//! Connection genes are lined up by innovation number. A gene carried by both
//! parents comes from either one with even odds; a gene carried by only one
//! parent is always inherited. Genes that would close a cycle in the child
//! are dropped.

use rand::Rng;

use crate::genome::Genome;
use crate::organism::Organism;

/// Breed two organisms. The one with the higher adjusted fitness is the
/// fitter parent; on a tie `a` is.
pub fn crossover<R: Rng>(a: &Organism, b: &Organism, rng: &mut R) -> Organism {
    let (more_fit, less_fit) = if b.adjusted_fitness > a.adjusted_fitness {
        (b, a)
    } else {
        (a, b)
    };
    Organism::new(crossover_genomes(more_fit.genome(), less_fit.genome(), rng))
}

/// Breed two genomes. The child starts from the fitter parent's bias, input
/// and output nodes, never gains an innovation absent from both parents, and
/// inherits the fitter parent's `initial_size`.
pub fn crossover_genomes<R: Rng>(more_fit: &Genome, less_fit: &Genome, rng: &mut R) -> Genome {
    let mut child = Genome::empty();
    for node in more_fit.nodes().filter(|n| !n.is_hidden()) {
        child.add_node(node.clone());
    }

    let mut innovations: Vec<_> = more_fit.innovations().chain(less_fit.innovations()).collect();
    innovations.sort_unstable();
    innovations.dedup();

    for innovation in innovations {
        let (parent, gene) = match (
            more_fit.connection_at(innovation),
            less_fit.connection_at(innovation),
        ) {
            (Some(fit_gene), Some(other_gene)) => {
                if rng.random::<f64>() > 0.5 {
                    (more_fit, fit_gene)
                } else {
                    (less_fit, other_gene)
                }
            }
            (Some(gene), None) => (more_fit, gene),
            (None, Some(gene)) => (less_fit, gene),
            (None, None) => continue,
        };

        if child.would_create_cycle(gene.from, gene.to) {
            continue;
        }
        for id in [gene.from, gene.to] {
            if let Some(node) = parent.node(id) {
                child.add_node(node.clone());
            }
        }
        child.add_inherited_connection(gene.clone());
    }

    child.set_initial_size(more_fit.initial_size());
    child
}
