//! Graph reachability over a genome's connections in CSR form.
//!
//! Structural mutation and crossover must never introduce a cycle. Both ask
//! the same question, "would the edge `from -> to` close a loop?", which is
//! answered by searching forward from `to` for `from`. [`GraphTopology`]
//! snapshots the connection graph once into Compressed Sparse Row arrays so
//! that repeated queries (up to `max_add_connection_tries` per mutation) do
//! not rescan the connection map.
//!
//! Disabled connections are part of the graph by default: a disabled gene can
//! be re-enabled later by mutation, and the cycle check must already account
//! for it.

use std::collections::VecDeque;

use crate::gene::NodeId;
use crate::genome::Genome;

/// Which connections become edges of the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeFilter {
    /// Every connection gene, enabled or not.
    All,
    /// Only enabled connection genes.
    Enabled,
}

/// CSR snapshot of a genome's connection graph.
#[derive(Debug, Clone)]
pub struct GraphTopology {
    /// Node ids in ascending order; position is the dense index.
    idx_to_node: Vec<NodeId>,
    /// Length = node_count + 1.
    offsets: Vec<usize>,
    /// `targets[offsets[i]..offsets[i + 1]]` are the successors of node i.
    targets: Vec<usize>,
}

impl GraphTopology {
    /// Build a snapshot of the genome's connections.
    #[must_use]
    pub fn from_genome(genome: &Genome, filter: EdgeFilter) -> Self {
        // Genome nodes iterate in ascending id order, so binary search works.
        let idx_to_node: Vec<NodeId> = genome.nodes().map(|node| node.id).collect();
        let node_count = idx_to_node.len();

        let edges: Vec<(usize, usize)> = genome
            .connections()
            .filter(|conn| filter == EdgeFilter::All || conn.enabled)
            .filter_map(|conn| {
                let from = idx_to_node.binary_search(&conn.from).ok()?;
                let to = idx_to_node.binary_search(&conn.to).ok()?;
                Some((from, to))
            })
            .collect();

        let mut counts = vec![0usize; node_count];
        for &(from, _) in &edges {
            counts[from] += 1;
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        offsets.push(0);
        for count in counts {
            let last = offsets[offsets.len() - 1];
            offsets.push(last + count);
        }

        let mut targets = vec![0usize; edges.len()];
        let mut write_pos = offsets[..node_count].to_vec();
        for (from, to) in edges {
            targets[write_pos[from]] = to;
            write_pos[from] += 1;
        }

        Self {
            idx_to_node,
            offsets,
            targets,
        }
    }

    /// Dense index of a node, if it is part of the snapshot.
    #[inline]
    #[must_use]
    pub fn node_index(&self, id: NodeId) -> Option<usize> {
        self.idx_to_node.binary_search(&id).ok()
    }

    /// Number of nodes in the snapshot.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.idx_to_node.len()
    }

    /// Iterate over successors of a node (forward edges).
    #[inline]
    pub fn successors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.targets[self.offsets[idx]..self.offsets[idx + 1]]
            .iter()
            .copied()
    }

    /// Whether `target` can be reached from `start` following forward edges.
    #[must_use]
    pub fn reaches(&self, start: NodeId, target: NodeId) -> bool {
        let (Some(start), Some(target)) = (self.node_index(start), self.node_index(target)) else {
            return false;
        };
        if start == target {
            return true;
        }

        let mut visited = vec![false; self.node_count()];
        let mut queue = VecDeque::from([start]);
        visited[start] = true;

        while let Some(current) = queue.pop_front() {
            for succ in self.successors(current) {
                if succ == target {
                    return true;
                }
                if !visited[succ] {
                    visited[succ] = true;
                    queue.push_back(succ);
                }
            }
        }
        false
    }

    /// Whether adding the edge `from -> to` would close a cycle.
    ///
    /// Self-loops count as cycles.
    #[must_use]
    pub fn would_create_cycle(&self, from: NodeId, to: NodeId) -> bool {
        from == to || self.reaches(to, from)
    }

    /// Detect any cycle using Kahn's algorithm.
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        let node_count = self.node_count();
        let mut in_degree = vec![0usize; node_count];
        for &target in &self.targets {
            in_degree[target] += 1;
        }

        let mut queue: VecDeque<usize> = (0..node_count).filter(|&i| in_degree[i] == 0).collect();
        let mut processed = 0;
        while let Some(u) = queue.pop_front() {
            processed += 1;
            for v in self.successors(u) {
                in_degree[v] -= 1;
                if in_degree[v] == 0 {
                    queue.push_back(v);
                }
            }
        }

        processed != node_count
    }
}
