use crate::graph::*;
use std::collections::VecDeque;

//------------------------------------------------------------------------------
//
// VertexOrder
//
//------------------------------------------------------------------------------

/// Processing order of the top-level vertices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexOrder {
    /// `order[i]` is the `i`-th vertex to be processed
    pub order: Vec<Vertex>,
    /// Inverse of `order`: `rank[order[i]] == i`
    pub rank: Vec<usize>,
    /// Largest residual degree seen at removal (zero for the natural order)
    pub degeneracy: usize,
}

impl VertexOrder {
    /// Identity order; vertex `v` is processed `v`-th.
    pub fn natural(g: &Graph) -> Self {
        VertexOrder {
            order: g.vertices().collect(),
            rank: (0..g.num_vertices()).collect(),
            degeneracy: 0,
        }
    }

    /// Degeneracy order computed by bucket-queue peeling.
    ///
    /// Every bucket is a FIFO queue. A vertex whose residual degree drops is
    /// appended to the lower bucket and its entry in the higher bucket is left
    /// behind as stale, which is skipped when it reaches the front.
    pub fn degeneracy(g: &Graph) -> Self {
        let n = g.num_vertices();
        let mut deg: Vec<usize> = g.vertices().map(|v| g.degree(v)).collect();
        let mut removed = vec![false; n];
        let mut buckets = vec![VecDeque::new(); g.max_degree() + 1];
        for v in g.vertices() {
            buckets[deg[v as usize]].push_back(v);
        }

        let mut order = Vec::with_capacity(n);
        let mut degeneracy = 0;
        let mut i = 0;
        while order.len() < n {
            let Some(v) = buckets[i].pop_front() else {
                i += 1;
                continue;
            };
            if removed[v as usize] || deg[v as usize] != i {
                continue; // Stale entry
            }

            removed[v as usize] = true;
            order.push(v);
            degeneracy = degeneracy.max(i);

            for &u in g.neighbors(v) {
                if !removed[u as usize] {
                    deg[u as usize] -= 1;
                    buckets[deg[u as usize]].push_back(u);
                }
            }
            // Residual degrees decrease by at most one per removal
            i = i.saturating_sub(1);
        }

        VertexOrder {
            rank: to_permutation(&order),
            order,
            degeneracy,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Make a permutation from an ordering.
///
/// Input: `order[position] = vertex`.
/// Output: `perm[vertex] = position`.
pub fn to_permutation(order: &[Vertex]) -> Vec<usize> {
    let mut perm = vec![0; order.len()];
    for (i, &v) in order.iter().enumerate() {
        perm[v as usize] = i;
    }
    perm
}
