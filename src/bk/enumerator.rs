use log::{debug, info};
use std::time::{Duration, Instant};

use super::ordering::VertexOrder;
use super::recorder::SearchTree;
use super::search::*;
use super::*;
use crate::graph::*;

////////////////////////////////////////////////////////////////////////////////
//
// MaximalCliques
//
////////////////////////////////////////////////////////////////////////////////

/// Maximal-clique enumerator for a given graph and options.
pub struct MaximalCliques<'a> {
    pub g: &'a Graph,
    pub opt: SearchOptions,
}

/// Result of a single enumeration run
#[derive(Debug)]
pub struct Outcome {
    pub clique_count: usize,
    /// Wall-clock time of ordering and search
    pub elapsed: Duration,
    /// Degeneracy of the graph (zero for the natural order)
    pub degeneracy: usize,
    pub recursion_count: usize,
    pub tree: Option<SearchTree>,
}

impl<'a> MaximalCliques<'a> {
    pub fn new(g: &'a Graph, opt: SearchOptions) -> Self {
        MaximalCliques { g, opt }
    }

    /// Counts the maximal cliques.
    pub fn run(&self) -> Outcome {
        self.run_with(|_| ())
    }

    /// Counts the maximal cliques, passing each of them to `report`.
    ///
    /// The slice given to `report` is in the order the vertices were added.
    pub fn run_with<F>(&self, report: F) -> Outcome
    where
        F: FnMut(&[Vertex]),
    {
        let start = Instant::now();

        let ord = match self.opt.ordering {
            VertexOrdering::Degeneracy => VertexOrder::degeneracy(self.g),
            VertexOrdering::Natural => VertexOrder::natural(self.g),
        };
        debug!(
            "{:?} order computed in {:?} (degeneracy: {})",
            self.opt.ordering,
            start.elapsed(),
            ord.degeneracy
        );

        let mut ctx = RunContext::new(self.opt.record_tree, report);
        search_all(self.g, &ord, &mut ctx);
        let elapsed = start.elapsed();

        info!(
            "{} maximal cliques in {:?} ({} calls)",
            ctx.clique_count, elapsed, ctx.recursion_count
        );
        if let Some(t) = &ctx.tree {
            debug_assert_eq!(t.root_clique_count(), ctx.clique_count);
            info!("search tree: {} nodes", t.len());
        }

        Outcome {
            clique_count: ctx.clique_count,
            elapsed,
            degeneracy: ord.degeneracy,
            recursion_count: ctx.recursion_count,
            tree: ctx.tree,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use fixedbitset::FixedBitSet;
    use itertools::Itertools;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const ORDERINGS: [VertexOrdering; 2] =
        [VertexOrdering::Degeneracy, VertexOrdering::Natural];

    fn options(ordering: VertexOrdering, record_tree: bool) -> SearchOptions {
        SearchOptions {
            ordering,
            record_tree,
        }
    }

    fn count(g: &Graph, ordering: VertexOrdering) -> usize {
        MaximalCliques::new(g, options(ordering, false))
            .run()
            .clique_count
    }

    fn random_graph(rng: &mut StdRng, n: usize, density: f64) -> Graph {
        let mut edges = vec![];
        for (u, v) in (0..n as Vertex).tuple_combinations() {
            if rng.gen_bool(density) {
                edges.push(if rng.gen_bool(0.5) { (u, v) } else { (v, u) });
            }
        }
        // Scramble the adjacency order
        for i in (1..edges.len()).rev() {
            edges.swap(i, rng.gen_range(0..=i));
        }
        Graph::from_edges(n, &edges).unwrap()
    }

    /// Maximal cliques by enumerating all the vertex subsets
    fn brute_force(g: &Graph) -> Vec<Vec<Vertex>> {
        let n = g.num_vertices();
        assert!(n <= 16);
        let mut adj = vec![FixedBitSet::with_capacity(n); n];
        for u in g.vertices() {
            for &v in g.neighbors(u) {
                adj[u as usize].insert(v as usize);
            }
        }

        let is_clique = |s: u32| {
            (0..n).filter(|&u| s >> u & 1 == 1).all(|u| {
                (0..n)
                    .filter(|&v| v != u && s >> v & 1 == 1)
                    .all(|v| adj[u][v])
            })
        };

        let mut cliques = vec![];
        for s in 1u32..(1 << n) {
            let maximal = is_clique(s)
                && (0..n)
                    .filter(|&v| s >> v & 1 == 0)
                    .all(|v| !is_clique(s | 1 << v));
            if maximal {
                cliques.push(
                    (0..n as Vertex).filter(|&v| s >> v & 1 == 1).collect(),
                );
            }
        }
        cliques.sort();
        cliques
    }

    fn sorted_cliques(
        g: &Graph,
        ordering: VertexOrdering,
    ) -> Vec<Vec<Vertex>> {
        let mut cliques: Vec<Vec<Vertex>> = vec![];
        let e = MaximalCliques::new(g, options(ordering, false));
        let out =
            e.run_with(|r| cliques.push(r.iter().cloned().sorted().collect()));
        assert_eq!(out.clique_count, cliques.len());
        cliques.sort();
        cliques
    }

    #[test]
    fn test_empty_graph() {
        for n in [1, 2, 7] {
            let g = Graph::from_edges(n, &[] as &[Edge]).unwrap();
            assert_eq!(count(&g, VertexOrdering::Degeneracy), n);
            assert_eq!(count(&g, VertexOrdering::Natural), n);
        }
        let g = Graph::from_edges(0, &[] as &[Edge]).unwrap();
        assert_eq!(count(&g, VertexOrdering::Degeneracy), 0);
    }

    #[test]
    fn test_complete_graph() {
        for n in 1..=8 {
            let edges = (0..n as Vertex).tuple_combinations().collect_vec();
            let g = Graph::from_edges(n, &edges).unwrap();
            assert_eq!(count(&g, VertexOrdering::Degeneracy), 1);
            assert_eq!(count(&g, VertexOrdering::Natural), 1);
        }
    }

    #[test]
    fn test_known_graphs() {
        // Single edge, two isolated vertices, triangle
        let g = Graph::from_edges(2, &[(0, 1)]).unwrap();
        assert_eq!(count(&g, VertexOrdering::Degeneracy), 1);
        let g = Graph::from_edges(2, &[] as &[Edge]).unwrap();
        assert_eq!(count(&g, VertexOrdering::Degeneracy), 2);
        let g = Graph::from_edges(3, &[(0, 1), (1, 2), (0, 2)]).unwrap();
        assert_eq!(count(&g, VertexOrdering::Degeneracy), 1);

        // Cycle of length 5: each edge is a maximal clique
        let edges = [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)];
        let g = Graph::from_edges(5, &edges).unwrap();
        assert_eq!(count(&g, VertexOrdering::Degeneracy), 5);

        // Octahedron K(2,2,2): 8 triangles
        let edges = (0..6 as Vertex)
            .tuple_combinations()
            .filter(|&(u, v)| u / 2 != v / 2)
            .collect_vec();
        let g = Graph::from_edges(6, &edges).unwrap();
        assert_eq!(count(&g, VertexOrdering::Degeneracy), 8);
        assert_eq!(count(&g, VertexOrdering::Natural), 8);
    }

    #[test]
    fn test_random_graphs_against_brute_force() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let n = rng.gen_range(0..=12);
            let density = rng.gen_range(0.1..0.9);
            let g = random_graph(&mut rng, n, density);

            let expected = brute_force(&g);
            for ordering in ORDERINGS {
                assert_eq!(sorted_cliques(&g, ordering), expected);
            }
        }
    }

    #[test]
    fn test_canonicalized_graph_gives_same_cliques() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut g = random_graph(&mut rng, 12, 0.5);
        let before = sorted_cliques(&g, VertexOrdering::Degeneracy);
        g.canonicalize();
        assert_eq!(sorted_cliques(&g, VertexOrdering::Degeneracy), before);
    }

    #[test]
    fn test_tree_is_consistent_with_count() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let n = rng.gen_range(1..=12);
            let density = rng.gen_range(0.2..0.8);
            let g = random_graph(&mut rng, n, density);
            for ordering in ORDERINGS {
                let plain = count(&g, ordering);
                let e = MaximalCliques::new(&g, options(ordering, true));
                let out = e.run();
                let t = out.tree.unwrap();

                assert_eq!(out.clique_count, plain);
                assert_eq!(t.root_clique_count(), plain);
                assert_eq!(t.stats().leaf_cliques, plain);
                assert_eq!(t.roots().count(), n);

                // Explored nodes add up their explored children
                for node in t.nodes().iter().filter(|x| !x.is_leaf()) {
                    if node.pruned_by_pivot {
                        continue;
                    }
                    let sum: usize = node
                        .children
                        .iter()
                        .map(|&c| t.node(c))
                        .filter(|c| !c.pruned_by_pivot)
                        .map(|c| c.cliques_in_subtree)
                        .sum();
                    assert_eq!(node.cliques_in_subtree, sum);
                }
            }
        }
    }

    #[test]
    fn test_idempotent_runs() {
        let mut rng = StdRng::seed_from_u64(3);
        let g = random_graph(&mut rng, 12, 0.6);
        let opt = options(VertexOrdering::Degeneracy, true);
        let e = MaximalCliques::new(&g, opt);
        let a = e.run();
        let b = e.run();
        assert_eq!(a.clique_count, b.clique_count);
        assert_eq!(a.tree, b.tree);
        assert_eq!(a.recursion_count, b.recursion_count);
    }
}
