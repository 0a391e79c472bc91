use log::{debug, trace};

use super::ordering::VertexOrder;
use super::partition::*;
use super::recorder::*;
use crate::graph::*;

////////////////////////////////////////////////////////////////////////////////
//
// RunContext
//
////////////////////////////////////////////////////////////////////////////////

/// Mutable state of a single enumeration run.
pub struct RunContext<F> {
    /// Number of maximal cliques found, excluding pivot-pruned explorations
    pub clique_count: usize,
    /// Number of recursive calls, including pivot-pruned explorations
    pub recursion_count: usize,
    /// Search tree being recorded, if enabled
    pub tree: Option<SearchTree>,
    /// Callback invoked with R for each maximal clique that is counted
    report: F,
}

impl<F> RunContext<F>
where
    F: FnMut(&[Vertex]),
{
    pub fn new(record_tree: bool, report: F) -> Self {
        RunContext {
            clique_count: 0,
            recursion_count: 0,
            tree: record_tree.then(SearchTree::new),
            report,
        }
    }
}

/// Position of a call in the search tree
#[derive(Clone, Copy, Debug)]
struct Frame {
    parent: Option<NodeId>,
    depth: usize,
    candidate: Option<Vertex>,
    /// Inside an exploration that pivoting would skip
    shadow: bool,
}

impl Frame {
    fn root() -> Self {
        Frame {
            parent: None,
            depth: 0,
            candidate: None,
            shadow: false,
        }
    }

    fn child(&self, node: Option<NodeId>, cand: Vertex, shadow: bool) -> Self {
        Frame {
            parent: node,
            depth: self.depth + 1,
            candidate: Some(cand),
            shadow: self.shadow || shadow,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
//
// Public Free Functions
//
////////////////////////////////////////////////////////////////////////////////

/// Enumerates the maximal cliques of `g`, processing the top-level vertices
/// in the order of `ord`.
///
/// For top-level vertex `v`, the search starts from R = {v}, X = neighbors
/// ranked before `v`, and P = neighbors ranked after `v`.
pub fn search_all<F>(g: &Graph, ord: &VertexOrder, ctx: &mut RunContext<F>)
where
    F: FnMut(&[Vertex]),
{
    debug_assert_eq!(ord.len(), g.num_vertices());

    let mut part = Partition::new(g);
    for &v in &ord.order {
        let w = part.open_root(v, &ord.rank);
        let n = expand(&mut part, w, ctx, Frame::root());
        part.close_root();
        debug!(
            "root {v}: |X| = {}, |P| = {}, cliques = {n}",
            w.x_len(),
            w.p_len()
        );
    }
}

////////////////////////////////////////////////////////////////////////////////
//
// Private Free Functions
//
////////////////////////////////////////////////////////////////////////////////

/// Recursive step of the pivoted Bron-Kerbosch algorithm.
///
/// Returns the number of maximal cliques found under this call. The window
/// of the caller is intact when this returns.
fn expand<F>(
    part: &mut Partition,
    mut w: Window,
    ctx: &mut RunContext<F>,
    frame: Frame,
) -> usize
where
    F: FnMut(&[Vertex]),
{
    ctx.recursion_count += 1;
    let node = ctx.tree.as_mut().map(|t| {
        t.open(
            frame.parent,
            frame.depth,
            frame.candidate,
            frame.shadow,
            part.clique(),
            w,
        )
    });

    if w.is_closed() {
        if !frame.shadow {
            ctx.clique_count += 1;
            (ctx.report)(part.clique());
        }
        if let (Some(t), Some(id)) = (ctx.tree.as_mut(), node) {
            t.close(id, 1);
        }
        return 1;
    }

    let pivot = part.select_pivot(w);
    let (explored, pruned) = part.split_by_pivot(w, pivot);
    trace!(
        "R = {:?}, |X| = {}, |P| = {}, pivot = {pivot}, explored = {:?}",
        part.clique(),
        w.x_len(),
        w.p_len(),
        &explored,
    );

    let mut found = 0;
    for &cand in &explored {
        found += {
            let mut ext = part.extend(w, cand);
            let child = ext.child();
            expand(&mut ext, child, ctx, frame.child(node, cand, false))
        };
        part.retire(&mut w, cand);
    }

    if let Some(id) = node {
        // Visit what pivoting skipped on private copies so that the shared
        // partition is never touched
        for &cand in &pruned {
            let mut shadow = part.clone();
            let mut ext = shadow.extend(w, cand);
            let child = ext.child();
            expand(&mut ext, child, ctx, frame.child(node, cand, true));
        }

        if let Some(t) = ctx.tree.as_mut() {
            t.close(id, found);
        }
    }

    found
}

#[cfg(test)]
mod test {
    use super::*;

    fn count(g: &Graph, ord: &VertexOrder) -> usize {
        let mut ctx = RunContext::new(false, |_: &[Vertex]| ());
        search_all(g, ord, &mut ctx);
        ctx.clique_count
    }

    #[test]
    fn test_search_small_graphs() {
        // Two isolated vertices
        let g = Graph::from_edges(2, &[] as &[Edge]).unwrap();
        assert_eq!(count(&g, &VertexOrder::degeneracy(&g)), 2);

        // A single edge
        let g = Graph::from_edges(2, &[(0, 1)]).unwrap();
        assert_eq!(count(&g, &VertexOrder::degeneracy(&g)), 1);

        // A triangle
        let g = Graph::from_edges(3, &[(0, 1), (1, 2), (2, 0)]).unwrap();
        assert_eq!(count(&g, &VertexOrder::degeneracy(&g)), 1);
        assert_eq!(count(&g, &VertexOrder::natural(&g)), 1);
    }

    #[test]
    fn test_search_reports_cliques() {
        // v0--v1--v2
        //      |  /
        //      v3
        let g = Graph::from_edges(4, &[(0, 1), (1, 2), (1, 3), (2, 3)])
            .unwrap();
        let mut cliques = vec![];
        let mut ctx = RunContext::new(false, |r: &[Vertex]| {
            let mut r = r.to_vec();
            r.sort();
            cliques.push(r);
        });
        search_all(&g, &VertexOrder::degeneracy(&g), &mut ctx);
        assert_eq!(ctx.clique_count, 2);
        drop(ctx);

        cliques.sort();
        assert_eq!(cliques, vec![vec![0, 1], vec![1, 2, 3]]);
    }

    #[test]
    fn test_search_records_pruned_branches() {
        // K4: from the first root, every other vertex is in P and the pivot
        // dominates all but itself
        let edges = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
        let g = Graph::from_edges(4, &edges).unwrap();
        let mut ctx = RunContext::new(true, |_: &[Vertex]| ());
        search_all(&g, &VertexOrder::natural(&g), &mut ctx);

        let t = ctx.tree.unwrap();
        assert_eq!(ctx.clique_count, 1);
        assert_eq!(t.root_clique_count(), 1);
        assert_eq!(t.roots().count(), 4);
        assert!(t.nodes().iter().any(|n| n.pruned_by_pivot));

        // Children of a pruned node are pruned as well
        for n in t.nodes() {
            if let Some(p) = n.parent_id {
                assert!(!t.node(p).pruned_by_pivot || n.pruned_by_pivot);
                assert_eq!(n.depth, t.node(p).depth + 1);
                assert_eq!(
                    n.current_clique.len(),
                    t.node(p).current_clique.len() + 1
                );
            }
        }

        // Explored and pruned children of the first root
        let root = t.node(0);
        assert_eq!(root.current_clique, vec![0]);
        assert_eq!((root.x_size, root.p_size), (0, 3));
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.cliques_in_subtree, 1);
        let n_pruned = root
            .children
            .iter()
            .filter(|&&c| t.node(c).pruned_by_pivot)
            .count();
        assert_eq!(n_pruned, 2);
    }
}
