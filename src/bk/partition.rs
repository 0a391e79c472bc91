use fixedbitset::FixedBitSet;
use std::ops::{Deref, DerefMut, Range};

use crate::graph::*;

////////////////////////////////////////////////////////////////////////////////
//
// Window
//
////////////////////////////////////////////////////////////////////////////////

/// Index ranges of X and P in `Partition::v_list` for a single frame.
///
/// X = `v_list[x..p]`, P = `v_list[p..e]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub x: usize,
    pub p: usize,
    pub e: usize,
}

impl Window {
    pub fn new(x: usize, p: usize, e: usize) -> Self {
        debug_assert!(x <= p && p <= e);
        Window { x, p, e }
    }

    pub fn x_range(&self) -> Range<usize> {
        self.x..self.p
    }

    pub fn p_range(&self) -> Range<usize> {
        self.p..self.e
    }

    pub fn x_len(&self) -> usize {
        self.p - self.x
    }

    pub fn p_len(&self) -> usize {
        self.e - self.p
    }

    /// Both X and P are empty
    pub fn is_closed(&self) -> bool {
        self.x == self.e
    }

    fn in_p(&self, i: usize) -> bool {
        self.p <= i && i < self.e
    }
}

////////////////////////////////////////////////////////////////////////////////
//
// Partition
//
////////////////////////////////////////////////////////////////////////////////

/// Mutable state shared by all the frames of a search.
///
/// Invariants visible from outside a frame:
/// - `rev_idx` is the inverse permutation of `v_list`.
/// - For each `u` in the window, the prefix of `adj[u]` is exactly the
///   neighbors of `u` in P, terminated by a neighbor outside P or by the end of
///   the list.
#[derive(Clone, Debug)]
pub struct Partition {
    v_list: Vec<Vertex>,
    rev_idx: Vec<usize>,
    /// Working copy of the adjacency lists whose order is permuted in place
    adj: Vec<Vec<Vertex>>,
    /// R; the clique under construction
    clique: Vec<Vertex>,
}

impl Partition {
    pub fn new(g: &Graph) -> Self {
        Partition {
            v_list: g.vertices().collect(),
            rev_idx: (0..g.num_vertices()).collect(),
            adj: g.adjacency().clone(),
            clique: Vec::new(),
        }
    }

    pub fn clique(&self) -> &[Vertex] {
        &self.clique
    }

    pub fn vertices(&self, r: Range<usize>) -> &[Vertex] {
        &self.v_list[r]
    }

    /// Lays out the initial frame for top-level vertex `v`: neighbors ranked
    /// before `v` become X, the others become P, and R = {v}.
    ///
    /// Returns the window, which always starts at index 0.
    pub fn open_root(&mut self, v: Vertex, rank: &[usize]) -> Window {
        debug_assert!(self.clique.is_empty());

        let r = rank[v as usize];
        let (xs, ps): (Vec<Vertex>, Vec<Vertex>) = self.adj[v as usize]
            .iter()
            .partition(|&&u| rank[u as usize] < r);
        for (k, &u) in xs.iter().chain(&ps).enumerate() {
            // Positions below `k` hold vertices already placed
            let i = self.rev_idx[u as usize];
            debug_assert!(i >= k);
            swap_positions(&mut self.v_list, &mut self.rev_idx, i, k);
        }
        let w = Window::new(0, xs.len(), xs.len() + ps.len());

        for i in 0..w.e {
            let u = self.v_list[i];
            let rev_idx = &self.rev_idx;
            let mut write = 0;
            let list = &mut self.adj[u as usize];
            for read in 0..list.len() {
                if w.in_p(rev_idx[list[read] as usize]) {
                    list.swap(write, read);
                    write += 1;
                }
            }
        }

        self.clique.push(v);
        self.debug_check(w);
        w
    }

    /// Closes the frame opened by [`Partition::open_root`].
    pub fn close_root(&mut self) {
        self.clique.pop();
        debug_assert!(self.clique.is_empty());
    }

    /// Neighbors of `u` in P, read from the coherent prefix of `adj[u]`.
    pub fn p_neighbors<'a>(
        &'a self,
        u: Vertex,
        w: Window,
    ) -> impl Iterator<Item = Vertex> + 'a {
        self.adj[u as usize]
            .iter()
            .cloned()
            .take_while(move |&x| w.in_p(self.rev_idx[x as usize]))
    }

    fn is_p_neighbor(&self, u: Vertex, cand: Vertex, w: Window) -> bool {
        self.p_neighbors(u, w).any(|x| x == cand)
    }

    /// Returns the vertex in X ∪ P with the most neighbors in P. Ties are
    /// broken by the first vertex in `v_list` order.
    pub fn select_pivot(&self, w: Window) -> Vertex {
        debug_assert!(!w.is_closed());

        let mut pivot = self.v_list[w.x];
        let mut max_count = None;
        for &v in &self.v_list[w.x..w.e] {
            let n = self.p_neighbors(v, w).count();
            if max_count.map_or(true, |m| n > m) {
                pivot = v;
                max_count = Some(n);
            }
        }
        pivot
    }

    /// Splits P into candidates that must be explored (non-neighbors of
    /// `pivot`) and candidates that the pivot makes redundant (neighbors).
    /// Both keep the order of `v_list`.
    pub fn split_by_pivot(
        &self,
        w: Window,
        pivot: Vertex,
    ) -> (Vec<Vertex>, Vec<Vertex>) {
        let mut dominated = FixedBitSet::with_capacity(w.p_len());
        for u in self.p_neighbors(pivot, w) {
            dominated.insert(self.rev_idx[u as usize] - w.p);
        }

        let n_pruned = dominated.count_ones(..);
        let mut explored = Vec::with_capacity(w.p_len() - n_pruned);
        let mut pruned = Vec::with_capacity(n_pruned);
        for (i, &v) in self.v_list[w.p_range()].iter().enumerate() {
            if dominated[i] {
                pruned.push(v);
            } else {
                explored.push(v);
            }
        }
        (explored, pruned)
    }

    /// Adds `cand` (in P of `w`) to R and narrows the window to the neighbors
    /// of `cand`. The returned guard undoes everything but the position of
    /// `cand` when dropped.
    pub fn extend(&mut self, w: Window, cand: Vertex) -> Extension<'_> {
        debug_assert!(w.in_p(self.rev_idx[cand as usize]));

        // X' is gathered right to left just below `p`
        let mut num_x = 0;
        for j in w.x_range().rev() {
            if self.is_p_neighbor(self.v_list[j], cand, w) {
                num_x += 1;
                let k = w.p - num_x;
                swap_positions(&mut self.v_list, &mut self.rev_idx, j, k);
            }
        }

        // P' is gathered left to right from `p`
        let mut num_p = 0;
        for j in w.p_range() {
            if self.is_p_neighbor(self.v_list[j], cand, w) {
                let k = w.p + num_p;
                swap_positions(&mut self.v_list, &mut self.rev_idx, j, k);
                num_p += 1;
            }
        }

        let child = Window::new(w.p - num_x, w.p, w.p + num_p);

        // Move neighbors in P' to the front of each parent prefix
        for i in child.x..child.e {
            let u = self.v_list[i];
            let rev_idx = &self.rev_idx;
            let list = &mut self.adj[u as usize];
            let mut write = 0;
            for read in 0..list.len() {
                let at = rev_idx[list[read] as usize];
                if !w.in_p(at) {
                    break;
                }
                if child.in_p(at) {
                    list.swap(write, read);
                    write += 1;
                }
            }
        }

        self.clique.push(cand);
        self.debug_check(child);

        Extension {
            part: self,
            parent: w,
            child,
            cand,
        }
    }

    /// Inverse of [`Partition::extend`] except for `v_list`; `cand` is moved
    /// to the tail of the parent prefix of every vertex in the child window.
    fn retract(&mut self, parent: Window, child: Window, cand: Vertex) {
        let popped = self.clique.pop();
        debug_assert_eq!(popped, Some(cand));

        for i in child.x..child.e {
            let u = self.v_list[i];
            let rev_idx = &self.rev_idx;
            let list = &mut self.adj[u as usize];
            let end = list
                .iter()
                .position(|&x| !parent.in_p(rev_idx[x as usize]))
                .unwrap_or(list.len());
            let at = list[..end].iter().position(|&x| x == cand);
            debug_assert!(at.is_some(), "{cand} is not in the prefix of {u}");
            if let Some(at) = at {
                list[at..end].rotate_left(1);
            }
        }

        self.debug_check(parent);
    }

    /// Moves `cand` from P to X of `w` for the following siblings.
    ///
    /// Must be called after the extension by `cand` is dropped; `cand` is then
    /// at the tail of every neighbor's prefix and becomes its sentinel.
    pub fn retire(&mut self, w: &mut Window, cand: Vertex) {
        let i = self.rev_idx[cand as usize];
        debug_assert!(w.in_p(i));
        swap_positions(&mut self.v_list, &mut self.rev_idx, i, w.p);
        w.p += 1;
        self.debug_check(*w);
    }

    fn debug_check(&self, w: Window) {
        if cfg!(debug_assertions) {
            if let Err(msg) = self.check_invariants(w) {
                panic!("{msg}");
            }
        }
    }

    /// Returns true iff `rev_idx` is the inverse permutation of `v_list`.
    pub fn is_inverse(&self) -> bool {
        self.v_list.len() == self.rev_idx.len()
            && self
                .v_list
                .iter()
                .enumerate()
                .all(|(i, &v)| self.rev_idx[v as usize] == i)
    }

    /// Verifies the inverse index and the prefix coherence of window `w`.
    pub fn check_invariants(&self, w: Window) -> Result<(), String> {
        for i in w.x..w.e {
            let v = self.v_list[i];
            if self.rev_idx[v as usize] != i {
                return Err(format!("rev_idx[{v}] != {i}"));
            }
        }

        for &u in &self.v_list[w.x..w.e] {
            let list = &self.adj[u as usize];
            let n_prefix = self.p_neighbors(u, w).count();
            let n_in_p = list
                .iter()
                .filter(|&&x| w.in_p(self.rev_idx[x as usize]))
                .count();
            if n_prefix != n_in_p {
                return Err(format!(
                    "prefix of {u} has {n_prefix} vertices in P but {n_in_p} \
                    neighbors are in P: {list:?}"
                ));
            }
        }

        Ok(())
    }
}

fn swap_positions(
    v_list: &mut [Vertex],
    rev_idx: &mut [usize],
    i: usize,
    j: usize,
) {
    v_list.swap(i, j);
    rev_idx[v_list[i] as usize] = i;
    rev_idx[v_list[j] as usize] = j;
}

////////////////////////////////////////////////////////////////////////////////
//
// Extension
//
////////////////////////////////////////////////////////////////////////////////

/// Scope of a child frame. Gives access to the partition with the narrowed
/// window and restores the parent window when dropped.
pub struct Extension<'a> {
    part: &'a mut Partition,
    parent: Window,
    child: Window,
    cand: Vertex,
}

impl<'a> Extension<'a> {
    pub fn child(&self) -> Window {
        self.child
    }

    pub fn candidate(&self) -> Vertex {
        self.cand
    }
}

impl<'a> Deref for Extension<'a> {
    type Target = Partition;

    fn deref(&self) -> &Partition {
        &*self.part
    }
}

impl<'a> DerefMut for Extension<'a> {
    fn deref_mut(&mut self) -> &mut Partition {
        &mut *self.part
    }
}

impl<'a> Drop for Extension<'a> {
    fn drop(&mut self) {
        self.part.retract(self.parent, self.child, self.cand);
    }
}
