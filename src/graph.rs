use itertools::Itertools;
use std::borrow::Borrow;
use std::fmt;
use std::ops::Range;

use crate::error::{Malformed, Result};

pub type VInt = u32;
pub type Vertex = VInt;
pub type Edge = (Vertex, Vertex);

/// Largest number of vertices accepted by [`Graph::from_edges`]
pub const MAX_VERTICES: usize = 1 << 27;

/// Undirected simple graph stored as adjacency lists.
///
/// The order of each neighbor list is the order in which the edges were
/// given. It decides tie-breaks during the search, so it is preserved unless
/// [`Graph::canonicalize`] is called.
#[derive(Clone, Debug, PartialEq)]
pub struct Graph {
    neighbors: Vec<Vec<Vertex>>,
    n_edges: usize,
}

impl Eq for Graph {}

impl Graph {
    /// Make a graph from an edge list.
    ///
    /// Vertex IDs must be in `0..num_vertices`, and `num_vertices` must not
    /// exceed [`MAX_VERTICES`]. Loops and duplicate edges (in either
    /// direction) are rejected.
    pub fn from_edges<E>(num_vertices: usize, edges: E) -> Result<Graph>
    where
        E: IntoIterator,
        E::Item: Borrow<Edge>,
    {
        if num_vertices > MAX_VERTICES {
            return Err(Malformed::TooManyVertices(num_vertices).into());
        }

        let mut neighbors = vec![vec![]; num_vertices];
        let mut seen = vec![];
        for e in edges {
            let (s, t) = *e.borrow();
            if s as usize >= num_vertices || t as usize >= num_vertices {
                return Err(
                    Malformed::VertexOutOfRange(s, t, num_vertices).into()
                );
            }
            if s == t {
                return Err(Malformed::SelfLoop(s).into());
            }
            neighbors[s as usize].push(t);
            neighbors[t as usize].push(s);
            seen.push((s.min(t), s.max(t)));
        }

        seen.sort_unstable();
        if let Some((e, _)) = seen.iter().tuple_windows().find(|(x, y)| x == y)
        {
            return Err(Malformed::DuplicateEdge(e.0, e.1).into());
        }

        Ok(Graph {
            neighbors,
            n_edges: seen.len(),
        })
    }

    pub fn num_vertices(&self) -> usize {
        self.neighbors.len()
    }

    /// Returns the number of undirected edges
    pub fn num_edges(&self) -> usize {
        self.n_edges
    }

    pub fn vertices(&self) -> Range<Vertex> {
        0..(self.neighbors.len() as Vertex)
    }

    pub fn degree(&self, v: Vertex) -> usize {
        self.neighbors[v as usize].len()
    }

    pub fn max_degree(&self) -> usize {
        self.neighbors.iter().map(|x| x.len()).max().unwrap_or(0)
    }

    pub fn neighbors(&self, v: Vertex) -> &[Vertex] {
        &self.neighbors[v as usize]
    }

    pub fn is_adjacent(&self, u: Vertex, v: Vertex) -> bool {
        self.neighbors(u).contains(&v)
    }

    /// Sorts every neighbor list so that graphs with the same edge set behave
    /// identically regardless of the input order of the edges.
    pub fn canonicalize(&mut self) {
        for nbrs in &mut self.neighbors {
            nbrs.sort_unstable();
        }
    }

    /// Adjacency lists used as the initial working copy of a search
    pub(crate) fn adjacency(&self) -> &Vec<Vec<Vertex>> {
        &self.neighbors
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Number of vertices: {}", self.num_vertices())?;
        writeln!(f, "Number of edges: {}", self.num_edges())?;
        for u in self.vertices() {
            writeln!(f, "{u}: {}", self.neighbors(u).iter().join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_graph_from_simple_edges() {
        //   v0
        //  /  \
        // v1--v2
        let edges = [(0, 1), (0, 2), (1, 2)];

        let g = Graph::from_edges(3, &edges).unwrap();
        assert_eq!(g.neighbors, vec![vec![1, 2], vec![0, 2], vec![0, 1]]);
        assert_eq!(g.num_edges(), 3);
        assert_eq!(g.max_degree(), 2);
    }

    #[test]
    fn test_graph_keeps_input_order() {
        let edges = [(2, 0), (1, 2), (0, 1), (3, 2)];

        let mut g = Graph::from_edges(4, &edges).unwrap();
        assert_eq!(g.neighbors(2), &[0, 1, 3]);
        assert_eq!(g.neighbors(0), &[2, 1]);
        assert_eq!(g.degree(3), 1);

        g.canonicalize();
        assert_eq!(g.neighbors(0), &[1, 2]);
    }

    #[test]
    fn test_graph_isolated_vertices() {
        let g = Graph::from_edges(5, &[(1, 3)]).unwrap();
        assert_eq!(g.num_vertices(), 5);
        assert_eq!(g.degree(0), 0);
        assert!(g.is_adjacent(3, 1));
        assert!(!g.is_adjacent(0, 1));
    }

    #[test]
    fn test_graph_rejects_loops_and_duplicates() {
        let r = Graph::from_edges(3, &[(0, 1), (2, 2)]);
        assert!(matches!(
            r,
            Err(Error::MalformedInput(Malformed::SelfLoop(2)))
        ));

        let r = Graph::from_edges(3, &[(0, 1), (1, 2), (1, 0)]);
        assert!(matches!(
            r,
            Err(Error::MalformedInput(Malformed::DuplicateEdge(0, 1)))
        ));

        let r = Graph::from_edges(3, &[(0, 3)]);
        assert!(matches!(
            r,
            Err(Error::MalformedInput(Malformed::VertexOutOfRange(0, 3, 3)))
        ));
    }

    #[test]
    fn test_graph_rejects_too_many_vertices() {
        let r = Graph::from_edges(MAX_VERTICES + 1, &[] as &[Edge]);
        assert!(matches!(
            r,
            Err(Error::MalformedInput(Malformed::TooManyVertices(n)))
                if n == MAX_VERTICES + 1
        ));

        let r = Graph::from_edges(usize::MAX, &[(0, 1)]);
        assert!(matches!(
            r,
            Err(Error::MalformedInput(Malformed::TooManyVertices(_)))
        ));
    }

    #[test]
    fn test_graph_display() {
        let g = Graph::from_edges(3, &[(0, 1), (0, 2)]).unwrap();
        assert_eq!(
            g.to_string(),
            "Number of vertices: 3\nNumber of edges: 2\n0: 1 2\n1: 0\n2: 0\n"
        );
    }
}
