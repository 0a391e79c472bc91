use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::graph::Vertex;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The graph cannot be built from the given input. The run must be
    /// aborted without reporting a clique count.
    #[error("malformed input: {0}")]
    MalformedInput(#[from] Malformed),

    /// The search tree cannot be written. The clique count is still valid.
    #[error("cannot export the search tree to '{}': {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Reasons why an input graph is rejected
#[derive(Debug, Error)]
pub enum Malformed {
    #[error("cannot read the input stream: {0}")]
    Unreadable(#[source] io::Error),

    #[error("missing header; expected `num_vertices num_edges`")]
    MissingHeader,

    #[error("cannot parse '{token}' at line {line}")]
    BadToken { line: usize, token: String },

    #[error("{expected} edges are declared but the input ends after {found}")]
    Truncated { expected: usize, found: usize },

    #[error("edge ({0}, {1}) has an endpoint outside 0..{2}")]
    VertexOutOfRange(Vertex, Vertex, usize),

    #[error("self loop on vertex {0}")]
    SelfLoop(Vertex),

    #[error("duplicate edge ({0}, {1})")]
    DuplicateEdge(Vertex, Vertex),

    #[error("too many vertices: {0} (at most {})", crate::graph::MAX_VERTICES)]
    TooManyVertices(usize),
}
