use clap::ValueEnum;
use serde::Serialize;

/// Order in which top-level vertices are processed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VertexOrdering {
    /// Degeneracy order; bounds the size of P at the top level by the
    /// degeneracy of the graph
    Degeneracy,
    /// Vertex ID order
    Natural,
}

#[derive(Clone, Debug)]
pub struct SearchOptions {
    pub ordering: VertexOrdering,
    pub record_tree: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            ordering: VertexOrdering::Degeneracy,
            record_tree: false,
        }
    }
}
