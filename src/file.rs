use itertools::Itertools;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use crate::bk::{SearchTree, TreeStats};
use crate::error::{Error, Malformed, Result};
use crate::graph::*;

pub const TREE_CSV_HEADER: &str = "node_id,parent_id,children_ids,\
    cliques_in_subtree,creation_order,depth,candidate_vertex,current_clique,\
    x_size,p_size,pruned_by_pivot";

#[derive(Debug, PartialEq, Serialize)]
pub struct RunResult {
    pub index: usize,
    pub clique_count: usize,
    pub search_sec: f32,
    pub degeneracy: usize,
    pub recursion_count: usize,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct TreeReport {
    pub stats: TreeStats,
    /// Destination of the CSV; `None` if the export failed
    pub export: Option<String>,
}

//------------------------------------------------------------------------------
//
// Graph input
//
//------------------------------------------------------------------------------

/// Returns `(line number, token)` of each whitespace-separated token.
///
/// Empty lines and lines starting with `#` are skipped.
fn tokens<R: BufRead>(r: R) -> impl Iterator<Item = Result<(usize, String)>> {
    r.lines().enumerate().flat_map(|(i, line)| {
        let toks: Vec<Result<_>> = match line {
            Err(e) => vec![Err(Malformed::Unreadable(e).into())],
            Ok(s) if s.trim().is_empty() || s.trim().starts_with('#') => vec![],
            Ok(s) => s
                .split_whitespace()
                .map(|t| Ok((i + 1, t.to_string())))
                .collect(),
        };
        toks
    })
}

fn parse_next<T, I>(it: &mut I) -> Result<Option<T>>
where
    T: FromStr,
    I: Iterator<Item = Result<(usize, String)>>,
{
    match it.next() {
        None => Ok(None),
        Some(Err(e)) => Err(e),
        Some(Ok((line, token))) => match token.parse() {
            Ok(x) => Ok(Some(x)),
            Err(_) => Err(Malformed::BadToken { line, token }.into()),
        },
    }
}

/// Reads a graph given as `num_vertices num_edges` followed by `num_edges`
/// pairs of vertex IDs.
///
/// Tokens after the last declared edge are ignored.
pub fn read_graph<R: BufRead>(r: R) -> Result<Graph> {
    let mut it = tokens(r);

    let (Some(n), Some(m)) =
        (parse_next::<usize, _>(&mut it)?, parse_next::<usize, _>(&mut it)?)
    else {
        return Err(Malformed::MissingHeader.into());
    };

    // `m` is not trusted until the edges are actually read
    let mut edges = Vec::new();
    for found in 0..m {
        let s = parse_next::<Vertex, _>(&mut it)?;
        let t = parse_next::<Vertex, _>(&mut it)?;
        match (s, t) {
            (Some(s), Some(t)) => edges.push((s, t)),
            _ => {
                return Err(Malformed::Truncated { expected: m, found }.into())
            }
        }
    }

    Graph::from_edges(n, &edges)
}

/// Reads a graph from a file, or from the standard input if `path` is `-`.
pub fn read_graph_file<P: AsRef<Path>>(path: P) -> Result<Graph> {
    let path = path.as_ref();
    if path == Path::new("-") {
        return read_graph(io::stdin().lock());
    }
    let f = File::open(path).map_err(Malformed::Unreadable)?;
    read_graph(BufReader::new(f))
}

//------------------------------------------------------------------------------
//
// Search tree output
//
//------------------------------------------------------------------------------

/// Writes the search tree as CSV: a header, the virtual root, and a row for
/// each node in creation order.
///
/// Rows are formatted directly since list fields are always quoted, even
/// when they hold a single ID or nothing, while numbers never are.
/// `csv::QuoteStyle` cannot express that mix.
pub fn write_search_tree<W: Write>(
    mut w: W,
    tree: &SearchTree,
) -> io::Result<()> {
    writeln!(w, "{TREE_CSV_HEADER}")?;
    for r in tree.records() {
        writeln!(
            w,
            "{},{},\"{}\",{},{},{},{},\"{}\",{},{},{}",
            r.node_id,
            r.parent_id,
            r.children_ids.iter().join(";"),
            r.cliques_in_subtree,
            r.creation_order,
            r.depth,
            r.candidate_vertex,
            r.current_clique.iter().join(";"),
            r.x_size,
            r.p_size,
            r.pruned_by_pivot,
        )?;
    }
    w.flush()
}

pub fn export_search_tree<P: AsRef<Path>>(
    path: P,
    tree: &SearchTree,
) -> Result<()> {
    let path = path.as_ref();
    let to_error = |source| Error::Export {
        path: path.to_path_buf(),
        source,
    };
    let f = File::create(path).map_err(to_error)?;
    write_search_tree(BufWriter::new(f), tree).map_err(to_error)
}
