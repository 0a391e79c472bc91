use bkclique::bk::{MaximalCliques, SearchOptions, VertexOrdering};
use bkclique::file::*;
use clap::Parser;
use env_logger::{Builder, Env};
use itertools::Itertools;
use log::error;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

/// Maximal-clique enumeration by the Bron-Kerbosch algorithm with pivoting
#[derive(Parser, Debug, Serialize)]
#[command(author, version, about)]
struct Args {
    /// Number of times to repeat the enumeration (for profiling)
    #[arg(long, default_value_t = 1)]
    repeat: usize,

    /// Order in which top-level vertices are processed
    #[arg(long, value_enum, default_value_t = SearchOptions::default().ordering)]
    ordering: VertexOrdering,

    /// Sort adjacency lists before the search
    #[arg(long)]
    canonical: bool,

    /// Print the adjacency lists to stderr
    #[arg(long)]
    print_graph: bool,

    /// Record the search tree and export it as CSV. The file name must be
    /// attached with `=` (`-e=FILE`, `--export-tree=FILE`); a separate word
    /// is read as GRAPH.
    #[arg(
        short,
        long,
        value_name = "FILE",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "search_tree.csv"
    )]
    export_tree: Option<PathBuf>,

    /// Graph file (`num_vertices num_edges` followed by edges); reads the
    /// standard input if omitted or `-`
    graph: Option<PathBuf>,
}

#[derive(Serialize)]
struct TreeSection<'a> {
    search_tree: &'a TreeReport,
}

fn init_logger() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = buf.timestamp_micros();
            writeln!(
                buf,
                "[{} {} {}] {}",
                ts,
                record.level(),
                record.module_path().unwrap_or(""),
                record.args()
            )
        })
        .init();
}

fn print_result(r: &RunResult) {
    println!(
        "  \
  clique_count: {}
  search_sec: {}
  degeneracy: {}
  recursion_count: {}",
        r.clique_count, r.search_sec, r.degeneracy, r.recursion_count
    );
}

fn print_yaml<T: Serialize>(x: &T) {
    if let Err(e) = serde_yaml::to_writer(std::io::stdout(), x) {
        error!("failed to write the report: {e}");
    }
}

fn main() -> ExitCode {
    init_logger();

    let args = Args::parse();

    println!("---");
    println!("command: {}", std::env::args().join(" "));
    print_yaml(&args);

    let path = args.graph.clone().unwrap_or_else(|| PathBuf::from("-"));
    let mut g = match read_graph_file(&path) {
        Ok(g) => g,
        Err(e) => {
            error!("{}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    };
    if args.canonical {
        g.canonicalize();
    }
    if args.print_graph {
        eprint!("{g}");
    }

    let opt = SearchOptions {
        ordering: args.ordering,
        record_tree: args.export_tree.is_some(),
    };
    let mc = MaximalCliques::new(&g, opt);

    let wholestart = Instant::now();
    println!("results:");

    let mut last_tree = None;
    for index in 0..args.repeat {
        println!("- index: {index}");

        let out = mc.run();
        print_result(&RunResult {
            index,
            clique_count: out.clique_count,
            search_sec: out.elapsed.as_secs_f32(),
            degeneracy: out.degeneracy,
            recursion_count: out.recursion_count,
        });
        last_tree = out.tree;
    }

    println!("whole_sec: {}", wholestart.elapsed().as_secs_f32());

    if let (Some(path), Some(tree)) = (&args.export_tree, &last_tree) {
        // The count is already reported; a failed export is not fatal
        let export = match export_search_tree(path, tree) {
            Ok(()) => Some(path.display().to_string()),
            Err(e) => {
                error!("{e}");
                None
            }
        };
        print_yaml(&TreeSection {
            search_tree: &TreeReport {
                stats: tree.stats(),
                export,
            },
        });
    }

    ExitCode::SUCCESS
}
