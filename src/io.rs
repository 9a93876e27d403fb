//! Plain-text edge lists and position tables.
//!
//! Edge list: one edge per line, two whitespace-separated node identifiers,
//! anything after them ignored. Blank lines and lines starting with `#` are
//! skipped.
//!
//! Position table: one node per line, `id x y`.
//!
//! A generated graph is saved as the pair `<prefix>_edgelist.txt` and
//! `<prefix>_position.txt`.

use std::fmt::Display;
use std::fs::File;
use std::hash::Hash;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::embedding::Embedding;
use crate::error::{Error, Result};
use crate::geometry::PolarCoord;
use crate::graph::Graph;

/// Parse an edge list. Self-loops are dropped and duplicate edges collapse.
pub fn read_edge_list<R: BufRead>(reader: R) -> Result<Graph<String>> {
    let mut graph = Graph::new();
    let mut dropped = 0usize;
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(a), Some(b)) = (fields.next(), fields.next()) else {
            return Err(Error::Parse {
                line: lineno + 1,
                message: format!("expected two node identifiers, got {:?}", line),
            });
        };
        if !graph.add_edge(a.to_string(), b.to_string()) {
            dropped += 1;
        }
    }
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        dropped,
        "read edge list"
    );
    Ok(graph)
}

pub fn read_edge_list_file<P: AsRef<Path>>(path: P) -> Result<Graph<String>> {
    let file = File::open(path)?;
    read_edge_list(BufReader::new(file))
}

/// Write one `a b` line per edge.
pub fn write_edge_list<N, W>(graph: &Graph<N>, writer: W) -> Result<()>
where
    N: Clone + Eq + Hash + Display,
    W: Write,
{
    let mut w = BufWriter::new(writer);
    for (a, b) in graph.edges() {
        if let (Some(a), Some(b)) = (graph.node(a), graph.node(b)) {
            writeln!(w, "{} {}", a, b)?;
        }
    }
    w.flush()?;
    Ok(())
}

/// Write one `id x y` line per embedded node.
pub fn write_positions<N, W>(embedding: &Embedding<N>, writer: W) -> Result<()>
where
    N: Clone + Eq + Hash + Display,
    W: Write,
{
    let mut w = BufWriter::new(writer);
    for (node, coord) in embedding.iter() {
        writeln!(w, "{} {:.10} {:.10}", node, coord.x, coord.y)?;
    }
    w.flush()?;
    Ok(())
}

/// Write an embedding to `path`, one `id x y` line per node.
pub fn write_positions_file<N, P>(embedding: &Embedding<N>, path: P) -> Result<()>
where
    N: Clone + Eq + Hash + Display,
    P: AsRef<Path>,
{
    write_positions(embedding, File::create(path)?)
}

/// `<prefix>_edgelist.txt` and `<prefix>_position.txt`.
pub fn generated_paths<P: AsRef<Path>>(prefix: P) -> (PathBuf, PathBuf) {
    let with_suffix = |suffix: &str| {
        let mut name = prefix.as_ref().as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    };
    (with_suffix("_edgelist.txt"), with_suffix("_position.txt"))
}

/// Save a generated graph and its ground-truth positions next to each other.
/// Returns the edge-list and position paths.
pub fn save_generated<P: AsRef<Path>>(
    prefix: P,
    graph: &Graph<usize>,
    positions: &[PolarCoord],
) -> Result<(PathBuf, PathBuf)> {
    let (edges, coords) = generated_paths(prefix);
    write_edge_list(graph, File::create(&edges)?)?;
    write_polar_positions(positions, File::create(&coords)?)?;
    debug!(edges = %edges.display(), positions = %coords.display(), "saved generated graph");
    Ok((edges, coords))
}

/// Write ground-truth polar positions as `index x y` lines.
pub fn write_polar_positions<W: Write>(positions: &[PolarCoord], writer: W) -> Result<()> {
    let mut w = BufWriter::new(writer);
    for (i, p) in positions.iter().enumerate() {
        let (x, y) = p.to_cartesian();
        writeln!(w, "{} {:.10} {:.10}", i, x, y)?;
    }
    w.flush()?;
    Ok(())
}
