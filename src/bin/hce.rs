//! hce CLI entry point.
//!
//! ```bash
//! hce embed network.txt -w RA1 -a EA -o coords.txt
//! hce generate 500 8 synthetic --seed 7
//! ```

use std::io::{self, Write};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use hce::io::{read_edge_list_file, save_generated, write_positions, write_positions_file};
use hce::{
    generate_seeded, AngularMode, ClassicalMds, Embedder, EmbeddingConfig, SpectralEmbedding,
    WeightingScheme,
};

/// Hyperbolic coalescent embedding of complex networks.
#[derive(Parser, Debug)]
#[command(name = "hce", version, about)]
struct Cli {
    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Embed an edge-list file into the hyperbolic disk
    Embed {
        /// Edge list: two node ids per line, `#` starts a comment
        input: String,

        /// Pre-weighting scheme (RA1, RA2, EBC)
        #[arg(short, long, default_value = "RA1")]
        weighting: WeightingScheme,

        /// Angular adjustment (CA, EA)
        #[arg(short, long, default_value = "EA")]
        angular: AngularMode,

        /// Dimension reduction method
        #[arg(short, long, value_enum, default_value_t = ReducerKind::Spectral)]
        reducer: ReducerKind,

        /// Curvature parameter of the radial formula
        #[arg(short, long, default_value = "1.0")]
        zeta: f64,

        /// Angle for nodes the reducer collapses to the origin
        #[arg(long)]
        fallback_angle: Option<f64>,

        /// Write `id x y` lines here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Sample a graph from the hyperbolic random graph model
    Generate {
        /// Number of nodes
        nodes: usize,

        /// Target average degree
        avg_degree: f64,

        /// Writes `<prefix>_edgelist.txt` and `<prefix>_position.txt`
        prefix: String,

        #[arg(short, long, default_value = "0")]
        seed: u64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ReducerKind {
    Spectral,
    Mds,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("error: cannot install logger: {}", e);
        process::exit(1);
    }

    let outcome = match cli.command {
        Command::Embed {
            input,
            weighting,
            angular,
            reducer,
            zeta,
            fallback_angle,
            output,
        } => {
            let config = EmbeddingConfig {
                weighting,
                angular,
                zeta,
                zero_norm_fallback: fallback_angle,
            };
            run_embed(&input, config, reducer, output.as_deref())
        }
        Command::Generate {
            nodes,
            avg_degree,
            prefix,
            seed,
        } => run_generate(nodes, avg_degree, &prefix, seed),
    };

    if let Err(e) = outcome {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run_embed(
    input: &str,
    config: EmbeddingConfig,
    reducer: ReducerKind,
    output: Option<&str>,
) -> hce::Result<()> {
    let graph = read_edge_list_file(input)?;
    let embedder = Embedder::new(config);
    let embedder = match reducer {
        ReducerKind::Spectral => embedder.with_reducer(SpectralEmbedding::default()),
        ReducerKind::Mds => embedder.with_reducer(ClassicalMds),
    };
    let embedding = embedder.embed(&graph)?;

    match output {
        Some(path) => write_positions_file(&embedding, path)?,
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_positions(&embedding, &mut lock)?;
            lock.flush()?;
        }
    }
    eprintln!(
        "embedded {} nodes (alpha = {:.3}, beta = {:.3})",
        embedding.len(),
        embedding.alpha(),
        embedding.beta()
    );
    Ok(())
}

fn run_generate(nodes: usize, avg_degree: f64, prefix: &str, seed: u64) -> hce::Result<()> {
    let (graph, positions) = generate_seeded(nodes, avg_degree, seed)?;
    let (edges, coords) = save_generated(prefix, &graph, &positions)?;
    eprintln!(
        "generated {} nodes, {} edges (average degree {:.2}) -> {}, {}",
        graph.node_count(),
        graph.edge_count(),
        2.0 * graph.edge_count() as f64 / nodes as f64,
        edges.display(),
        coords.display()
    );
    Ok(())
}
