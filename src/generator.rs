//! Hyperbolic random geometric graphs with known node positions.
//!
//! `n` points are dropped uniformly (by hyperbolic area) into a disk of radius
//! `R = 2 ln(8n / (pi k))`, and every pair closer than `R` is joined. The
//! expected average degree is close to `k` and the degree distribution has a
//! power-law tail with exponent about 3. The positions are the ground truth an
//! embedding should approximately recover.

use std::f64::consts::{PI, TAU};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::{HyperbolicDisk, PolarCoord};
use crate::graph::Graph;

/// Disk radius giving expected average degree `avg_degree` for `n` nodes.
pub fn disk_radius(n: usize, avg_degree: f64) -> f64 {
    2.0 * (8.0 * n as f64 / (PI * avg_degree)).ln()
}

/// Uniform point in a hyperbolic disk of radius `radius`.
///
/// The radial density is `sinh(r) / (cosh(R) - 1)`, sampled by inverting its
/// CDF.
pub fn random_position<R: Rng + ?Sized>(radius: f64, rng: &mut R) -> PolarCoord {
    let theta = rng.random::<f64>() * TAU;
    let u = rng.random::<f64>();
    let r = (u * (radius.cosh() - 1.0) + 1.0).acosh();
    PolarCoord { theta, r }
}

/// Generate a graph on nodes `0..n` together with their positions.
pub fn generate<R: Rng + ?Sized>(
    n: usize,
    avg_degree: f64,
    rng: &mut R,
) -> Result<(Graph<usize>, Vec<PolarCoord>)> {
    if n == 0 {
        return Err(Error::InvalidArgument("node count must be positive".into()));
    }
    if !(avg_degree.is_finite() && avg_degree > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "average degree must be positive, got {}",
            avg_degree
        )));
    }
    let radius = disk_radius(n, avg_degree);
    if radius <= 0.0 {
        return Err(Error::InvalidArgument(format!(
            "average degree {} too large for {} nodes (disk radius {:.3})",
            avg_degree, n, radius
        )));
    }

    let disk = HyperbolicDisk::default();
    let mut graph = Graph::new();
    let mut positions = Vec::with_capacity(n);
    for i in 0..n {
        graph.add_node(i);
        let p = random_position(radius, rng);
        for (j, q) in positions.iter().enumerate() {
            if disk.distance(&p, q) < radius {
                graph.add_edge(i, j);
            }
        }
        positions.push(p);
    }

    debug!(
        n,
        radius,
        edges = graph.edge_count(),
        avg_degree = 2.0 * graph.edge_count() as f64 / n as f64,
        "generated hyperbolic random graph"
    );
    Ok((graph, positions))
}

/// [`generate`] with a seeded [`StdRng`].
pub fn generate_seeded(n: usize, avg_degree: f64, seed: u64) -> Result<(Graph<usize>, Vec<PolarCoord>)> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate(n, avg_degree, &mut rng)
}
