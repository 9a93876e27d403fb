//! Synthetic Recovery
//!
//! Samples graphs from the hyperbolic random graph model, embeds them and
//! compares the recovered coordinates with the hidden ones:
//!
//! - radii by Spearman correlation (degree rank should mirror true radius)
//! - hyperbolic distances by Pearson correlation over all node pairs
//!
//! ```bash
//! cargo run --example synthetic_recovery --release
//! ```

use hce::eval::{pearson, spearman};
use hce::{
    generate_seeded, AngularMode, Embedder, EmbeddingConfig, HyperbolicDisk, PolarCoord,
    WeightingScheme,
};

fn main() {
    println!("Synthetic Recovery");
    println!("==================\n");

    let disk = HyperbolicDisk::default();

    println!(
        "{:>5} {:>5} {:<6} {:<4} {:>7} {:>9} {:>9}",
        "n", "k", "scheme", "mode", "alpha", "radius rho", "dist r"
    );
    for (n, k) in [(200, 6.0), (500, 8.0)] {
        let (graph, truth) = match generate_seeded(n, k, 11) {
            Ok(sample) => sample,
            Err(e) => {
                eprintln!("generation failed: {}", e);
                continue;
            }
        };

        for weighting in WeightingScheme::ALL {
            for angular in AngularMode::ALL {
                let config = EmbeddingConfig {
                    weighting,
                    angular,
                    zero_norm_fallback: Some(0.0),
                    ..Default::default()
                };
                let emb = match Embedder::new(config).embed(&graph) {
                    Ok(emb) => emb,
                    Err(e) => {
                        println!("{:>5} {:>5} {:<6} {:<4} failed: {}", n, k, weighting, angular, e);
                        continue;
                    }
                };

                let recovered: Vec<PolarCoord> = graph
                    .nodes()
                    .filter_map(|node| emb.get(node))
                    .map(|c| c.polar())
                    .collect();
                let radii: Vec<f64> = recovered.iter().map(|p| p.r).collect();
                let true_radii: Vec<f64> = truth.iter().map(|p| p.r).collect();
                let rho = spearman(&radii, &true_radii).unwrap_or(f64::NAN);

                let mut d_rec = Vec::new();
                let mut d_true = Vec::new();
                for i in 0..n {
                    for j in (i + 1)..n {
                        d_rec.push(disk.distance(&recovered[i], &recovered[j]));
                        d_true.push(disk.distance(&truth[i], &truth[j]));
                    }
                }
                let r = pearson(&d_rec, &d_true).unwrap_or(f64::NAN);

                println!(
                    "{:>5} {:>5.1} {:<6} {:<4} {:>7.3} {:>9.3} {:>9.3}",
                    n,
                    k,
                    weighting,
                    angular,
                    emb.alpha(),
                    rho,
                    r
                );
            }
        }
    }
}
