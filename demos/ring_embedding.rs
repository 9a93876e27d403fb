//! Ring Embedding
//!
//! Embeds a ring of 12 nodes with every weighting scheme and both angular
//! modes. A ring has no hubs, so all radii are close together and the
//! interesting part is whether neighbours stay neighbours on the circle.
//!
//! ```bash
//! cargo run --example ring_embedding
//! ```

use std::f64::consts::PI;

use hce::{AngularMode, Embedder, EmbeddingConfig, Graph, WeightingScheme};

fn main() {
    println!("Ring Embedding");
    println!("==============\n");

    let n = 12u32;
    let ring = Graph::from_edges((0..n).map(|i| (i, (i + 1) % n)));

    println!("{:<6} {:<4} {:>12} {:>10}", "scheme", "mode", "adjacent gap", "max radius");
    for weighting in WeightingScheme::ALL {
        for angular in AngularMode::ALL {
            let config = EmbeddingConfig {
                weighting,
                angular,
                // every node of a ring is alike
                zero_norm_fallback: Some(0.0),
                ..Default::default()
            };
            match Embedder::new(config).embed(&ring) {
                Ok(emb) => {
                    let coords = emb.coords();
                    let mean_gap = (0..n as usize)
                        .map(|i| {
                            let d = (coords[i].angle() - coords[(i + 1) % n as usize].angle())
                                .rem_euclid(2.0 * PI);
                            d.min(2.0 * PI - d)
                        })
                        .sum::<f64>()
                        / n as f64;
                    let max_r = coords.iter().map(|c| c.radius()).fold(0.0, f64::max);
                    println!(
                        "{:<6} {:<4} {:>12.4} {:>10.4}",
                        weighting.name(),
                        angular.name(),
                        mean_gap,
                        max_r
                    );
                }
                Err(e) => println!("{:<6} {:<4} failed: {}", weighting.name(), angular.name(), e),
            }
        }
    }

    println!("\nIdeal adjacent gap: {:.4} (2*pi/{})", 2.0 * PI / n as f64, n);
}
