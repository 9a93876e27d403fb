//! Hyperbolic coalescent embedding of complex networks.
//!
//! Place every node of an undirected graph in the 2-D hyperbolic disk:
//! popular (high-degree) nodes near the centre, topologically similar nodes at
//! similar angles.
//!
//! # Pipeline
//!
//! | Step | Module | Output |
//! |------|--------|--------|
//! | Pre-weighting | [`weights`] | `n x n` symmetric non-negative matrix |
//! | Dimension reduction | [`reducer`] | `n x 2` raw coordinates |
//! | Angular adjustment | [`angular`] | `n` unit vectors |
//! | Exponent fit | [`powerlaw`] | degree exponent `alpha` |
//! | Radial placement | [`radial`] | `n` radii, by degree rank |
//! | Composition | [`embedding`] | node -> `(x, y)` |
//!
//! # Which Options Should I Use?
//!
//! | Option | Choices | Notes |
//! |--------|---------|-------|
//! | Weighting | **RA1**, RA2, EBC | RA1 uses every pair; RA2 and EBC only edges |
//! | Angular | CA, **EA** | EA spaces nodes evenly and keeps only their order |
//! | Reducer | **spectral**, MDS, your own | anything implementing [`ManifoldReducer`] |
//!
//! # Example
//!
//! ```
//! use hce::{Embedder, EmbeddingConfig, Graph};
//!
//! let ring = Graph::from_edges((0..6).map(|i| (i, (i + 1) % 6)));
//! let embedding = Embedder::new(EmbeddingConfig::default()).embed(&ring).unwrap();
//! assert_eq!(embedding.len(), 6);
//! ```
//!
//! # Why Coalescent?
//!
//! In the popularity-similarity model a network grows in a hyperbolic disk:
//! a node's radius reflects how early it arrived (and so its degree), its
//! angle reflects what it is similar to. Spectral and MDS reductions of a
//! suitably weighted adjacency structure make nodes of the same angular
//! neighbourhood *coalesce*, so their angular order can be read off directly;
//! radii follow from degree ranks alone.
//!
//! # Scale
//!
//! Pre-weighting touches every node pair and the reducers solve a dense
//! eigenproblem: use this for graphs of thousands of nodes, not millions.
//!
//! # References
//!
//! - Muscoloni, Thomas, Ciucci, Bianconi & Cannistraci (2017): "Machine learning meets complex
//!   networks via coalescent embedding in the hyperbolic space"
//! - Papadopoulos et al. (2012): "Popularity versus similarity in growing networks"
//! - Krioukov et al. (2010): "Hyperbolic geometry of complex networks"
//! - Clauset, Shalizi & Newman (2009): "Power-law distributions in empirical data"

pub mod angular;
pub mod embedding;
pub mod error;
pub mod eval;
pub mod generator;
pub mod geometry;
pub mod graph;
pub mod io;
pub mod powerlaw;
pub mod radial;
pub mod reducer;
pub mod weights;

pub use angular::{angle_between, circular_adjustment, equidistant_adjustment, AngularMode};
pub use embedding::{compose, embed, Coordinate, Embedder, Embedding, EmbeddingConfig};
pub use error::{Error, Result, Stage};
pub use generator::{generate, generate_seeded};
pub use geometry::{HyperbolicDisk, PolarCoord};
pub use graph::Graph;
pub use powerlaw::{DiscreteMle, ExponentEstimator, FixedExponent, PowerLawConfig};
pub use radial::{beta_from_exponent, radial_coords, DegreeRanking};
pub use reducer::{ClassicalMds, ManifoldReducer, SpectralConfig, SpectralEmbedding};
pub use weights::{build_weights, WeightingScheme};
