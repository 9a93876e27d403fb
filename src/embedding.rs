//! The coalescent embedding pipeline.
//!
//! ```text
//! graph ─▶ weights ─▶ reducer ─▶ angular adjustment ─┐
//!   │                                                 ├─▶ compose ─▶ node -> (x, y)
//!   └──▶ degrees ─▶ exponent fit ─▶ beta ─▶ radii ────┘
//! ```
//!
//! Angles are indexed by graph index, radii by degree rank. [`compose`] reads
//! each node's radius through the [`DegreeRanking`] so neither side needs to be
//! reordered.

use std::collections::HashMap;
use std::f64::consts::TAU;
use std::hash::Hash;

use ndarray::{Array2, ArrayView2};
use tracing::{debug, info, instrument};

use crate::angular::{adjust, AngularMode};
use crate::error::{Error, Result, Stage, StageExt};
use crate::geometry::{HyperbolicDisk, PolarCoord};
use crate::graph::Graph;
use crate::powerlaw::{DiscreteMle, ExponentEstimator};
use crate::radial::{beta_from_exponent, radial_coords, DegreeRanking};
use crate::reducer::{ManifoldReducer, SpectralEmbedding, TARGET_DIM};
use crate::weights::{build_weights, WeightingScheme};

/// Final planar position of a node: `radius * (cos theta, sin theta)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    /// Native hyperbolic radius.
    pub fn radius(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Angle in `[0, 2*pi)`.
    pub fn angle(&self) -> f64 {
        let theta = self.y.atan2(self.x);
        if theta < 0.0 {
            theta + TAU
        } else {
            theta
        }
    }

    pub fn polar(&self) -> PolarCoord {
        PolarCoord::from_cartesian(self.x, self.y)
    }

    /// Same direction, radius mapped into the unit Poincare disk.
    pub fn to_poincare(&self, zeta: f64) -> (f64, f64) {
        let r = self.radius();
        if r == 0.0 {
            return (0.0, 0.0);
        }
        let rho = HyperbolicDisk::new(zeta).to_poincare(r);
        (self.x * rho / r, self.y * rho / r)
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(c: Coordinate) -> Self {
        (c.x, c.y)
    }
}

/// Result of one embedding call: a coordinate per node, in graph index order.
#[derive(Debug, Clone)]
pub struct Embedding<N> {
    nodes: Vec<N>,
    coords: Vec<Coordinate>,
    index: HashMap<N, usize>,
    alpha: f64,
    beta: f64,
}

impl<N> Embedding<N>
where
    N: Clone + Eq + Hash,
{
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, node: &N) -> Option<Coordinate> {
        self.index.get(node).map(|&i| self.coords[i])
    }

    /// `(node, coordinate)` pairs in graph index order.
    pub fn iter(&self) -> impl Iterator<Item = (&N, &Coordinate)> + '_ {
        self.nodes.iter().zip(self.coords.iter())
    }

    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn coords(&self) -> &[Coordinate] {
        &self.coords
    }

    /// Fitted degree exponent.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Popularity fading `1 / (alpha - 1)` used for the radii.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn into_map(self) -> HashMap<N, (f64, f64)> {
        self.nodes
            .into_iter()
            .zip(self.coords)
            .map(|(n, c)| (n, c.into()))
            .collect()
    }
}

/// Options of an embedding run.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingConfig {
    pub weighting: WeightingScheme,
    pub angular: AngularMode,
    /// Curvature parameter of the radial formula.
    pub zeta: f64,
    /// Angle for nodes the reducer collapses to the origin. `None` fails the
    /// run with a degenerate-input error instead.
    pub zero_norm_fallback: Option<f64>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            weighting: WeightingScheme::Ra1,
            angular: AngularMode::Equidistant,
            zeta: 1.0,
            zero_norm_fallback: None,
        }
    }
}

/// Multiply each node's unit vector by the radius of its degree rank.
///
/// `angular` is in graph index order, `radii` in rank order (element 0 is rank
/// 1); `ranking` translates between them.
pub fn compose(
    angular: ArrayView2<'_, f64>,
    ranking: &DegreeRanking,
    radii: &[f64],
) -> Result<Vec<Coordinate>> {
    let (n, dim) = angular.dim();
    if dim != TARGET_DIM || ranking.len() != n {
        return Err(Error::DimensionMismatch {
            expected: (ranking.len(), TARGET_DIM),
            actual: (n, dim),
        });
    }
    if radii.len() != n {
        return Err(Error::DimensionMismatch {
            expected: (n, 1),
            actual: (radii.len(), 1),
        });
    }
    Ok((0..n)
        .map(|i| {
            let r = radii[ranking.rank(i) - 1];
            Coordinate {
                x: r * angular[[i, 0]],
                y: r * angular[[i, 1]],
            }
        })
        .collect())
}

/// Embedding pipeline with injectable reducer and exponent estimator.
pub struct Embedder {
    config: EmbeddingConfig,
    reducer: Box<dyn ManifoldReducer>,
    estimator: Box<dyn ExponentEstimator>,
}

impl Default for Embedder {
    fn default() -> Self {
        Self::new(EmbeddingConfig::default())
    }
}

impl Embedder {
    /// Spectral reducer and discrete MLE exponent fit.
    pub fn new(config: EmbeddingConfig) -> Self {
        Self {
            config,
            reducer: Box::new(SpectralEmbedding::default()),
            estimator: Box::new(DiscreteMle::default()),
        }
    }

    pub fn with_reducer<R: ManifoldReducer + 'static>(mut self, reducer: R) -> Self {
        self.reducer = Box::new(reducer);
        self
    }

    pub fn with_estimator<E: ExponentEstimator + 'static>(mut self, estimator: E) -> Self {
        self.estimator = Box::new(estimator);
        self
    }

    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }

    pub fn embed<N>(&self, graph: &Graph<N>) -> Result<Embedding<N>>
    where
        N: Clone + Eq + Hash,
    {
        run(graph, &self.config, self.reducer.as_ref(), self.estimator.as_ref())
    }
}

/// Embed `graph` with the given weighting, reducer and angular mode.
///
/// The degree exponent is fitted with [`DiscreteMle`]; use [`Embedder`] to
/// swap it.
pub fn embed<N>(
    graph: &Graph<N>,
    weighting: WeightingScheme,
    reducer: &dyn ManifoldReducer,
    angular: AngularMode,
) -> Result<Embedding<N>>
where
    N: Clone + Eq + Hash,
{
    let config = EmbeddingConfig {
        weighting,
        angular,
        ..Default::default()
    };
    run(graph, &config, reducer, &DiscreteMle::default())
}

#[instrument(
    skip_all,
    fields(nodes = graph.node_count(), scheme = %config.weighting, mode = %config.angular)
)]
fn run<N>(
    graph: &Graph<N>,
    config: &EmbeddingConfig,
    reducer: &dyn ManifoldReducer,
    estimator: &dyn ExponentEstimator,
) -> Result<Embedding<N>>
where
    N: Clone + Eq + Hash,
{
    let n = graph.node_count();
    let weights = build_weights(graph, config.weighting).at(Stage::Weighting)?;
    let degrees = graph.degrees();

    let (reduced, alpha) = reduce_and_fit(&weights, &degrees, reducer, estimator);
    let reduced = reduced.at(Stage::Reduction)?;
    if reduced.dim() != (n, TARGET_DIM) {
        return Err(Error::DimensionMismatch {
            expected: (n, TARGET_DIM),
            actual: reduced.dim(),
        }
        .at(Stage::Reduction));
    }
    debug!(reducer = reducer.name(), "reduced to the plane");

    let alpha = alpha.at(Stage::ExponentFit)?;
    let beta = beta_from_exponent(alpha).at(Stage::ExponentFit)?;

    let angular = adjust(config.angular, reduced.view(), config.zero_norm_fallback)
        .at(Stage::Angular)?;

    let ranking = DegreeRanking::from_degrees(&degrees);
    let radii = radial_coords(&ranking, beta, config.zeta).at(Stage::Radial)?;

    let coords = compose(angular.view(), &ranking, &radii).at(Stage::Composition)?;
    info!(
        nodes = n,
        edges = graph.edge_count(),
        alpha,
        beta,
        estimator = estimator.name(),
        "embedding complete"
    );

    let nodes: Vec<N> = graph.nodes().cloned().collect();
    let index = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.clone(), i))
        .collect();
    Ok(Embedding {
        nodes,
        coords,
        index,
        alpha,
        beta,
    })
}

/// Reduction and exponent fit are independent; run them side by side when
/// the `parallel` feature is on.
fn reduce_and_fit(
    weights: &Array2<f64>,
    degrees: &[usize],
    reducer: &dyn ManifoldReducer,
    estimator: &dyn ExponentEstimator,
) -> (Result<Array2<f64>>, Result<f64>) {
    #[cfg(feature = "parallel")]
    {
        rayon::join(
            || reducer.reduce(weights.view()),
            || estimator.estimate(degrees),
        )
    }
    #[cfg(not(feature = "parallel"))]
    {
        (reducer.reduce(weights.view()), estimator.estimate(degrees))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::powerlaw::FixedExponent;
    use ndarray::array;

    const EPS: f64 = 1e-9;

    struct Collapse;

    impl ManifoldReducer for Collapse {
        fn reduce(&self, matrix: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
            Ok(Array2::zeros((matrix.nrows(), 2)))
        }
    }

    struct WrongShape;

    impl ManifoldReducer for WrongShape {
        fn reduce(&self, matrix: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
            Ok(Array2::ones((matrix.nrows(), 3)))
        }
    }

    fn star() -> Graph<&'static str> {
        Graph::from_edges([("hub", "a"), ("hub", "b"), ("hub", "c"), ("a", "b")])
    }

    #[test]
    fn test_compose_reads_radius_by_rank() {
        // graph index 2 has the highest degree, so it gets radii[0]
        let ranking = DegreeRanking::from_degrees(&[1, 2, 5]);
        let unit = array![[1.0, 0.0], [0.0, 1.0], [-1.0, 0.0]];
        let coords = compose(unit.view(), &ranking, &[0.5, 1.0, 2.0]).unwrap();
        assert!((coords[2].x + 0.5).abs() < EPS);
        assert!((coords[1].y - 1.0).abs() < EPS);
        assert!((coords[0].x - 2.0).abs() < EPS);
    }

    #[test]
    fn test_compose_shape_checked() {
        let ranking = DegreeRanking::from_degrees(&[1, 2]);
        let unit = array![[1.0, 0.0], [0.0, 1.0]];
        match compose(unit.view(), &ranking, &[1.0]) {
            Err(Error::DimensionMismatch { expected, actual }) => {
                assert_eq!(expected, (2, 1));
                assert_eq!(actual, (1, 1));
            }
            other => panic!("unexpected {:?}", other),
        }

        let wide = array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        match compose(wide.view(), &ranking, &[1.0, 2.0]) {
            Err(Error::DimensionMismatch { expected, actual }) => {
                assert_eq!(expected, (2, 2));
                assert_eq!(actual, (2, 3));
            }
            other => panic!("unexpected {:?}", other),
        }

        let short = DegreeRanking::from_degrees(&[1, 2, 3]);
        match compose(unit.view(), &short, &[1.0, 2.0]) {
            Err(Error::DimensionMismatch { expected, actual }) => {
                assert_eq!(expected, (3, 2));
                assert_eq!(actual, (2, 2));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_coordinate_polar_helpers() {
        let c = Coordinate { x: 0.0, y: -2.0 };
        assert!((c.radius() - 2.0).abs() < EPS);
        assert!((c.angle() - 1.5 * std::f64::consts::PI).abs() < EPS);
        let (px, py) = c.to_poincare(1.0);
        assert!(px.abs() < EPS);
        assert!((py + 1.0f64.tanh()).abs() < EPS);
    }

    #[test]
    fn test_hub_gets_smallest_radius() {
        let g = star();
        // a and b are twins; their reduced rows may cancel
        let config = EmbeddingConfig {
            zero_norm_fallback: Some(0.0),
            ..Default::default()
        };
        let emb = Embedder::new(config)
            .with_estimator(FixedExponent(3.0))
            .embed(&g)
            .unwrap();
        assert_eq!(emb.len(), 4);
        assert!((emb.beta() - 0.5).abs() < EPS);
        let hub = emb.get(&"hub").unwrap().radius();
        for leaf in ["a", "b", "c"] {
            assert!(hub < emb.get(&leaf).unwrap().radius() + EPS, "leaf {}", leaf);
        }
        // rank 1 radius: (1 - beta) * 2 ln 4
        assert!((hub - 4f64.ln()).abs() < 1e-9, "hub radius {}", hub);
    }

    #[test]
    fn test_invalid_exponent_reported_at_fit_stage() {
        let err = Embedder::default()
            .with_estimator(FixedExponent(1.0))
            .embed(&star())
            .unwrap_err();
        assert_eq!(err.stage(), Some(Stage::ExponentFit));
        assert!(matches!(err.root(), Error::InvalidExponent { .. }));
    }

    #[test]
    fn test_degenerate_reducer_reported_at_angular_stage() {
        let err = Embedder::default()
            .with_reducer(Collapse)
            .embed(&star())
            .unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Angular));
        assert!(matches!(err.root(), Error::DegenerateInput(_)));
    }

    #[test]
    fn test_fallback_angle_rescues_collapse() {
        let config = EmbeddingConfig {
            angular: AngularMode::Circular,
            zero_norm_fallback: Some(0.0),
            ..Default::default()
        };
        let emb = Embedder::new(config).with_reducer(Collapse).embed(&star()).unwrap();
        assert!(emb.coords().iter().all(|c| c.y.abs() < EPS));
    }

    #[test]
    fn test_wrong_reducer_shape() {
        let err = embed(&star(), WeightingScheme::Ra1, &WrongShape, AngularMode::Circular)
            .unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Reduction));
        assert!(matches!(err.root(), Error::DimensionMismatch { .. }));
    }

    #[test]
    fn test_single_node_insufficient() {
        let mut g = Graph::new();
        g.add_node(1u8);
        let err = Embedder::default().embed(&g).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Weighting));
        assert!(matches!(err.root(), Error::InsufficientData(_)));
    }

    #[test]
    fn test_into_map_keeps_every_node() {
        let config = EmbeddingConfig {
            zero_norm_fallback: Some(1.0),
            ..Default::default()
        };
        let emb = Embedder::new(config)
            .with_estimator(FixedExponent(2.5))
            .embed(&star())
            .unwrap();
        let map = emb.into_map();
        assert_eq!(map.len(), 4);
        assert!(map.contains_key("hub"));
    }
}
