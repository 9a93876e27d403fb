//! Error types for the embedding pipeline.

use std::fmt;

/// Pipeline stage that detected a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Similarity matrix construction.
    Weighting,
    /// Manifold reduction to two dimensions.
    Reduction,
    /// Projection onto the unit circle.
    Angular,
    /// Power-law exponent fit of the degree sequence.
    ExponentFit,
    /// Degree ranking and radius assignment.
    Radial,
    /// Merging angles and radii.
    Composition,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Weighting => "weighting",
            Stage::Reduction => "reduction",
            Stage::Angular => "angular",
            Stage::ExponentFit => "exponent-fit",
            Stage::Radial => "radial",
            Stage::Composition => "composition",
        };
        f.write_str(name)
    }
}

/// Errors from graph loading, generation and embedding.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unknown scheme/mode name or out-of-range parameter.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Graph too small to embed.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Zero-norm vector where a direction is required.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// The fitted exponent leaves `beta = 1 / (alpha - 1)` undefined or negative.
    #[error("invalid power-law exponent {alpha}: must be > 1")]
    InvalidExponent {
        /// Exponent returned by the estimator
        alpha: f64,
    },

    /// A matrix or vector had the wrong shape.
    #[error("dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        /// Expected (rows, cols)
        expected: (usize, usize),
        /// Actual (rows, cols)
        actual: (usize, usize),
    },

    /// Failure tagged with the pipeline stage that raised it.
    #[error("{stage} stage failed: {source}")]
    Stage {
        /// Offending stage
        stage: Stage,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Reading an edge list or writing results failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed edge-list line.
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Tag this error with the stage that detected it.
    ///
    /// Already-tagged errors keep their original stage.
    pub fn at(self, stage: Stage) -> Self {
        match self {
            tagged @ Error::Stage { .. } => tagged,
            other => Error::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The stage that raised this error, if it was raised inside the pipeline.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The underlying error kind, with stage tagging stripped.
    pub fn root(&self) -> &Error {
        match self {
            Error::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Attach a [`Stage`] to the error side of a result.
pub(crate) trait StageExt<T> {
    fn at(self, stage: Stage) -> Result<T>;
}

impl<T> StageExt<T> for Result<T> {
    fn at(self, stage: Stage) -> Result<T> {
        self.map_err(|e| e.at(stage))
    }
}
