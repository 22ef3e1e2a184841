//! Crate error type.
//!
//! Every fatal condition of the pipeline surfaces as one `Error` variant; nothing
//! is logged and then ignored. Geometry and assignment errors are deterministic in
//! the input and never retried. Continuation and singularity errors are only
//! produced after the per-edge retry budget is spent (see `integrate::edges`).

use thiserror::Error;

use crate::integrate::ContinuationFailure;

/// Unified error type for decomposition, loop extraction and integration.
#[derive(Debug, Error)]
pub enum Error {
    /// A Voronoi region does not close into a single bounded loop, or the
    /// decomposition graph is unusable (disconnected, unknown path step).
    #[error("degenerate geometry: {0}")]
    GeometryDegenerate(String),
    /// Two diagram seeds are at the same distance from a critical point.
    #[error("ambiguous region assignment for critical point {point}: seeds {first} and {second} are equidistant")]
    AssignmentAmbiguous {
        point: usize,
        first: usize,
        second: usize,
    },
    /// Precondition violation: non-positive tolerance, coincident input points,
    /// non-finite coordinates or an invalid configuration value.
    #[error("invalid precision or precondition: {0}")]
    PrecisionInvalid(String),
    /// The continuation oracle did not converge within the retry budget.
    #[error("analytic continuation failed along edge {edge} after {attempts} attempts")]
    ContinuationFailure {
        edge: usize,
        attempts: u32,
        #[source]
        source: ContinuationFailure,
    },
    /// The oracle kept returning a non-invertible matrix within the retry budget.
    #[error("transition matrix along edge {edge} is not invertible after {attempts} attempts")]
    SingularTransition { edge: usize, attempts: u32 },
    /// The fixed-size integration pool could not be started.
    #[error("failed to build integration worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
