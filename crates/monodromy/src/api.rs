//! Curated API surface.
//!
//! Important
//! - Convenience re-exports for callers that want the whole pipeline without
//!   reaching into individual modules.
//! - `compute_monodromy` is the one-call entry: fundamental group, parallel edge
//!   integration, composition, input-order matrices.

use num_complex::Complex64;

// Exact arithmetic
pub use crate::rational::{rationalize, simple_rational, QComplex};
// Geometry helpers
pub use crate::geom2::{invert_permutation, is_clockwise, point_along_path, simplify_path, GeomCfg};
// Decomposition and loops
pub use crate::fundamental_group::FundamentalGroup;
pub use crate::voronoi::{decompose, Decomposition, VoronoiCfg};
// Integration
pub use crate::integrate::{
    ContinuationFailure, DiagonalFuchsian, DifferentialOperator, IntegrationCfg, Integrator,
    Precision, Staleness, TransitionMatrix,
};
// Basepoint
pub use crate::basepoint::{choose_basepoint, default_basepoint, BasepointCfg};

use crate::error::Result;

/// All tunables of `compute_monodromy`.
#[derive(Clone, Debug, Default)]
pub struct MonodromyCfg {
    pub voronoi: VoronoiCfg,
    pub geom: GeomCfg,
    pub integration: IntegrationCfg,
    pub basepoint: BasepointCfg,
}

/// Transition matrices of `operator` around each critical point, in input order.
///
/// `basepoint = None` picks one with `choose_basepoint`.
pub fn compute_monodromy<L: DifferentialOperator>(
    critical: &[Complex64],
    basepoint: Option<Complex64>,
    operator: L,
    cfg: &MonodromyCfg,
) -> Result<Vec<TransitionMatrix>> {
    let basepoint = match basepoint {
        Some(b) => b,
        None => choose_basepoint(critical, &cfg.basepoint)?,
    };
    let group = FundamentalGroup::new(critical, basepoint, &cfg.voronoi, &cfg.geom)?;
    let mut integrator = Integrator::new(&group, operator, cfg.integration)?;
    integrator.transition_matrices_in_input_order()
}
