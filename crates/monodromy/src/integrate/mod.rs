//! Parallel path integration and composition of transition matrices.
//!
//! Purpose
//! - Continue the solutions of a linear differential operator along every
//!   decomposition edge and multiply the edge matrices along each pointed loop.
//!
//! Model
//! - The operator is an opaque oracle (`DifferentialOperator`) that returns the
//!   transition matrix of one straight segment at a requested precision.
//! - Edges are independent: `integrate_edges` maps them over a fixed-size rayon
//!   pool and gathers results by edge index. A failing oracle call is retried
//!   with doubled precision up to `IntegrationCfg::max_tries` attempts.
//! - `compose_transition` removes backtracks from a walk and premultiplies edge
//!   matrices in walk order, using the inverse for steps against an edge's
//!   stored orientation.
//! - `Integrator` caches both layers and exposes typed invalidation.
//!
//! Code cross-refs: `fundamental_group::FundamentalGroup::pointed_loops`,
//! `geom2::{simplify_path, invert_permutation}`.

mod cache;
mod compose;
mod edges;
mod operator;

pub use cache::{Integrator, Staleness};
pub use compose::{compose_transition, EdgeLookup};
pub use edges::{integrate_edge, integrate_edges, IntegratedEdge, IntegrationCfg};
pub use operator::{
    ContinuationFailure, DiagonalFuchsian, DifferentialOperator, Precision, TransitionMatrix,
};

#[cfg(test)]
mod tests;
